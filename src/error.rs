use std::fmt::{self, Display};

/// Errors surfaced by the drawing core. Input problems (bad samples, odd
/// widths) are absorbed locally and never show up here.
#[derive(Debug)]
pub enum CanvasError {
    /// The template asset could not be fetched.
    AssetFetch { asset: String, reason: String },
    /// The fetched bytes are not a decodable raster image.
    TemplateDecode(String),
    /// The template decoded to a zero-sized image.
    EmptyTemplate,
    /// `finish()` was called before a template was loaded.
    NotReady,
    /// PNG encoding of the composite failed.
    Encode(String),
    InvalidColor(String),
    Config(String),
}

impl Display for CanvasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanvasError::AssetFetch { asset, reason } => {
                write!(f, "failed to fetch template asset {asset}: {reason}")
            }
            CanvasError::TemplateDecode(s) => write!(f, "failed to decode template: {s}"),
            CanvasError::EmptyTemplate => write!(f, "template image has zero width or height"),
            CanvasError::NotReady => write!(f, "drawing surface is not ready (no template loaded)"),
            CanvasError::Encode(s) => write!(f, "failed to encode composite: {s}"),
            CanvasError::InvalidColor(s) => write!(f, "invalid color: {s}"),
            CanvasError::Config(s) => write!(f, "invalid canvas config: {s}"),
        }
    }
}

impl std::error::Error for CanvasError {}

impl From<image::ImageError> for CanvasError {
    fn from(e: image::ImageError) -> Self {
        CanvasError::TemplateDecode(e.to_string())
    }
}

impl From<serde_json::Error> for CanvasError {
    fn from(e: serde_json::Error) -> Self {
        CanvasError::Config(e.to_string())
    }
}
