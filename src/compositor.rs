use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::canvas::{Surface, SurfaceKind};
use crate::error::CanvasError;

/// The flattened artwork, PNG-encoded at the template's intrinsic size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

impl EncodedImage {
    pub fn as_bytes(&self) -> &[u8] {
        &self.png
    }

    /// `data:image/png;base64,...`, the form upload endpoints accept as a
    /// single multipart field.
    pub fn to_data_url(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.png))
    }
}

/// Template first, ink over it with standard alpha-over. Neither input is touched.
pub fn flatten(template: &Surface, ink: &Surface) -> Surface {
    let mut out = Surface::from_image(SurfaceKind::Composite, template.pixels().clone());
    out.draw_over(ink);
    out
}

pub fn finish(template: &Surface, ink: &Surface) -> Result<EncodedImage, CanvasError> {
    if template.size() != ink.size() {
        return Err(CanvasError::Encode(format!(
            "layer size mismatch: template {:?}, ink {:?}",
            template.size(),
            ink.size()
        )));
    }
    let composite = flatten(template, ink);
    let png = composite.encode_png()?;
    log::info!(
        "composited {}x{} artwork ({} bytes)",
        composite.width(),
        composite.height(),
        png.len()
    );
    Ok(EncodedImage {
        width: composite.width(),
        height: composite.height(),
        png,
    })
}
