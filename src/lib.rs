mod app;
mod canvas;
mod compositor;
mod config;
mod drawing;
mod engine;
mod error;
mod handoff;
mod math;
mod silhouette;
mod state;
mod template;
#[cfg(target_arch = "wasm32")]
mod web;

// Re-export the main public interface
pub use app::{DrawingSession, init_logging};
pub use canvas::{CanvasTransform, DisplayRect, Surface, SurfaceKind};
pub use compositor::{EncodedImage, finish, flatten};
pub use config::{BrushSettings, CanvasConfig};
pub use drawing::{Tool, ToolConfig, WidthRange, parse_hex_color};
pub use engine::StrokeEngine;
pub use error::CanvasError;
pub use handoff::{ImageUploader, RecordStore, SockRecord, attach_text, submit_artwork};
pub use silhouette::{SilhouetteMask, SilhouetteStrategy};
pub use state::{InputState, PointerEvent, PointerKind, UserInputState};
pub use template::{AssetSource, FsAssetSource, InMemoryAssets, Template, load};

#[cfg(target_arch = "wasm32")]
pub use web::{SockCanvas, WebAssetSource};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg_attr(target_arch = "wasm32", wasm_bindgen(start))]
pub fn start() {
    init_logging();
}
