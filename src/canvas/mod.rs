mod canvas_transform;
mod surface;

pub use canvas_transform::{CanvasTransform, DisplayRect};
pub use surface::{Surface, SurfaceKind};
