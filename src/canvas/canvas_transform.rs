/// Where the surface currently sits on screen, in client coordinates.
/// Hosts may display the surface at any size; painting always happens in
/// the surface's intrinsic pixel grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl DisplayRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// A rect showing the surface 1:1 at the client origin.
    pub fn intrinsic(surface_size: (u32, u32)) -> Self {
        Self::new(0.0, 0.0, surface_size.0 as f32, surface_size.1 as f32)
    }
}

pub struct CanvasTransform {
    pub display: DisplayRect,
    pub surface_size: (u32, u32),
}

impl CanvasTransform {
    pub fn new(display: DisplayRect, surface_size: (u32, u32)) -> Self {
        Self {
            display,
            surface_size,
        }
    }

    /// Maps a client position to surface pixels, scaling each axis by
    /// intrinsic/displayed size. `None` for zero-sized displays and other
    /// non-finite results.
    pub fn screen_to_canvas(&self, screen_pos: [f32; 2]) -> Option<[f32; 2]> {
        let pos = [
            (screen_pos[0] - self.display.left) / self.display.width * self.surface_size.0 as f32,
            (screen_pos[1] - self.display.top) / self.display.height * self.surface_size.1 as f32,
        ];
        (pos[0].is_finite() && pos[1].is_finite()).then_some(pos)
    }
}
