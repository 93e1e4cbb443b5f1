use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, Rgba, RgbaImage};

use crate::drawing::{Tool, ToolConfig};
use crate::error::CanvasError;
use crate::math::{clamp, distance_to_segment, segment_bounds};
use crate::silhouette::SilhouetteMask;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    Template,
    Ink,
    Composite,
}

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// An owned straight-alpha RGBA raster.
#[derive(Debug, Clone)]
pub struct Surface {
    kind: SurfaceKind,
    pixels: RgbaImage,
}

impl Surface {
    pub fn new_transparent(kind: SurfaceKind, width: u32, height: u32) -> Self {
        Self {
            kind,
            pixels: RgbaImage::from_pixel(width, height, TRANSPARENT),
        }
    }

    pub fn from_image(kind: SurfaceKind, pixels: RgbaImage) -> Self {
        Self { kind, pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn read_pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        (x < self.width() && y < self.height()).then(|| *self.pixels.get_pixel(x, y))
    }

    /// True when every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.pixels.pixels().all(|p| p[3] == 0)
    }

    pub fn clear(&mut self) {
        for p in self.pixels.pixels_mut() {
            *p = TRANSPARENT;
        }
    }

    /// Paints a round-capped segment from `a` to `b` with the configured tool,
    /// writing only pixels the mask marks as inside. Returns the number of
    /// pixels touched.
    pub fn stroke_segment(
        &mut self,
        a: [f32; 2],
        b: [f32; 2],
        config: &ToolConfig,
        mask: &SilhouetteMask,
    ) -> usize {
        debug_assert_eq!(self.kind, SurfaceKind::Ink, "only the ink surface takes strokes");
        let radius = config.radius();
        let Some((min_x, min_y, max_x, max_y)) =
            segment_bounds(a, b, radius, self.width(), self.height())
        else {
            return 0;
        };

        let mut touched = 0;
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                if !mask.contains_pixel(x, y) {
                    continue;
                }
                let center = [x as f32 + 0.5, y as f32 + 0.5];
                let coverage = clamp(radius + 0.5 - distance_to_segment(center, a, b), 0.0, 1.0);
                if coverage <= 0.0 {
                    continue;
                }
                let base = *self.pixels.get_pixel(x, y);
                let next = match config.tool {
                    Tool::Brush => blend_over(base, config.color, coverage),
                    Tool::Eraser => erase(base, coverage),
                };
                self.pixels.put_pixel(x, y, next);
                touched += 1;
            }
        }
        touched
    }

    /// Standard alpha-over of `top` onto this surface. Sizes must match.
    pub fn draw_over(&mut self, top: &Surface) {
        debug_assert_eq!(self.size(), top.size());
        for (base, over) in self.pixels.pixels_mut().zip(top.pixels.pixels()) {
            *base = blend_over(*base, *over, 1.0);
        }
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, CanvasError> {
        let mut buf = Vec::new();
        PngEncoder::new(&mut buf)
            .write_image(
                self.pixels.as_raw(),
                self.width(),
                self.height(),
                ColorType::Rgba8,
            )
            .map_err(|e| CanvasError::Encode(e.to_string()))?;
        Ok(buf)
    }
}

/// Normal blend of `top` over `base` with `top`'s alpha scaled by `coverage`.
fn blend_over(base: Rgba<u8>, top: Rgba<u8>, coverage: f32) -> Rgba<u8> {
    let top_a = top[3] as f32 / 255.0 * coverage;
    if top_a <= 0.0 {
        return base;
    }
    if top_a >= 1.0 {
        return top;
    }

    let base_a = base[3] as f32 / 255.0;
    let out_a = top_a + base_a * (1.0 - top_a);
    let channel = |i: usize| {
        let t = top[i] as f32 / 255.0;
        let b = base[i] as f32 / 255.0;
        let c = (t * top_a + b * base_a * (1.0 - top_a)) / out_a;
        (clamp(c, 0.0, 1.0) * 255.0).round() as u8
    };
    Rgba([
        channel(0),
        channel(1),
        channel(2),
        (clamp(out_a, 0.0, 1.0) * 255.0).round() as u8,
    ])
}

/// Punch-through: removes `coverage` of the existing alpha.
fn erase(base: Rgba<u8>, coverage: f32) -> Rgba<u8> {
    let alpha = (base[3] as f32 * (1.0 - coverage)).round() as u8;
    if alpha == 0 {
        TRANSPARENT
    } else {
        Rgba([base[0], base[1], base[2], alpha])
    }
}
