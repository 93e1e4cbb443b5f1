//! Paintable-region resolution.
//!
//! The mask is computed once when a template becomes ready and never changes
//! for the rest of the session. Every input sample queries it, so lookups are
//! a single index into a dense bitmap.

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::math::point_in_polygon;

/// How the paintable region is derived from a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum SilhouetteStrategy {
    /// Pixels whose template alpha exceeds `threshold` are paintable.
    Alpha { threshold: u8 },
    /// Pixels whose centers fall inside the closed polygon are paintable.
    /// Points are in template pixel space, or in `reference_size` space when
    /// given, in which case they are scaled to the template per axis.
    Polygon {
        points: Vec<[f32; 2]>,
        #[serde(default)]
        reference_size: Option<[u32; 2]>,
    },
}

impl Default for SilhouetteStrategy {
    fn default() -> Self {
        SilhouetteStrategy::Alpha { threshold: 8 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SilhouetteMask {
    width: u32,
    height: u32,
    inside: Vec<bool>,
}

impl SilhouetteMask {
    pub fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> bool) -> Self {
        let mut inside = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                inside.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            inside,
        }
    }

    pub fn from_alpha(template: &RgbaImage, threshold: u8) -> Self {
        Self::from_fn(template.width(), template.height(), |x, y| {
            template.get_pixel(x, y)[3] > threshold
        })
    }

    pub fn from_polygon(width: u32, height: u32, polygon: &[[f32; 2]]) -> Self {
        Self::from_fn(width, height, |x, y| {
            point_in_polygon([x as f32 + 0.5, y as f32 + 0.5], polygon)
        })
    }

    pub fn build(template: &RgbaImage, strategy: &SilhouetteStrategy) -> Self {
        match strategy {
            SilhouetteStrategy::Alpha { threshold } => Self::from_alpha(template, *threshold),
            SilhouetteStrategy::Polygon {
                points,
                reference_size,
            } => {
                let (w, h) = template.dimensions();
                match reference_size {
                    Some([rw, rh]) if *rw > 0 && *rh > 0 && (*rw, *rh) != (w, h) => {
                        let sx = w as f32 / *rw as f32;
                        let sy = h as f32 / *rh as f32;
                        let scaled: Vec<[f32; 2]> =
                            points.iter().map(|p| [p[0] * sx, p[1] * sy]).collect();
                        Self::from_polygon(w, h, &scaled)
                    }
                    _ => Self::from_polygon(w, h, points),
                }
            }
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains_pixel(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.inside[(y * self.width + x) as usize]
    }

    /// Membership test for a surface-space position. The position is floored
    /// to its pixel; anything off the surface (or non-finite) is outside.
    pub fn is_inside(&self, x: f32, y: f32) -> bool {
        if !(x.is_finite() && y.is_finite()) || x < 0.0 || y < 0.0 {
            return false;
        }
        self.contains_pixel(x.floor() as u32, y.floor() as u32)
    }

    pub fn count_inside(&self) -> usize {
        self.inside.iter().filter(|&&b| b).count()
    }
}
