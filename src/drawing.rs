use std::str::FromStr;

use image::Rgba;

use crate::error::CanvasError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Brush,
    Eraser,
}

impl FromStr for Tool {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "brush" => Ok(Tool::Brush),
            "eraser" => Ok(Tool::Eraser),
            other => Err(CanvasError::Config(format!("unknown tool {other:?}"))),
        }
    }
}

/// Inclusive bounds for the stroke width, in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidthRange {
    pub min: u32,
    pub max: u32,
}

impl WidthRange {
    pub fn new(min: u32, max: u32) -> Self {
        let min = min.max(1);
        Self { min, max: max.max(min) }
    }

    /// Clamps any requested width into range. Non-positive requests land on `min`.
    pub fn clamp(&self, requested: i64) -> u32 {
        requested.clamp(self.min as i64, self.max as i64) as u32
    }
}

impl Default for WidthRange {
    fn default() -> Self {
        Self { min: 1, max: 30 }
    }
}

/// Current tool, color and width. Changes apply from the next painted segment on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolConfig {
    pub tool: Tool,
    pub color: Rgba<u8>,
    width: u32,
    range: WidthRange,
}

impl ToolConfig {
    pub fn new(color: Rgba<u8>, width: i64, range: WidthRange) -> Self {
        Self {
            tool: Tool::Brush,
            color,
            width: range.clamp(width),
            range,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn range(&self) -> WidthRange {
        self.range
    }

    pub fn set_width(&mut self, width: i64) {
        self.width = self.range.clamp(width);
    }

    pub fn radius(&self) -> f32 {
        self.width as f32 / 2.0
    }
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self::new(Rgba([0, 0, 0, 255]), 5, WidthRange::default())
    }
}

/// Parses `#rgb`, `#rrggbb` or `#rrggbbaa` into straight RGBA.
pub fn parse_hex_color(s: &str) -> Result<Rgba<u8>, CanvasError> {
    let invalid = || CanvasError::InvalidColor(s.to_string());
    let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16).ok_or_else(invalid)? as u8;
                rgb[i] = v * 17;
            }
            Ok(Rgba([rgb[0], rgb[1], rgb[2], 255]))
        }
        6 => Ok(Rgba([byte(0)?, byte(2)?, byte(4)?, 255])),
        8 => Ok(Rgba([byte(0)?, byte(2)?, byte(4)?, byte(6)?])),
        _ => Err(invalid()),
    }
}
