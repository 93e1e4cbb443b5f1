use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::drawing::{ToolConfig, WidthRange, parse_hex_color};
use crate::error::CanvasError;
use crate::silhouette::SilhouetteStrategy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushSettings {
    pub default_color: String,
    pub default_width: u32,
    pub min_width: u32,
    pub max_width: u32,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            default_color: "#000000".to_string(),
            default_width: 5,
            min_width: 1,
            max_width: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub template_path: String,
    /// Resample the template to this size on load. `None` keeps its intrinsic size.
    pub surface_size: Option<[u32; 2]>,
    pub silhouette: SilhouetteStrategy,
    pub brush: BrushSettings,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            template_path: "/sock.png".to_string(),
            surface_size: None,
            silhouette: SilhouetteStrategy::default(),
            brush: BrushSettings::default(),
        }
    }
}

impl CanvasConfig {
    pub fn from_json_str(json: &str) -> Result<Self, CanvasError> {
        let config: CanvasConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CanvasError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| CanvasError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    fn validate(&self) -> Result<(), CanvasError> {
        if let Some([w, h]) = self.surface_size {
            if w == 0 || h == 0 {
                return Err(CanvasError::Config(format!("surface_size {w}x{h} is empty")));
            }
        }
        parse_hex_color(&self.brush.default_color)?;
        Ok(())
    }

    /// The hand-traced sock interior, traced on a 600x600 canvas and scaled
    /// to whatever size the template loads at.
    pub fn sock_polygon() -> SilhouetteStrategy {
        SilhouetteStrategy::Polygon {
            points: vec![
                [250.0, 130.0],
                [350.0, 170.0],
                [360.0, 400.0],
                [300.0, 520.0],
                [200.0, 460.0],
                [190.0, 200.0],
            ],
            reference_size: Some([600, 600]),
        }
    }

    pub fn width_range(&self) -> WidthRange {
        WidthRange::new(self.brush.min_width, self.brush.max_width)
    }

    /// Initial tool state. An unparsable default color falls back to black.
    pub fn tool_config(&self) -> ToolConfig {
        let color = parse_hex_color(&self.brush.default_color)
            .unwrap_or(image::Rgba([0, 0, 0, 255]));
        ToolConfig::new(color, self.brush.default_width as i64, self.width_range())
    }
}
