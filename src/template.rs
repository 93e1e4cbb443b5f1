//! Template loading: fetch the decoration artwork, decode it, and derive the
//! silhouette mask that constrains painting for the rest of the session.

use std::collections::HashMap;
use std::path::PathBuf;

use image::imageops::FilterType;

use crate::canvas::{Surface, SurfaceKind};
use crate::config::CanvasConfig;
use crate::error::CanvasError;
use crate::silhouette::SilhouetteMask;

/// Resolves a template asset reference to encoded image bytes.
#[allow(async_fn_in_trait)]
pub trait AssetSource {
    async fn fetch(&self, asset: &str) -> Result<Vec<u8>, CanvasError>;
}

/// Reads assets from a directory. Leading slashes in the reference are
/// treated as relative to `root`, so web-style paths like `/sock.png` work.
pub struct FsAssetSource {
    root: PathBuf,
}

impl FsAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for FsAssetSource {
    async fn fetch(&self, asset: &str) -> Result<Vec<u8>, CanvasError> {
        let path = self.root.join(asset.trim_start_matches('/'));
        std::fs::read(&path).map_err(|e| CanvasError::AssetFetch {
            asset: asset.to_string(),
            reason: format!("{}: {e}", path.display()),
        })
    }
}

/// Assets held in memory, e.g. embedded with `include_bytes!`.
#[derive(Default)]
pub struct InMemoryAssets {
    assets: HashMap<String, Vec<u8>>,
}

impl InMemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, asset: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.assets.insert(asset.into(), bytes);
        self
    }
}

impl AssetSource for InMemoryAssets {
    async fn fetch(&self, asset: &str) -> Result<Vec<u8>, CanvasError> {
        self.assets
            .get(asset)
            .cloned()
            .ok_or_else(|| CanvasError::AssetFetch {
                asset: asset.to_string(),
                reason: "not found".to_string(),
            })
    }
}

/// A decoded template and its paintable region. Immutable once built.
#[derive(Debug, Clone)]
pub struct Template {
    surface: Surface,
    mask: SilhouetteMask,
}

impl Template {
    /// Decodes `bytes` and computes the silhouette per `config`.
    pub fn from_bytes(bytes: &[u8], config: &CanvasConfig) -> Result<Self, CanvasError> {
        let mut pixels = image::load_from_memory(bytes)?.to_rgba8();
        if let Some([w, h]) = config.surface_size {
            if w == 0 || h == 0 {
                return Err(CanvasError::EmptyTemplate);
            }
            if pixels.dimensions() != (w, h) {
                log::debug!(
                    "resampling template {}x{} -> {}x{}",
                    pixels.width(),
                    pixels.height(),
                    w,
                    h
                );
                pixels = image::imageops::resize(&pixels, w, h, FilterType::Triangle);
            }
        }
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(CanvasError::EmptyTemplate);
        }

        let mask = SilhouetteMask::build(&pixels, &config.silhouette);
        if mask.count_inside() == 0 {
            log::warn!("template silhouette is empty; nothing will be paintable");
        }
        Ok(Self {
            surface: Surface::from_image(SurfaceKind::Template, pixels),
            mask,
        })
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn mask(&self) -> &SilhouetteMask {
        &self.mask
    }

    pub fn size(&self) -> (u32, u32) {
        self.surface.size()
    }

    pub fn is_inside(&self, x: f32, y: f32) -> bool {
        self.mask.is_inside(x, y)
    }
}

/// Fetches and decodes the configured template. This is the only suspension
/// point in the drawing core.
pub async fn load(source: &impl AssetSource, config: &CanvasConfig) -> Result<Template, CanvasError> {
    let bytes = source.fetch(&config.template_path).await?;
    let template = Template::from_bytes(&bytes, config)?;
    let (w, h) = template.size();
    log::info!(
        "template {} ready: {}x{}, {} paintable pixels",
        config.template_path,
        w,
        h,
        template.mask().count_inside()
    );
    Ok(template)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    /// A `size`x`size` PNG whose centered `side`x`side` square is opaque
    /// green and everything else fully transparent.
    pub(crate) fn square_template_png(size: u32, side: u32) -> Vec<u8> {
        let lo = (size - side) / 2;
        let hi = lo + side;
        let img = RgbaImage::from_fn(size, size, |x, y| {
            if (lo..hi).contains(&x) && (lo..hi).contains(&y) {
                Rgba([20, 160, 60, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        });
        Surface::from_image(SurfaceKind::Template, img).encode_png().unwrap()
    }

    #[test]
    fn test_load_from_memory() {
        let assets = InMemoryAssets::new().with("/sock.png", square_template_png(700, 400));
        let template = pollster::block_on(load(&assets, &CanvasConfig::default())).unwrap();
        assert_eq!(template.size(), (700, 700));
        assert!(template.is_inside(350.0, 350.0));
        assert!(!template.is_inside(10.0, 10.0));
        assert_eq!(template.mask().count_inside(), 400 * 400);
    }

    #[test]
    fn test_missing_asset_fails() {
        let assets = InMemoryAssets::new();
        let err = pollster::block_on(load(&assets, &CanvasConfig::default())).unwrap_err();
        assert!(matches!(err, CanvasError::AssetFetch { .. }));
    }

    #[test]
    fn test_corrupt_asset_fails() {
        let assets = InMemoryAssets::new().with("/sock.png", b"definitely not a png".to_vec());
        let err = pollster::block_on(load(&assets, &CanvasConfig::default())).unwrap_err();
        assert!(matches!(err, CanvasError::TemplateDecode(_)));
    }

    #[test]
    fn test_resample_to_surface_size() {
        let config = CanvasConfig {
            surface_size: Some([600, 600]),
            ..CanvasConfig::default()
        };
        let template = Template::from_bytes(&square_template_png(300, 100), &config).unwrap();
        assert_eq!(template.size(), (600, 600));
        assert!(template.is_inside(300.0, 300.0));
        assert!(!template.is_inside(50.0, 50.0));
    }

    #[test]
    fn test_zero_surface_size_is_empty_template() {
        for size in [[0, 600], [600, 0]] {
            let config = CanvasConfig {
                surface_size: Some(size),
                ..CanvasConfig::default()
            };
            let err = Template::from_bytes(&square_template_png(40, 20), &config).unwrap_err();
            assert!(matches!(err, CanvasError::EmptyTemplate));
        }
    }

    #[test]
    fn test_sock_polygon_follows_template_size() {
        let config = CanvasConfig {
            silhouette: CanvasConfig::sock_polygon(),
            ..CanvasConfig::default()
        };
        let template = Template::from_bytes(&square_template_png(300, 10), &config).unwrap();
        assert_eq!(template.size(), (300, 300));
        // (220, 300), (100, 100) and (400, 300) in the 600x600 outline space
        assert!(template.is_inside(110.0, 150.0));
        assert!(!template.is_inside(50.0, 50.0));
        assert!(!template.is_inside(200.0, 150.0));
    }

    #[test]
    fn test_polygon_strategy_ignores_alpha() {
        let config = CanvasConfig {
            silhouette: CanvasConfig::sock_polygon(),
            ..CanvasConfig::default()
        };
        let template = Template::from_bytes(&square_template_png(600, 10), &config).unwrap();
        // transparent in the artwork, but inside the traced outline
        assert!(template.is_inside(220.0, 300.0));
        assert!(template.is_inside(300.0, 300.0));
        assert!(!template.is_inside(100.0, 100.0));
    }

    #[test]
    fn test_fs_source_strips_leading_slash() {
        let dir = std::env::temp_dir().join(format!("sockcanvas-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("sock.png"), square_template_png(40, 20)).unwrap();
        let source = FsAssetSource::new(&dir);
        let template = pollster::block_on(load(&source, &CanvasConfig::default())).unwrap();
        assert_eq!(template.size(), (40, 40));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
