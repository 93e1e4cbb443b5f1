use uuid::Uuid;

use crate::compositor::EncodedImage;
use crate::config::CanvasConfig;
use crate::engine::StrokeEngine;
use crate::error::CanvasError;
use crate::handoff::{ImageUploader, RecordStore, submit_artwork};
use crate::template::{self, AssetSource};

/// Installs the platform logger. Safe to call more than once.
pub fn init_logging() {
    cfg_if::cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            let _ = console_log::init_with_level(log::Level::Info);
        } else {
            let _ = env_logger::try_init();
        }
    }
}

/// One drawing session: a config, the template it names, and the engine
/// painting over it.
pub struct DrawingSession {
    config: CanvasConfig,
    engine: StrokeEngine,
}

impl DrawingSession {
    pub fn new(config: CanvasConfig) -> Self {
        let engine = StrokeEngine::from_config(&config);
        Self { config, engine }
    }

    /// Loads the configured template. On failure the session stays
    /// unpaintable; callers may retry with another call.
    pub async fn load(&mut self, source: &impl AssetSource) -> Result<(), CanvasError> {
        match template::load(source, &self.config).await {
            Ok(template) => {
                self.engine.attach(template);
                Ok(())
            }
            Err(e) => {
                log::warn!("template {} failed to load: {}", self.config.template_path, e);
                Err(e)
            }
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn engine(&self) -> &StrokeEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut StrokeEngine {
        &mut self.engine
    }

    pub fn finish(&self) -> Result<EncodedImage, CanvasError> {
        self.engine.finish()
    }

    /// Flattens the artwork and hands it to the image host and record store.
    pub fn submit(
        &self,
        uploader: &impl ImageUploader,
        store: &mut impl RecordStore,
        owner_key: &str,
    ) -> anyhow::Result<Uuid> {
        let image = self.finish()?;
        submit_artwork(uploader, store, owner_key, &image)
    }
}
