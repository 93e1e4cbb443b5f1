//! Browser bindings. The host page owns the `<canvas>` element and forwards
//! pointer/touch events along with the element's bounding client rect.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::app::{DrawingSession, init_logging};
use crate::canvas::DisplayRect;
use crate::config::CanvasConfig;
use crate::drawing::Tool;
use crate::error::CanvasError;
use crate::state::{PointerEvent, PointerKind};
use crate::template::AssetSource;

/// Fetches assets relative to the page with `window.fetch`.
pub struct WebAssetSource;

impl AssetSource for WebAssetSource {
    async fn fetch(&self, asset: &str) -> Result<Vec<u8>, CanvasError> {
        let fail = |reason: String| CanvasError::AssetFetch {
            asset: asset.to_string(),
            reason,
        };
        let window = web_sys::window().ok_or_else(|| fail("no window".to_string()))?;
        let response = JsFuture::from(window.fetch_with_str(asset))
            .await
            .map_err(|e| fail(format!("{e:?}")))?;
        let response: web_sys::Response = response
            .dyn_into()
            .map_err(|_| fail("fetch did not return a Response".to_string()))?;
        if !response.ok() {
            return Err(fail(format!("HTTP {}", response.status())));
        }
        let buffer = response.array_buffer().map_err(|e| fail(format!("{e:?}")))?;
        let buffer = JsFuture::from(buffer)
            .await
            .map_err(|e| fail(format!("{e:?}")))?;
        Ok(js_sys::Uint8Array::new(&buffer).to_vec())
    }
}

fn to_js(e: CanvasError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct SockCanvas {
    session: DrawingSession,
}

/// Loads the template named by `config_json` (or the default `/sock.png`)
/// and resolves to a ready canvas. Rejects if the template cannot be loaded.
#[wasm_bindgen(js_name = loadSockCanvas)]
pub async fn load_sock_canvas(config_json: Option<String>) -> Result<SockCanvas, JsValue> {
    init_logging();
    let config = match config_json {
        Some(json) => CanvasConfig::from_json_str(&json).map_err(to_js)?,
        None => CanvasConfig::default(),
    };
    let mut session = DrawingSession::new(config);
    session.load(&WebAssetSource).await.map_err(to_js)?;
    Ok(SockCanvas { session })
}

impl SockCanvas {
    #[allow(clippy::too_many_arguments)]
    fn dispatch(
        &mut self,
        kind: PointerKind,
        pointer_id: i32,
        client_x: f32,
        client_y: f32,
        left: f32,
        top: f32,
        width: f32,
        height: f32,
    ) -> bool {
        self.session.engine_mut().handle(
            PointerEvent::new(kind, pointer_id, client_x, client_y),
            DisplayRect::new(left, top, width, height),
        )
    }
}

#[wasm_bindgen]
impl SockCanvas {
    #[allow(clippy::too_many_arguments)]
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(
        &mut self,
        pointer_id: i32,
        client_x: f32,
        client_y: f32,
        left: f32,
        top: f32,
        width: f32,
        height: f32,
    ) -> bool {
        self.dispatch(PointerKind::Down, pointer_id, client_x, client_y, left, top, width, height)
    }

    #[allow(clippy::too_many_arguments)]
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(
        &mut self,
        pointer_id: i32,
        client_x: f32,
        client_y: f32,
        left: f32,
        top: f32,
        width: f32,
        height: f32,
    ) -> bool {
        self.dispatch(PointerKind::Move, pointer_id, client_x, client_y, left, top, width, height)
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, pointer_id: i32) {
        self.dispatch(PointerKind::Up, pointer_id, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    }

    #[wasm_bindgen(js_name = pointerCancel)]
    pub fn pointer_cancel(&mut self, pointer_id: i32) {
        self.dispatch(PointerKind::Cancel, pointer_id, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    }

    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self, pointer_id: i32) {
        self.dispatch(PointerKind::Leave, pointer_id, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    }

    /// `"brush"` or `"eraser"`.
    #[wasm_bindgen(js_name = setTool)]
    pub fn set_tool(&mut self, tool: &str) -> Result<(), JsValue> {
        let tool: Tool = tool.parse().map_err(to_js)?;
        self.session.engine_mut().set_tool(tool);
        Ok(())
    }

    #[wasm_bindgen(js_name = setColor)]
    pub fn set_color(&mut self, hex: &str) -> Result<(), JsValue> {
        self.session.engine_mut().set_color_hex(hex).map_err(to_js)
    }

    #[wasm_bindgen(js_name = setWidth)]
    pub fn set_width(&mut self, width: i32) {
        self.session.engine_mut().set_width(width as i64);
    }

    pub fn clear(&mut self) {
        self.session.engine_mut().clear();
    }

    #[wasm_bindgen(js_name = finishDataUrl)]
    pub fn finish_data_url(&self) -> Result<String, JsValue> {
        self.session.finish().map(|img| img.to_data_url()).map_err(to_js)
    }

    /// Template plus ink as straight RGBA, for `putImageData` on the visible canvas.
    #[wasm_bindgen(js_name = compositeRgba)]
    pub fn composite_rgba(&self) -> Vec<u8> {
        self.session
            .engine()
            .composite()
            .map(|s| s.pixels().as_raw().clone())
            .unwrap_or_default()
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.session.engine().surface_size().map_or(0, |s| s.0)
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.session.engine().surface_size().map_or(0, |s| s.1)
    }
}
