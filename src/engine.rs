use image::Rgba;

use crate::canvas::{CanvasTransform, DisplayRect, Surface, SurfaceKind};
use crate::compositor::{self, EncodedImage};
use crate::config::CanvasConfig;
use crate::drawing::{Tool, ToolConfig, parse_hex_color};
use crate::error::CanvasError;
use crate::state::{InputState, PointerEvent, PointerKind, UserInputState};
use crate::template::Template;

/// Template plus the ink drawn over it. Only exists once a template loaded.
struct Layers {
    template: Template,
    ink: Surface,
}

/// Turns pointer input into ink on a surface constrained to the template's
/// silhouette. Until a template is attached every operation is a no-op.
pub struct StrokeEngine {
    layers: Option<Layers>,
    tools: ToolConfig,
    input: InputState,
}

impl StrokeEngine {
    pub fn new(tools: ToolConfig) -> Self {
        Self {
            layers: None,
            tools,
            input: InputState::default(),
        }
    }

    pub fn from_config(config: &CanvasConfig) -> Self {
        Self::new(config.tool_config())
    }

    /// Installs a loaded template with a fresh transparent ink layer.
    pub fn attach(&mut self, template: Template) {
        let (w, h) = template.size();
        self.layers = Some(Layers {
            template,
            ink: Surface::new_transparent(SurfaceKind::Ink, w, h),
        });
        self.input.end();
        log::info!("stroke engine ready on {}x{} surface", w, h);
    }

    pub fn is_ready(&self) -> bool {
        self.layers.is_some()
    }

    pub fn template(&self) -> Option<&Template> {
        self.layers.as_ref().map(|l| &l.template)
    }

    pub fn ink(&self) -> Option<&Surface> {
        self.layers.as_ref().map(|l| &l.ink)
    }

    pub fn surface_size(&self) -> Option<(u32, u32)> {
        self.template().map(Template::size)
    }

    pub fn tools(&self) -> &ToolConfig {
        &self.tools
    }

    pub fn input_state(&self) -> UserInputState {
        self.input.state
    }

    pub fn last_point(&self) -> Option<[f32; 2]> {
        self.input.last_point
    }

    pub fn set_tool(&mut self, tool: Tool) {
        log::debug!("tool -> {:?}", tool);
        self.tools.tool = tool;
    }

    pub fn set_color(&mut self, color: Rgba<u8>) {
        self.tools.color = color;
    }

    /// Sets the brush color from a CSS hex string. Invalid input leaves the
    /// current color untouched.
    pub fn set_color_hex(&mut self, hex: &str) -> Result<(), CanvasError> {
        self.tools.color = parse_hex_color(hex)?;
        Ok(())
    }

    pub fn set_width(&mut self, width: i64) {
        self.tools.set_width(width);
        log::debug!("width {} -> {}", width, self.tools.width());
    }

    /// Wipes the ink layer. The template and its mask are left as loaded.
    pub fn clear(&mut self) {
        if let Some(layers) = self.layers.as_mut() {
            layers.ink.clear();
            log::debug!("ink cleared");
        }
    }

    /// Feeds one input sample. `display` is where the surface is currently
    /// shown in client space. Returns whether any ink pixel changed.
    pub fn handle(&mut self, event: PointerEvent, display: DisplayRect) -> bool {
        if matches!(
            event.kind,
            PointerKind::Up | PointerKind::Cancel | PointerKind::Leave
        ) {
            if self.input.is_drawing() {
                log::debug!("gesture ended ({:?})", event.kind);
            }
            self.input.end();
            return false;
        }

        let Some(layers) = self.layers.as_mut() else {
            return false;
        };
        let transform = CanvasTransform::new(display, layers.template.size());
        let surface_point = transform.screen_to_canvas(event.client);
        let point = surface_point.filter(|p| layers.template.is_inside(p[0], p[1]));
        log::trace!("{:?} {:?} -> {:?}", event.kind, event.client, point);

        match event.kind {
            PointerKind::Down => {
                if self.input.is_drawing() {
                    if !self.input.owns(event.pointer_id) {
                        return false;
                    }
                    // lost up from the previous gesture
                    log::debug!("pointer {} pressed again, restarting", event.pointer_id);
                    self.input.end();
                }
                if surface_point.is_none() {
                    return false;
                }
                self.input.begin(event.pointer_id, point);
                log::debug!("gesture started by pointer {}", event.pointer_id);
                match point {
                    Some(p) => paint(layers, &self.tools, p, p),
                    None => false,
                }
            }
            PointerKind::Move => {
                if !self.input.is_drawing() || !self.input.owns(event.pointer_id) {
                    return false;
                }
                match point {
                    Some(p) => {
                        let from = self.input.last_point.unwrap_or(p);
                        self.input.last_point = Some(p);
                        paint(layers, &self.tools, from, p)
                    }
                    None => {
                        self.input.last_point = None;
                        false
                    }
                }
            }
            PointerKind::Up | PointerKind::Cancel | PointerKind::Leave => false,
        }
    }

    /// Convenience for hosts that report positions already in surface pixels.
    pub fn handle_intrinsic(&mut self, event: PointerEvent) -> bool {
        match self.surface_size() {
            Some(size) => self.handle(event, DisplayRect::intrinsic(size)),
            None => self.handle(event, DisplayRect::new(0.0, 0.0, 0.0, 0.0)),
        }
    }

    /// Flattens template and ink into an encoded PNG.
    pub fn finish(&self) -> Result<EncodedImage, CanvasError> {
        match self.layers.as_ref() {
            Some(layers) => compositor::finish(layers.template.surface(), &layers.ink),
            None => {
                log::warn!("finish requested before the template loaded");
                Err(CanvasError::NotReady)
            }
        }
    }

    /// Flattened RGBA pixels for redrawing the visible canvas.
    pub fn composite(&self) -> Option<Surface> {
        self.layers
            .as_ref()
            .map(|l| compositor::flatten(l.template.surface(), &l.ink))
    }
}

fn paint(layers: &mut Layers, tools: &ToolConfig, from: [f32; 2], to: [f32; 2]) -> bool {
    layers
        .ink
        .stroke_segment(from, to, tools, layers.template.mask())
        > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::tests::square_template_png;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

    fn ready_engine() -> StrokeEngine {
        let template =
            Template::from_bytes(&square_template_png(700, 400), &CanvasConfig::default()).unwrap();
        let mut engine = StrokeEngine::new(ToolConfig::default());
        engine.set_color(RED);
        engine.attach(template);
        engine
    }

    fn ev(kind: PointerKind, x: f32, y: f32) -> PointerEvent {
        PointerEvent::new(kind, 1, x, y)
    }

    fn ink_at(engine: &StrokeEngine, x: u32, y: u32) -> Rgba<u8> {
        engine.ink().unwrap().read_pixel(x, y).unwrap()
    }

    #[test]
    fn test_not_ready_is_noop() {
        let mut engine = StrokeEngine::new(ToolConfig::default());
        assert!(!engine.handle_intrinsic(ev(PointerKind::Down, 350.0, 350.0)));
        assert_eq!(engine.input_state(), UserInputState::Idle);
        assert!(!engine.handle_intrinsic(ev(PointerKind::Move, 360.0, 360.0)));
        engine.clear();
        assert!(engine.ink().is_none());
        assert!(matches!(engine.finish(), Err(CanvasError::NotReady)));
    }

    #[test]
    fn test_down_inside_paints_dot_and_records_point() {
        let mut engine = ready_engine();
        assert!(engine.handle_intrinsic(ev(PointerKind::Down, 350.5, 350.5)));
        assert_eq!(engine.input_state(), UserInputState::Drawing);
        assert_eq!(engine.last_point(), Some([350.5, 350.5]));
        assert_eq!(ink_at(&engine, 350, 350), RED);
    }

    #[test]
    fn test_down_outside_draws_nothing() {
        let mut engine = ready_engine();
        assert!(!engine.handle_intrinsic(ev(PointerKind::Down, 10.0, 10.0)));
        assert_eq!(engine.input_state(), UserInputState::Drawing);
        assert_eq!(engine.last_point(), None);
        assert!(engine.ink().unwrap().is_blank());
    }

    #[test]
    fn test_moves_without_down_are_ignored() {
        let mut engine = ready_engine();
        assert!(!engine.handle_intrinsic(ev(PointerKind::Move, 350.0, 350.0)));
        assert!(!engine.handle_intrinsic(ev(PointerKind::Move, 360.0, 360.0)));
        assert!(!engine.handle_intrinsic(ev(PointerKind::Up, 360.0, 360.0)));
        assert!(engine.ink().unwrap().is_blank());
    }

    #[test]
    fn test_up_cancel_leave_return_to_idle() {
        for kind in [PointerKind::Up, PointerKind::Cancel, PointerKind::Leave] {
            let mut engine = ready_engine();
            engine.handle_intrinsic(ev(PointerKind::Down, 300.0, 300.0));
            engine.handle(
                PointerEvent::new(kind, 99, 0.0, 0.0),
                DisplayRect::new(0.0, 0.0, 0.0, 0.0),
            );
            assert_eq!(engine.input_state(), UserInputState::Idle);
            assert_eq!(engine.last_point(), None);
            assert!(!engine.handle_intrinsic(ev(PointerKind::Move, 320.0, 320.0)));
        }
    }

    #[test]
    fn test_leaving_silhouette_starts_new_substroke() {
        let mut engine = ready_engine();
        engine.set_width(3);
        engine.handle_intrinsic(ev(PointerKind::Down, 200.5, 300.5));
        engine.handle_intrinsic(ev(PointerKind::Move, 100.5, 300.5));
        assert_eq!(engine.last_point(), None);
        // re-enter far away; no segment is drawn across the gap
        engine.handle_intrinsic(ev(PointerKind::Move, 200.5, 500.5));
        assert_eq!(engine.last_point(), Some([200.5, 500.5]));
        assert_eq!(ink_at(&engine, 200, 500), RED);
        assert_eq!(ink_at(&engine, 200, 400), CLEAR);
        assert_eq!(ink_at(&engine, 175, 300), CLEAR);
    }

    #[test]
    fn test_second_pointer_is_ignored() {
        let mut engine = ready_engine();
        engine.handle_intrinsic(PointerEvent::new(PointerKind::Down, 1, 300.5, 300.5));
        assert!(!engine.handle_intrinsic(PointerEvent::new(PointerKind::Down, 2, 400.5, 400.5)));
        assert!(!engine.handle_intrinsic(PointerEvent::new(PointerKind::Move, 2, 410.5, 410.5)));
        assert_eq!(ink_at(&engine, 400, 400), CLEAR);
        assert_eq!(ink_at(&engine, 410, 410), CLEAR);
        assert!(engine.handle_intrinsic(PointerEvent::new(PointerKind::Move, 1, 310.5, 300.5)));
        assert_eq!(ink_at(&engine, 305, 300), RED);
    }

    #[test]
    fn test_repeat_down_without_up_restarts_gesture() {
        let mut engine = ready_engine();
        engine.handle_intrinsic(ev(PointerKind::Down, 200.5, 200.5));
        engine.handle_intrinsic(ev(PointerKind::Move, 210.5, 200.5));
        // release happened off the element, so no up arrives
        assert!(engine.handle_intrinsic(ev(PointerKind::Down, 500.5, 500.5)));
        assert_eq!(engine.input_state(), UserInputState::Drawing);
        assert_eq!(engine.last_point(), Some([500.5, 500.5]));
        engine.handle_intrinsic(ev(PointerKind::Move, 505.5, 500.5));
        assert_eq!(ink_at(&engine, 505, 500), RED);
        assert_eq!(ink_at(&engine, 355, 350), CLEAR);
        assert_eq!(ink_at(&engine, 300, 300), CLEAR);
    }

    #[test]
    fn test_outside_pixels_never_change() {
        let mut engine = ready_engine();
        engine.set_width(30);
        engine.handle_intrinsic(ev(PointerKind::Down, 151.0, 151.0));
        engine.handle_intrinsic(ev(PointerKind::Move, 548.0, 151.0));
        engine.handle_intrinsic(ev(PointerKind::Move, 548.0, 548.0));
        engine.handle_intrinsic(ev(PointerKind::Up, 0.0, 0.0));
        let mask = engine.template().unwrap().mask().clone();
        let ink = engine.ink().unwrap();
        for (x, y, p) in ink.pixels().enumerate_pixels() {
            if !mask.contains_pixel(x, y) {
                assert_eq!(*p, CLEAR, "pixel {x},{y} outside silhouette was painted");
            }
        }
        assert_eq!(ink_at(&engine, 150, 151), RED);
        assert_eq!(ink_at(&engine, 149, 151), CLEAR);
    }

    #[test]
    fn test_scaled_displays_paint_same_pixels() {
        let paint_at = |display: DisplayRect, from: [f32; 2], to: [f32; 2]| {
            let mut engine = ready_engine();
            engine.handle(ev(PointerKind::Down, from[0], from[1]), display);
            engine.handle(ev(PointerKind::Move, to[0], to[1]), display);
            engine.ink().unwrap().pixels().clone()
        };
        // intrinsic (300,320) -> (400,330)
        let half = paint_at(
            DisplayRect::new(20.0, 40.0, 350.0, 350.0),
            [20.0 + 150.0, 40.0 + 160.0],
            [20.0 + 200.0, 40.0 + 165.0],
        );
        let double = paint_at(
            DisplayRect::new(5.0, 5.0, 1400.0, 1400.0),
            [5.0 + 600.0, 5.0 + 640.0],
            [5.0 + 800.0, 5.0 + 660.0],
        );
        let direct = paint_at(DisplayRect::intrinsic((700, 700)), [300.0, 320.0], [400.0, 330.0]);
        let same = |a: &image::RgbaImage, b: &image::RgbaImage| {
            a.pixels()
                .zip(b.pixels())
                .all(|(p, q)| (0..4).all(|i| (p[i] as i32 - q[i] as i32).abs() <= 2))
        };
        assert!(same(&half, &double));
        assert!(same(&half, &direct));
        assert!(half.get_pixel(350, 325)[3] > 0);
        assert_eq!(half.get_pixel(350, 340)[3], 0);
    }

    #[test]
    fn test_zero_sized_display_is_ignored() {
        let mut engine = ready_engine();
        let empty = DisplayRect::new(0.0, 0.0, 0.0, 0.0);
        assert!(!engine.handle(ev(PointerKind::Down, 0.0, 0.0), empty));
        assert_eq!(engine.input_state(), UserInputState::Idle);
        assert!(engine.ink().unwrap().is_blank());
    }

    #[test]
    fn test_tool_changes_apply_to_next_segment_only() {
        let mut engine = ready_engine();
        engine.handle_intrinsic(ev(PointerKind::Down, 300.5, 300.5));
        engine.handle_intrinsic(ev(PointerKind::Move, 320.5, 300.5));
        engine.set_color(Rgba([0, 0, 255, 255]));
        engine.set_width(0);
        assert_eq!(engine.tools().width(), 1);
        assert_eq!(ink_at(&engine, 310, 300), RED);
        engine.handle_intrinsic(ev(PointerKind::Move, 340.5, 300.5));
        assert_eq!(ink_at(&engine, 310, 300), RED);
        assert_eq!(ink_at(&engine, 330, 300), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_set_color_hex_rejects_invalid() {
        let mut engine = ready_engine();
        assert!(engine.set_color_hex("#00ff00").is_ok());
        assert_eq!(engine.tools().color, Rgba([0, 255, 0, 255]));
        assert!(engine.set_color_hex("green").is_err());
        assert_eq!(engine.tools().color, Rgba([0, 255, 0, 255]));
    }

    #[test]
    fn test_clear_keeps_template() {
        let mut engine = ready_engine();
        engine.handle_intrinsic(ev(PointerKind::Down, 300.5, 300.5));
        engine.handle_intrinsic(ev(PointerKind::Move, 380.5, 380.5));
        let template_before = engine.template().unwrap().surface().pixels().clone();
        engine.clear();
        assert!(engine.ink().unwrap().is_blank());
        assert_eq!(engine.template().unwrap().surface().pixels(), &template_before);
        assert!(engine.template().unwrap().is_inside(350.0, 350.0));
    }
}
