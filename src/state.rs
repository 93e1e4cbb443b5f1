#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserInputState {
    #[default]
    Idle,
    Drawing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
    Cancel,
    Leave,
}

/// One raw input sample in client space. Touch hosts report their first touch point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub pointer_id: i32,
    pub client: [f32; 2],
}

impl PointerEvent {
    pub fn new(kind: PointerKind, pointer_id: i32, x: f32, y: f32) -> Self {
        Self {
            kind,
            pointer_id,
            client: [x, y],
        }
    }
}

/// Per-gesture state. `last_point` is `None` at gesture start outside the
/// silhouette and after the pointer leaves it, so re-entry starts a new sub-stroke.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputState {
    pub state: UserInputState,
    pub pointer_id: Option<i32>,
    pub last_point: Option<[f32; 2]>,
}

impl InputState {
    pub fn begin(&mut self, pointer_id: i32, point: Option<[f32; 2]>) {
        self.state = UserInputState::Drawing;
        self.pointer_id = Some(pointer_id);
        self.last_point = point;
    }

    pub fn end(&mut self) {
        *self = Self::default();
    }

    pub fn is_drawing(&self) -> bool {
        self.state == UserInputState::Drawing
    }

    pub fn owns(&self, pointer_id: i32) -> bool {
        self.pointer_id == Some(pointer_id)
    }
}
