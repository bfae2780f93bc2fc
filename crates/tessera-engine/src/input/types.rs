/// Pointer id reported for the mouse cursor.
///
/// Touch contacts report the platform's touch id, which may also be 0 on
/// platforms that number contacts from zero.
pub const MOUSE_POINTER_ID: u64 = 0;

/// A single pointer sample in physical pixels (top-left origin).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Pointer {
    pub id: u64,
    pub x: f32,
    pub y: f32,
}

impl Pointer {
    #[inline]
    pub const fn new(id: u64, x: f32, y: f32) -> Self {
        Self { id, x, y }
    }
}

/// What happened to the pointer(s) carried by an [`InputEvent::Pointer`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PointerAction {
    Down,
    Up,
    /// The platform aborted the gesture. Consumers treat it like `Up`.
    Cancel,
    /// Snapshot of every active pointer; the platform does not say which moved.
    Move,
}

/// Platform-agnostic touch phase, fed to [`InputState::touch`](super::InputState::touch).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TouchPhase {
    Started,
    Moved,
    Ended,
    Cancelled,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Input event delivered to `core::App::on_input`.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// `Down`/`Up`/`Cancel` carry the one pointer that changed;
    /// `Move` carries all active pointers in id order.
    Pointer {
        action: PointerAction,
        pointers: Vec<Pointer>,
    },

    /// `code` is a stable platform key code.
    Key {
        code: u32,
        state: KeyState,
        repeat: bool,
    },

    Focused(bool),
}
