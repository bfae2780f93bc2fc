//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! Runtime code is responsible for translating platform events into `InputEvent`s
//! (see `platform::winit`). Every sample logs the resulting events, one line each.

mod logger;
pub mod platform;
mod state;
mod types;

pub use logger::{describe_event, log_event};
pub use state::InputState;
pub use types::{InputEvent, KeyState, Pointer, PointerAction, TouchPhase, MOUSE_POINTER_ID};
