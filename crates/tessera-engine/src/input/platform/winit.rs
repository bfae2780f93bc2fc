use winit::event::{ElementState, MouseButton as WinitMouseButton, TouchPhase as WinitTouchPhase, WindowEvent};
use winit::keyboard::PhysicalKey;

use crate::input::{InputEvent, InputState, KeyState, TouchPhase};

/// Translates a winit `WindowEvent` into an engine `InputEvent`, updating `state`.
///
/// Coordinates stay in physical pixels. Returns `None` for events not
/// represented by the input subsystem.
pub fn translate_window_event(state: &mut InputState, event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::Focused(f) => Some(state.focus(*f)),

        WindowEvent::CursorLeft { .. } => {
            state.cursor_left();
            None
        }

        WindowEvent::CursorMoved { position, .. } => {
            state.cursor_moved(position.x as f32, position.y as f32)
        }

        WindowEvent::MouseInput { state: st, button, .. } => {
            state.mouse_button(map_mouse_button(*button), *st == ElementState::Pressed)
        }

        WindowEvent::Touch(touch) => {
            let phase = match touch.phase {
                WinitTouchPhase::Started => TouchPhase::Started,
                WinitTouchPhase::Moved => TouchPhase::Moved,
                WinitTouchPhase::Ended => TouchPhase::Ended,
                WinitTouchPhase::Cancelled => TouchPhase::Cancelled,
            };
            state.touch(phase, touch.id, touch.location.x as f32, touch.location.y as f32)
        }

        WindowEvent::KeyboardInput { event, .. } => {
            let st = match event.state {
                ElementState::Pressed => KeyState::Pressed,
                ElementState::Released => KeyState::Released,
            };
            state.key(key_code(event.physical_key), st, event.repeat)
        }

        _ => None,
    }
}

fn map_mouse_button(b: WinitMouseButton) -> u16 {
    match b {
        WinitMouseButton::Left => 0,
        WinitMouseButton::Right => 1,
        WinitMouseButton::Middle => 2,
        WinitMouseButton::Back => 3,
        WinitMouseButton::Forward => 4,
        WinitMouseButton::Other(v) => v.saturating_add(5),
    }
}

fn key_code(pk: PhysicalKey) -> u32 {
    match pk {
        PhysicalKey::Code(code) => code as u32,
        // NativeKeyCode is not a u32 in winit 0.30; report "unknown" as 0.
        PhysicalKey::Unidentified(_) => 0,
    }
}
