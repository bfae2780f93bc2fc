use std::fmt::Write as _;

use super::types::{InputEvent, KeyState, PointerAction};

/// Formats one input event as a single console line.
///
/// Examples:
/// - `Pointer(s): (0, 12.5, 40) Pointer Down`
/// - `Pointer(s): (0, 1, 2), (3, 4, 5) Pointer Move`
/// - `Key: 30 Key Up`
pub fn describe_event(event: &InputEvent) -> String {
    match event {
        InputEvent::Pointer { action, pointers } => {
            let mut line = String::from("Pointer(s): ");
            for (i, p) in pointers.iter().enumerate() {
                if i > 0 {
                    line.push_str(", ");
                }
                let _ = write!(line, "({}, {}, {})", p.id, p.x, p.y);
            }
            line.push_str(match action {
                PointerAction::Down => " Pointer Down",
                PointerAction::Up | PointerAction::Cancel => " Pointer Up",
                PointerAction::Move => " Pointer Move",
            });
            line
        }

        InputEvent::Key { code, state, repeat } => {
            let what = match (state, repeat) {
                (KeyState::Pressed, false) => "Key Down",
                (KeyState::Pressed, true) => "Key Down (repeat)",
                (KeyState::Released, _) => "Key Up",
            };
            format!("Key: {code} {what}")
        }

        InputEvent::Focused(true) => "Focus gained".to_string(),
        InputEvent::Focused(false) => "Focus lost".to_string(),
    }
}

/// Logs `describe_event(event)` at info level.
pub fn log_event(event: &InputEvent) {
    log::info!("{}", describe_event(event));
}
