use std::collections::{BTreeMap, HashSet};

use super::types::{InputEvent, KeyState, Pointer, PointerAction, TouchPhase, MOUSE_POINTER_ID};

/// Current input state for a single window.
///
/// Tracks the cursor, held mouse buttons, active touch contacts and held keys,
/// and turns raw platform transitions into [`InputEvent`]s. Returns `None`
/// when a transition produces no event (hover without a held button, a second
/// mouse button while one is already held, a key release for a key never
/// seen pressed).
#[derive(Debug, Default)]
pub struct InputState {
    /// Whether the window is focused.
    pub focused: bool,

    /// Cursor position in physical pixels.
    pub cursor: Option<(f32, f32)>,

    /// Currently held mouse buttons (platform ids).
    buttons_down: HashSet<u16>,

    /// Active touch contacts, ordered by id for stable move snapshots.
    touches: BTreeMap<u64, (f32, f32)>,

    /// Currently held keys.
    keys_down: HashSet<u32>,
}

impl InputState {
    pub fn cursor_moved(&mut self, x: f32, y: f32) -> Option<InputEvent> {
        self.cursor = Some((x, y));
        if self.buttons_down.is_empty() {
            return None;
        }
        Some(self.move_snapshot())
    }

    pub fn cursor_left(&mut self) {
        self.cursor = None;
    }

    /// The mouse behaves as one pointer: down on the first held button,
    /// up when the last one is released.
    pub fn mouse_button(&mut self, button: u16, pressed: bool) -> Option<InputEvent> {
        let (x, y) = self.cursor.unwrap_or((0.0, 0.0));
        let pointer = Pointer::new(MOUSE_POINTER_ID, x, y);

        if pressed {
            let was_idle = self.buttons_down.is_empty();
            self.buttons_down.insert(button);
            was_idle.then(|| single(PointerAction::Down, pointer))
        } else {
            let removed = self.buttons_down.remove(&button);
            (removed && self.buttons_down.is_empty()).then(|| single(PointerAction::Up, pointer))
        }
    }

    pub fn touch(&mut self, phase: TouchPhase, id: u64, x: f32, y: f32) -> Option<InputEvent> {
        let pointer = Pointer::new(id, x, y);
        match phase {
            TouchPhase::Started => {
                self.touches.insert(id, (x, y));
                Some(single(PointerAction::Down, pointer))
            }
            TouchPhase::Moved => {
                self.touches.insert(id, (x, y));
                Some(self.move_snapshot())
            }
            TouchPhase::Ended => {
                self.touches.remove(&id);
                Some(single(PointerAction::Up, pointer))
            }
            TouchPhase::Cancelled => {
                self.touches.remove(&id);
                Some(single(PointerAction::Cancel, pointer))
            }
        }
    }

    pub fn key(&mut self, code: u32, state: KeyState, repeat: bool) -> Option<InputEvent> {
        match state {
            KeyState::Pressed => {
                self.keys_down.insert(code);
            }
            KeyState::Released => {
                if !self.keys_down.remove(&code) {
                    return None;
                }
            }
        }
        Some(InputEvent::Key { code, state, repeat })
    }

    pub fn focus(&mut self, focused: bool) -> InputEvent {
        self.focused = focused;
        if !focused {
            // On focus loss, clear "down" sets to avoid stuck keys/buttons.
            self.keys_down.clear();
            self.buttons_down.clear();
            self.touches.clear();
        }
        InputEvent::Focused(focused)
    }

    pub fn key_down(&self, code: u32) -> bool {
        self.keys_down.contains(&code)
    }

    /// Number of active pointers (held mouse counts as one).
    pub fn active_pointers(&self) -> usize {
        self.touches.len() + usize::from(!self.buttons_down.is_empty())
    }

    fn move_snapshot(&self) -> InputEvent {
        let mut pointers = Vec::with_capacity(self.active_pointers());
        if !self.buttons_down.is_empty() {
            let (x, y) = self.cursor.unwrap_or((0.0, 0.0));
            pointers.push(Pointer::new(MOUSE_POINTER_ID, x, y));
        }
        pointers.extend(self.touches.iter().map(|(&id, &(x, y))| Pointer::new(id, x, y)));
        InputEvent::Pointer {
            action: PointerAction::Move,
            pointers,
        }
    }
}

fn single(action: PointerAction, pointer: Pointer) -> InputEvent {
    InputEvent::Pointer {
        action,
        pointers: vec![pointer],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action_of(ev: &InputEvent) -> PointerAction {
        match ev {
            InputEvent::Pointer { action, .. } => *action,
            other => panic!("expected pointer event, got {other:?}"),
        }
    }

    // ── mouse ─────────────────────────────────────────────────────────────

    #[test]
    fn hover_produces_no_event() {
        let mut s = InputState::default();
        assert!(s.cursor_moved(10.0, 10.0).is_none());
    }

    #[test]
    fn press_drag_release_sequence() {
        let mut s = InputState::default();
        s.cursor_moved(5.0, 6.0);

        let down = s.mouse_button(0, true).unwrap();
        assert_eq!(
            down,
            InputEvent::Pointer {
                action: PointerAction::Down,
                pointers: vec![Pointer::new(MOUSE_POINTER_ID, 5.0, 6.0)],
            }
        );

        let mv = s.cursor_moved(7.0, 8.0).unwrap();
        assert_eq!(action_of(&mv), PointerAction::Move);

        assert_eq!(action_of(&s.mouse_button(0, false).unwrap()), PointerAction::Up);
        assert_eq!(s.active_pointers(), 0);
    }

    #[test]
    fn second_button_does_not_repeat_down() {
        let mut s = InputState::default();
        assert!(s.mouse_button(0, true).is_some());
        assert!(s.mouse_button(1, true).is_none());
        assert!(s.mouse_button(1, false).is_none());
        assert!(s.mouse_button(0, false).is_some());
    }

    // ── touch ─────────────────────────────────────────────────────────────

    #[test]
    fn move_snapshot_contains_all_touches_in_id_order() {
        let mut s = InputState::default();
        s.touch(TouchPhase::Started, 7, 1.0, 1.0);
        s.touch(TouchPhase::Started, 3, 2.0, 2.0);
        let mv = s.touch(TouchPhase::Moved, 7, 9.0, 9.0).unwrap();
        let InputEvent::Pointer { pointers, .. } = mv else { panic!("not a pointer event") };
        let ids: Vec<u64> = pointers.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 7]);
        assert_eq!(pointers[1].x, 9.0);
    }

    #[test]
    fn cancelled_touch_is_removed() {
        let mut s = InputState::default();
        s.touch(TouchPhase::Started, 1, 0.0, 0.0);
        let ev = s.touch(TouchPhase::Cancelled, 1, 0.0, 0.0).unwrap();
        assert_eq!(action_of(&ev), PointerAction::Cancel);
        assert_eq!(s.active_pointers(), 0);
    }

    // ── keys / focus ──────────────────────────────────────────────────────

    #[test]
    fn release_without_press_is_ignored() {
        let mut s = InputState::default();
        assert!(s.key(42, KeyState::Released, false).is_none());
    }

    #[test]
    fn focus_loss_clears_held_state() {
        let mut s = InputState::default();
        s.key(42, KeyState::Pressed, false);
        s.mouse_button(0, true);
        s.touch(TouchPhase::Started, 1, 0.0, 0.0);

        assert_eq!(s.focus(false), InputEvent::Focused(false));
        assert!(!s.key_down(42));
        assert_eq!(s.active_pointers(), 0);
    }
}
