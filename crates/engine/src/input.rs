//! Input tracker: turns key events into scroll intent and actions.

use glidenav_core::Direction;
use glidenav_keyboard::{Action, KeyInput, Keymap};

use crate::scroll::ScrollIntent;

/// Scroll direction driven by an action, if any.
pub fn scroll_direction(action: Action) -> Option<Direction> {
    match action {
        Action::ScrollUp => Some(Direction::Up),
        Action::ScrollDown => Some(Direction::Down),
        _ => None,
    }
}

/// Keeps the held state of both scroll directions.
#[derive(Debug, Clone)]
pub struct InputTracker {
    keymap: Keymap,
    intent: ScrollIntent,
}

impl InputTracker {
    pub fn new(keymap: Keymap) -> Self {
        Self {
            keymap,
            intent: ScrollIntent::default(),
        }
    }

    pub fn intent(&self) -> ScrollIntent {
        self.intent
    }

    /// Action a key-down triggers, or `None` when the key is guarded or
    /// unbound.
    pub fn key_down_action(&self, input: &KeyInput) -> Option<Action> {
        if input.is_guarded() {
            return None;
        }
        self.keymap.action_for(&input.key)
    }

    /// Scroll directions a key-up releases. A key bound to both releases
    /// both.
    pub fn key_up_directions(&self, input: &KeyInput) -> Vec<Direction> {
        if input.is_guarded() {
            return Vec::new();
        }

        [Action::ScrollUp, Action::ScrollDown]
            .into_iter()
            .filter(|action| self.keymap.is_bound(*action, &input.key))
            .filter_map(scroll_direction)
            .collect()
    }

    /// Mark `direction` held; returns `false` if it already was.
    pub fn hold(&mut self, direction: Direction) -> bool {
        self.intent.set(direction, true)
    }

    /// Mark `direction` released; returns `false` if it was not held.
    pub fn release(&mut self, direction: Direction) -> bool {
        self.intent.set(direction, false)
    }
}
