//! Keyboard handling for glidenav.
//!
//! This crate provides utilities for keyboard event handling:
//! - DOM-style key names for terminal key codes (`w`, `ArrowLeft`, `PageDown`)
//! - `KeyInput`, the host-independent view of a key event the engine consumes
//! - `Keymap`, lookup of configured bindings per action
//! - `ReleaseTracker`, synthetic key releases for terminals that only
//!   report presses

mod keymap;
mod release;

pub use keymap::{Action, Keymap};
pub use release::ReleaseTracker;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A key event as seen by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    /// Key name (`"w"`, `"ArrowLeft"`, ...)
    pub key: String,
    /// Modifiers held with the key
    pub modifiers: KeyModifiers,
    /// Whether a text input currently has focus
    pub text_focused: bool,
}

impl KeyInput {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: KeyModifiers::NONE,
            text_focused: false,
        }
    }

    pub fn with_modifiers(mut self, modifiers: KeyModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_text_focus(mut self, text_focused: bool) -> Self {
        self.text_focused = text_focused;
        self
    }

    /// Build from a terminal key event. Keys without a name give `None`.
    pub fn from_event(event: &KeyEvent, text_focused: bool) -> Option<Self> {
        Some(Self {
            key: key_name(event.code)?,
            modifiers: event.modifiers,
            text_focused,
        })
    }

    /// Ctrl/Alt combinations and typing belong to the host, not to bindings.
    pub fn is_guarded(&self) -> bool {
        self.text_focused
            || self
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    }
}

/// DOM-style name of a terminal key code.
pub fn key_name(code: KeyCode) -> Option<String> {
    let name = match code {
        KeyCode::Char(ch) => return Some(ch.to_string()),
        KeyCode::F(n) => return Some(format!("F{}", n)),
        KeyCode::Left => "ArrowLeft",
        KeyCode::Right => "ArrowRight",
        KeyCode::Up => "ArrowUp",
        KeyCode::Down => "ArrowDown",
        KeyCode::PageUp => "PageUp",
        KeyCode::PageDown => "PageDown",
        KeyCode::Home => "Home",
        KeyCode::End => "End",
        KeyCode::Enter => "Enter",
        KeyCode::Esc => "Escape",
        KeyCode::Tab | KeyCode::BackTab => "Tab",
        KeyCode::Backspace => "Backspace",
        KeyCode::Delete => "Delete",
        KeyCode::Insert => "Insert",
        _ => return None,
    };
    Some(name.to_string())
}

/// Check if a key matches one of the bindings for an action.
///
/// Comparison is case-insensitive, so `W` (Shift+w) matches `w`.
pub fn matches_binding(pressed: &str, bindings: &[String]) -> bool {
    let lower = pressed.to_lowercase();
    bindings
        .iter()
        .any(|binding| binding == pressed || binding.to_lowercase() == lower)
}
