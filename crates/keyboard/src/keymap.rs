use glidenav_config::KeyBindings;

use crate::matches_binding;

/// Actions that can be bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ScrollUp,
    ScrollDown,
    PrevChapter,
    NextChapter,
    Fullscreen,
    AllChapters,
}

impl Action {
    /// Lookup order when a key is bound to several actions.
    pub const PRIORITY: [Action; 6] = [
        Action::ScrollUp,
        Action::ScrollDown,
        Action::PrevChapter,
        Action::NextChapter,
        Action::Fullscreen,
        Action::AllChapters,
    ];

    /// Human-readable name used in diagnostics.
    pub fn label(self) -> &'static str {
        match self {
            Action::ScrollUp => "Scroll Up",
            Action::ScrollDown => "Scroll Down",
            Action::PrevChapter => "Previous Chapter",
            Action::NextChapter => "Next Chapter",
            Action::Fullscreen => "Fullscreen",
            Action::AllChapters => "All Chapters",
        }
    }
}

/// Configured key bindings, queried by action.
#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: KeyBindings,
}

impl Keymap {
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    /// Key names bound to `action`.
    pub fn keys(&self, action: Action) -> &[String] {
        match action {
            Action::ScrollUp => &self.bindings.scroll_up,
            Action::ScrollDown => &self.bindings.scroll_down,
            Action::PrevChapter => &self.bindings.prev_chapter,
            Action::NextChapter => &self.bindings.next_chapter,
            Action::Fullscreen => &self.bindings.fullscreen,
            Action::AllChapters => &self.bindings.all_chapters,
        }
    }

    /// Check if `key` is bound to `action`.
    pub fn is_bound(&self, action: Action, key: &str) -> bool {
        matches_binding(key, self.keys(action))
    }

    /// First action bound to `key` in priority order.
    pub fn action_for(&self, key: &str) -> Option<Action> {
        Action::PRIORITY
            .into_iter()
            .find(|action| self.is_bound(*action, key))
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new(KeyBindings::default())
    }
}
