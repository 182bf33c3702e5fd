use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState};

/// Synthesizes key releases for terminals that only report presses.
///
/// A held key produces auto-repeat presses; once none arrived for
/// `timeout`, the key counts as released. The timeout must exceed the
/// initial auto-repeat delay or holds are cut short.
#[derive(Debug, Clone)]
pub struct ReleaseTracker {
    timeout: Duration,
    held: HashMap<KeyCode, (KeyEvent, Instant)>,
}

impl ReleaseTracker {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            held: HashMap::new(),
        }
    }

    /// Record a press or auto-repeat.
    pub fn press(&mut self, event: KeyEvent, now: Instant) {
        self.held.insert(normalize(event.code), (event, now));
    }

    /// Forget a key that was released explicitly.
    pub fn release(&mut self, code: KeyCode) {
        self.held.remove(&normalize(code));
    }

    /// Remove and return release events for keys that stopped repeating.
    pub fn expired(&mut self, now: Instant) -> Vec<KeyEvent> {
        let timeout = self.timeout;
        let mut released = Vec::new();

        self.held.retain(|_, (event, last_seen)| {
            if now.saturating_duration_since(*last_seen) >= timeout {
                released.push(KeyEvent {
                    kind: KeyEventKind::Release,
                    state: KeyEventState::NONE,
                    ..*event
                });
                false
            } else {
                true
            }
        });

        released
    }

    /// Earliest instant at which a held key expires.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.held
            .values()
            .map(|(_, last_seen)| *last_seen + self.timeout)
            .min()
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }
}

/// `W` and `w` are the same physical key.
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(ch) => KeyCode::Char(ch.to_ascii_lowercase()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE)
    }

    #[test]
    fn test_repeats_keep_key_held() {
        let start = Instant::now();
        let mut tracker = ReleaseTracker::new(Duration::from_millis(500));

        tracker.press(press('s'), start);
        tracker.press(press('s'), start + Duration::from_millis(400));
        assert!(tracker
            .expired(start + Duration::from_millis(800))
            .is_empty());

        let released = tracker.expired(start + Duration::from_millis(900));
        assert_eq!(released.len(), 1);
        assert_eq!(released[0].code, KeyCode::Char('s'));
        assert_eq!(released[0].kind, KeyEventKind::Release);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_explicit_release_and_case() {
        let start = Instant::now();
        let mut tracker = ReleaseTracker::new(Duration::from_millis(500));

        tracker.press(press('W'), start);
        tracker.release(KeyCode::Char('w'));
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_next_deadline() {
        let start = Instant::now();
        let mut tracker = ReleaseTracker::new(Duration::from_millis(500));
        assert_eq!(tracker.next_deadline(), None);

        tracker.press(press('w'), start + Duration::from_millis(100));
        tracker.press(press('s'), start);
        assert_eq!(
            tracker.next_deadline(),
            Some(start + Duration::from_millis(500))
        );
    }
}
