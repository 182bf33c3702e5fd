use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

use glidenav_keyboard::ReleaseTracker;

/// Application event
#[derive(Debug, Clone)]
pub enum Event {
    /// Key pressed or auto-repeated
    KeyDown(KeyEvent),
    /// Key released (reported by the terminal or synthesized)
    KeyUp(KeyEvent),
    /// Terminal resized; the next draw picks up the new size
    Resize,
    /// Poll timed out
    Tick,
}

/// Event handler
pub struct EventHandler {
    /// Present when the terminal cannot report key releases
    release_tracker: Option<ReleaseTracker>,
    queued: VecDeque<Event>,
}

impl EventHandler {
    /// Create an event handler. Without release reporting, releases are
    /// synthesized once a key stops repeating for `release_timeout`.
    pub fn new(reports_releases: bool, release_timeout: Duration) -> Self {
        let release_tracker = if reports_releases {
            None
        } else {
            Some(ReleaseTracker::new(release_timeout))
        };

        Self {
            release_tracker,
            queued: VecDeque::new(),
        }
    }

    /// Wait up to `timeout` for the next event
    pub fn next(&mut self, timeout: Duration) -> Result<Event> {
        if let Some(event) = self.queued.pop_front() {
            return Ok(event);
        }

        let event = if event::poll(self.poll_timeout(timeout))? {
            self.translate(event::read()?)
        } else {
            Event::Tick
        };

        if let Some(tracker) = &mut self.release_tracker {
            for key in tracker.expired(Instant::now()) {
                self.queued.push_back(Event::KeyUp(key));
            }
        }

        match event {
            Event::Tick => Ok(self.queued.pop_front().unwrap_or(Event::Tick)),
            other => Ok(other),
        }
    }

    fn poll_timeout(&self, timeout: Duration) -> Duration {
        let deadline = self
            .release_tracker
            .as_ref()
            .and_then(|tracker| tracker.next_deadline());

        match deadline {
            Some(deadline) => timeout.min(deadline.saturating_duration_since(Instant::now())),
            None => timeout,
        }
    }

    fn translate(&mut self, event: CrosstermEvent) -> Event {
        match event {
            CrosstermEvent::Key(key) => match key.kind {
                KeyEventKind::Press | KeyEventKind::Repeat => {
                    if let Some(tracker) = &mut self.release_tracker {
                        tracker.press(key, Instant::now());
                    }
                    Event::KeyDown(key)
                }
                KeyEventKind::Release => {
                    if let Some(tracker) = &mut self.release_tracker {
                        tracker.release(key.code);
                    }
                    Event::KeyUp(key)
                }
            },
            CrosstermEvent::Resize(_, _) => Event::Resize,
            _ => Event::Tick,
        }
    }
}
