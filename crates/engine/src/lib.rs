//! Momentum scrolling engine driven by held keys.
//!
//! This crate provides:
//! - `InputTracker` - held state of both scroll directions from key events
//! - `ScrollIntegrator` - the frame loop: velocity ramp, decay, displacement
//! - `Engine` - one instance per page, wiring both to a host
//!
//! # Architecture
//!
//! ```text
//! key down/up ──► InputTracker ──► ScrollIntent
//!                      │                │ (read once per frame)
//!        nav/fullscreen▼                ▼
//!                    Host ◄──── ScrollIntegrator ◄── frame(handle, timestamp)
//!                 (click, scroll_by, request_frame)
//! ```
//!
//! Everything runs on the host's single event thread. Failures inside the
//! engine are logged and never interrupt key handling or the frame loop.

pub mod input;
pub mod scroll;

#[cfg(test)]
mod testing;

pub use input::InputTracker;
pub use scroll::{FrameOutcome, ScrollIntegrator, ScrollIntent, VelocityPair};

use std::time::Duration;

use glidenav_config::{Config, SiteProfile};
use glidenav_core::{
    Direction, ElementResolver, FrameScheduler, HostContext, LoopHandle, NavError, PageActions,
};
use glidenav_keyboard::{Action, KeyInput, Keymap};

/// How the host should treat a key event after the engine saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not for the engine; the host handles the key normally.
    Ignored,
    /// The engine acted on the key.
    Handled {
        /// The host must not apply its own default behaviour for the key.
        prevent_default: bool,
    },
}

impl KeyOutcome {
    pub fn is_handled(self) -> bool {
        matches!(self, KeyOutcome::Handled { .. })
    }

    pub fn prevents_default(self) -> bool {
        matches!(
            self,
            KeyOutcome::Handled {
                prevent_default: true
            }
        )
    }
}

/// Scrolling and navigation engine for one page.
#[derive(Debug, Clone)]
pub struct Engine {
    host: String,
    profile: SiteProfile,
    tracker: InputTracker,
    integrator: ScrollIntegrator,
    fullscreen: bool,
}

impl Engine {
    /// Create the engine for `host`.
    ///
    /// Hosts without a site profile opt out: the error is logged and
    /// returned, and the caller must not route any input to an engine.
    pub fn init(config: &Config, host: &str) -> Result<Self, NavError> {
        let Some(profile) = config.site(host) else {
            let err = NavError::ConfigurationMissing {
                host: host.to_string(),
            };
            glidenav_logger::warn(err.to_string());
            return Err(err);
        };

        glidenav_logger::info(format!("Engine initialized for {}", host));
        Ok(Self {
            host: host.to_string(),
            profile: profile.clone(),
            tracker: InputTracker::new(Keymap::new(config.keys.clone())),
            integrator: ScrollIntegrator::new(config.scroll, profile),
            fullscreen: false,
        })
    }

    pub fn intent(&self) -> ScrollIntent {
        self.tracker.intent()
    }

    pub fn velocity(&self) -> VelocityPair {
        self.integrator.velocity()
    }

    /// Whether the frame loop is running.
    pub fn is_scrolling(&self) -> bool {
        self.integrator.is_active()
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Handle a key press or auto-repeat.
    pub fn on_key_down<H>(&mut self, input: &KeyInput, host: &mut H) -> KeyOutcome
    where
        H: HostContext + ?Sized,
    {
        let Some(action) = self.tracker.key_down_action(input) else {
            return KeyOutcome::Ignored;
        };

        match action {
            Action::ScrollUp => self.start_scrolling(Direction::Up, host),
            Action::ScrollDown => self.start_scrolling(Direction::Down, host),
            Action::Fullscreen => self.toggle_fullscreen(host),
            Action::PrevChapter | Action::NextChapter | Action::AllChapters => {
                if let Err(err) = self.navigate(action, host) {
                    glidenav_logger::warn(err.to_string());
                }
                return KeyOutcome::Handled {
                    prevent_default: false,
                };
            }
        }

        KeyOutcome::Handled {
            prevent_default: true,
        }
    }

    /// Handle a key release.
    pub fn on_key_up(&mut self, input: &KeyInput) -> KeyOutcome {
        let directions = self.tracker.key_up_directions(input);
        if directions.is_empty() {
            return KeyOutcome::Ignored;
        }

        for direction in directions {
            self.stop_scrolling(direction);
        }
        KeyOutcome::Handled {
            prevent_default: false,
        }
    }

    /// Hold `direction` and make sure the loop runs. Repeats are no-ops.
    pub fn start_scrolling<S>(&mut self, direction: Direction, scheduler: &mut S)
    where
        S: FrameScheduler + ?Sized,
    {
        if self.tracker.hold(direction) {
            self.integrator.start(direction, scheduler);
        }
    }

    /// Release `direction`. The loop keeps running until velocity decays.
    pub fn stop_scrolling(&mut self, direction: Direction) {
        self.tracker.release(direction);
    }

    /// Frame entry point, called by the host for a requested frame.
    pub fn on_animation_frame<H>(
        &mut self,
        handle: LoopHandle,
        timestamp: Duration,
        host: &mut H,
    ) -> FrameOutcome
    where
        H: ElementResolver + PageActions + FrameScheduler + ?Sized,
    {
        let intent = self.tracker.intent();
        self.integrator.on_frame(handle, timestamp, intent, host)
    }

    /// Click the control configured for a navigation action.
    pub fn navigate<H>(&self, action: Action, host: &mut H) -> Result<(), NavError>
    where
        H: ElementResolver + PageActions + ?Sized,
    {
        let locator = match action {
            Action::PrevChapter => self.profile.prev.as_deref(),
            Action::NextChapter => self.profile.next.as_deref(),
            Action::AllChapters => self.profile.all_chapters.as_deref(),
            _ => None,
        }
        .ok_or_else(|| NavError::UnconfiguredAction {
            action: action.label().to_string(),
            host: self.host.clone(),
        })?;

        let element =
            host.resolve_element(locator)
                .ok_or_else(|| NavError::SelectorNotFound {
                    action: action.label().to_string(),
                    locator: locator.to_string(),
                })?;

        glidenav_logger::debug(format!("{} -> {}", action.label(), locator));
        host.click(element);
        Ok(())
    }

    fn toggle_fullscreen<H>(&mut self, host: &mut H)
    where
        H: HostContext + ?Sized,
    {
        if self.fullscreen {
            host.exit_fullscreen();
        } else {
            host.enter_fullscreen();
        }
        self.fullscreen = !self.fullscreen;
    }
}
