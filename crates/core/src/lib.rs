//! Host interfaces and shared types for the glidenav scroll engine.
//!
//! The engine never touches a page directly. Everything it needs from the
//! environment it runs in (element lookup, clicks, scrolling, fullscreen,
//! frame scheduling, time) goes through the traits in [`host`], so the same
//! engine drives the terminal reader and the fake hosts used in tests.

pub mod error;
pub mod host;

pub use error::NavError;
pub use host::{
    Clock, ElementId, ElementResolver, FrameScheduler, FullscreenController, HostContext,
    LoopHandle, MonotonicClock, PageActions, ScrollTarget,
};

/// Vertical scroll direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}
