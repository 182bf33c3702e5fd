//! Collaborator traits implemented by the environment hosting the engine.
//!
//! # Architecture
//!
//! ```text
//! key events ──► Engine ──► ElementResolver / PageActions / FullscreenController
//!                  ▲  │
//!    frame(handle, │  └──► FrameScheduler::request_frame() -> LoopHandle
//!    timestamp)    │
//!                 Host (delivers the frame, stamps it with Clock::now())
//! ```

use std::time::{Duration, Instant};

/// Opaque reference to an element on the host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub u64);

/// Handle of a scheduled frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoopHandle(pub u64);

/// Where scroll displacement is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollTarget {
    /// The page viewport
    Viewport,
    /// A nested scrollable element
    Element(ElementId),
}

/// Locator lookup on the host page.
pub trait ElementResolver {
    /// Resolve a locator to an element present right now.
    fn resolve_element(&self, locator: &str) -> Option<ElementId>;
}

/// Side-effecting page operations. All of them are fire-and-forget.
pub trait PageActions {
    /// Activate an element as if the user clicked it.
    fn click(&mut self, element: ElementId);

    /// Scroll `target` vertically by `delta_y` pixels (positive is down).
    fn scroll_by(&mut self, target: ScrollTarget, delta_y: f64);
}

/// Fullscreen capability of the host.
pub trait FullscreenController {
    fn enter_fullscreen(&mut self);
    fn exit_fullscreen(&mut self);
}

/// Display-refresh scheduler.
///
/// A requested frame is delivered once: the host calls the engine's frame
/// entry point with the returned handle. Delivering a frame consumes the
/// request; the engine asks again if it wants another one.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> LoopHandle;
}

/// Monotonic time source for frame timestamps.
pub trait Clock {
    /// Time elapsed since an arbitrary fixed origin.
    fn now(&self) -> Duration;
}

/// Combined context trait for everything the engine calls on its host.
pub trait HostContext: ElementResolver + PageActions + FullscreenController + FrameScheduler {}

impl<T> HostContext for T where
    T: ElementResolver + PageActions + FullscreenController + FrameScheduler
{
}

/// [`Clock`] backed by [`Instant`], measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}
