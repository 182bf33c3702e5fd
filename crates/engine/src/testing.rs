//! Fake host for engine tests.

use std::collections::HashMap;

use glidenav_core::{
    ElementId, ElementResolver, FrameScheduler, FullscreenController, LoopHandle, PageActions,
    ScrollTarget,
};

/// Records every call the engine makes.
#[derive(Debug, Default)]
pub struct FakeHost {
    pub elements: HashMap<String, ElementId>,
    pub clicks: Vec<ElementId>,
    pub scrolls: Vec<(ScrollTarget, f64)>,
    /// `true` for enter, `false` for exit
    pub fullscreen_calls: Vec<bool>,
    pub frame_requests: u64,
    pub pending: Option<LoopHandle>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_element(&mut self, locator: &str, element: ElementId) {
        self.elements.insert(locator.to_string(), element);
    }

    pub fn remove_element(&mut self, locator: &str) {
        self.elements.remove(locator);
    }

    /// Take the pending frame request, as the host does when it delivers.
    pub fn take_frame(&mut self) -> Option<LoopHandle> {
        self.pending.take()
    }

    pub fn scrolled_total(&self) -> f64 {
        self.scrolls.iter().map(|(_, delta)| delta).sum()
    }
}

impl ElementResolver for FakeHost {
    fn resolve_element(&self, locator: &str) -> Option<ElementId> {
        self.elements.get(locator).copied()
    }
}

impl PageActions for FakeHost {
    fn click(&mut self, element: ElementId) {
        self.clicks.push(element);
    }

    fn scroll_by(&mut self, target: ScrollTarget, delta_y: f64) {
        self.scrolls.push((target, delta_y));
    }
}

impl FullscreenController for FakeHost {
    fn enter_fullscreen(&mut self) {
        self.fullscreen_calls.push(true);
    }

    fn exit_fullscreen(&mut self) {
        self.fullscreen_calls.push(false);
    }
}

impl FrameScheduler for FakeHost {
    fn request_frame(&mut self) -> LoopHandle {
        self.frame_requests += 1;
        let handle = LoopHandle(self.frame_requests);
        self.pending = Some(handle);
        handle
    }
}
