//! Frame-driven scroll integrator.
//!
//! Two velocity accumulators (up and down) are advanced every frame from
//! the held state of each direction and the real time elapsed since the
//! previous frame: linear ramp-up while held, exponential decay while
//! released. Because both rules integrate over `dt` rather than per frame,
//! perceived speed does not depend on the frame rate.

use std::time::Duration;

use glidenav_config::{ScrollSettings, SiteProfile};
use glidenav_core::{
    Direction, ElementResolver, FrameScheduler, LoopHandle, NavError, PageActions, ScrollTarget,
};

/// Held state of each scroll direction.
///
/// Both directions may be held at once; they cancel in the net speed, not
/// here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollIntent {
    pub up_held: bool,
    pub down_held: bool,
}

impl ScrollIntent {
    pub fn is_held(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up_held,
            Direction::Down => self.down_held,
        }
    }

    /// Set the held state; returns `true` if it changed.
    pub fn set(&mut self, direction: Direction, held: bool) -> bool {
        let slot = match direction {
            Direction::Up => &mut self.up_held,
            Direction::Down => &mut self.down_held,
        };
        let changed = *slot != held;
        *slot = held;
        changed
    }

    pub fn any(&self) -> bool {
        self.up_held || self.down_held
    }
}

/// Current speed per direction, in px/s. Both stay within `0..=max_speed`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VelocityPair {
    pub up: f64,
    pub down: f64,
}

impl VelocityPair {
    /// Signed speed, positive downwards.
    pub fn net(&self) -> f64 {
        self.down - self.up
    }

    pub fn get(&self, direction: Direction) -> f64 {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
        }
    }
}

/// Advance one directional speed by `dt` seconds.
pub fn step_speed(speed: f64, held: bool, dt: f64, tuning: &ScrollSettings) -> f64 {
    if held {
        (speed + tuning.accel_rate * dt).min(tuning.max_speed)
    } else {
        speed * (-tuning.decay_rate * dt).exp()
    }
}

/// Seconds needed to decay from `max_speed` below the stop threshold.
pub fn settle_time(tuning: &ScrollSettings) -> f64 {
    (tuning.max_speed / tuning.stop_threshold).ln() / tuning.decay_rate
}

/// What a delivered frame did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// The handle does not belong to the running loop; nothing happened.
    Stale,
    /// Both speeds settled; the loop stopped without scrolling.
    Idle,
    /// `delta` pixels were applied and the next frame was requested.
    Scrolled { delta: f64 },
}

/// Per-frame velocity integration and scroll application.
#[derive(Debug, Clone)]
pub struct ScrollIntegrator {
    tuning: ScrollSettings,
    /// Site scroll multiplier
    multiplier: f64,
    /// Locator of the nested scroll container, if any
    container: Option<String>,
    velocity: VelocityPair,
    /// Frame requested for the running loop; `None` while idle
    handle: Option<LoopHandle>,
    /// Timestamp of the previous processed frame
    last_frame: Option<Duration>,
    /// Missing-container warning already emitted for this activation
    container_warned: bool,
}

impl ScrollIntegrator {
    pub fn new(tuning: ScrollSettings, profile: &SiteProfile) -> Self {
        Self {
            tuning,
            multiplier: profile.scroll_speed,
            container: profile.scroll_container.clone(),
            velocity: VelocityPair::default(),
            handle: None,
            last_frame: None,
            container_warned: false,
        }
    }

    pub fn velocity(&self) -> VelocityPair {
        self.velocity
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    /// Make sure the loop runs. A running loop is left alone: one loop
    /// serves both directions.
    pub fn start<S>(&mut self, direction: Direction, scheduler: &mut S)
    where
        S: FrameScheduler + ?Sized,
    {
        if self.handle.is_some() {
            return;
        }

        self.last_frame = None;
        self.container_warned = false;
        self.handle = Some(scheduler.request_frame());
        glidenav_logger::debug(format!("Scroll loop started ({})", direction.as_str()));
    }

    /// Process one frame delivered for `handle` at `timestamp`.
    pub fn on_frame<H>(
        &mut self,
        handle: LoopHandle,
        timestamp: Duration,
        intent: ScrollIntent,
        host: &mut H,
    ) -> FrameOutcome
    where
        H: ElementResolver + PageActions + FrameScheduler + ?Sized,
    {
        if self.handle != Some(handle) {
            return FrameOutcome::Stale;
        }

        let dt = self
            .last_frame
            .map(|previous| timestamp.saturating_sub(previous).as_secs_f64())
            .unwrap_or(0.0);
        self.last_frame = Some(timestamp);

        self.velocity.up = step_speed(self.velocity.up, intent.up_held, dt, &self.tuning);
        self.velocity.down = step_speed(self.velocity.down, intent.down_held, dt, &self.tuning);

        let threshold = self.tuning.stop_threshold;
        if self.velocity.up < threshold && self.velocity.down < threshold && !intent.any() {
            self.stop();
            return FrameOutcome::Idle;
        }

        let delta = self.velocity.net() * dt * self.multiplier;
        if delta != 0.0 {
            let target = self.resolve_target(&*host);
            host.scroll_by(target, delta);
        }

        self.handle = Some(host.request_frame());
        FrameOutcome::Scrolled { delta }
    }

    /// Resolve the configured container, falling back to the viewport.
    pub fn resolve_target<R>(&mut self, resolver: &R) -> ScrollTarget
    where
        R: ElementResolver + ?Sized,
    {
        let Some(locator) = self.container.as_deref() else {
            return ScrollTarget::Viewport;
        };

        match resolver.resolve_element(locator) {
            Some(element) => ScrollTarget::Element(element),
            None => {
                if !self.container_warned {
                    self.container_warned = true;
                    let err = NavError::SelectorNotFound {
                        action: "Scroll Container".to_string(),
                        locator: locator.to_string(),
                    };
                    glidenav_logger::warn(format!("{} Falling back to viewport.", err));
                }
                ScrollTarget::Viewport
            }
        }
    }

    fn stop(&mut self) {
        self.handle = None;
        self.last_frame = None;
        self.velocity = VelocityPair::default();
        glidenav_logger::debug("Scroll loop idle");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeHost;
    use glidenav_core::ElementId;

    const DT_60: f64 = 1.0 / 60.0;

    fn tuning() -> ScrollSettings {
        ScrollSettings {
            max_speed: 1800.0,
            accel_rate: 1500.0,
            decay_rate: 18.0,
            stop_threshold: 1.0,
        }
    }

    /// Drives an integrator with explicit timestamps.
    struct Sim {
        integrator: ScrollIntegrator,
        host: FakeHost,
        intent: ScrollIntent,
        now: f64,
    }

    impl Sim {
        fn new(tuning: ScrollSettings, profile: SiteProfile) -> Self {
            Self {
                integrator: ScrollIntegrator::new(tuning, &profile),
                host: FakeHost::new(),
                intent: ScrollIntent::default(),
                now: 0.0,
            }
        }

        fn hold(&mut self, direction: Direction) {
            if self.intent.set(direction, true) {
                self.integrator.start(direction, &mut self.host);
            }
        }

        fn release(&mut self, direction: Direction) {
            self.intent.set(direction, false);
        }

        /// Deliver the pending frame at the current time.
        fn frame(&mut self) -> FrameOutcome {
            let handle = self.host.take_frame().expect("no frame pending");
            let timestamp = Duration::from_secs_f64(self.now);
            self.integrator
                .on_frame(handle, timestamp, self.intent, &mut self.host)
        }

        /// Advance the clock by `dt` and deliver a frame.
        fn advance(&mut self, dt: f64) -> FrameOutcome {
            self.now += dt;
            self.frame()
        }

        /// Deliver frames every `dt` for `duration` seconds (first frame at
        /// the current time).
        fn run_for(&mut self, duration: f64, dt: f64) {
            self.frame();
            let steps = (duration / dt).round() as usize;
            for _ in 0..steps {
                self.advance(dt);
            }
        }

        /// Deliver frames every `dt` until the loop goes idle; returns the
        /// elapsed time.
        fn run_until_idle(&mut self, dt: f64) -> f64 {
            let started = self.now;
            for _ in 0..100_000 {
                if self.advance(dt) == FrameOutcome::Idle {
                    return self.now - started;
                }
            }
            panic!("loop never went idle");
        }
    }

    #[test]
    fn test_step_speed_ramps_and_caps() {
        let tuning = tuning();
        assert_eq!(step_speed(0.0, true, 0.5, &tuning), 750.0);
        assert_eq!(step_speed(1700.0, true, 0.5, &tuning), 1800.0);
        assert_eq!(step_speed(500.0, true, 0.0, &tuning), 500.0);
    }

    #[test]
    fn test_step_speed_decays_exponentially() {
        let tuning = tuning();
        let decayed = step_speed(1000.0, false, 0.1, &tuning);
        assert!((decayed - 1000.0 * (-1.8f64).exp()).abs() < 1e-9);
        assert_eq!(step_speed(0.0, false, 0.1, &tuning), 0.0);
    }

    #[test]
    fn test_hold_down_one_second_scenario() {
        let mut sim = Sim::new(tuning(), SiteProfile::default());
        sim.hold(Direction::Down);
        sim.run_for(1.0, DT_60);

        let velocity = sim.integrator.velocity();
        assert!((velocity.down - 1500.0).abs() < 1e-3);
        assert_eq!(velocity.up, 0.0);

        // Discrete stepping overshoots ½·a·T² by a·T·dt/2
        let scrolled = sim.host.scrolled_total();
        assert!((scrolled - 750.0).abs() < 15.0, "scrolled {}", scrolled);
        assert!(sim
            .host
            .scrolls
            .iter()
            .all(|(target, delta)| *target == ScrollTarget::Viewport && *delta > 0.0));
    }

    #[test]
    fn test_release_decays_to_idle_scenario() {
        let mut sim = Sim::new(tuning(), SiteProfile::default());
        sim.hold(Direction::Down);
        sim.run_for(1.0, DT_60);
        sim.release(Direction::Down);

        let requests_before = sim.host.frame_requests;
        let elapsed = sim.run_until_idle(DT_60);

        let bound = (1500.0f64).ln() / 18.0;
        assert!(elapsed <= bound + DT_60 + 1e-9, "took {}", elapsed);
        assert!(!sim.integrator.is_active());
        assert_eq!(sim.integrator.velocity(), VelocityPair::default());
        assert!(sim.host.take_frame().is_none());

        let frames = (elapsed / DT_60).round() as u64;
        // Every frame but the idle one asked for a successor
        assert_eq!(sim.host.frame_requests - requests_before, frames - 1);
    }

    #[test]
    fn test_ramp_is_frame_rate_independent() {
        let hold = 0.5;
        let mut speeds = Vec::new();
        let mut distances = Vec::new();

        for dt in [1.0f64 / 30.0, 1.0 / 60.0, 1.0 / 144.0, 1.0 / 240.0] {
            let mut sim = Sim::new(tuning(), SiteProfile::default());
            sim.hold(Direction::Up);
            sim.run_for(hold, dt);
            speeds.push(sim.integrator.velocity().up);
            distances.push(sim.host.scrolled_total());
        }

        for speed in &speeds {
            assert!((speed - 750.0).abs() < 1e-3, "speed {}", speed);
        }
        // Distance converges to -½·a·T² as dt shrinks
        for distance in &distances {
            assert!((distance + 187.5).abs() < 15.0, "distance {}", distance);
        }
    }

    #[test]
    fn test_irregular_frames_match_regular_frames() {
        let mut regular = Sim::new(tuning(), SiteProfile::default());
        regular.hold(Direction::Down);
        regular.run_for(0.6, 0.02);

        let mut irregular = Sim::new(tuning(), SiteProfile::default());
        irregular.hold(Direction::Down);
        irregular.frame();
        for dt in [0.005f64, 0.1, 0.033, 0.016, 0.2, 0.046, 0.1, 0.1] {
            irregular.advance(dt);
        }

        assert!((irregular.now - 0.6).abs() < 1e-9);
        let a = regular.integrator.velocity().down;
        let b = irregular.integrator.velocity().down;
        assert!((a - b).abs() < 1e-3, "{} vs {}", a, b);
    }

    #[test]
    fn test_decay_is_frame_rate_independent() {
        let mut finals = Vec::new();
        for dt in [1.0f64 / 30.0, 1.0 / 60.0, 1.0 / 120.0] {
            let mut sim = Sim::new(tuning(), SiteProfile::default());
            sim.hold(Direction::Down);
            sim.run_for(0.6, 0.05);
            sim.release(Direction::Down);
            // 0.2 s of decay
            let steps = (0.2f64 / dt).round() as usize;
            for _ in 0..steps {
                sim.advance(dt);
            }
            finals.push(sim.integrator.velocity().down);
        }

        let expected = 900.0 * (-18.0f64 * 0.2).exp();
        for speed in finals {
            assert!((speed - expected).abs() < 1e-6, "{} vs {}", speed, expected);
        }
    }

    #[test]
    fn test_speed_saturates_at_max() {
        for dt in [1.0f64 / 60.0, 0.25, 5.0] {
            let mut sim = Sim::new(tuning(), SiteProfile::default());
            sim.hold(Direction::Down);
            sim.frame();
            for _ in 0..200 {
                sim.advance(dt);
                let down = sim.integrator.velocity().down;
                assert!(down <= 1800.0, "speed {} at dt {}", down, dt);
            }
            assert_eq!(sim.integrator.velocity().down, 1800.0);
        }
    }

    #[test]
    fn test_decay_converges_within_bound() {
        for decay_rate in [2.0f64, 5.0, 18.0, 40.0] {
            for dt in [1.0f64 / 30.0, 1.0 / 60.0, 1.0 / 144.0] {
                let tuning = ScrollSettings {
                    decay_rate,
                    ..tuning()
                };
                let mut sim = Sim::new(tuning, SiteProfile::default());
                sim.hold(Direction::Up);
                sim.run_for(1.5, dt);
                assert_eq!(sim.integrator.velocity().up, 1800.0);

                sim.release(Direction::Up);
                let elapsed = sim.run_until_idle(dt);
                let bound = settle_time(&tuning);
                assert!(
                    elapsed > bound - 1e-9 && elapsed <= bound + dt + 1e-9,
                    "decay {} dt {}: {} vs {}",
                    decay_rate,
                    dt,
                    elapsed,
                    bound
                );
            }
        }
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut once = Sim::new(tuning(), SiteProfile::default());
        once.integrator.start(Direction::Up, &mut once.host);
        once.intent.set(Direction::Up, true);

        let mut twice = Sim::new(tuning(), SiteProfile::default());
        twice.integrator.start(Direction::Up, &mut twice.host);
        twice.intent.set(Direction::Up, true);
        twice.integrator.start(Direction::Up, &mut twice.host);

        assert_eq!(once.host.frame_requests, 1);
        assert_eq!(twice.host.frame_requests, 1);

        once.frame();
        twice.frame();
        for _ in 0..30 {
            once.advance(DT_60);
            twice.advance(DT_60);
            // Starting mid-flight must not reset the frame clock
            twice.integrator.start(Direction::Up, &mut twice.host);
            assert_eq!(once.integrator.velocity(), twice.integrator.velocity());
        }
        assert_eq!(once.host.scrolls, twice.host.scrolls);
    }

    #[test]
    fn test_opposing_holds_cancel_net_motion() {
        let mut both = Sim::new(tuning(), SiteProfile::default());
        both.hold(Direction::Up);
        both.hold(Direction::Down);

        let mut alone = Sim::new(tuning(), SiteProfile::default());
        alone.hold(Direction::Down);

        both.frame();
        alone.frame();
        for _ in 0..45 {
            both.advance(DT_60);
            alone.advance(DT_60);
            let velocity = both.integrator.velocity();
            assert_eq!(velocity.up, velocity.down);
            assert_eq!(velocity.net(), 0.0);
            assert_eq!(velocity.down, alone.integrator.velocity().down);
        }
        assert!(both.host.scrolls.is_empty());
        assert_eq!(both.host.frame_requests, 47);

        // Releasing one side first lets the other win while it decays
        both.release(Direction::Up);
        both.advance(DT_60);
        let velocity = both.integrator.velocity();
        assert!(velocity.up < velocity.down);
        assert!(velocity.up > 0.0);
        assert!(both.host.scrolled_total() > 0.0);
    }

    #[test]
    fn test_restart_never_uses_stale_dt() {
        let mut sim = Sim::new(tuning(), SiteProfile::default());
        sim.hold(Direction::Down);
        sim.run_for(0.2, DT_60);
        sim.release(Direction::Down);
        sim.run_until_idle(DT_60);

        // Ten seconds later
        sim.now += 10.0;
        sim.hold(Direction::Down);
        let outcome = sim.frame();
        assert_eq!(outcome, FrameOutcome::Scrolled { delta: 0.0 });
        assert_eq!(sim.integrator.velocity().down, 0.0);

        sim.advance(DT_60);
        assert!((sim.integrator.velocity().down - 25.0).abs() < 1e-3);
    }

    #[test]
    fn test_stale_handle_is_ignored() {
        let mut sim = Sim::new(tuning(), SiteProfile::default());
        sim.hold(Direction::Down);
        let stale = sim.host.take_frame().unwrap();
        sim.host.pending = Some(stale);
        sim.advance(DT_60);

        let outcome = sim
            .integrator
            .on_frame(stale, Duration::from_secs(1), sim.intent, &mut sim.host);
        assert_eq!(outcome, FrameOutcome::Stale);
        assert_eq!(sim.integrator.velocity().down, 0.0);
    }

    #[test]
    fn test_backwards_timestamp_counts_as_zero() {
        let mut sim = Sim::new(tuning(), SiteProfile::default());
        sim.now = 1.0;
        sim.hold(Direction::Down);
        sim.frame();
        sim.advance(0.1);
        let before = sim.integrator.velocity().down;

        sim.now = 0.5;
        sim.frame();
        assert_eq!(sim.integrator.velocity().down, before);
    }

    #[test]
    fn test_site_multiplier_scales_displacement() {
        let mut normal = Sim::new(tuning(), SiteProfile::default());
        let mut fast = Sim::new(tuning(), SiteProfile::default().with_scroll_speed(2.0));
        for sim in [&mut normal, &mut fast] {
            sim.hold(Direction::Down);
            sim.run_for(0.5, DT_60);
        }

        let ratio = fast.host.scrolled_total() / normal.host.scrolled_total();
        assert!((ratio - 2.0).abs() < 1e-9);
        assert_eq!(normal.integrator.velocity(), fast.integrator.velocity());
    }

    #[test]
    fn test_container_target_and_fallback() {
        let profile = SiteProfile::default().with_scroll_container("div.reader");
        let mut sim = Sim::new(tuning(), profile);
        sim.host.add_element("div.reader", ElementId(7));

        sim.hold(Direction::Down);
        sim.frame();
        sim.advance(DT_60);
        assert_eq!(
            sim.host.scrolls.last().map(|(target, _)| *target),
            Some(ScrollTarget::Element(ElementId(7)))
        );

        // Container disappears mid-scroll: viewport takes over, loop continues
        sim.host.remove_element("div.reader");
        let outcome = sim.advance(DT_60);
        assert!(matches!(outcome, FrameOutcome::Scrolled { .. }));
        assert_eq!(
            sim.host.scrolls.last().map(|(target, _)| *target),
            Some(ScrollTarget::Viewport)
        );
        assert!(sim.integrator.is_active());
    }
}
