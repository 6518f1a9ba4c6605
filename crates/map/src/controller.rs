//! Camera sequencing for the globe: fly-to focus, reset to the world view,
//! and the two per-frame rotation modes.
//!
//! - **Idle**: bearing +0.018 deg per frame with pitch pinned at 0, while the
//!   zoom eases linearly toward [`WORLD_ZOOM`]. The ease takes 90 s before
//!   the user has engaged and 12 s afterwards, then the zoom is held.
//! - **Hover**: bearing +0.02 deg per frame around a focused city. It starts
//!   only once the widget reports the end of the fly-to.
//!
//! Calling [`MapController::focus`] or [`MapController::reset`] freezes the
//! bearing immediately; rotation never runs concurrently with a flight.

use foundation::geo::LngLat;
use foundation::math::{lerp, progress};
use foundation::time::Millis;

use crate::camera::{CameraOptions, MapOptions, WORLD_ZOOM};
use crate::widget::{MapError, MapWidget};

pub const IDLE_BEARING_STEP_DEG: f64 = 0.018;
pub const HOVER_BEARING_STEP_DEG: f64 = 0.02;

/// Idle zoom ease before the intro is dismissed.
pub const IDLE_ZOOM_MS_PRE_INTRO: f64 = 90_000.0;
/// Idle zoom ease once the user has engaged.
pub const IDLE_ZOOM_MS_ENGAGED: f64 = 12_000.0;

#[derive(Debug, Copy, Clone, PartialEq)]
struct IdleZoom {
    from: f64,
    duration_ms: f64,
    /// Stamped by the first tick so the ease starts on a real frame.
    started_at: Option<Millis>,
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum Motion {
    Still,
    Idle(IdleZoom),
    /// Flying to a city; hover begins at move-end.
    FlyingToFocus,
    Hover,
    /// Flying back to the world; idle begins at move-end.
    FlyingToWorld,
}

/// Public summary of what the camera is doing.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MotionState {
    Still,
    Idle,
    FlyingToFocus,
    Hover,
    FlyingToWorld,
}

#[derive(Debug)]
pub struct MapController<W> {
    widget: Option<W>,
    motion: Motion,
    /// Past the intro. Controls idle resume on reset and the idle ease length.
    engaged: bool,
}

impl<W> Default for MapController<W> {
    fn default() -> Self {
        Self {
            widget: None,
            motion: Motion::Still,
            engaged: false,
        }
    }
}

impl<W: MapWidget> MapController<W> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the widget. Returns `Ok(false)` without calling `factory` if
    /// a widget is already live.
    pub fn initialize<F>(&mut self, options: &MapOptions, factory: F) -> Result<bool, MapError>
    where
        F: FnOnce(&MapOptions) -> Result<W, MapError>,
    {
        if self.widget.is_some() {
            tracing::debug!("map already initialized");
            return Ok(false);
        }
        let widget = factory(options)?;
        self.widget = Some(widget);
        self.motion = Motion::Still;
        tracing::info!(style = %options.style, "map initialized");
        Ok(true)
    }

    pub fn is_live(&self) -> bool {
        self.widget.is_some()
    }

    pub fn widget(&self) -> Option<&W> {
        self.widget.as_ref()
    }

    pub fn widget_mut(&mut self) -> Option<&mut W> {
        self.widget.as_mut()
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    pub fn motion(&self) -> MotionState {
        match self.motion {
            Motion::Still => MotionState::Still,
            Motion::Idle(_) => MotionState::Idle,
            Motion::FlyingToFocus => MotionState::FlyingToFocus,
            Motion::Hover => MotionState::Hover,
            Motion::FlyingToWorld => MotionState::FlyingToWorld,
        }
    }

    pub fn is_rotating(&self) -> bool {
        matches!(self.motion, Motion::Idle(_) | Motion::Hover)
    }

    /// Flies to `target`. Hover rotation starts at the next move-end.
    pub fn focus(&mut self, target: LngLat) {
        let Some(widget) = self.widget.as_mut() else {
            return;
        };
        self.motion = Motion::Still;
        widget.fly_to(&CameraOptions::focus_flight(target));
        // Set after the call: a move-end fired synchronously by the
        // interrupted flight belongs to the old animation.
        self.motion = Motion::FlyingToFocus;
        tracing::debug!(%target, "flying to focus");
    }

    /// Flies back to the world view. Idle rotation resumes at move-end when
    /// the user has engaged.
    pub fn reset(&mut self) {
        let Some(widget) = self.widget.as_mut() else {
            return;
        };
        self.motion = Motion::Still;
        widget.fly_to(&CameraOptions::world_flight());
        if self.engaged {
            self.motion = Motion::FlyingToWorld;
        }
        tracing::debug!(engaged = self.engaged, "flying to world view");
    }

    /// Called by the widget when a camera animation ends.
    pub fn on_move_end(&mut self) {
        match self.motion {
            Motion::FlyingToFocus => {
                self.motion = Motion::Hover;
                tracing::debug!("hover rotation started");
            }
            Motion::FlyingToWorld => self.start_idle(),
            _ => {}
        }
    }

    /// `false` snaps to the world origin and starts the slow idle ease.
    /// `true` shortens a running idle ease, restarting it from the current
    /// zoom.
    pub fn set_animate(&mut self, engaged: bool) {
        self.engaged = engaged;
        if self.widget.is_none() {
            return;
        }
        if !engaged {
            if let Some(widget) = self.widget.as_mut() {
                widget.jump_to(&CameraOptions::world_origin());
            }
            self.start_idle();
        } else if matches!(self.motion, Motion::Idle(_)) {
            self.start_idle();
        }
    }

    fn start_idle(&mut self) {
        let Some(widget) = self.widget.as_ref() else {
            return;
        };
        let duration_ms = if self.engaged {
            IDLE_ZOOM_MS_ENGAGED
        } else {
            IDLE_ZOOM_MS_PRE_INTRO
        };
        self.motion = Motion::Idle(IdleZoom {
            from: widget.zoom(),
            duration_ms,
            started_at: None,
        });
        tracing::debug!(duration_ms, "idle rotation started");
    }

    /// One frame of whichever rotation is active.
    pub fn tick(&mut self, now: Millis) {
        let Some(widget) = self.widget.as_mut() else {
            return;
        };
        match &mut self.motion {
            Motion::Idle(ease) => {
                let started = *ease.started_at.get_or_insert(now);
                widget.set_bearing(widget.bearing() + IDLE_BEARING_STEP_DEG);
                widget.set_pitch(0.0);
                let t = progress(now.since(started), ease.duration_ms);
                widget.set_zoom(lerp(ease.from, WORLD_ZOOM, t));
            }
            Motion::Hover => {
                widget.set_bearing(widget.bearing() + HOVER_BEARING_STEP_DEG);
            }
            Motion::Still | Motion::FlyingToFocus | Motion::FlyingToWorld => {}
        }
    }

    /// Stops rotation and removes the widget. Later calls do nothing.
    pub fn teardown(&mut self) {
        self.motion = Motion::Still;
        if let Some(mut widget) = self.widget.take() {
            widget.remove();
            tracing::info!("map removed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{FLY_SPEED, FOCUS_ZOOM};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        FlyTo(CameraOptions),
        JumpTo(CameraOptions),
        Remove,
    }

    /// Records camera commands; bearing, zoom and pitch behave like a map
    /// that applies setters instantly.
    #[derive(Debug, Default)]
    struct FakeWidget {
        bearing: f64,
        zoom: f64,
        pitch: f64,
        calls: Rc<RefCell<Vec<Call>>>,
    }

    impl MapWidget for FakeWidget {
        fn fly_to(&mut self, camera: &CameraOptions) {
            self.calls.borrow_mut().push(Call::FlyTo(*camera));
        }
        fn jump_to(&mut self, camera: &CameraOptions) {
            self.bearing = camera.bearing;
            self.zoom = camera.zoom;
            self.pitch = camera.pitch;
            self.calls.borrow_mut().push(Call::JumpTo(*camera));
        }
        fn bearing(&self) -> f64 {
            self.bearing
        }
        fn set_bearing(&mut self, bearing_deg: f64) {
            self.bearing = bearing_deg;
        }
        fn zoom(&self) -> f64 {
            self.zoom
        }
        fn set_zoom(&mut self, zoom: f64) {
            self.zoom = zoom;
        }
        fn set_pitch(&mut self, pitch_deg: f64) {
            self.pitch = pitch_deg;
        }
        fn remove(&mut self) {
            self.calls.borrow_mut().push(Call::Remove);
        }
    }

    fn options() -> MapOptions {
        MapOptions::globe("map", "mapbox://styles/mapbox/standard", "pk.test")
    }

    fn live() -> (MapController<FakeWidget>, Rc<RefCell<Vec<Call>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut ctl = MapController::new();
        let widget = FakeWidget {
            calls: Rc::clone(&calls),
            ..FakeWidget::default()
        };
        assert_eq!(ctl.initialize(&options(), |_| Ok(widget)), Ok(true));
        (ctl, calls)
    }

    fn bearing(ctl: &MapController<FakeWidget>) -> f64 {
        ctl.widget().map(|w| w.bearing).unwrap_or(f64::NAN)
    }

    #[test]
    fn initialize_twice_keeps_the_first_widget() {
        let (mut ctl, _) = live();
        let mut called = false;
        let second = ctl.initialize(&options(), |_| {
            called = true;
            Ok(FakeWidget::default())
        });
        assert_eq!(second, Ok(false));
        assert!(!called);
    }

    #[test]
    fn initialize_propagates_factory_errors() {
        let mut ctl: MapController<FakeWidget> = MapController::new();
        let err = ctl
            .initialize(&options(), |_| Err(MapError::Create("no container".into())))
            .unwrap_err();
        assert_eq!(err, MapError::Create("no container".into()));
        assert!(!ctl.is_live());
    }

    #[test]
    fn hover_starts_only_after_move_end() {
        let (mut ctl, calls) = live();
        let paris = LngLat::new(2.3522, 48.8566);
        ctl.focus(paris);

        match calls.borrow().last() {
            Some(Call::FlyTo(cam)) => {
                assert_eq!(cam.center, paris);
                assert_eq!(cam.zoom, FOCUS_ZOOM);
                assert_eq!(cam.speed, Some(FLY_SPEED));
            }
            other => panic!("expected fly_to, got {other:?}"),
        }

        for i in 0..10 {
            ctl.tick(Millis(i as f64 * 16.0));
        }
        assert_eq!(bearing(&ctl), 0.0);
        assert_eq!(ctl.motion(), MotionState::FlyingToFocus);

        ctl.on_move_end();
        assert_eq!(ctl.motion(), MotionState::Hover);
        ctl.tick(Millis(200.0));
        ctl.tick(Millis(216.0));
        assert!((bearing(&ctl) - 0.04).abs() < 1e-12);
    }

    #[test]
    fn rotation_is_frozen_by_focus_and_reset() {
        let (mut ctl, _) = live();
        ctl.set_animate(true);
        ctl.focus(LngLat::new(10.0, 10.0));
        ctl.on_move_end();
        ctl.tick(Millis(0.0));
        let before = bearing(&ctl);

        ctl.reset();
        ctl.tick(Millis(16.0));
        ctl.tick(Millis(32.0));
        assert_eq!(bearing(&ctl), before);

        ctl.on_move_end();
        assert_eq!(ctl.motion(), MotionState::Idle);
        ctl.focus(LngLat::new(20.0, 20.0));
        let frozen = bearing(&ctl);
        ctl.tick(Millis(48.0));
        assert_eq!(bearing(&ctl), frozen);
    }

    #[test]
    fn reset_before_engagement_stays_still() {
        let (mut ctl, calls) = live();
        ctl.reset();
        assert_eq!(
            calls.borrow().last(),
            Some(&Call::FlyTo(CameraOptions::world_flight()))
        );
        ctl.on_move_end();
        assert_eq!(ctl.motion(), MotionState::Still);
    }

    #[test]
    fn idle_bearing_is_monotonic_and_zoom_eases_then_holds() {
        let (mut ctl, calls) = live();
        ctl.set_animate(false);
        assert_eq!(
            calls.borrow().last(),
            Some(&Call::JumpTo(CameraOptions::world_origin()))
        );

        let mut last = bearing(&ctl);
        ctl.tick(Millis(1000.0));
        for step in 1..=100 {
            ctl.tick(Millis(1000.0 + step as f64 * 450.0));
            let b = bearing(&ctl);
            assert!(b > last);
            last = b;
        }
        // 45 s into a 90 s ease from zoom 0.
        let zoom = ctl.widget().map(|w| w.zoom).unwrap_or_default();
        assert!((zoom - WORLD_ZOOM / 2.0).abs() < 1e-9);
        assert_eq!(ctl.widget().map(|w| w.pitch), Some(0.0));

        ctl.tick(Millis(200_000.0));
        assert_eq!(ctl.widget().map(|w| w.zoom), Some(WORLD_ZOOM));
    }

    #[test]
    fn engaging_shortens_the_idle_ease() {
        let (mut ctl, _) = live();
        ctl.set_animate(false);
        ctl.tick(Millis(0.0));
        ctl.set_animate(true);
        ctl.tick(Millis(10_000.0));
        ctl.tick(Millis(22_000.0));
        assert_eq!(ctl.widget().map(|w| w.zoom), Some(WORLD_ZOOM));
        assert!(ctl.is_engaged());
    }

    #[test]
    fn teardown_removes_once_and_disables_everything() {
        let (mut ctl, calls) = live();
        ctl.teardown();
        ctl.teardown();
        ctl.focus(LngLat::new(1.0, 1.0));
        ctl.tick(Millis(0.0));
        let removes = calls.borrow().iter().filter(|c| **c == Call::Remove).count();
        assert_eq!(removes, 1);
        assert!(!ctl.is_live());
    }
}
