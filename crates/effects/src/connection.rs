//! The "connecting to data sources" interlude shown between the intro and
//! the map.
//!
//! [`ConnectionSequence`] is a fixed script: each step goes pending ->
//! connecting -> connected on a timer, a success banner follows, and the
//! completion callback fires once. Nothing is actually contacted.
//! [`ConnectionScene`] paints the honeycomb and the particles converging on
//! each step while the sequence runs.

use foundation::color::Rgba;
use foundation::time::Millis;
use rand::Rng;
use runtime::animation_loop::{Animation, LoopControl};
use runtime::frame::Frame;
use runtime::script::Script;
use serde::Serialize;

use crate::canvas::{Canvas2d, ColorStop, Paint};
use crate::hexagons::{HexGrid, HexStyle};

pub const REVEAL_DELAY_MS: f64 = 500.0;
pub const STEP_PAUSE_MS: f64 = 500.0;
pub const SUCCESS_HOLD_MS: f64 = 3000.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Connecting,
    Connected,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionStep {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    /// `#rrggbb`
    pub color: &'static str,
    pub duration_ms: f64,
    pub status: StepStatus,
}

impl ConnectionStep {
    pub fn rgba(&self) -> Rgba {
        Rgba::from_hex(self.color).unwrap_or(Rgba::new(255, 255, 255, 1.0))
    }

    /// Particles only move toward a step once it has started.
    fn is_active(&self) -> bool {
        matches!(self.status, StepStatus::Connecting | StepStatus::Connected)
    }
}

pub fn default_steps() -> Vec<ConnectionStep> {
    vec![
        ConnectionStep {
            id: "onu",
            name: "United Nations SDG API",
            description: "Connecting to UN Sustainable Development Goals database to retrieve Goal 11 data for sustainable cities...",
            icon: "🏛️",
            color: "#1a237e",
            duration_ms: 2500.0,
            status: StepStatus::Pending,
        },
        ConnectionStep {
            id: "openmeteo",
            name: "OpenMeteo Climate API",
            description: "Retrieving historical weather data and climate forecasts for accurate analysis...",
            icon: "🌡️",
            color: "#2196f3",
            duration_ms: 3000.0,
            status: StepStatus::Pending,
        },
        ConnectionStep {
            id: "probablefutures",
            name: "Probable Futures",
            description: "Accessing climate change projection models and IPCC scenarios for future impact assessment...",
            icon: "🌍",
            color: "#4caf50",
            duration_ms: 3500.0,
            status: StepStatus::Pending,
        },
    ]
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SequenceCue {
    Reveal,
    Connecting(usize),
    Connected(usize),
    Success,
    Complete,
}

/// Serializable view of the sequence for the host page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SequenceView {
    pub revealed: bool,
    pub current_step: usize,
    pub steps: Vec<ConnectionStep>,
    /// Completed steps over total, in `[0, 1]`.
    pub progress: f64,
    pub success: bool,
    pub complete: bool,
}

pub struct ConnectionSequence {
    steps: Vec<ConnectionStep>,
    script: Script<SequenceCue>,
    revealed: bool,
    current_step: usize,
    success: bool,
    complete: bool,
    on_complete: Option<Box<dyn FnOnce()>>,
}

impl std::fmt::Debug for ConnectionSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionSequence")
            .field("steps", &self.steps)
            .field("revealed", &self.revealed)
            .field("current_step", &self.current_step)
            .field("success", &self.success)
            .field("complete", &self.complete)
            .finish_non_exhaustive()
    }
}

impl Default for ConnectionSequence {
    fn default() -> Self {
        Self::new(default_steps())
    }
}

impl ConnectionSequence {
    pub fn new(steps: Vec<ConnectionStep>) -> Self {
        let script = Self::script_for(&steps);
        Self {
            steps,
            script,
            revealed: false,
            current_step: 0,
            success: false,
            complete: false,
            on_complete: None,
        }
    }

    fn script_for(steps: &[ConnectionStep]) -> Script<SequenceCue> {
        let mut b = Script::builder().wait(REVEAL_DELAY_MS).cue(SequenceCue::Reveal);
        for (i, step) in steps.iter().enumerate() {
            if i > 0 {
                b = b.wait(STEP_PAUSE_MS);
            }
            b = b
                .cue(SequenceCue::Connecting(i))
                .wait(step.duration_ms)
                .cue(SequenceCue::Connected(i));
        }
        b.cue(SequenceCue::Success)
            .wait(SUCCESS_HOLD_MS)
            .cue(SequenceCue::Complete)
            .build()
    }

    /// Registers the callback run when the success banner has been shown.
    pub fn on_complete(mut self, f: impl FnOnce() + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    pub fn start(&mut self, now: Millis) {
        self.script.start(now);
    }

    pub fn is_started(&self) -> bool {
        self.script.is_started()
    }

    /// Applies every cue due at `now` and returns them.
    pub fn update(&mut self, now: Millis) -> Vec<SequenceCue> {
        let cues = self.script.poll(now);
        for cue in &cues {
            self.apply(*cue);
        }
        cues
    }

    fn apply(&mut self, cue: SequenceCue) {
        match cue {
            SequenceCue::Reveal => self.revealed = true,
            SequenceCue::Connecting(i) => {
                if let Some(step) = self.steps.get_mut(i) {
                    step.status = StepStatus::Connecting;
                    self.current_step = i;
                }
            }
            SequenceCue::Connected(i) => {
                if let Some(step) = self.steps.get_mut(i) {
                    step.status = StepStatus::Connected;
                    tracing::debug!(step = step.id, "data source connected");
                }
            }
            SequenceCue::Success => self.success = true,
            SequenceCue::Complete => {
                self.complete = true;
                if let Some(f) = self.on_complete.take() {
                    f();
                }
            }
        }
    }

    pub fn steps(&self) -> &[ConnectionStep] {
        &self.steps
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn progress(&self) -> f64 {
        if self.steps.is_empty() {
            return 1.0;
        }
        let done = self
            .steps
            .iter()
            .filter(|s| s.status == StepStatus::Connected)
            .count();
        done as f64 / self.steps.len() as f64
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn duration_ms(&self) -> f64 {
        self.script.duration_ms()
    }

    pub fn view(&self) -> SequenceView {
        SequenceView {
            revealed: self.revealed,
            current_step: self.current_step,
            steps: self.steps.clone(),
            progress: self.progress(),
            success: self.success,
            complete: self.complete,
        }
    }
}

const SOURCE_PARTICLES: usize = 12;
const DATA_PARTICLES: usize = 6;
pub const PARTICLES_PER_STEP: usize = SOURCE_PARTICLES + DATA_PARTICLES;

const ATTRACTION: f64 = 0.015;
const CAPTURE_RADIUS: f64 = 5.0;
const MAX_SPEED: f64 = 4.0;
const TRAIL_FRAMES: f64 = 8.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ConvergingParticle {
    pub step: usize,
    pub pos: [f64; 2],
    pub vel: [f64; 2],
    pub size: f64,
    pub opacity: f64,
    pub target: [f64; 2],
}

/// Where the particles of step `index` gather.
pub fn step_anchor(width: f64, height: f64, index: usize) -> [f64; 2] {
    [width / 2.0, height / 2.0 - 100.0 + index as f64 * 120.0]
}

#[derive(Debug, Clone)]
pub struct ConnectionParticles {
    particles: Vec<ConvergingParticle>,
}

impl ConnectionParticles {
    pub fn spawn(rng: &mut impl Rng, width: f64, height: f64, steps: usize) -> Self {
        let mut particles = Vec::with_capacity(steps * PARTICLES_PER_STEP);
        for step in 0..steps {
            let target = step_anchor(width, height, step);
            for _ in 0..SOURCE_PARTICLES {
                particles.push(ConvergingParticle {
                    step,
                    pos: [
                        target[0] + rng.gen_range(-150.0..150.0),
                        target[1] + rng.gen_range(-150.0..150.0),
                    ],
                    vel: [rng.gen_range(-1.5..1.5), rng.gen_range(-1.5..1.5)],
                    size: rng.gen_range(2.0..6.0),
                    opacity: rng.gen_range(0.4..1.0),
                    target,
                });
            }
            for _ in 0..DATA_PARTICLES {
                particles.push(ConvergingParticle {
                    step,
                    pos: [
                        rng.gen_range(0.0..=width.max(0.0)),
                        rng.gen_range(0.0..=height.max(0.0)),
                    ],
                    vel: [0.0, 0.0],
                    size: rng.gen_range(1.0..3.0),
                    opacity: rng.gen_range(0.2..0.6),
                    target,
                });
            }
        }
        Self { particles }
    }

    pub fn particles(&self) -> &[ConvergingParticle] {
        &self.particles
    }

    /// One frame of motion. Particles of a pending step keep drifting.
    pub fn advance(&mut self, steps: &[ConnectionStep], now_ms: f64) {
        for (index, p) in self.particles.iter_mut().enumerate() {
            let Some(step) = steps.get(p.step) else {
                continue;
            };
            if step.is_active() {
                let dx = p.target[0] - p.pos[0];
                let dy = p.target[1] - p.pos[1];
                if dx.hypot(dy) > CAPTURE_RADIUS {
                    p.vel[0] += dx * ATTRACTION;
                    p.vel[1] += dy * ATTRACTION;
                }
                let speed = p.vel[0].hypot(p.vel[1]);
                if speed > MAX_SPEED {
                    p.vel[0] = p.vel[0] / speed * MAX_SPEED;
                    p.vel[1] = p.vel[1] / speed * MAX_SPEED;
                }
                if step.status == StepStatus::Connected {
                    p.opacity = 0.4 + 0.3 * (now_ms * 0.005 + index as f64).sin();
                }
            }
            p.pos[0] += p.vel[0];
            p.pos[1] += p.vel[1];
        }
    }

    pub fn draw(&self, canvas: &mut impl Canvas2d, steps: &[ConnectionStep]) {
        for p in &self.particles {
            let Some(step) = steps.get(p.step) else {
                continue;
            };
            let color = step.rgba();
            if step.status == StepStatus::Connected {
                let glow = Paint::Radial {
                    center: p.pos,
                    inner_radius: 0.0,
                    outer_radius: p.size * 4.0,
                    stops: vec![
                        ColorStop::new(0.0, color.css()),
                        ColorStop::new(0.5, color.with_alpha(0.5).css()),
                        ColorStop::new(1.0, Rgba::new(255, 255, 255, 0.0).css()),
                    ],
                };
                canvas.fill_circle(p.pos, p.size * 4.0, &glow, p.opacity);
            }
            canvas.fill_circle(p.pos, p.size, &Paint::Solid(color), p.opacity);
            if p.vel[0].abs() > 0.1 || p.vel[1].abs() > 0.1 {
                let tail = [
                    p.pos[0] - p.vel[0] * TRAIL_FRAMES,
                    p.pos[1] - p.vel[1] * TRAIL_FRAMES,
                ];
                canvas.stroke_line(p.pos, tail, color.with_alpha(0.25), 1.0, p.opacity);
            }
        }
    }
}

pub fn connection_backdrop(width: f64, height: f64) -> Paint {
    Paint::Linear {
        from: [0.0, 0.0],
        to: [width, height],
        stops: vec![
            ColorStop::new(0.0, Rgba::new(20, 33, 61, 0.95).css()),
            ColorStop::new(1.0, Rgba::new(25, 118, 210, 0.1).css()),
        ],
    }
}

/// Drives a [`ConnectionSequence`] and paints it on two canvases: the
/// honeycomb underneath and the converging particles on top.
///
/// Nothing is drawn until the sequence reveals itself. The loop breaks once
/// the sequence completes.
#[derive(Debug)]
pub struct ConnectionScene<R, C> {
    rng: R,
    sequence: ConnectionSequence,
    particle_canvas: C,
    honeycomb_canvas: C,
    particles: Option<ConnectionParticles>,
    honeycomb: Option<HexGrid>,
}

impl<R: Rng, C: Canvas2d> ConnectionScene<R, C> {
    pub fn new(rng: R, sequence: ConnectionSequence, particle_canvas: C, honeycomb_canvas: C) -> Self {
        Self {
            rng,
            sequence,
            particle_canvas,
            honeycomb_canvas,
            particles: None,
            honeycomb: None,
        }
    }

    pub fn sequence(&self) -> &ConnectionSequence {
        &self.sequence
    }

    pub fn particles(&self) -> Option<&ConnectionParticles> {
        self.particles.as_ref()
    }

    pub fn honeycomb(&self) -> Option<&HexGrid> {
        self.honeycomb.as_ref()
    }

    pub fn particle_canvas(&self) -> &C {
        &self.particle_canvas
    }

    pub fn honeycomb_canvas(&self) -> &C {
        &self.honeycomb_canvas
    }

    fn ensure_visuals(&mut self) {
        let (w, h) = self.particle_canvas.size();
        if self.particles.is_none() {
            let steps = self.sequence.steps().len();
            self.particles = Some(ConnectionParticles::spawn(&mut self.rng, w, h, steps));
        }
        let (hw, hh) = self.honeycomb_canvas.size();
        match self.honeycomb.as_mut() {
            Some(grid) => grid.resize(&mut self.rng, hw, hh),
            None => {
                self.honeycomb = Some(HexGrid::new(&mut self.rng, HexStyle::HONEYCOMB, hw, hh));
            }
        }
    }

    /// Advances the script to `now` and paints one frame.
    pub fn render(&mut self, now: Millis) {
        if !self.sequence.is_started() {
            self.sequence.start(now);
        }
        self.sequence.update(now);
        if !self.sequence.is_revealed() {
            return;
        }
        self.ensure_visuals();

        if let Some(grid) = self.honeycomb.as_mut() {
            self.honeycomb_canvas.clear();
            grid.advance();
            grid.draw(&mut self.honeycomb_canvas);
        }

        let (w, h) = self.particle_canvas.size();
        self.particle_canvas.clear();
        self.particle_canvas
            .fill_rect(0.0, 0.0, w, h, &connection_backdrop(w, h));
        if let Some(particles) = self.particles.as_mut() {
            particles.advance(self.sequence.steps(), now.0);
            particles.draw(&mut self.particle_canvas, self.sequence.steps());
        }
    }
}

impl<R: Rng, C: Canvas2d> Animation for ConnectionScene<R, C> {
    fn frame(&mut self, frame: Frame) -> LoopControl {
        self.render(frame.now);
        if self.sequence.is_complete() {
            LoopControl::Break
        } else {
            LoopControl::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::recording::{Op, RecordingCanvas};
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::cell::Cell;
    use std::rc::Rc;

    fn statuses(seq: &ConnectionSequence) -> Vec<StepStatus> {
        seq.steps().iter().map(|s| s.status).collect()
    }

    #[test]
    fn steps_advance_on_schedule() {
        use StepStatus::*;
        let mut seq = ConnectionSequence::default();
        seq.start(Millis(0.0));

        assert!(seq.update(Millis(499.0)).is_empty());
        assert!(!seq.is_revealed());

        assert_eq!(
            seq.update(Millis(500.0)),
            vec![SequenceCue::Reveal, SequenceCue::Connecting(0)]
        );
        assert_eq!(statuses(&seq), vec![Connecting, Pending, Pending]);

        seq.update(Millis(3000.0));
        assert_eq!(statuses(&seq), vec![Connected, Pending, Pending]);
        assert!((seq.progress() - 1.0 / 3.0).abs() < 1e-12);

        // 500 ms pause before the next step.
        seq.update(Millis(3499.0));
        assert_eq!(statuses(&seq), vec![Connected, Pending, Pending]);
        seq.update(Millis(3500.0));
        assert_eq!(statuses(&seq), vec![Connected, Connecting, Pending]);
        assert_eq!(seq.current_step(), 1);

        seq.update(Millis(6500.0));
        seq.update(Millis(7000.0));
        assert_eq!(statuses(&seq), vec![Connected, Connected, Connecting]);

        assert_eq!(
            seq.update(Millis(10_500.0)),
            vec![SequenceCue::Connected(2), SequenceCue::Success]
        );
        assert!(seq.is_success());
        assert!(!seq.is_complete());
        assert_eq!(seq.progress(), 1.0);

        assert_eq!(seq.update(Millis(13_500.0)), vec![SequenceCue::Complete]);
        assert!(seq.is_complete());
        assert_eq!(seq.duration_ms(), 13_500.0);
    }

    #[test]
    fn completion_callback_fires_exactly_once() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let mut seq = ConnectionSequence::default().on_complete(move || {
            counter.set(counter.get() + 1);
        });
        seq.start(Millis(1000.0));
        seq.update(Millis(14_499.0));
        assert_eq!(calls.get(), 0);
        seq.update(Millis(14_500.0));
        seq.update(Millis(20_000.0));
        seq.update(Millis(90_000.0));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn view_serializes_lowercase_statuses() {
        let mut seq = ConnectionSequence::default();
        seq.start(Millis(0.0));
        seq.update(Millis(600.0));
        let json = serde_json::to_value(seq.view()).unwrap();
        assert_eq!(json["revealed"], true);
        assert_eq!(json["steps"][0]["status"], "connecting");
        assert_eq!(json["steps"][1]["status"], "pending");
        assert_eq!(json["steps"][2]["color"], "#4caf50");
    }

    fn active(status: StepStatus) -> Vec<ConnectionStep> {
        default_steps()
            .into_iter()
            .map(|mut s| {
                s.status = status;
                s
            })
            .collect()
    }

    #[test]
    fn pending_particles_drift_without_attraction() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut field = ConnectionParticles::spawn(&mut rng, 800.0, 600.0, 3);
        let before = field.particles().to_vec();
        field.advance(&active(StepStatus::Pending), 0.0);
        for (p, b) in field.particles().iter().zip(before) {
            assert_eq!(p.vel, b.vel);
            assert_eq!(p.pos, [b.pos[0] + b.vel[0], b.pos[1] + b.vel[1]]);
        }
    }

    #[test]
    fn active_particles_accelerate_toward_anchor_up_to_max_speed() {
        let mut field = ConnectionParticles {
            particles: vec![ConvergingParticle {
                step: 0,
                pos: [0.0, 0.0],
                vel: [0.0, 0.0],
                size: 2.0,
                opacity: 1.0,
                target: [100.0, 0.0],
            }],
        };
        let steps = active(StepStatus::Connecting);

        field.advance(&steps, 0.0);
        let p = &field.particles()[0];
        assert!((p.vel[0] - 1.5).abs() < 1e-12);
        assert!((p.pos[0] - 1.5).abs() < 1e-12);

        field.advance(&steps, 16.0);
        field.advance(&steps, 32.0);
        let p = &field.particles()[0];
        assert!((p.vel[0] - MAX_SPEED).abs() < 1e-12);
        assert_eq!(p.vel[1], 0.0);
    }

    #[test]
    fn anchors_stack_vertically() {
        let mut rng = StdRng::seed_from_u64(6);
        let field = ConnectionParticles::spawn(&mut rng, 800.0, 600.0, 3);
        assert_eq!(field.particles().len(), 3 * PARTICLES_PER_STEP);
        assert_eq!(field.particles()[0].target, [400.0, 200.0]);
        assert_eq!(field.particles()[PARTICLES_PER_STEP].target, [400.0, 320.0]);
        assert_eq!(field.particles()[2 * PARTICLES_PER_STEP].target, [400.0, 440.0]);
    }

    #[test]
    fn connected_particles_pulse_and_glow() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut field = ConnectionParticles::spawn(&mut rng, 800.0, 600.0, 1);
        let steps = vec![active(StepStatus::Connected).remove(0)];
        field.advance(&steps, 1000.0);
        for (i, p) in field.particles().iter().enumerate() {
            let expected = 0.4 + 0.3 * (1000.0f64 * 0.005 + i as f64).sin();
            assert!((p.opacity - expected).abs() < 1e-12);
        }

        let mut canvas = RecordingCanvas::new(800.0, 600.0);
        field.draw(&mut canvas, &steps);
        let glows = canvas.count(|op| {
            matches!(op, Op::FillCircle { radius, .. } if field.particles().iter().any(|p| p.size * 4.0 == *radius))
        });
        assert!(glows >= PARTICLES_PER_STEP);
    }

    #[test]
    fn scene_draws_nothing_before_reveal_and_breaks_when_complete() {
        let mut scene = ConnectionScene::new(
            StdRng::seed_from_u64(8),
            ConnectionSequence::default(),
            RecordingCanvas::new(640.0, 480.0),
            RecordingCanvas::new(640.0, 480.0),
        );
        let frame = |index: u64, now: f64| Frame {
            index,
            now: Millis(now),
            dt_ms: 16.0,
        };

        assert_eq!(scene.frame(frame(0, 0.0)), LoopControl::Continue);
        assert_eq!(scene.frame(frame(1, 100.0)), LoopControl::Continue);
        assert!(scene.particle_canvas().ops.is_empty());
        assert!(scene.particles().is_none());

        scene.frame(frame(2, 600.0));
        assert!(scene.particles().is_some());
        assert!(scene.honeycomb().is_some());
        assert_eq!(scene.particle_canvas().ops[0], Op::Clear);
        assert!(matches!(
            scene.particle_canvas().ops[1],
            Op::FillRect(Paint::Linear { .. })
        ));
        assert!(scene.honeycomb_canvas().count(|op| matches!(op, Op::FillPolygon { .. })) > 0);

        assert_eq!(scene.frame(frame(3, 13_500.0)), LoopControl::Break);
        assert!(scene.sequence().is_complete());
    }
}
