//! The full-page animated background: shifting gradient, depth overlay,
//! hexagon grid and particles.

use foundation::color::{Hsl, Rgba};
use rand::Rng;
use runtime::animation_loop::{Animation, LoopControl};
use runtime::frame::Frame;

use crate::canvas::{Canvas2d, ColorStop, Paint};
use crate::hexagons::{HexGrid, HexStyle};
use crate::particles::ParticleField;

const DEPTH: Rgba = Rgba::new(20, 33, 61, 1.0);

/// Diagonal gradient whose hues drift slowly with wall-clock `time_s`.
pub fn background_gradient(width: f64, height: f64, time_s: f64) -> Paint {
    let hue = |base: f64, rate: f64, swing: f64| base + (time_s * rate).sin() * swing;
    Paint::Linear {
        from: [0.0, 0.0],
        to: [width, height],
        stops: vec![
            ColorStop::new(0.0, Hsl::new(hue(220.0, 0.1, 10.0), 70.0, 15.0).css()),
            ColorStop::new(0.3, Hsl::new(hue(230.0, 0.15, 15.0), 60.0, 20.0).css()),
            ColorStop::new(0.7, Hsl::new(hue(240.0, 0.2, 10.0), 50.0, 25.0).css()),
            ColorStop::new(1.0, Hsl::new(hue(250.0, 0.1, 5.0), 40.0, 30.0).css()),
        ],
    }
}

/// Radial vignette laid over the gradient.
pub fn depth_overlay(width: f64, height: f64) -> Paint {
    Paint::Radial {
        center: [width / 2.0, height / 2.0],
        inner_radius: 0.0,
        outer_radius: width.max(height) / 2.0,
        stops: vec![
            ColorStop::new(0.0, DEPTH.with_alpha(0.3).css()),
            ColorStop::new(0.5, DEPTH.with_alpha(0.1).css()),
            ColorStop::new(1.0, DEPTH.with_alpha(0.5).css()),
        ],
    }
}

/// Owns everything drawn on the background canvas.
///
/// The gradient drifts with wall-clock time. Frames read it from the clock
/// set with [`BackgroundLayer::with_clock`] (milliseconds since the epoch);
/// without one they fall back to the repaint timestamp.
#[derive(Debug)]
pub struct BackgroundLayer<R, C> {
    rng: R,
    canvas: C,
    particles: ParticleField,
    grid: HexGrid,
    wall_clock: Option<fn() -> f64>,
}

impl<R: Rng, C: Canvas2d> BackgroundLayer<R, C> {
    pub fn new(mut rng: R, canvas: C) -> Self {
        let (w, h) = canvas.size();
        let particles = ParticleField::spawn(&mut rng, w, h);
        let grid = HexGrid::new(&mut rng, HexStyle::BACKGROUND, w, h);
        Self {
            rng,
            canvas,
            particles,
            grid,
            wall_clock: None,
        }
    }

    pub fn with_clock(mut self, wall_clock_ms: fn() -> f64) -> Self {
        self.wall_clock = Some(wall_clock_ms);
        self
    }

    fn time_s(&self, frame: &Frame) -> f64 {
        match self.wall_clock {
            Some(now_ms) => now_ms() / 1000.0,
            None => frame.now.as_seconds(),
        }
    }

    /// Picks up a canvas size change; the grid is re-tiled.
    pub fn sync_size(&mut self) {
        let (w, h) = self.canvas.size();
        self.particles.resize(w, h);
        self.grid.resize(&mut self.rng, w, h);
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    pub fn grid(&self) -> &HexGrid {
        &self.grid
    }

    /// Paints the current state, then advances it for the next frame.
    /// `time_s` drives the gradient hue drift.
    pub fn render(&mut self, time_s: f64) {
        let (w, h) = self.canvas.size();

        self.canvas.clear();
        self.canvas.fill_rect(0.0, 0.0, w, h, &background_gradient(w, h, time_s));
        self.canvas.fill_rect(0.0, 0.0, w, h, &depth_overlay(w, h));
        self.grid.draw(&mut self.canvas);
        self.particles.draw(&mut self.canvas);

        self.particles.advance(&mut self.rng);
        self.grid.advance();
    }
}

impl<R: Rng, C: Canvas2d> Animation for BackgroundLayer<R, C> {
    fn frame(&mut self, frame: Frame) -> LoopControl {
        self.sync_size();
        let time_s = self.time_s(&frame);
        self.render(time_s);
        LoopControl::Continue
    }
}
