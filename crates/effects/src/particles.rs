//! Background particles: glowing dots, dots with a motion trail, and rings
//! expanding from the canvas centre.

use foundation::color::Rgba;
use rand::Rng;

use crate::canvas::{Canvas2d, ColorStop, Paint};

const GLOW_DOTS: usize = 15;
const TRAIL_DOTS: usize = 25;
const RINGS: usize = 8;

const GLOW_MAX_AGE: f64 = 100.0;
const TRAIL_MAX_AGE: f64 = 80.0;
const RING_MAX_AGE: f64 = 200.0;

const RING_GROWTH_PER_FRAME: f64 = 0.5;
const RING_PEAK_OPACITY: f64 = 0.3;
const TRAIL_LENGTH_FRAMES: f64 = 10.0;

const GOLD: Rgba = Rgba::new(255, 215, 0, 0.9);
const AMBER: Rgba = Rgba::new(255, 193, 7, 0.4);
const DATA_BLUE: Rgba = Rgba::new(25, 118, 210, 0.7);
const TRAIL_BLUE: Rgba = Rgba::new(25, 118, 210, 0.3);
const RING_BLUE: Rgba = Rgba::new(144, 202, 249, 0.3);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ParticleKind {
    /// Drifts and bounces; opacity breathes with age. Runs forever.
    GlowDot,
    /// Drifts and bounces; drawn with a short line behind it.
    TrailDot,
    /// Fixed at the centre, grows and fades, then respawns in place.
    ExpandingRing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub kind: ParticleKind,
    pub pos: [f64; 2],
    pub vel: [f64; 2],
    pub radius: f64,
    pub opacity: f64,
    pub age: f64,
    pub max_age: f64,
}

impl Particle {
    fn glow_dot(rng: &mut impl Rng, w: f64, h: f64) -> Self {
        Self {
            kind: ParticleKind::GlowDot,
            pos: random_position(rng, w, h),
            vel: [rng.gen_range(-0.25..0.25), rng.gen_range(-0.25..0.25)],
            radius: rng.gen_range(2.0..5.0),
            opacity: rng.gen_range(0.4..1.0),
            age: rng.gen_range(0.0..GLOW_MAX_AGE),
            max_age: GLOW_MAX_AGE,
        }
    }

    fn trail_dot(rng: &mut impl Rng, w: f64, h: f64) -> Self {
        Self {
            kind: ParticleKind::TrailDot,
            pos: random_position(rng, w, h),
            vel: [rng.gen_range(-0.4..0.4), rng.gen_range(-0.4..0.4)],
            radius: rng.gen_range(1.0..3.0),
            opacity: rng.gen_range(0.3..0.8),
            age: rng.gen_range(0.0..TRAIL_MAX_AGE),
            max_age: TRAIL_MAX_AGE,
        }
    }

    fn ring(rng: &mut impl Rng, w: f64, h: f64) -> Self {
        Self {
            kind: ParticleKind::ExpandingRing,
            pos: [w / 2.0, h / 2.0],
            vel: [0.0, 0.0],
            radius: random_ring_radius(rng),
            opacity: 0.1,
            age: rng.gen_range(0.0..RING_MAX_AGE),
            max_age: RING_MAX_AGE,
        }
    }

    /// One frame of motion for a canvas of `w` x `h`.
    fn advance(&mut self, rng: &mut impl Rng, w: f64, h: f64) {
        self.pos[0] += self.vel[0];
        self.pos[1] += self.vel[1];
        self.age += 1.0;

        if self.pos[0] <= 0.0 || self.pos[0] >= w {
            self.vel[0] = -self.vel[0];
        }
        if self.pos[1] <= 0.0 || self.pos[1] >= h {
            self.vel[1] = -self.vel[1];
        }

        match self.kind {
            ParticleKind::GlowDot => {
                self.opacity = 0.4 + 0.3 * (self.age * 0.05).sin();
            }
            ParticleKind::TrailDot => {}
            ParticleKind::ExpandingRing => {
                self.radius += RING_GROWTH_PER_FRAME;
                self.opacity = (RING_PEAK_OPACITY * (1.0 - self.age / self.max_age)).max(0.0);
                if self.age > self.max_age {
                    self.pos = [w / 2.0, h / 2.0];
                    self.radius = random_ring_radius(rng);
                    self.age = 0.0;
                    self.opacity = RING_PEAK_OPACITY;
                }
            }
        }
    }

    fn draw(&self, canvas: &mut impl Canvas2d) {
        match self.kind {
            ParticleKind::GlowDot => {
                let halo = Paint::Radial {
                    center: self.pos,
                    inner_radius: 0.0,
                    outer_radius: self.radius * 2.0,
                    stops: vec![
                        ColorStop::new(0.0, GOLD.with_alpha(0.8).css()),
                        ColorStop::new(0.5, AMBER.css()),
                        ColorStop::new(1.0, AMBER.with_alpha(0.0).css()),
                    ],
                };
                canvas.fill_circle(self.pos, self.radius * 2.0, &halo, self.opacity);
                canvas.fill_circle(self.pos, self.radius, &Paint::Solid(GOLD), self.opacity);
            }
            ParticleKind::TrailDot => {
                canvas.fill_circle(self.pos, self.radius, &Paint::Solid(DATA_BLUE), self.opacity);
                let tail = [
                    self.pos[0] - self.vel[0] * TRAIL_LENGTH_FRAMES,
                    self.pos[1] - self.vel[1] * TRAIL_LENGTH_FRAMES,
                ];
                canvas.stroke_line(self.pos, tail, TRAIL_BLUE, 1.0, self.opacity);
            }
            ParticleKind::ExpandingRing => {
                canvas.stroke_circle(self.pos, self.radius, RING_BLUE, 2.0, self.opacity);
            }
        }
    }
}

fn random_position(rng: &mut impl Rng, w: f64, h: f64) -> [f64; 2] {
    [rng.gen_range(0.0..=w.max(0.0)), rng.gen_range(0.0..=h.max(0.0))]
}

fn random_ring_radius(rng: &mut impl Rng) -> f64 {
    rng.gen_range(50.0..150.0)
}

/// The full particle population of the background layer.
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    width: f64,
    height: f64,
}

impl ParticleField {
    /// Spawns the initial batch for a canvas of `width` x `height`.
    pub fn spawn(rng: &mut impl Rng, width: f64, height: f64) -> Self {
        let mut particles = Vec::with_capacity(GLOW_DOTS + TRAIL_DOTS + RINGS);
        particles.extend((0..GLOW_DOTS).map(|_| Particle::glow_dot(rng, width, height)));
        particles.extend((0..TRAIL_DOTS).map(|_| Particle::trail_dot(rng, width, height)));
        particles.extend((0..RINGS).map(|_| Particle::ring(rng, width, height)));
        Self {
            particles,
            width,
            height,
        }
    }

    /// New bounds for reflection and ring respawn. Particles keep their state.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn advance(&mut self, rng: &mut impl Rng) {
        let (w, h) = (self.width, self.height);
        for p in &mut self.particles {
            p.advance(rng, w, h);
        }
    }

    pub fn draw(&self, canvas: &mut impl Canvas2d) {
        for p in &self.particles {
            p.draw(canvas);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::recording::{Op, RecordingCanvas};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn field() -> (ParticleField, StdRng) {
        let mut rng = StdRng::seed_from_u64(7);
        let f = ParticleField::spawn(&mut rng, 800.0, 600.0);
        (f, rng)
    }

    fn count(f: &ParticleField, kind: ParticleKind) -> usize {
        f.particles().iter().filter(|p| p.kind == kind).count()
    }

    #[test]
    fn spawns_fixed_population() {
        let (f, _) = field();
        assert_eq!(count(&f, ParticleKind::GlowDot), 15);
        assert_eq!(count(&f, ParticleKind::TrailDot), 25);
        assert_eq!(count(&f, ParticleKind::ExpandingRing), 8);
        for ring in f.particles().iter().filter(|p| p.kind == ParticleKind::ExpandingRing) {
            assert_eq!(ring.pos, [400.0, 300.0]);
            assert!((50.0..150.0).contains(&ring.radius));
        }
    }

    #[test]
    fn ring_age_stays_within_bounds_and_respawns() {
        let (mut f, mut rng) = field();
        let mut respawns = 0;
        for _ in 0..1000 {
            let before: Vec<f64> = f.particles().iter().map(|p| p.age).collect();
            f.advance(&mut rng);
            for (p, prev) in f.particles().iter().zip(before) {
                if p.kind != ParticleKind::ExpandingRing {
                    continue;
                }
                assert!(p.age >= 0.0 && p.age <= p.max_age, "age {} out of range", p.age);
                if p.age < prev {
                    respawns += 1;
                    assert_eq!(p.age, 0.0);
                    assert_eq!(p.pos, [400.0, 300.0]);
                    assert!((50.0..150.0).contains(&p.radius));
                    assert_eq!(p.opacity, RING_PEAK_OPACITY);
                }
            }
        }
        assert!(respawns >= 8, "every ring should respawn at least once");
        assert_eq!(count(&f, ParticleKind::ExpandingRing), 8);
    }

    #[test]
    fn ring_fades_linearly_with_age() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut ring = Particle::ring(&mut rng, 100.0, 100.0);
        ring.age = 99.0;
        let r0 = ring.radius;
        ring.advance(&mut rng, 100.0, 100.0);
        assert_eq!(ring.age, 100.0);
        assert!((ring.opacity - 0.15).abs() < 1e-12);
        assert_eq!(ring.radius, r0 + 0.5);
    }

    #[test]
    fn dots_reflect_off_edges() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut dot = Particle::trail_dot(&mut rng, 100.0, 100.0);
        dot.pos = [99.8, 50.0];
        dot.vel = [0.3, 0.0];
        dot.advance(&mut rng, 100.0, 100.0);
        assert!(dot.vel[0] < 0.0);

        dot.pos = [50.0, 0.1];
        dot.vel = [0.0, -0.3];
        dot.advance(&mut rng, 100.0, 100.0);
        assert!(dot.vel[1] > 0.0);
    }

    #[test]
    fn glow_dot_breathes_with_age() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut dot = Particle::glow_dot(&mut rng, 100.0, 100.0);
        for _ in 0..500 {
            dot.advance(&mut rng, 100.0, 100.0);
            let expected = 0.4 + 0.3 * (dot.age * 0.05).sin();
            assert!((dot.opacity - expected).abs() < 1e-12);
            assert!((0.1..=0.7).contains(&dot.opacity));
        }
    }

    #[test]
    fn trail_dots_draw_a_tail_behind_them() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut dot = Particle::trail_dot(&mut rng, 100.0, 100.0);
        dot.pos = [10.0, 10.0];
        dot.vel = [0.2, -0.1];
        let mut canvas = RecordingCanvas::new(100.0, 100.0);
        dot.draw(&mut canvas);
        assert_eq!(
            canvas.ops.last(),
            Some(&Op::StrokeLine {
                from: [10.0, 10.0],
                to: [8.0, 11.0]
            })
        );
    }

    #[test]
    fn draws_every_particle() {
        let (f, _) = field();
        let mut canvas = RecordingCanvas::new(800.0, 600.0);
        f.draw(&mut canvas);
        assert_eq!(canvas.count(|op| matches!(op, Op::StrokeCircle { .. })), 8);
        assert_eq!(canvas.count(|op| matches!(op, Op::StrokeLine { .. })), 25);
        assert_eq!(canvas.count(|op| matches!(op, Op::FillCircle { .. })), 15 * 2 + 25);
    }
}
