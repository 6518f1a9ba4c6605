//! Pulsing hexagonal grid drawn behind the particles.

use foundation::color::Rgba;
use rand::Rng;
use std::f64::consts::{PI, TAU};

use crate::canvas::Canvas2d;

pub const HEX_FILL: Rgba = Rgba::new(144, 202, 249, 1.0);

/// Geometry and pulse parameters of a grid.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HexStyle {
    /// Circumradius of one cell in pixels.
    pub cell_size: f64,
    /// Opacity around which cells pulse.
    pub base_opacity: f64,
    pub amplitude: f64,
    /// Phase advance per frame (radians).
    pub phase_step: f64,
}

impl HexStyle {
    /// Faint grid behind the whole page.
    pub const BACKGROUND: HexStyle = HexStyle {
        cell_size: 40.0,
        base_opacity: 0.02,
        amplitude: 0.03,
        phase_step: 0.02,
    };

    /// Brighter honeycomb behind the connection sequence.
    pub const HONEYCOMB: HexStyle = HexStyle {
        cell_size: 35.0,
        base_opacity: 0.08,
        amplitude: 0.12,
        phase_step: 0.015,
    };

    fn opacity_at(&self, phase: f64) -> f64 {
        self.base_opacity + self.amplitude * phase.sin()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HexCell {
    pub center: [f64; 2],
    pub phase: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone)]
pub struct HexGrid {
    style: HexStyle,
    cells: Vec<HexCell>,
    size: (f64, f64),
}

impl HexGrid {
    pub fn new(rng: &mut impl Rng, style: HexStyle, width: f64, height: f64) -> Self {
        let mut grid = Self {
            style,
            cells: Vec::new(),
            size: (width, height),
        };
        grid.layout(rng);
        grid
    }

    /// Rows and columns needed to cover the canvas, plus two of overscan.
    pub fn dimensions(style: &HexStyle, width: f64, height: f64) -> (usize, usize) {
        let s = style.cell_size;
        let rows = (height.max(0.0) / (s * 1.5)).ceil() as usize + 2;
        let cols = (width.max(0.0) / (s * 3f64.sqrt())).ceil() as usize + 2;
        (rows, cols)
    }

    /// Recomputes the tiling for a new canvas size; phases are re-randomized.
    pub fn resize(&mut self, rng: &mut impl Rng, width: f64, height: f64) {
        if self.size == (width, height) {
            return;
        }
        self.size = (width, height);
        self.layout(rng);
    }

    fn layout(&mut self, rng: &mut impl Rng) {
        let (rows, cols) = Self::dimensions(&self.style, self.size.0, self.size.1);
        let s = self.style.cell_size;
        let col_step = s * 3f64.sqrt();
        self.cells.clear();
        self.cells.reserve(rows * cols);
        for row in 0..rows {
            let offset = if row % 2 == 1 { col_step / 2.0 } else { 0.0 };
            for col in 0..cols {
                let phase = rng.gen_range(0.0..TAU);
                self.cells.push(HexCell {
                    center: [col as f64 * col_step + offset, row as f64 * s * 1.5],
                    phase,
                    opacity: self.style.opacity_at(phase),
                });
            }
        }
    }

    pub fn cells(&self) -> &[HexCell] {
        &self.cells
    }

    pub fn style(&self) -> &HexStyle {
        &self.style
    }

    pub fn advance(&mut self) {
        let style = self.style;
        for cell in &mut self.cells {
            cell.phase += style.phase_step;
            cell.opacity = style.opacity_at(cell.phase);
        }
    }

    pub fn draw(&self, canvas: &mut impl Canvas2d) {
        let s = self.style.cell_size;
        for cell in &self.cells {
            let points = hexagon_points(cell.center, s);
            canvas.fill_polygon(&points, HEX_FILL.with_alpha(cell.opacity));
        }
    }
}

/// Vertices of a flat-topped hexagon.
pub fn hexagon_points(center: [f64; 2], size: f64) -> [[f64; 2]; 6] {
    std::array::from_fn(|i| {
        let angle = i as f64 * PI / 3.0;
        [center[0] + size * angle.cos(), center[1] + size * angle.sin()]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::recording::{Op, RecordingCanvas};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn grid_covers_canvas_with_overscan() {
        let (rows, cols) = HexGrid::dimensions(&HexStyle::BACKGROUND, 1280.0, 720.0);
        assert_eq!(rows, 12 + 2);
        assert_eq!(cols, 19 + 2);

        let mut rng = StdRng::seed_from_u64(1);
        let grid = HexGrid::new(&mut rng, HexStyle::BACKGROUND, 1280.0, 720.0);
        assert_eq!(grid.cells().len(), rows * cols);

        let max_x = grid.cells().iter().map(|c| c.center[0]).fold(0.0, f64::max);
        let max_y = grid.cells().iter().map(|c| c.center[1]).fold(0.0, f64::max);
        assert!(max_x >= 1280.0);
        assert!(max_y >= 720.0);
    }

    #[test]
    fn odd_rows_are_offset_by_half_a_column() {
        let mut rng = StdRng::seed_from_u64(1);
        let grid = HexGrid::new(&mut rng, HexStyle::BACKGROUND, 200.0, 100.0);
        let (_, cols) = HexGrid::dimensions(&HexStyle::BACKGROUND, 200.0, 100.0);
        let row0 = grid.cells()[0].center;
        let row1 = grid.cells()[cols].center;
        assert_eq!(row0, [0.0, 0.0]);
        assert!((row1[0] - 20.0 * 3f64.sqrt()).abs() < 1e-9);
        assert!((row1[1] - 60.0).abs() < 1e-9);
    }

    #[test]
    fn opacity_pulses_with_phase() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut grid = HexGrid::new(&mut rng, HexStyle::HONEYCOMB, 300.0, 300.0);
        let phases: Vec<f64> = grid.cells().iter().map(|c| c.phase).collect();
        grid.advance();
        for (cell, before) in grid.cells().iter().zip(phases) {
            assert!((cell.phase - (before + 0.015)).abs() < 1e-12);
            let expected = 0.08 + 0.12 * cell.phase.sin();
            assert!((cell.opacity - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn resize_regenerates_cells() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut grid = HexGrid::new(&mut rng, HexStyle::BACKGROUND, 100.0, 100.0);
        let small = grid.cells().len();
        grid.resize(&mut rng, 1000.0, 1000.0);
        assert!(grid.cells().len() > small);
    }

    #[test]
    fn hexagon_has_six_vertices_on_circle() {
        for p in hexagon_points([10.0, 20.0], 5.0) {
            let d = ((p[0] - 10.0).powi(2) + (p[1] - 20.0).powi(2)).sqrt();
            assert!((d - 5.0).abs() < 1e-9);
        }
    }

    #[test]
    fn draws_one_polygon_per_cell() {
        let mut rng = StdRng::seed_from_u64(4);
        let grid = HexGrid::new(&mut rng, HexStyle::BACKGROUND, 200.0, 200.0);
        let mut canvas = RecordingCanvas::new(200.0, 200.0);
        grid.draw(&mut canvas);
        assert_eq!(
            canvas.count(|op| matches!(op, Op::FillPolygon { points: 6, .. })),
            grid.cells().len()
        );
    }
}
