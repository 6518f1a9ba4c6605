use foundation::color::Rgba;

/// A gradient color stop: offset in `[0, 1]` and a CSS color.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorStop {
    pub offset: f64,
    pub color: String,
}

impl ColorStop {
    pub fn new(offset: f64, color: impl Into<String>) -> Self {
        Self {
            offset,
            color: color.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Linear {
        from: [f64; 2],
        to: [f64; 2],
        stops: Vec<ColorStop>,
    },
    Radial {
        center: [f64; 2],
        inner_radius: f64,
        outer_radius: f64,
        stops: Vec<ColorStop>,
    },
}

/// The handful of 2D drawing operations the effects need.
///
/// `alpha` arguments are global alpha for that one draw call.
pub trait Canvas2d {
    fn size(&self) -> (f64, f64);
    fn clear(&mut self);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, paint: &Paint);
    fn fill_circle(&mut self, center: [f64; 2], radius: f64, paint: &Paint, alpha: f64);
    fn stroke_circle(&mut self, center: [f64; 2], radius: f64, color: Rgba, width: f64, alpha: f64);
    fn stroke_line(&mut self, from: [f64; 2], to: [f64; 2], color: Rgba, width: f64, alpha: f64);
    fn fill_polygon(&mut self, points: &[[f64; 2]], color: Rgba);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasError {
    /// No element with this id, or it is not a `<canvas>`.
    NotFound(String),
    /// The element exists but refused a 2D context.
    ContextUnavailable(String),
}

impl std::fmt::Display for CanvasError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CanvasError::NotFound(id) => write!(f, "canvas element #{id} not found"),
            CanvasError::ContextUnavailable(id) => {
                write!(f, "canvas element #{id} has no 2d context")
            }
        }
    }
}

impl std::error::Error for CanvasError {}
