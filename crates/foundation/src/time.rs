//! Time primitives.

/// A point on the page's monotonic clock, in milliseconds
/// (`performance.now()` / `requestAnimationFrame` timestamps in the browser).
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
pub struct Millis(pub f64);

impl Millis {
    pub const ZERO: Millis = Millis(0.0);

    pub fn as_seconds(self) -> f64 {
        self.0 / 1000.0
    }

    /// Milliseconds elapsed since `earlier`, never negative.
    pub fn since(self, earlier: Millis) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }

    pub fn after(self, ms: f64) -> Millis {
        Millis(self.0 + ms)
    }
}
