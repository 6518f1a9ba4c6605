use foundation::time::Millis;

/// Metadata for one display frame.
///
/// Frames are stamped with the timestamp the browser hands to the
/// `requestAnimationFrame` callback, so `dt_ms` tracks the real repaint rate.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index since the clock started.
    pub index: u64,
    /// Timestamp of this frame.
    pub now: Millis,
    /// Milliseconds since the previous frame (0 on the first frame).
    pub dt_ms: f64,
}

/// Turns a stream of repaint timestamps into [`Frame`]s.
#[derive(Debug, Default, Clone)]
pub struct FrameClock {
    next_index: u64,
    last: Option<Millis>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, now: Millis) -> Frame {
        let dt_ms = self.last.map(|last| now.since(last)).unwrap_or(0.0);
        let frame = Frame {
            index: self.next_index,
            now,
            dt_ms,
        };
        self.next_index = self.next_index.wrapping_add(1);
        self.last = Some(now);
        frame
    }

    pub fn frames_seen(&self) -> u64 {
        self.next_index
    }
}
