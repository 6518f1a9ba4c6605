//! Timed scripts: a list of cues fired at fixed offsets from a start time.
//!
//! A script is polled with the current time and returns every cue whose
//! offset has elapsed, in order. Nothing depends on wall-clock timers, so
//! scripts replay identically under test.

use foundation::time::Millis;

#[derive(Debug, Clone)]
struct Cue<E> {
    at_ms: f64,
    event: E,
}

#[derive(Debug, Clone)]
pub struct Script<E> {
    cues: Vec<Cue<E>>,
    started_at: Option<Millis>,
    next: usize,
}

/// Builds a [`Script`] as a sequence of waits and cues.
#[derive(Debug, Clone)]
pub struct ScriptBuilder<E> {
    cues: Vec<Cue<E>>,
    cursor_ms: f64,
}

impl<E> Default for ScriptBuilder<E> {
    fn default() -> Self {
        Self {
            cues: Vec::new(),
            cursor_ms: 0.0,
        }
    }
}

impl<E> ScriptBuilder<E> {
    pub fn wait(mut self, ms: f64) -> Self {
        self.cursor_ms += ms.max(0.0);
        self
    }

    pub fn cue(mut self, event: E) -> Self {
        self.cues.push(Cue {
            at_ms: self.cursor_ms,
            event,
        });
        self
    }

    pub fn build(self) -> Script<E> {
        Script {
            cues: self.cues,
            started_at: None,
            next: 0,
        }
    }
}

impl<E: Clone> Script<E> {
    pub fn builder() -> ScriptBuilder<E> {
        ScriptBuilder::default()
    }

    /// Starts the script. Restarting rewinds it.
    pub fn start(&mut self, now: Millis) {
        self.started_at = Some(now);
        self.next = 0;
    }

    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_finished(&self) -> bool {
        self.started_at.is_some() && self.next >= self.cues.len()
    }

    /// Total scripted length: offset of the last cue.
    pub fn duration_ms(&self) -> f64 {
        self.cues.last().map(|c| c.at_ms).unwrap_or(0.0)
    }

    /// Returns the cues due at `now` that have not been returned yet.
    pub fn poll(&mut self, now: Millis) -> Vec<E> {
        let Some(start) = self.started_at else {
            return Vec::new();
        };
        let elapsed = now.since(start);
        let mut due = Vec::new();
        while let Some(cue) = self.cues.get(self.next) {
            if cue.at_ms > elapsed {
                break;
            }
            due.push(cue.event.clone());
            self.next += 1;
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::Script;
    use foundation::time::Millis;
    use pretty_assertions::assert_eq;

    fn script() -> Script<&'static str> {
        Script::builder()
            .wait(500.0)
            .cue("a")
            .wait(1000.0)
            .cue("b")
            .cue("c")
            .build()
    }

    #[test]
    fn nothing_fires_before_start() {
        let mut s = script();
        assert!(s.poll(Millis(10_000.0)).is_empty());
        assert!(!s.is_finished());
    }

    #[test]
    fn fires_cues_in_order_as_time_passes() {
        let mut s = script();
        s.start(Millis(100.0));
        assert_eq!(s.poll(Millis(599.0)), Vec::<&str>::new());
        assert_eq!(s.poll(Millis(600.0)), vec!["a"]);
        assert_eq!(s.poll(Millis(1000.0)), Vec::<&str>::new());
        assert_eq!(s.poll(Millis(5000.0)), vec!["b", "c"]);
        assert!(s.is_finished());
        assert_eq!(s.duration_ms(), 1500.0);
    }

    #[test]
    fn late_poll_delivers_everything_once() {
        let mut s = script();
        s.start(Millis(0.0));
        assert_eq!(s.poll(Millis(99_999.0)), vec!["a", "b", "c"]);
        assert!(s.poll(Millis(100_000.0)).is_empty());
    }
}
