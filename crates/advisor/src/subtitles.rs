//! Rotating status lines shown while the first recommendation is loading.

use foundation::time::Millis;
use serde::Serialize;

/// Time each line stays up before the next one fades in.
pub const SUBTITLE_INTERVAL_MS: f64 = 3000.0;
/// Fade-out before a line is swapped.
pub const SUBTITLE_FADE_MS: f64 = 300.0;

const MESSAGES: [&str; 7] = [
    "🐝 Bee Agents are leaving the hive...",
    "🌐 Connecting to United Nations Goals API...",
    "📊 Gathering data for Goal 11...",
    "🔍 Analyzing request for {city}...",
    "🌡️ Processing climate data...",
    "💡 Generating recommendations...",
    "✨ Finalizing analysis...",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubtitleFrame {
    pub index: usize,
    pub text: String,
    pub opacity: f64,
}

#[derive(Debug, Clone, Default)]
pub struct LoadingSubtitles {
    city: String,
    started_at: Option<Millis>,
}

impl LoadingSubtitles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, now: Millis, city: impl Into<String>) {
        self.city = city.into();
        self.started_at = Some(now);
    }

    /// Back to the first line, fully visible.
    pub fn reset(&mut self) {
        self.started_at = None;
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn message_count() -> usize {
        MESSAGES.len()
    }

    pub fn frame(&self, now: Millis) -> SubtitleFrame {
        let last = MESSAGES.len() - 1;
        let Some(start) = self.started_at else {
            return self.line(0, 1.0);
        };
        let elapsed = now.since(start);
        let ticks = (elapsed / SUBTITLE_INTERVAL_MS).floor() as usize;
        if ticks == 0 {
            return self.line(0, 1.0);
        }
        if ticks > last {
            return self.line(last, 1.0);
        }
        let into_tick = elapsed - ticks as f64 * SUBTITLE_INTERVAL_MS;
        if into_tick < SUBTITLE_FADE_MS {
            // Previous line fading out.
            self.line(ticks - 1, 0.0)
        } else {
            self.line(ticks, 1.0)
        }
    }

    fn line(&self, index: usize, opacity: f64) -> SubtitleFrame {
        SubtitleFrame {
            index,
            text: MESSAGES[index].replace("{city}", &self.city),
            opacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_shows_first_line() {
        let s = LoadingSubtitles::new();
        let f = s.frame(Millis(123_456.0));
        assert_eq!(f.index, 0);
        assert_eq!(f.opacity, 1.0);
    }

    #[test]
    fn advances_every_interval_with_a_fade() {
        let mut s = LoadingSubtitles::new();
        s.start(Millis(1000.0), "Paris");
        assert_eq!(s.frame(Millis(3999.0)).index, 0);

        let fading = s.frame(Millis(4100.0));
        assert_eq!((fading.index, fading.opacity), (0, 0.0));

        let next = s.frame(Millis(4300.0));
        assert_eq!((next.index, next.opacity), (1, 1.0));
    }

    #[test]
    fn city_is_interpolated() {
        let mut s = LoadingSubtitles::new();
        s.start(Millis(0.0), "Paris");
        let f = s.frame(Millis(3.0 * SUBTITLE_INTERVAL_MS + 500.0));
        assert_eq!(f.index, 3);
        assert_eq!(f.text, "🔍 Analyzing request for Paris...");
    }

    #[test]
    fn holds_on_last_line() {
        let mut s = LoadingSubtitles::new();
        s.start(Millis(0.0), "Paris");
        let last = LoadingSubtitles::message_count() - 1;
        for t in [6.5, 7.0, 7.05, 50.0] {
            let f = s.frame(Millis(t * SUBTITLE_INTERVAL_MS));
            assert_eq!(f.index, last, "at tick {t}");
            assert_eq!(f.opacity, 1.0);
        }
    }

    #[test]
    fn reset_returns_to_first_line() {
        let mut s = LoadingSubtitles::new();
        s.start(Millis(0.0), "Paris");
        s.reset();
        assert!(!s.is_running());
        assert_eq!(s.frame(Millis(20_000.0)).index, 0);
    }
}
