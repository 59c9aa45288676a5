// Timing engine - WPM to tick period and the playback timer

use std::time::{Duration, Instant};

/// Period between two words at the given rate: `60000 / wpm` milliseconds.
pub fn wpm_to_period(wpm: u32) -> Duration {
    Duration::from_micros(60_000_000 / wpm.max(1) as u64)
}

/// A repeating timer expressed as a deadline the host loop waits on.
///
/// The timer never fires by itself; the owner asks it whether a tick is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackTimer {
    period: Duration,
    next_due: Instant,
}

impl PlaybackTimer {
    pub fn start(period: Duration, now: Instant) -> Self {
        Self {
            period,
            next_due: now + period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn next_due(&self) -> Instant {
        self.next_due
    }

    /// Consumes one elapsed tick. Overdue ticks are handed out one call at a time.
    pub fn take_due(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        self.next_due += self.period;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wpm_to_period_300() {
        assert_eq!(wpm_to_period(300), Duration::from_millis(200));
    }

    #[test]
    fn test_wpm_to_period_600() {
        assert_eq!(wpm_to_period(600), Duration::from_millis(100));
    }

    #[test]
    fn test_wpm_to_period_keeps_sub_millisecond_precision() {
        // 60,000 / 350 = 171.428... ms
        assert_eq!(wpm_to_period(350), Duration::from_micros(171_428));
    }

    #[test]
    fn test_wpm_to_period_zero_does_not_divide_by_zero() {
        assert_eq!(wpm_to_period(0), Duration::from_secs(60));
    }

    #[test]
    fn test_timer_not_due_before_period() {
        let start = Instant::now();
        let mut timer = PlaybackTimer::start(Duration::from_millis(200), start);
        assert!(!timer.take_due(start));
        assert!(!timer.take_due(start + Duration::from_millis(199)));
        assert_eq!(timer.next_due(), start + Duration::from_millis(200));
    }

    #[test]
    fn test_timer_fires_on_each_boundary() {
        let start = Instant::now();
        let mut timer = PlaybackTimer::start(Duration::from_millis(200), start);
        assert!(timer.take_due(start + Duration::from_millis(200)));
        assert!(!timer.take_due(start + Duration::from_millis(200)));
        assert!(timer.take_due(start + Duration::from_millis(400)));
    }

    #[test]
    fn test_timer_hands_out_overdue_ticks_one_at_a_time() {
        let start = Instant::now();
        let mut timer = PlaybackTimer::start(Duration::from_millis(100), start);
        let late = start + Duration::from_millis(350);
        let fired = std::iter::from_fn(|| timer.take_due(late).then_some(())).count();
        assert_eq!(fired, 3);
        assert_eq!(timer.next_due(), start + Duration::from_millis(400));
    }
}
