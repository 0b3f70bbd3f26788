use std::time::Duration;

/// Time elapsed since `stamp`, or `None` if nothing was ever recorded.
pub fn elapsed_since(now: Duration, stamp: Option<Duration>) -> Option<Duration> {
    stamp.map(|t| now.saturating_sub(t))
}

/// Whether `stamp` happened no more than `window` before `now`.
///
/// An unset stamp is treated as infinitely old and never falls inside a window.
pub fn within_window(now: Duration, stamp: Option<Duration>, window: Duration) -> bool {
    elapsed_since(now, stamp).is_some_and(|elapsed| elapsed <= window)
}

/// Duration of one fixed tick at `hz`. Non-positive or non-finite rates fall back to 60 Hz.
pub fn tick_duration(hz: f32) -> Duration {
    let hz = if hz.is_finite() && hz > 0.0 { hz } else { 60.0 };
    Duration::from_secs_f64(1.0 / f64::from(hz))
}

/// Accumulates wall-clock time and releases it in fixed-size ticks.
#[derive(Debug, Clone)]
pub struct FixedStep {
    step: Duration,
    accumulator: Duration,
    max_catch_up: u32,
}

impl FixedStep {
    pub fn new(hz: f32) -> Self {
        Self {
            step: tick_duration(hz),
            accumulator: Duration::ZERO,
            max_catch_up: 5,
        }
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Real time still needed before the next tick is due.
    pub fn until_next(&self) -> Duration {
        self.step.saturating_sub(self.accumulator)
    }

    /// Feed elapsed real time and return how many ticks should run now.
    /// Backlog beyond `max_catch_up` ticks is dropped.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulator += elapsed;
        let mut ticks = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            ticks += 1;
            if ticks == self.max_catch_up {
                self.accumulator = Duration::ZERO;
                break;
            }
        }
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_stamp_is_never_recent() {
        assert!(!within_window(
            Duration::from_millis(10),
            None,
            Duration::from_secs(100)
        ));
    }

    #[test]
    fn window_is_inclusive() {
        let now = Duration::from_millis(240);
        let stamp = Some(Duration::from_millis(100));
        assert!(within_window(now, stamp, Duration::from_millis(140)));
        assert!(!within_window(now, stamp, Duration::from_millis(139)));
    }

    #[test]
    fn tick_duration_falls_back_on_bad_rate() {
        assert_eq!(tick_duration(0.0), tick_duration(60.0));
        assert_eq!(tick_duration(f32::NAN), tick_duration(60.0));
    }

    #[test]
    fn fixed_step_releases_whole_ticks() {
        let mut clock = FixedStep::new(50.0);
        assert_eq!(clock.advance(Duration::from_millis(10)), 0);
        assert_eq!(clock.advance(Duration::from_millis(35)), 2);
        assert_eq!(clock.advance(Duration::from_millis(5)), 0);
        assert_eq!(clock.until_next(), Duration::from_millis(10));
    }

    #[test]
    fn fixed_step_caps_backlog() {
        let mut clock = FixedStep::new(60.0);
        assert_eq!(clock.advance(Duration::from_secs(3)), 5);
        assert_eq!(clock.advance(Duration::ZERO), 0);
    }
}
