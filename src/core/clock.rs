//=========================================================================
// Game Clock
//=========================================================================
//
// Monotonic simulation time and interval throttles.
//
// Architecture:
//   tick(dt) → GameClock::advance(dt) → now()
//                                         ↓
//                    Throttle::ready(now) (room check, focus raycast, ...)
//
// The clock only moves through `advance`, so throttled subsystems keep a
// stable cadence under variable frame rate and tests stay deterministic.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

//=== Conversion ==========================================================

/// Seconds as a `Duration`. Negative and NaN values count as zero, values
/// too large to represent saturate.
pub fn secs(value: f32) -> Duration {
    if value.is_nan() || value <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f32(value).unwrap_or(Duration::MAX)
}

//=== GameClock ===========================================================

/// Simulation time since the clock was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameClock {
    now: Duration,
    max_delta: Option<Duration>,
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clock that clamps every step to `max_delta`.
    pub fn with_max_delta(max_delta: Duration) -> Self {
        Self {
            now: Duration::ZERO,
            max_delta: Some(max_delta),
        }
    }

    /// Advances by a frame delta in seconds and returns the step actually
    /// applied. Negative and non-finite deltas count as zero.
    pub fn advance(&mut self, dt: f32) -> Duration {
        let step = if dt.is_finite() { secs(dt) } else { Duration::ZERO };
        let step = match self.max_delta {
            Some(max) => step.min(max),
            None => step,
        };
        self.now = self.now.saturating_add(step);
        step
    }

    pub fn now(&self) -> Duration {
        self.now
    }
}

//=== Throttle ============================================================

/// Fires at most once per `interval` of clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throttle {
    interval: Duration,
    last: Option<Duration>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self { interval, last: None }
    }

    pub fn from_secs(interval: f32) -> Self {
        Self::new(secs(interval))
    }

    /// Returns `true` and re-arms if the interval has elapsed.
    ///
    /// The first query after construction or [`reset`](Self::reset)
    /// always fires.
    pub fn ready(&mut self, now: Duration) -> bool {
        let due = match self.last {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.interval,
        };
        if due {
            self.last = Some(now);
        }
        due
    }

    /// Forgets the last firing.
    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn clock_accumulates_deltas() {
        let mut clock = GameClock::new();
        clock.advance(0.5);
        clock.advance(0.25);
        assert_eq!(clock.now(), ms(750));
    }

    #[test]
    fn clock_ignores_negative_and_nan() {
        let mut clock = GameClock::new();
        assert_eq!(clock.advance(-1.0), Duration::ZERO);
        assert_eq!(clock.advance(f32::NAN), Duration::ZERO);
        assert_eq!(clock.now(), Duration::ZERO);
    }

    #[test]
    fn secs_never_panics() {
        assert_eq!(secs(0.5), ms(500));
        assert_eq!(secs(-1.0), Duration::ZERO);
        assert_eq!(secs(f32::NAN), Duration::ZERO);
        assert_eq!(secs(f32::INFINITY), Duration::MAX);
        assert_eq!(secs(f32::MAX), Duration::MAX);
    }

    #[test]
    fn clock_ignores_unrepresentable_steps() {
        let mut clock = GameClock::new();
        assert_eq!(clock.advance(f32::INFINITY), Duration::ZERO);
        clock.advance(f32::MAX);
        clock.advance(f32::MAX);
        assert_eq!(clock.now(), Duration::MAX);
    }

    #[test]
    fn clock_clamps_large_steps() {
        let mut clock = GameClock::with_max_delta(ms(250));
        assert_eq!(clock.advance(3.0), ms(250));
        assert_eq!(clock.now(), ms(250));
    }

    #[test]
    fn throttle_first_query_fires() {
        let mut throttle = Throttle::new(ms(100));
        assert!(throttle.ready(Duration::ZERO));
        assert!(!throttle.ready(ms(50)));
    }

    #[test]
    fn throttle_fires_once_per_interval() {
        let mut throttle = Throttle::new(ms(100));
        let fired = (0..=10)
            .map(|i| ms(i * 20))
            .filter(|&now| throttle.ready(now))
            .count();
        // 0, 100, 200
        assert_eq!(fired, 3);
    }

    #[test]
    fn throttle_reset_rearms() {
        let mut throttle = Throttle::new(ms(250));
        assert!(throttle.ready(ms(0)));
        throttle.reset();
        assert!(throttle.ready(ms(10)));
    }
}
