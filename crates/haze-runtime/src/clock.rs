//! Millisecond clocks and the frame-rate limiter

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// A monotonic millisecond clock
pub trait TimeSource {
    /// Milliseconds since an arbitrary fixed origin
    fn now_ms(&self) -> f64;
}

/// Wall clock backed by `Instant`
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Hand-driven clock. Clones share the same time.
#[derive(Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl TimeSource for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Gates an animation-frame driver down to a frames-per-second cap.
///
/// The driver may call `poll` as often as it likes; a frame is released only
/// once strictly more than one interval has passed since the last release.
/// The remainder past a whole interval is carried so the cadence does not drift.
#[derive(Clone, Debug)]
pub struct FrameLimiter {
    /// Minimum milliseconds between released frames
    pub interval_ms: f64,
    /// Time of the last released frame, minus the carried remainder
    then_ms: f64,
}

impl FrameLimiter {
    /// Create a limiter for `fps` frames per second. Non-positive rates clamp to 1.
    pub fn new(fps: f64) -> Self {
        let fps = if fps.is_finite() && fps > 0.0 { fps } else { 1.0 };
        Self {
            interval_ms: 1000.0 / fps,
            then_ms: 0.0,
        }
    }

    /// Restart the interval window at `now_ms`
    pub fn reset(&mut self, now_ms: f64) {
        self.then_ms = now_ms;
    }

    /// Returns the elapsed delta in milliseconds if a frame is due
    pub fn poll(&mut self, now_ms: f64) -> Option<f64> {
        let elapsed = now_ms - self.then_ms;
        if elapsed > self.interval_ms {
            self.then_ms = now_ms - (elapsed % self.interval_ms);
            Some(elapsed)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limiter_interval() {
        let limiter = FrameLimiter::new(24.0);
        assert!((limiter.interval_ms - 41.666).abs() < 0.01);
    }

    #[test]
    fn test_limiter_clamps_bad_rate() {
        assert!((FrameLimiter::new(0.0).interval_ms - 1000.0).abs() < 1e-9);
        assert!((FrameLimiter::new(f64::NAN).interval_ms - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_limiter_throttles_fast_driver() {
        let mut limiter = FrameLimiter::new(24.0);
        limiter.reset(0.0);

        let mut released = Vec::new();
        let mut now = 0.0;
        for _ in 0..200 {
            now += 16.0;
            if limiter.poll(now).is_some() {
                released.push(now);
            }
        }

        assert!(!released.is_empty());
        // Never more than one release per interval window
        for pair in released.windows(2) {
            assert!(pair[1] - pair[0] >= 32.0);
        }
        let windows = now / limiter.interval_ms;
        assert!(released.len() as f64 <= windows.ceil());
    }

    #[test]
    fn test_limiter_reports_delta() {
        let mut limiter = FrameLimiter::new(24.0);
        limiter.reset(100.0);
        assert_eq!(limiter.poll(116.0), None);
        assert_eq!(limiter.poll(132.0), None);
        assert_eq!(limiter.poll(148.0), Some(48.0));
    }

    #[test]
    fn test_manual_clock_shared() {
        let clock = ManualClock::new(10.0);
        let other = clock.clone();
        clock.advance(5.0);
        assert_eq!(other.now_ms(), 15.0);
        other.set(0.0);
        assert_eq!(clock.now_ms(), 0.0);
    }

    #[test]
    fn test_system_clock_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }
}
