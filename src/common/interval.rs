use super::clock::{sleep_until, Instant};
use super::units::SECONDS;
use core::time::Duration;

/// A drift-free periodic ticker.
///
/// Each call to [`Interval::wait`] moves the target forward by exactly one
/// period from the previous target, never from "now", so variable work
/// between waits does not accumulate into drift. If the work overran the
/// period the target is already in the past and the wait returns at once;
/// nothing is skipped and nothing is rescheduled.
pub struct Interval {
    next: Instant,
    period: Duration,
    overruns: u64,
}

impl Interval {
    /// Create an interval anchored at the current time.
    pub fn new(period: Duration) -> Self {
        Self::starting_at(Instant::now(), period)
    }

    pub fn starting_at(start: Instant, period: Duration) -> Self {
        Self {
            next: start,
            period,
            overruns: 0,
        }
    }

    /// The period for a rate in Hz. `hz` must be non-zero.
    pub fn period_for(hz: u32) -> Duration {
        Duration::from_nanos(SECONDS / hz as u64)
    }

    /// Advance the target by one period and block until it is reached.
    /// Returns `true` if the target had already passed.
    pub fn wait(&mut self) -> bool {
        self.next += self.period;

        if Instant::now() >= self.next {
            self.overruns += 1;
            return true;
        }

        sleep_until(self.next);

        false
    }

    /// Number of waits that found their target already in the past.
    pub fn overruns(&self) -> u64 {
        self.overruns
    }
}
