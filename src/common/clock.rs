//! A thin wrapper over `CLOCK_MONOTONIC` that can be handed back to the
//! kernel as an absolute deadline.

use core::ops::{Add, AddAssign, Sub};
use core::time::Duration;

use nix::sys::time::TimeSpec;
use nix::time::{clock_gettime, ClockId};

use super::units::SECONDS;

/// A point on the monotonic clock, in nanoseconds since an unspecified origin.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant {
    nanos: u64,
}

impl Instant {
    pub fn now() -> Self {
        // the monotonic clock exists on every kernel we run on
        let ts = clock_gettime(ClockId::CLOCK_MONOTONIC).expect("CLOCK_MONOTONIC is unavailable");

        Self {
            nanos: (ts.tv_sec() as u64)
                .wrapping_mul(SECONDS)
                .wrapping_add(ts.tv_nsec() as u64),
        }
    }

    pub fn elapsed(&self) -> Duration {
        Self::now() - *self
    }

    #[cfg_attr(not(target_os = "linux"), allow(dead_code))]
    fn as_timespec(&self) -> TimeSpec {
        TimeSpec::new((self.nanos / SECONDS) as _, (self.nanos % SECONDS) as _)
    }
}

impl Add<Duration> for Instant {
    type Output = Instant;

    fn add(self, rhs: Duration) -> Self::Output {
        Self {
            nanos: self.nanos + rhs.as_nanos() as u64,
        }
    }
}

impl AddAssign<Duration> for Instant {
    fn add_assign(&mut self, rhs: Duration) {
        *self = *self + rhs;
    }
}

/// Saturates to zero when `rhs` is later than `self`.
impl Sub<Instant> for Instant {
    type Output = Duration;

    fn sub(self, rhs: Instant) -> Self::Output {
        Duration::from_nanos(self.nanos.saturating_sub(rhs.nanos))
    }
}

/// Block the calling thread until the monotonic clock reaches `deadline`.
/// Returns immediately if the deadline has already passed.
#[cfg(target_os = "linux")]
pub fn sleep_until(deadline: Instant) {
    use nix::errno::Errno;
    use nix::time::{clock_nanosleep, ClockNanosleepFlags};

    let ts = deadline.as_timespec();

    // the deadline is absolute, so an interrupted sleep simply resumes
    while let Err(Errno::EINTR) =
        clock_nanosleep(ClockId::CLOCK_MONOTONIC, ClockNanosleepFlags::TIMER_ABSTIME, &ts)
    {}
}

/// Block the calling thread until the monotonic clock reaches `deadline`.
/// Returns immediately if the deadline has already passed.
#[cfg(not(target_os = "linux"))]
pub fn sleep_until(deadline: Instant) {
    let now = Instant::now();

    if deadline > now {
        std::thread::sleep(deadline - now);
    }
}
