pub mod clock;
mod interval;
pub mod units;

pub use clock::Instant;
pub use interval::Interval;
