// Nanoseconds per second
pub const SECONDS: u64 = 1_000_000_000;

// Sysfs sensors report in thousandths of the display unit (mV, mA, m°C)
pub const MILLI: f32 = 1_000.0;
