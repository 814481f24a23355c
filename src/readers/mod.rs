//! Conversions from raw kernel-exposed text to typed metric values.
//!
//! Every reader is best-effort: a source that is missing, unreadable, empty,
//! or garbled yields zero (or `None` for memory controller utilization)
//! rather than an error. A sampling cycle must never be delayed or aborted
//! by one flaky sensor, so stricter handling added here has to preserve that
//! property.

mod cpu;
mod emc;
mod gpu;
mod memory;
mod power;
mod source;
mod thermal;

pub use cpu::{parse_proc_stat, CpuReader, CpuUsage, Jiffies};
pub use emc::emc_util;
pub use gpu::{gpu_load, GPU_LOAD_SCALE};
pub use memory::{parse_meminfo, MemoryUsage};
pub use power::{rail_reading, RailReading};
pub use source::Source;
pub use thermal::temperature_c;
