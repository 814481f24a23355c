//! Tiered, high-rate hardware telemetry recording for embedded compute
//! boards.
//!
//! An [`Engine`] samples a board's data sources on three independent
//! schedules and, when stopped, writes everything it collected to one binary
//! [`trace`] file:
//!
//! * fast: GPU load, per-core CPU utilization, memory, memory controller
//! * medium: power rail voltage, current and power
//! * slow: thermal zone temperatures
//!
//! ```no_run
//! use tierscope::{boardinfo, Engine, SamplingConfig};
//!
//! let board = boardinfo::preset("agx_orin")?;
//! let engine = Engine::new("trace.bin", board, SamplingConfig::default())?;
//!
//! let session = engine.session()?;
//! // ... workload ...
//! session.sync();
//! // ... next phase ...
//! session.finish()?;
//! # Ok::<(), tierscope::Error>(())
//! ```

pub mod config;
pub mod readers;
pub mod trace;

mod common;
mod engine;
mod error;

pub use boardinfo;

pub use config::{SamplingConfig, MAX_RATE_HZ};
pub use engine::{Engine, Session, TierKind};
pub use error::{Error, Result};

pub(crate) use tracing::{debug, error, info, warn};
