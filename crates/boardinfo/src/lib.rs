//! Describe the telemetry sources present on an embedded compute board.
//!
//! A [`BoardDescriptor`] lists where each readable data source lives (GPU
//! load, memory controller utilization, power rails, thermal zones). It is
//! built once, either from a pre-baked [`preset`], by [`detect`]ing the
//! running board, or by deserializing a custom description, and is treated as
//! immutable afterwards.

#[macro_use]
extern crate serde;

mod descriptor;
mod detect;
mod error;
mod presets;
mod util;

pub use crate::descriptor::{
    BoardDescriptor, PowerRail, ThermalZone, MAX_CPU_CORES, MAX_POWER_RAILS, MAX_THERMAL_ZONES,
};
pub use crate::detect::{detect, prune};
pub use crate::error::{Error, Result};
pub use crate::presets::{preset, preset_names};
