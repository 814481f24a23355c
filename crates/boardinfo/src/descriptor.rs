use std::path::PathBuf;

use crate::{Error, Result};

/// Upper bound on the number of CPU cores a board may report.
pub const MAX_CPU_CORES: usize = 16;

/// Upper bound on the number of power rails a board may report.
pub const MAX_POWER_RAILS: usize = 8;

/// Upper bound on the number of thermal zones a board may report.
pub const MAX_THERMAL_ZONES: usize = 16;

fn proc_stat() -> PathBuf {
    "/proc/stat".into()
}

fn meminfo() -> PathBuf {
    "/proc/meminfo".into()
}

/// A power monitor channel, read as a voltage/current pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerRail {
    /// Human-readable rail name, e.g. `VDD_GPU_SOC`.
    pub label: String,
    /// Source reporting the rail voltage in millivolts.
    pub voltage: PathBuf,
    /// Source reporting the rail current in milliamps.
    pub current: PathBuf,
}

/// A thermal sensor reporting millidegrees Celsius.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThermalZone {
    pub name: String,
    pub temperature: PathBuf,
}

/// The set of data sources the sampling engine reads on a given board.
///
/// Absent sources are `None` (GPU load, memory controller utilization) or
/// simply not listed (rails, zones). The engine reads the descriptor but never
/// modifies it.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardDescriptor {
    pub name: String,
    pub num_cpu_cores: usize,
    #[serde(default)]
    pub gpu_load: Option<PathBuf>,
    #[serde(default)]
    pub emc_util: Option<PathBuf>,
    #[serde(default)]
    pub power_rails: Vec<PowerRail>,
    #[serde(default)]
    pub thermal_zones: Vec<ThermalZone>,
    #[serde(default = "proc_stat")]
    pub proc_stat: PathBuf,
    #[serde(default = "meminfo")]
    pub meminfo: PathBuf,
}

impl BoardDescriptor {
    /// Create a descriptor with only the CPU and memory sources, which every
    /// Linux board provides through procfs.
    pub fn new(name: impl Into<String>, num_cpu_cores: usize) -> Self {
        Self {
            name: name.into(),
            num_cpu_cores,
            gpu_load: None,
            emc_util: None,
            power_rails: Vec::new(),
            thermal_zones: Vec::new(),
            proc_stat: proc_stat(),
            meminfo: meminfo(),
        }
    }

    pub fn with_gpu_load(mut self, path: impl Into<PathBuf>) -> Self {
        self.gpu_load = Some(path.into());
        self
    }

    pub fn with_emc_util(mut self, path: impl Into<PathBuf>) -> Self {
        self.emc_util = Some(path.into());
        self
    }

    pub fn with_power_rail(
        mut self,
        label: impl Into<String>,
        voltage: impl Into<PathBuf>,
        current: impl Into<PathBuf>,
    ) -> Self {
        self.power_rails.push(PowerRail {
            label: label.into(),
            voltage: voltage.into(),
            current: current.into(),
        });
        self
    }

    pub fn with_thermal_zone(
        mut self,
        name: impl Into<String>,
        temperature: impl Into<PathBuf>,
    ) -> Self {
        self.thermal_zones.push(ThermalZone {
            name: name.into(),
            temperature: temperature.into(),
        });
        self
    }

    pub fn with_proc_stat(mut self, path: impl Into<PathBuf>) -> Self {
        self.proc_stat = path.into();
        self
    }

    pub fn with_meminfo(mut self, path: impl Into<PathBuf>) -> Self {
        self.meminfo = path.into();
        self
    }

    /// Check the descriptor against the fixed record capacities.
    pub fn validate(&self) -> Result<()> {
        if self.num_cpu_cores == 0 || self.num_cpu_cores > MAX_CPU_CORES {
            return Err(Error::InvalidCoreCount {
                got: self.num_cpu_cores,
                max: MAX_CPU_CORES,
            });
        }

        if self.power_rails.len() > MAX_POWER_RAILS {
            return Err(Error::TooManyRails {
                got: self.power_rails.len(),
                max: MAX_POWER_RAILS,
            });
        }

        if self.thermal_zones.len() > MAX_THERMAL_ZONES {
            return Err(Error::TooManyZones {
                got: self.thermal_zones.len(),
                max: MAX_THERMAL_ZONES,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_cores_rejected() {
        let board = BoardDescriptor::new("test", 0);
        assert!(matches!(
            board.validate(),
            Err(Error::InvalidCoreCount { got: 0, .. })
        ));
    }

    #[test]
    fn too_many_cores_rejected() {
        let board = BoardDescriptor::new("test", MAX_CPU_CORES + 1);
        assert!(board.validate().unwrap_err().is_validation());
    }

    #[test]
    fn too_many_rails_rejected() {
        let mut board = BoardDescriptor::new("test", 4);
        for _ in 0..=MAX_POWER_RAILS {
            board = board.with_power_rail("rail", "/dev/null", "/dev/null");
        }
        assert!(matches!(board.validate(), Err(Error::TooManyRails { .. })));
    }

    #[test]
    fn too_many_zones_rejected() {
        let mut board = BoardDescriptor::new("test", 4);
        for _ in 0..=MAX_THERMAL_ZONES {
            board = board.with_thermal_zone("zone", "/dev/null");
        }
        assert!(matches!(board.validate(), Err(Error::TooManyZones { .. })));
    }

    #[test]
    fn bounds_are_inclusive() {
        let mut board = BoardDescriptor::new("test", MAX_CPU_CORES);
        for _ in 0..MAX_POWER_RAILS {
            board = board.with_power_rail("rail", "/dev/null", "/dev/null");
        }
        for _ in 0..MAX_THERMAL_ZONES {
            board = board.with_thermal_zone("zone", "/dev/null");
        }
        assert!(board.validate().is_ok());
    }

    #[test]
    fn procfs_defaults() {
        let board = BoardDescriptor::new("test", 1);
        assert_eq!(board.proc_stat, PathBuf::from("/proc/stat"));
        assert_eq!(board.meminfo, PathBuf::from("/proc/meminfo"));
        assert!(board.gpu_load.is_none());
        assert!(board.emc_util.is_none());
    }
}
