use crate::{BoardDescriptor, Error, Result};

const GPU_LOAD: &str = "/sys/devices/platform/bus@0/17000000.gpu/load";
const EMC_ACTMON: &str = "/sys/kernel/debug/cactmon/mc_all";

// INA3221 power monitors on the I2C bus
const INA3221_0X40: &str = "/sys/bus/i2c/drivers/ina3221/1-0040/hwmon/hwmon3";
const INA3221_0X41: &str = "/sys/bus/i2c/drivers/ina3221/1-0041/hwmon/hwmon4";

const ZONES: &[&str] = &[
    "cpu-thermal",
    "gpu-thermal",
    "cv0-thermal",
    "cv1-thermal",
    "cv2-thermal",
    "soc0-thermal",
    "soc1-thermal",
    "soc2-thermal",
    "tj-thermal",
    "tboard-thermal",
    "tdiode-thermal",
];

type Preset = (&'static str, fn() -> BoardDescriptor);

const PRESETS: &[Preset] = &[("agx_orin", agx_orin), ("orin_nx", orin_nx)];

/// Get a pre-baked descriptor by name.
pub fn preset(name: &str) -> Result<BoardDescriptor> {
    PRESETS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, build)| build())
        .ok_or_else(|| Error::UnknownBoard(name.to_string()))
}

/// Names accepted by [`preset`].
pub fn preset_names() -> impl Iterator<Item = &'static str> {
    PRESETS.iter().map(|(name, _)| *name)
}

fn rail(board: BoardDescriptor, label: &str, hwmon: &str, channel: usize) -> BoardDescriptor {
    board.with_power_rail(
        label,
        format!("{hwmon}/in{channel}_input"),
        format!("{hwmon}/curr{channel}_input"),
    )
}

fn zones(mut board: BoardDescriptor, count: usize) -> BoardDescriptor {
    for (id, name) in ZONES.iter().take(count).enumerate() {
        board = board.with_thermal_zone(
            *name,
            format!("/sys/class/thermal/thermal_zone{id}/temp"),
        );
    }
    board
}

pub(crate) fn agx_orin() -> BoardDescriptor {
    let board = BoardDescriptor::new("agx_orin", 12)
        .with_gpu_load(GPU_LOAD)
        .with_emc_util(EMC_ACTMON);

    let board = rail(board, "VDD_GPU_SOC", INA3221_0X40, 1);
    let board = rail(board, "VDD_CPU_CV", INA3221_0X40, 2);
    let board = rail(board, "VIN_SYS_5V0", INA3221_0X40, 3);
    let board = rail(board, "VDDQ_VDD2_1V8AO", INA3221_0X41, 2);

    zones(board, 11)
}

// rail labels are the defaults for the devkit carrier and may differ on
// third-party carrier boards
pub(crate) fn orin_nx() -> BoardDescriptor {
    let board = BoardDescriptor::new("orin_nx", 8)
        .with_gpu_load(GPU_LOAD)
        .with_emc_util(EMC_ACTMON);

    let board = rail(board, "VDD_GPU_SOC", INA3221_0X40, 1);
    let board = rail(board, "VDD_CPU_CV", INA3221_0X40, 2);
    let board = rail(board, "VIN_SYS_5V0", INA3221_0X40, 3);

    zones(board, 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agx_orin_preset() {
        let board = preset("agx_orin").unwrap();
        assert_eq!(board.name, "agx_orin");
        assert_eq!(board.num_cpu_cores, 12);
        assert_eq!(board.power_rails.len(), 4);
        assert_eq!(board.thermal_zones.len(), 11);
        assert_eq!(board.power_rails[3].label, "VDDQ_VDD2_1V8AO");
        assert_eq!(board.thermal_zones[8].name, "tj-thermal");
        assert!(board.gpu_load.is_some());
        assert!(board.emc_util.is_some());
    }

    #[test]
    fn orin_nx_preset() {
        let board = preset("orin_nx").unwrap();
        assert_eq!(board.num_cpu_cores, 8);
        assert_eq!(board.power_rails.len(), 3);
        assert_eq!(board.thermal_zones.len(), 10);
    }

    #[test]
    fn presets_are_valid() {
        for name in preset_names() {
            let board = preset(name).unwrap();
            board.validate().unwrap();
            for rail in &board.power_rails {
                assert!(rail.voltage.to_string_lossy().contains("/in"));
                assert!(rail.current.to_string_lossy().contains("/curr"));
            }
        }
    }

    #[test]
    fn unknown_preset() {
        assert!(matches!(preset("unknown"), Err(Error::UnknownBoard(_))));
    }
}
