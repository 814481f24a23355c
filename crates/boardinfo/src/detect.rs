use log::{debug, warn};

use crate::presets::{agx_orin, orin_nx};
use crate::util::{compatible_ids, count_cpu_cores, is_readable, read_string};
use crate::{BoardDescriptor, Error, Result};

const COMPATIBLE: &str = "/proc/device-tree/compatible";

/// Detect the running board from the device tree and prune its descriptor
/// down to the sources that are actually readable.
pub fn detect() -> Result<BoardDescriptor> {
    let raw = read_string(COMPATIBLE).unwrap_or_default();

    let mut board = from_compatible(&raw)?;

    debug!("detected board: {}", board.name);

    prune(&mut board);

    Ok(board)
}

fn from_compatible(raw: &str) -> Result<BoardDescriptor> {
    for id in compatible_ids(raw) {
        // module part numbers
        if id.contains("p3701") {
            return Ok(agx_orin());
        }
        if id.contains("p3767") {
            return Ok(orin_nx());
        }
    }

    Err(Error::UnrecognizedBoard(raw.replace('\0', " ").trim().to_string()))
}

/// Drop the sources of `board` that cannot be opened for reading and take the
/// core count from the per-core lines of its `proc_stat` source.
pub fn prune(board: &mut BoardDescriptor) {
    match count_cpu_cores(&board.proc_stat) {
        Ok(0) | Err(_) => {
            warn!("could not count cpu cores, keeping {}", board.num_cpu_cores);
        }
        Ok(cores) => board.num_cpu_cores = cores,
    }

    if board.gpu_load.as_ref().is_some_and(|p| !is_readable(p)) {
        warn!("gpu load source unavailable: {:?}", board.gpu_load);
        board.gpu_load = None;
    }

    if board.emc_util.as_ref().is_some_and(|p| !is_readable(p)) {
        warn!("emc utilization source unavailable: {:?}", board.emc_util);
        board.emc_util = None;
    }

    board.power_rails.retain(|rail| {
        let readable = is_readable(&rail.voltage) && is_readable(&rail.current);
        if !readable {
            warn!("power rail unavailable: {}", rail.label);
        }
        readable
    });

    board.thermal_zones.retain(|zone| {
        let readable = is_readable(&zone.temperature);
        if !readable {
            warn!("thermal zone unavailable: {}", zone.name);
        }
        readable
    });
}
