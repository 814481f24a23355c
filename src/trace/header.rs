use boardinfo::{BoardDescriptor, MAX_CPU_CORES, MAX_POWER_RAILS, MAX_THERMAL_ZONES};
use serde::Serialize;

use super::codec::{Decoder, Encoder};
use super::records::{EpochMarker, FastSample, MediumSample, Record, SlowSample};
use super::{TraceError, MAGIC, VERSION};
use crate::config::SamplingConfig;

const BOARD_NAME_LEN: usize = 32;
const LABEL_LEN: usize = 24;
const RESERVED_LEN: usize = 64;

/// Session metadata at the start of every trace.
///
/// | offset | field              | type       |
/// |--------|--------------------|------------|
/// | 0      | magic              | u32        |
/// | 4      | version            | u32        |
/// | 8      | board_name         | [u8; 32]   |
/// | 40     | num_cpu_cores      | u8         |
/// | 41     | num_power_rails    | u8         |
/// | 42     | num_thermal_zones  | u8         |
/// | 43     | emc_available      | u8         |
/// | 44     | fast/medium/slow Hz| u32 × 3    |
/// | 56     | record counts      | u64 × 4    |
/// | 88     | power rail names   | [u8; 24] × 8  |
/// | 280    | thermal zone names | [u8; 24] × 16 |
/// | 664    | reserved           | [u8; 64]   |
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FileHeader {
    pub board_name: String,
    pub num_cpu_cores: u8,
    pub num_power_rails: u8,
    pub num_thermal_zones: u8,
    pub emc_available: bool,
    pub fast_hz: u32,
    pub medium_hz: u32,
    pub slow_hz: u32,
    pub num_fast_samples: u64,
    pub num_medium_samples: u64,
    pub num_slow_samples: u64,
    pub num_markers: u64,
    pub power_rail_names: Vec<String>,
    pub thermal_zone_names: Vec<String>,
}

impl FileHeader {
    pub const SIZE: usize = 728;

    /// Header for a session on `board`, with zero record counts. The board
    /// must already be validated.
    pub fn for_session(board: &BoardDescriptor, sampling: &SamplingConfig, emc_available: bool) -> Self {
        Self {
            board_name: board.name.clone(),
            num_cpu_cores: board.num_cpu_cores as u8,
            num_power_rails: board.power_rails.len() as u8,
            num_thermal_zones: board.thermal_zones.len() as u8,
            emc_available,
            fast_hz: sampling.fast_hz,
            medium_hz: sampling.medium_hz,
            slow_hz: sampling.slow_hz,
            power_rail_names: board.power_rails.iter().map(|r| r.label.clone()).collect(),
            thermal_zone_names: board.thermal_zones.iter().map(|z| z.name.clone()).collect(),
            ..Default::default()
        }
    }

    /// Total file size implied by the record counts.
    pub fn file_size(&self) -> u64 {
        // saturating so that corrupt counts surface as a size mismatch
        [
            (self.num_fast_samples, FastSample::SIZE),
            (self.num_medium_samples, MediumSample::SIZE),
            (self.num_slow_samples, SlowSample::SIZE),
            (self.num_markers, EpochMarker::SIZE),
        ]
        .iter()
        .fold(Self::SIZE as u64, |total, (count, size)| {
            total.saturating_add(count.saturating_mul(*size as u64))
        })
    }

    pub fn encode(&self, buf: &mut Vec<u8>) {
        let mut e = Encoder::new(buf);
        e.u32(MAGIC);
        e.u32(VERSION);
        e.fixed_str(&self.board_name, BOARD_NAME_LEN);
        e.u8(self.num_cpu_cores);
        e.u8(self.num_power_rails);
        e.u8(self.num_thermal_zones);
        e.u8(self.emc_available as u8);
        e.u32(self.fast_hz);
        e.u32(self.medium_hz);
        e.u32(self.slow_hz);
        e.u64(self.num_fast_samples);
        e.u64(self.num_medium_samples);
        e.u64(self.num_slow_samples);
        e.u64(self.num_markers);

        encode_names(&mut e, &self.power_rail_names, MAX_POWER_RAILS);
        encode_names(&mut e, &self.thermal_zone_names, MAX_THERMAL_ZONES);

        e.zeros(RESERVED_LEN);
    }

    /// Decode and check a header. `data` may be longer than the header.
    pub fn decode(data: &[u8]) -> Result<Self, TraceError> {
        if data.len() < Self::SIZE {
            return Err(TraceError::TooShort(data.len()));
        }

        let mut d = Decoder::new(&data[..Self::SIZE]);

        let magic = d.u32();
        if magic != MAGIC {
            return Err(TraceError::InvalidMagic(magic));
        }

        let version = d.u32();
        if version != VERSION {
            return Err(TraceError::UnsupportedVersion(version));
        }

        let board_name = d
            .fixed_str(BOARD_NAME_LEN)
            .ok_or(TraceError::InvalidUtf8("board name"))?;

        let num_cpu_cores = d.u8();
        let num_power_rails = d.u8();
        let num_thermal_zones = d.u8();
        let emc_available = d.u8() != 0;

        check_count("num_cpu_cores", num_cpu_cores, MAX_CPU_CORES)?;
        check_count("num_power_rails", num_power_rails, MAX_POWER_RAILS)?;
        check_count("num_thermal_zones", num_thermal_zones, MAX_THERMAL_ZONES)?;

        let fast_hz = d.u32();
        let medium_hz = d.u32();
        let slow_hz = d.u32();

        let num_fast_samples = d.u64();
        let num_medium_samples = d.u64();
        let num_slow_samples = d.u64();
        let num_markers = d.u64();

        let power_rail_names = decode_names(&mut d, num_power_rails, MAX_POWER_RAILS, "rail name")?;
        let thermal_zone_names =
            decode_names(&mut d, num_thermal_zones, MAX_THERMAL_ZONES, "zone name")?;

        Ok(Self {
            board_name,
            num_cpu_cores,
            num_power_rails,
            num_thermal_zones,
            emc_available,
            fast_hz,
            medium_hz,
            slow_hz,
            num_fast_samples,
            num_medium_samples,
            num_slow_samples,
            num_markers,
            power_rail_names,
            thermal_zone_names,
        })
    }
}

fn check_count(field: &'static str, value: u8, max: usize) -> Result<(), TraceError> {
    if value as usize > max {
        return Err(TraceError::InvalidCount {
            field,
            value: value as u64,
            max: max as u64,
        });
    }

    Ok(())
}

fn encode_names(e: &mut Encoder<'_>, names: &[String], slots: usize) {
    for slot in 0..slots {
        e.fixed_str(names.get(slot).map(String::as_str).unwrap_or(""), LABEL_LEN);
    }
}

fn decode_names(
    d: &mut Decoder<'_>,
    active: u8,
    slots: usize,
    what: &'static str,
) -> Result<Vec<String>, TraceError> {
    let mut names = Vec::with_capacity(active as usize);

    for slot in 0..slots {
        if slot < active as usize {
            names.push(d.fixed_str(LABEL_LEN).ok_or(TraceError::InvalidUtf8(what))?);
        } else {
            d.skip(LABEL_LEN);
        }
    }

    Ok(names)
}
