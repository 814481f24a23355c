use boardinfo::{MAX_CPU_CORES, MAX_POWER_RAILS, MAX_THERMAL_ZONES};

use super::codec::{Decoder, Encoder};
use super::EMC_UNAVAILABLE;

/// A fixed-size on-disk record.
pub trait Record: Sized {
    /// Encoded size in bytes.
    const SIZE: usize;

    /// Append exactly [`Self::SIZE`] bytes to `buf`.
    fn encode(&self, buf: &mut Vec<u8>);

    /// Decode from a slice of exactly [`Self::SIZE`] bytes.
    fn decode(data: &[u8]) -> Self;
}

/// Fast tier: GPU, CPU, memory and memory controller.
///
/// | offset | field            | type          |
/// |--------|------------------|---------------|
/// | 0      | time_s           | f64           |
/// | 8      | gpu_load         | u16           |
/// | 10     | cpu_util         | f32 × 16      |
/// | 74     | cpu_aggregate    | f32           |
/// | 78     | ram_used_kb      | u64           |
/// | 86     | ram_available_kb | u64           |
/// | 94     | emc_util         | f32 (-1 = none) |
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FastSample {
    /// Seconds since the session started.
    pub time_s: f64,
    /// Tenths of a percent, 0..=1000.
    pub gpu_load: u16,
    /// Per-core percent; slots past the board's core count are zero.
    pub cpu_util: [f32; MAX_CPU_CORES],
    pub cpu_aggregate: f32,
    pub ram_used_kb: u64,
    pub ram_available_kb: u64,
    /// Percent, or `None` when the source is unavailable.
    pub emc_util: Option<f32>,
}

impl Record for FastSample {
    const SIZE: usize = 98;

    fn encode(&self, buf: &mut Vec<u8>) {
        let mut e = Encoder::new(buf);
        e.f64(self.time_s);
        e.u16(self.gpu_load);
        for v in self.cpu_util {
            e.f32(v);
        }
        e.f32(self.cpu_aggregate);
        e.u64(self.ram_used_kb);
        e.u64(self.ram_available_kb);
        e.f32(self.emc_util.unwrap_or(EMC_UNAVAILABLE));
    }

    fn decode(data: &[u8]) -> Self {
        let mut d = Decoder::new(data);
        let time_s = d.f64();
        let gpu_load = d.u16();
        let cpu_util = std::array::from_fn(|_| d.f32());
        let cpu_aggregate = d.f32();
        let ram_used_kb = d.u64();
        let ram_available_kb = d.u64();
        let emc = d.f32();

        Self {
            time_s,
            gpu_load,
            cpu_util,
            cpu_aggregate,
            ram_used_kb,
            ram_available_kb,
            emc_util: (emc >= 0.0).then_some(emc),
        }
    }
}

/// Medium tier: power rails.
///
/// | offset | field      | type    |
/// |--------|------------|---------|
/// | 0      | time_s     | f64     |
/// | 8      | voltage_mv | u32 × 8 |
/// | 40     | current_ma | u32 × 8 |
/// | 72     | power_mw   | f32 × 8 |
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MediumSample {
    pub time_s: f64,
    pub voltage_mv: [u32; MAX_POWER_RAILS],
    pub current_ma: [u32; MAX_POWER_RAILS],
    pub power_mw: [f32; MAX_POWER_RAILS],
}

impl Record for MediumSample {
    const SIZE: usize = 104;

    fn encode(&self, buf: &mut Vec<u8>) {
        let mut e = Encoder::new(buf);
        e.f64(self.time_s);
        for v in self.voltage_mv {
            e.u32(v);
        }
        for v in self.current_ma {
            e.u32(v);
        }
        for v in self.power_mw {
            e.f32(v);
        }
    }

    fn decode(data: &[u8]) -> Self {
        let mut d = Decoder::new(data);
        let time_s = d.f64();
        let voltage_mv = std::array::from_fn(|_| d.u32());
        let current_ma = std::array::from_fn(|_| d.u32());
        let power_mw = std::array::from_fn(|_| d.f32());

        Self {
            time_s,
            voltage_mv,
            current_ma,
            power_mw,
        }
    }
}

/// Slow tier: thermal zones.
///
/// | offset | field  | type     |
/// |--------|--------|----------|
/// | 0      | time_s | f64      |
/// | 8      | temp_c | f32 × 16 |
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SlowSample {
    pub time_s: f64,
    pub temp_c: [f32; MAX_THERMAL_ZONES],
}

impl Record for SlowSample {
    const SIZE: usize = 72;

    fn encode(&self, buf: &mut Vec<u8>) {
        let mut e = Encoder::new(buf);
        e.f64(self.time_s);
        for v in self.temp_c {
            e.f32(v);
        }
    }

    fn decode(data: &[u8]) -> Self {
        let mut d = Decoder::new(data);
        let time_s = d.f64();
        let temp_c = std::array::from_fn(|_| d.f32());

        Self { time_s, temp_c }
    }
}

/// A caller-requested phase boundary on the fast tier's timeline.
///
/// The sample index is a snapshot of the fast tier's published count, so
/// the marker occurred no earlier than that many fast samples in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EpochMarker {
    /// Dense, starting at 1.
    pub id: u64,
    pub fast_sample_idx: u64,
}

impl Record for EpochMarker {
    const SIZE: usize = 16;

    fn encode(&self, buf: &mut Vec<u8>) {
        let mut e = Encoder::new(buf);
        e.u64(self.id);
        e.u64(self.fast_sample_idx);
    }

    fn decode(data: &[u8]) -> Self {
        let mut d = Decoder::new(data);

        Self {
            id: d.u64(),
            fast_sample_idx: d.u64(),
        }
    }
}
