use boardinfo::{BoardDescriptor, MAX_POWER_RAILS, MAX_THERMAL_ZONES};

use std::fmt;
use std::sync::Arc;
use std::thread::JoinHandle;

use super::state::SharedState;
use crate::common::{Instant, Interval};
use crate::readers::{
    emc_util, gpu_load, parse_meminfo, rail_reading, temperature_c, CpuReader, Source,
};
use crate::trace::{FastSample, MediumSample, Record, SlowSample};
use crate::debug;

// buffers start with room for this many seconds of samples
const PREALLOCATE_SECONDS: usize = 10;

/// One of the three independently scheduled sampling rates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TierKind {
    Fast,
    Medium,
    Slow,
}

impl TierKind {
    pub const ALL: [TierKind; 3] = [TierKind::Fast, TierKind::Medium, TierKind::Slow];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Medium => "medium",
            Self::Slow => "slow",
        }
    }

    fn thread_name(&self) -> String {
        format!("tierscope-{}", self.as_str())
    }
}

impl fmt::Display for TierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The readers owned by one tier's thread.
pub(crate) trait Tier: Send + 'static {
    const KIND: TierKind;

    type Record: Record + Send + 'static;

    /// Read every source of this tier once.
    fn sample(&mut self, time_s: f64) -> Self::Record;
}

pub(crate) struct FastTier {
    gpu: Source,
    cpu: CpuReader,
    meminfo: Source,
    emc: Source,
}

impl FastTier {
    pub fn open(board: &BoardDescriptor) -> Self {
        Self {
            gpu: Source::open(board.gpu_load.as_deref()),
            cpu: CpuReader::new(Source::open(Some(&board.proc_stat)), board.num_cpu_cores),
            meminfo: Source::open(Some(&board.meminfo)),
            emc: Source::open(board.emc_util.as_deref()),
        }
    }

    pub fn emc_available(&self) -> bool {
        self.emc.is_available()
    }
}

impl Tier for FastTier {
    const KIND: TierKind = TierKind::Fast;

    type Record = FastSample;

    fn sample(&mut self, time_s: f64) -> FastSample {
        let gpu_load = gpu_load(self.gpu.read_int());
        let cpu = self.cpu.read();
        let memory = self.meminfo.read().map(parse_meminfo).unwrap_or_default();
        let emc_util = emc_util(self.emc.read_int());

        FastSample {
            time_s,
            gpu_load,
            cpu_util: cpu.per_core,
            cpu_aggregate: cpu.aggregate,
            ram_used_kb: memory.used_kb,
            ram_available_kb: memory.available_kb,
            emc_util,
        }
    }
}

pub(crate) struct MediumTier {
    rails: Vec<(Source, Source)>,
}

impl MediumTier {
    pub fn open(board: &BoardDescriptor) -> Self {
        let rails = board
            .power_rails
            .iter()
            .take(MAX_POWER_RAILS)
            .map(|rail| {
                (
                    Source::open(Some(&rail.voltage)),
                    Source::open(Some(&rail.current)),
                )
            })
            .collect();

        Self { rails }
    }
}

impl Tier for MediumTier {
    const KIND: TierKind = TierKind::Medium;

    type Record = MediumSample;

    fn sample(&mut self, time_s: f64) -> MediumSample {
        let mut sample = MediumSample {
            time_s,
            ..Default::default()
        };

        for (i, (voltage, current)) in self.rails.iter_mut().enumerate() {
            let reading = rail_reading(voltage.read_int(), current.read_int());
            sample.voltage_mv[i] = reading.voltage_mv;
            sample.current_ma[i] = reading.current_ma;
            sample.power_mw[i] = reading.power_mw;
        }

        sample
    }
}

pub(crate) struct SlowTier {
    zones: Vec<Source>,
}

impl SlowTier {
    pub fn open(board: &BoardDescriptor) -> Self {
        let zones = board
            .thermal_zones
            .iter()
            .take(MAX_THERMAL_ZONES)
            .map(|zone| Source::open(Some(&zone.temperature)))
            .collect();

        Self { zones }
    }
}

impl Tier for SlowTier {
    const KIND: TierKind = TierKind::Slow;

    type Record = SlowSample;

    fn sample(&mut self, time_s: f64) -> SlowSample {
        let mut sample = SlowSample {
            time_s,
            ..Default::default()
        };

        for (i, zone) in self.zones.iter_mut().enumerate() {
            sample.temp_c[i] = temperature_c(zone.read_int());
        }

        sample
    }
}

/// What a tier thread hands back when it exits.
pub(crate) struct TierOutput<R> {
    pub records: Vec<R>,
    /// Cycles whose work ran past the next wake target.
    pub overruns: u64,
}

/// Per-session parameters for one tier thread.
#[derive(Clone)]
pub(crate) struct TierContext {
    pub state: Arc<SharedState>,
    /// Timestamps are seconds since this instant.
    pub epoch: Instant,
    pub hz: u32,
    pub warmup_samples: u32,
}

pub(crate) fn spawn<T: Tier>(
    tier: T,
    context: TierContext,
) -> std::io::Result<JoinHandle<TierOutput<T::Record>>> {
    std::thread::Builder::new()
        .name(T::KIND.thread_name())
        .spawn(move || run(tier, context))
}

fn run<T: Tier>(mut tier: T, context: TierContext) -> TierOutput<T::Record> {
    let _halt = HaltOnPanic(&context.state);

    let period = Interval::period_for(context.hz);
    let mut records = Vec::with_capacity(context.hz as usize * PREALLOCATE_SECONDS);

    if T::KIND == TierKind::Fast {
        // prime the cumulative counters on a relative sleep, then release the
        // other tiers
        for _ in 0..context.warmup_samples {
            if !context.state.is_running() {
                break;
            }
            sample_into(&mut tier, &context, &mut records);
            std::thread::sleep(period);
        }

        context.state.finish_warmup();
        debug!("warmup complete after {} samples", records.len());
    } else {
        context.state.wait_for_warmup();
    }

    // a fresh anchor, so warmup timing is not inherited
    let mut interval = Interval::new(period);

    while context.state.is_running() {
        sample_into(&mut tier, &context, &mut records);
        interval.wait();
    }

    TierOutput {
        records,
        overruns: interval.overruns(),
    }
}

fn sample_into<T: Tier>(tier: &mut T, context: &TierContext, records: &mut Vec<T::Record>) {
    let time_s = context.epoch.elapsed().as_secs_f64();
    records.push(tier.sample(time_s));

    if T::KIND == TierKind::Fast {
        context.state.record_fast_sample();
    }
}

/// Halts the session if a tier thread unwinds, so that the other tiers and
/// any warmup waiters are not left blocked on it.
struct HaltOnPanic<'a>(&'a SharedState);

impl Drop for HaltOnPanic<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.0.halt();
        }
    }
}
