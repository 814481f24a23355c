use boardinfo::MAX_CPU_CORES;

use super::Source;

// field positions within a `/proc/stat` cpu line, after the `cpuN` header
const CPU_IDLE_FIELD_INDEX: usize = 3;
const CPU_IO_WAIT_FIELD_INDEX: usize = 4;

// user, nice, system, idle, iowait, irq, softirq, steal. guest and
// guest_nice are already accounted within user and nice.
const CPU_TOTAL_FIELDS: usize = 8;

/// Cumulative jiffies for one core.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Jiffies {
    pub total: u64,
    pub idle: u64,
}

impl Jiffies {
    fn from_fields<'a>(fields: impl Iterator<Item = &'a str>) -> Self {
        let mut jiffies = Self::default();

        for (field, value) in fields.take(CPU_TOTAL_FIELDS).enumerate() {
            let value = value.parse::<u64>().unwrap_or(0);

            jiffies.total = jiffies.total.wrapping_add(value);

            if field == CPU_IDLE_FIELD_INDEX || field == CPU_IO_WAIT_FIELD_INDEX {
                jiffies.idle = jiffies.idle.wrapping_add(value);
            }
        }

        jiffies
    }

    /// Busy percentage over the span since `prev`, within `[0, 100]`.
    /// Counters that did not advance, or went backwards, yield zero.
    fn utilization_since(&self, prev: &Jiffies) -> f32 {
        let total = self.total.saturating_sub(prev.total);

        if total == 0 {
            return 0.0;
        }

        let idle = self.idle.saturating_sub(prev.idle).min(total);

        (100.0 * (total - idle) as f32 / total as f32).clamp(0.0, 100.0)
    }
}

/// Per-core and aggregate utilization for one sample.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CpuUsage {
    pub per_core: [f32; MAX_CPU_CORES],
    pub aggregate: f32,
}

fn core_fields(line: &str) -> Option<std::str::SplitWhitespace<'_>> {
    let mut parts = line.split_whitespace();

    let header = parts.next()?;
    header.strip_prefix("cpu")?.parse::<usize>().ok()?;

    Some(parts)
}

/// Derive utilization from a `/proc/stat` snapshot.
///
/// Core lines are consumed in order for up to `prev.len()` cores; `prev`
/// holds the previous cumulative counters per core and is updated in place.
/// The aggregate is the mean over the cores actually parsed rather than the
/// kernel's own `cpu` line, so it always agrees with the per-core values.
pub fn parse_proc_stat(data: &str, prev: &mut [Jiffies]) -> CpuUsage {
    let mut usage = CpuUsage::default();

    let cores = data
        .lines()
        .skip_while(|line| line.split_whitespace().next() == Some("cpu"))
        .map_while(core_fields);

    let mut parsed = 0;
    let mut sum = 0.0;

    for (core, (fields, prev)) in cores.zip(prev.iter_mut()).take(MAX_CPU_CORES).enumerate() {
        let current = Jiffies::from_fields(fields);
        let util = current.utilization_since(prev);
        *prev = current;

        usage.per_core[core] = util;
        sum += util;
        parsed += 1;
    }

    if parsed > 0 {
        usage.aggregate = (sum / parsed as f32).clamp(0.0, 100.0);
    }

    usage
}

/// Stateful CPU utilization reader over a `/proc/stat` source.
///
/// The first read after construction is measured against zeroed counters and
/// is therefore meaningless; the fast tier's warmup absorbs it.
pub struct CpuReader {
    source: Source,
    prev: Vec<Jiffies>,
}

impl CpuReader {
    pub fn new(source: Source, cores: usize) -> Self {
        Self {
            source,
            prev: vec![Jiffies::default(); cores.min(MAX_CPU_CORES)],
        }
    }

    pub fn read(&mut self) -> CpuUsage {
        match self.source.read() {
            Some(data) => parse_proc_stat(data, &mut self.prev),
            None => CpuUsage::default(),
        }
    }
}
