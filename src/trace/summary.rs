use serde::Serialize;

use super::Trace;

/// What one sampling tier captured.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TierSummary {
    pub samples: u64,
    pub configured_hz: u32,
    /// Seconds between the first and last sample.
    pub duration_s: f64,
    /// Achieved sample rate, or `None` with fewer than two samples.
    pub observed_hz: Option<f64>,
}

impl TierSummary {
    fn new(times: impl ExactSizeIterator<Item = f64> + Clone, configured_hz: u32) -> Self {
        let samples = times.len() as u64;
        let first = times.clone().next();
        let last = times.last();

        let duration_s = match (first, last) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        };

        let observed_hz =
            (samples > 1 && duration_s > 0.0).then(|| (samples - 1) as f64 / duration_s);

        Self {
            samples,
            configured_hz,
            duration_s,
            observed_hz,
        }
    }
}

/// A human-oriented digest of a trace, printed by `tierscope inspect`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TraceSummary {
    pub board: String,
    pub cpu_cores: u8,
    pub power_rails: Vec<String>,
    pub thermal_zones: Vec<String>,
    pub emc_available: bool,
    pub fast: TierSummary,
    pub medium: TierSummary,
    pub slow: TierSummary,
    pub markers: u64,
    pub mean_cpu_util: Option<f32>,
    pub peak_gpu_load: Option<u16>,
}

impl TraceSummary {
    pub fn new(trace: &Trace) -> Self {
        let header = &trace.header;

        let mean_cpu_util = (!trace.fast.is_empty()).then(|| {
            trace.fast.iter().map(|s| s.cpu_aggregate).sum::<f32>() / trace.fast.len() as f32
        });

        Self {
            board: header.board_name.clone(),
            cpu_cores: header.num_cpu_cores,
            power_rails: header.power_rail_names.clone(),
            thermal_zones: header.thermal_zone_names.clone(),
            emc_available: header.emc_available,
            fast: TierSummary::new(trace.fast.iter().map(|s| s.time_s), header.fast_hz),
            medium: TierSummary::new(trace.medium.iter().map(|s| s.time_s), header.medium_hz),
            slow: TierSummary::new(trace.slow.iter().map(|s| s.time_s), header.slow_hz),
            markers: trace.markers.len() as u64,
            mean_cpu_util,
            peak_gpu_load: trace.fast.iter().map(|s| s.gpu_load).max(),
        }
    }
}

impl std::fmt::Display for TraceSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "board:          {}", self.board)?;
        writeln!(f, "cpu cores:      {}", self.cpu_cores)?;
        writeln!(f, "power rails:    {}", self.power_rails.join(", "))?;
        writeln!(f, "thermal zones:  {}", self.thermal_zones.join(", "))?;
        writeln!(f, "emc available:  {}", self.emc_available)?;

        for (name, tier) in [("fast", &self.fast), ("medium", &self.medium), ("slow", &self.slow)] {
            write!(
                f,
                "{name:<6} tier:    {} samples over {:.3}s ({} Hz configured",
                tier.samples, tier.duration_s, tier.configured_hz
            )?;
            match tier.observed_hz {
                Some(hz) => writeln!(f, ", {hz:.1} Hz observed)")?,
                None => writeln!(f, ")")?,
            }
        }

        writeln!(f, "markers:        {}", self.markers)?;

        if let Some(util) = self.mean_cpu_util {
            writeln!(f, "mean cpu util:  {util:.1}%")?;
        }
        if let Some(load) = self.peak_gpu_load {
            writeln!(f, "peak gpu load:  {:.1}%", load as f32 / 10.0)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::{EpochMarker, FastSample, FileHeader, MediumSample};

    fn sample(time_s: f64, cpu: f32, gpu: u16) -> FastSample {
        FastSample {
            time_s,
            gpu_load: gpu,
            cpu_aggregate: cpu,
            ..Default::default()
        }
    }

    #[test]
    fn observed_rate() {
        let header = FileHeader {
            fast_hz: 1000,
            medium_hz: 100,
            slow_hz: 10,
            ..Default::default()
        };
        let fast = (0..11).map(|i| sample(i as f64 * 0.001, 10.0, i as u16)).collect();
        let medium = vec![MediumSample::default()];
        let markers = vec![EpochMarker {
            id: 1,
            fast_sample_idx: 0,
        }];

        let summary = Trace::new(header, fast, medium, Vec::new(), markers).summary();

        assert_eq!(summary.fast.samples, 11);
        assert!((summary.fast.duration_s - 0.010).abs() < 1e-9);
        assert!((summary.fast.observed_hz.unwrap() - 1000.0).abs() < 1e-6);
        assert_eq!(summary.medium.samples, 1);
        assert_eq!(summary.medium.observed_hz, None);
        assert_eq!(summary.slow.samples, 0);
        assert_eq!(summary.slow.duration_s, 0.0);
        assert_eq!(summary.markers, 1);
        assert_eq!(summary.mean_cpu_util, Some(10.0));
        assert_eq!(summary.peak_gpu_load, Some(10));
    }

    #[test]
    fn empty_trace() {
        let summary = Trace::new(
            FileHeader::default(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
        )
        .summary();

        assert_eq!(summary.mean_cpu_util, None);
        assert_eq!(summary.peak_gpu_load, None);
        assert!(summary.to_string().contains("0 samples"));
    }
}
