use super::*;

use crate::engine::TierKind;
use crate::Error;

/// Highest accepted rate for any tier.
pub const MAX_RATE_HZ: u32 = 10_000;

/// Per-tier sampling rates and the fast tier's warmup length.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SamplingConfig {
    #[serde(default = "fast_hz")]
    pub fast_hz: u32,
    #[serde(default = "medium_hz")]
    pub medium_hz: u32,
    #[serde(default = "slow_hz")]
    pub slow_hz: u32,
    /// Fast tier iterations run before the session is live.
    #[serde(default = "warmup_samples")]
    pub warmup_samples: u32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            fast_hz: fast_hz(),
            medium_hz: medium_hz(),
            slow_hz: slow_hz(),
            warmup_samples: warmup_samples(),
        }
    }
}

impl SamplingConfig {
    pub fn check(&self) -> crate::Result<()> {
        for tier in TierKind::ALL {
            let hz = self.rate(tier);
            if !(1..=MAX_RATE_HZ).contains(&hz) {
                return Err(Error::InvalidRate {
                    tier,
                    hz,
                    max: MAX_RATE_HZ,
                });
            }
        }

        if self.warmup_samples == 0 {
            return Err(Error::InvalidWarmup);
        }

        Ok(())
    }

    pub fn rate(&self, tier: TierKind) -> u32 {
        match tier {
            TierKind::Fast => self.fast_hz,
            TierKind::Medium => self.medium_hz,
            TierKind::Slow => self.slow_hz,
        }
    }
}

fn fast_hz() -> u32 {
    1000
}

fn medium_hz() -> u32 {
    100
}

fn slow_hz() -> u32 {
    10
}

fn warmup_samples() -> u32 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SamplingConfig::default();
        assert_eq!(config.rate(TierKind::Fast), 1000);
        assert_eq!(config.rate(TierKind::Medium), 100);
        assert_eq!(config.rate(TierKind::Slow), 10);
        assert_eq!(config.warmup_samples, 10);
        assert!(config.check().is_ok());
    }

    #[test]
    fn rejects_bad_rates() {
        let config = SamplingConfig {
            medium_hz: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.check(),
            Err(Error::InvalidRate {
                tier: TierKind::Medium,
                hz: 0,
                ..
            })
        ));

        let config = SamplingConfig {
            fast_hz: MAX_RATE_HZ + 1,
            ..Default::default()
        };
        assert!(matches!(
            config.check(),
            Err(Error::InvalidRate {
                tier: TierKind::Fast,
                ..
            })
        ));

        let config = SamplingConfig {
            warmup_samples: 0,
            ..Default::default()
        };
        assert!(matches!(config.check(), Err(Error::InvalidWarmup)));
    }
}
