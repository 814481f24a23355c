use std::path::PathBuf;

use crate::engine::TierKind;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid board descriptor: {0}")]
    InvalidBoard(#[from] boardinfo::Error),
    #[error("{tier} tier rate {hz} Hz is outside 1..={max} Hz")]
    InvalidRate { tier: TierKind, hz: u32, max: u32 },
    #[error("warmup must be at least one sample")]
    InvalidWarmup,
    #[error("engine is already running")]
    AlreadyRunning,
    #[error("failed to spawn {tier} sampler thread: {source}")]
    Spawn {
        tier: TierKind,
        source: std::io::Error,
    },
    #[error("{tier} sampler thread panicked; the session was discarded")]
    SamplerPanicked { tier: TierKind },
    #[error("failed to write trace to {}: {source}", path.display())]
    Finalize {
        path: PathBuf,
        source: std::io::Error,
    },
}
