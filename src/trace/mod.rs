//! The binary trace container.
//!
//! File layout, little-endian, no padding:
//!
//! ```text
//! [FileHeader] [FastSample × n] [MediumSample × n] [SlowSample × n] [EpochMarker × n]
//! ```
//!
//! Every field is encoded explicitly at a fixed offset, so the layout never
//! depends on how the compiler lays out the in-memory types. A file whose
//! size differs from the size implied by its header counts is truncated or
//! corrupt.

mod codec;
mod header;
mod reader;
mod records;
mod summary;
mod writer;

pub use header::FileHeader;
pub use reader::read_trace;
pub use records::{EpochMarker, FastSample, MediumSample, Record, SlowSample};
pub use summary::{TierSummary, TraceSummary};

use std::io;

/// "NVMT"
pub const MAGIC: u32 = 0x4E56_4D54;
pub const VERSION: u32 = 1;

/// On-disk encoding of an unavailable memory controller reading.
pub const EMC_UNAVAILABLE: f32 = -1.0;

#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("file too small: {0} bytes")]
    TooShort(usize),
    #[error("invalid magic: {0:#010x}")]
    InvalidMagic(u32),
    #[error("unsupported version: {0}")]
    UnsupportedVersion(u32),
    #[error("header declares {field} = {value} (max {max})")]
    InvalidCount {
        field: &'static str,
        value: u64,
        max: u64,
    },
    #[error("file size mismatch: expected {expected} bytes, found {actual}")]
    SizeMismatch { expected: u64, actual: u64 },
    #[error("invalid UTF-8 in {0}")]
    InvalidUtf8(&'static str),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// The complete contents of one recording session.
#[derive(Clone, Debug, PartialEq)]
pub struct Trace {
    pub header: FileHeader,
    pub fast: Vec<FastSample>,
    pub medium: Vec<MediumSample>,
    pub slow: Vec<SlowSample>,
    pub markers: Vec<EpochMarker>,
}

impl Trace {
    /// Assemble a trace, setting the header's record counts from the buffers.
    pub fn new(
        mut header: FileHeader,
        fast: Vec<FastSample>,
        medium: Vec<MediumSample>,
        slow: Vec<SlowSample>,
        markers: Vec<EpochMarker>,
    ) -> Self {
        header.num_fast_samples = fast.len() as u64;
        header.num_medium_samples = medium.len() as u64;
        header.num_slow_samples = slow.len() as u64;
        header.num_markers = markers.len() as u64;

        Self {
            header,
            fast,
            medium,
            slow,
            markers,
        }
    }

    /// The marker id in effect at each fast sample: the id of the latest
    /// marker whose sample index is at or before the sample, or 0 before the
    /// first marker.
    pub fn marker_ids(&self) -> Vec<u64> {
        let mut ids = vec![0; self.fast.len()];

        for marker in &self.markers {
            let start = marker.fast_sample_idx as usize;
            if let Some(tail) = ids.get_mut(start..) {
                tail.fill(marker.id);
            }
        }

        ids
    }

    pub fn summary(&self) -> TraceSummary {
        TraceSummary::new(self)
    }
}
