use std::path::Path;

use super::records::{EpochMarker, FastSample, MediumSample, Record, SlowSample};
use super::{FileHeader, Trace, TraceError};

/// Read and validate a trace file.
pub fn read_trace(path: &Path) -> Result<Trace, TraceError> {
    let data = std::fs::read(path)?;
    Trace::decode(&data)
}

impl Trace {
    /// Decode a complete trace. The input must be exactly the size implied by
    /// the header counts.
    pub fn decode(data: &[u8]) -> Result<Self, TraceError> {
        let header = FileHeader::decode(data)?;

        let expected = header.file_size();
        let actual = data.len() as u64;
        if expected != actual {
            return Err(TraceError::SizeMismatch { expected, actual });
        }

        let body = &data[FileHeader::SIZE..];
        let (fast, body) = decode_records::<FastSample>(body, header.num_fast_samples);
        let (medium, body) = decode_records::<MediumSample>(body, header.num_medium_samples);
        let (slow, body) = decode_records::<SlowSample>(body, header.num_slow_samples);
        let (markers, _) = decode_records::<EpochMarker>(body, header.num_markers);

        Ok(Self {
            header,
            fast,
            medium,
            slow,
            markers,
        })
    }
}

fn decode_records<R: Record>(data: &[u8], count: u64) -> (Vec<R>, &[u8]) {
    let (records, rest) = data.split_at(count as usize * R::SIZE);
    let records = records.chunks_exact(R::SIZE).map(R::decode).collect();
    (records, rest)
}
