use std::path::Path;

use crate::{Error, Result};

pub(crate) fn read_string(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();

    let raw = std::fs::read_to_string(path).map_err(|e| Error::unreadable(e, path))?;

    Ok(raw)
}

pub(crate) fn is_readable(path: impl AsRef<Path>) -> bool {
    std::fs::File::open(path).is_ok()
}

/// Counts the per-core lines (`cpuN ...`) in a `/proc/stat` style file.
pub(crate) fn count_cpu_cores(path: impl AsRef<Path>) -> Result<usize> {
    let raw = read_string(path)?;

    Ok(parse_cpu_count(&raw))
}

fn parse_cpu_count(raw: &str) -> usize {
    raw.lines()
        .filter(|line| {
            line.strip_prefix("cpu")
                .and_then(|rest| rest.chars().next())
                .map(|c| c.is_ascii_digit())
                .unwrap_or(false)
        })
        .count()
}

/// Splits the NUL-separated device tree `compatible` property.
pub(crate) fn compatible_ids(raw: &str) -> impl Iterator<Item = &str> {
    raw.split('\0').map(str::trim).filter(|s| !s.is_empty())
}
