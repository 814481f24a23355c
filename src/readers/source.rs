use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use crate::debug;

/// A data source opened once per session and re-read from the start on every
/// sample, keeping the open and path lookup off the sampling path.
pub struct Source {
    file: Option<File>,
    data: String,
}

impl Source {
    /// Open `path` for reading. A missing path, or one that cannot be opened,
    /// produces an unavailable source whose reads always yield `None`.
    pub fn open(path: Option<&Path>) -> Self {
        let file = path.and_then(|path| match File::open(path) {
            Ok(file) => Some(file),
            Err(e) => {
                debug!("source unavailable: {path:?}: {e}");
                None
            }
        });

        Self {
            file,
            data: String::new(),
        }
    }

    pub fn unavailable() -> Self {
        Self::open(None)
    }

    pub fn is_available(&self) -> bool {
        self.file.is_some()
    }

    /// Re-read the full contents. Returns `None` if the source is unavailable,
    /// the read fails, or nothing was read.
    pub fn read(&mut self) -> Option<&str> {
        let file = self.file.as_mut()?;

        file.rewind().ok()?;

        self.data.clear();

        file.read_to_string(&mut self.data).ok()?;

        if self.data.is_empty() {
            None
        } else {
            Some(self.data.as_str())
        }
    }

    /// Read the source as a single integer, as sysfs attributes are.
    pub fn read_int(&mut self) -> Option<i64> {
        self.read().and_then(|raw| raw.trim().parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    #[test]
    fn rereads_from_start() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("load");
        fs::write(&path, "512\n").unwrap();

        let mut source = Source::open(Some(&path));
        assert!(source.is_available());
        assert_eq!(source.read_int(), Some(512));

        fs::write(&path, "700\n").unwrap();
        assert_eq!(source.read_int(), Some(700));
        assert_eq!(source.read_int(), Some(700));
    }

    #[test]
    fn missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = Source::open(Some(&dir.path().join("missing")));
        assert!(!source.is_available());
        assert_eq!(source.read(), None);

        let mut source = Source::unavailable();
        assert_eq!(source.read_int(), None);
    }

    #[test]
    fn garbled_and_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbled");
        fs::write(&path, "n/a\n").unwrap();
        assert_eq!(Source::open(Some(&path)).read_int(), None);

        fs::write(&path, "").unwrap();
        assert_eq!(Source::open(Some(&path)).read(), None);
    }
}
