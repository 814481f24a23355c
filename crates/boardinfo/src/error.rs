use std::io;
use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("num_cpu_cores must be in 1..={max}, got {got}")]
    InvalidCoreCount { got: usize, max: usize },
    #[error("too many power rails: {got} (max {max})")]
    TooManyRails { got: usize, max: usize },
    #[error("too many thermal zones: {got} (max {max})")]
    TooManyZones { got: usize, max: usize },
    #[error("unknown board: {0}")]
    UnknownBoard(String),
    #[error("unrecognized board, compatible string: {0:?}")]
    UnrecognizedBoard(String),
    #[error("could not read {path:?}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn unreadable(source: io::Error, path: impl AsRef<Path>) -> Self {
        Self::Unreadable {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Returns true for errors raised by [`BoardDescriptor::validate`].
    ///
    /// [`BoardDescriptor::validate`]: crate::BoardDescriptor::validate
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidCoreCount { .. } | Self::TooManyRails { .. } | Self::TooManyZones { .. }
        )
    }
}
