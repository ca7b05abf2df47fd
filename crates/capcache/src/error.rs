use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading, writing or refreshing the cache.
///
/// Note: loading never fails because the file is missing or malformed. Those
/// cases produce an empty or partial store instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Cache path has no parent directory to place a temporary file in
    #[error("cache path has no parent directory: {0}")]
    NoParent(PathBuf),

    /// Creating the cache directory failed
    #[error("failed to create cache directory {path}: {source}")]
    CreateDir {
        /// Directory that could not be created
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Writing or renaming the temporary file failed
    #[error("failed to write cache file {path}: {source}")]
    Write {
        /// Final cache path
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Reading an existing cache file failed
    #[error("failed to read cache file {path}: {source}")]
    Read {
        /// Cache path
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// The capacity source failed for one remote
    #[error("capacity query failed for {remote}: {message}")]
    Source {
        /// Remote that was queried
        remote: String,
        /// Error reported by the source
        message: String,
    },
}

impl Error {
    /// Returns true if the error came from the filesystem rather than the source.
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            Error::CreateDir { .. } | Error::Write { .. } | Error::Read { .. } | Error::NoParent(_)
        )
    }
}

/// Result type for cache operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let write = Error::Write {
            path: PathBuf::from("/cache"),
            source: std::io::Error::other("disk full"),
        };
        assert!(write.is_io());

        let source = Error::Source {
            remote: "gdrive".to_string(),
            message: "timeout".to_string(),
        };
        assert!(!source.is_io());
        assert_eq!(
            source.to_string(),
            "capacity query failed for gdrive: timeout"
        );
    }
}
