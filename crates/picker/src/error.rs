use thiserror::Error;

/// Errors that can occur while presenting a picker.
///
/// A user backing out of a menu is not an error; see [`crate::Pick::Cancelled`].
#[derive(Debug, Error)]
pub enum Error {
    /// Nothing to choose from
    #[error("no items to choose from")]
    NoItems,

    /// The backend program could not be started
    #[error("failed to start {program}: {source}")]
    Spawn {
        /// Program name (fzf, gum)
        program: &'static str,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// The backend program failed for a reason other than cancellation
    #[error("{program} exited with status {code}")]
    Backend {
        /// Program name (fzf, gum)
        program: &'static str,
        /// Exit code, -1 when killed by a signal
        code: i32,
    },

    /// The backend returned text that matches none of the items
    #[error("selection does not match any menu entry: {0:?}")]
    UnknownSelection(String),

    /// Terminal IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns true for errors that indicate a bug rather than an environment
    /// problem.
    pub fn is_internal(&self) -> bool {
        matches!(self, Error::NoItems | Error::UnknownSelection(_))
    }
}

/// Result type for picker operations
pub type Result<T> = std::result::Result<T, Error>;
