//! Crate-wide error taxonomy.

use thiserror::Error;

/// Boxed error carried by [`Error::Unexpected`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced to callers of the marshalling, waiting, and input layers.
#[derive(Debug, Error)]
pub enum Error {
    /// An action run on the dispatch thread returned an error or panicked.
    /// The original failure is rethrown on the calling thread wrapped in this
    /// variant.
    #[error("unexpected error: {source}")]
    Unexpected {
        #[source]
        source: BoxError,
    },

    /// A wait loop gave up before its condition was satisfied. Carries the
    /// condition's description so the caller can tell which wait expired.
    #[error("timed out waiting for {description}")]
    WaitTimedOut { description: String },

    /// A simulated user action could not be performed, e.g. dropping when no
    /// drag is in effect or invoking an accessible action on a component that
    /// exposes none.
    #[error("{reason}")]
    ActionFailed { reason: String },
}

impl Error {
    #[must_use]
    pub fn unexpected(source: impl Into<BoxError>) -> Self {
        Self::Unexpected {
            source: source.into(),
        }
    }

    #[must_use]
    pub fn wait_timed_out(description: impl Into<String>) -> Self {
        Self::WaitTimedOut {
            description: description.into(),
        }
    }

    #[must_use]
    pub fn action_failed(reason: impl Into<String>) -> Self {
        Self::ActionFailed {
            reason: reason.into(),
        }
    }

    /// True when the error is a wait timeout, regardless of which wait
    /// produced it.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::WaitTimedOut { .. })
    }
}
