// Error taxonomy for clustering requests.
//
// Empty input and degenerate clusterings are valid outcomes, not errors.
// Only bad configuration and internal faults surface here.

use thiserror::Error;

/// Errors returned by the clustering pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// An option value is unknown, out of range, or incompatible with another
    /// option. Always reported before any document is processed.
    #[error("invalid configuration option {option}: {message}")]
    Configuration {
        /// Option name, as spelled in the configuration table.
        option: &'static str,
        /// Human-readable explanation.
        message: String,
    },

    /// An unexpected internal fault. The request is aborted with no partial output.
    #[error("clustering failed: {0}")]
    Processing(String),
}

impl Error {
    pub(crate) fn config(option: &'static str, message: impl Into<String>) -> Self {
        Error::Configuration {
            option,
            message: message.into(),
        }
    }
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
