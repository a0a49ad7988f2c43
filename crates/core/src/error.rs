use thiserror::Error;

use crate::selector::Selector;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the traversal engine
#[derive(Debug, Error)]
pub enum Error {
    /// A bounded readiness poll expired before the selector matched
    ///
    /// Distinguishes a page that never became ready from a page with
    /// nothing pending. Carries the selector polled and the wall time
    /// spent waiting.
    #[error("timed out after {waited_ms}ms waiting for: {selector}")]
    ReadinessTimeout { selector: Selector, waited_ms: u64 },

    /// Navigation failed at the driver level
    #[error("navigation failed: {url}")]
    Navigation {
        url: String,
        #[source]
        source: anyhow::Error,
    },

    /// Any other driver or session failure
    #[error("driver call failed")]
    Driver(#[source] anyhow::Error),
}

impl Error {
    /// Wrap a foreign driver error
    pub fn driver(err: impl Into<anyhow::Error>) -> Self {
        Error::Driver(err.into())
    }

    /// Returns true if this is a readiness poll expiry
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::ReadinessTimeout { .. })
    }
}
