//! Error types for the scan and fix pipeline
//!
//! Per-instance problems inside a check and per-fix problems inside the fix
//! engine are handled by skipping, not by surfacing an error. The variants
//! here cover the cases a caller can actually act on: bad input, a failed
//! URL pipeline, or a malformed configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    /// URL could not be parsed or has no http(s) scheme
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// One URL's fetch pipeline failed; siblings are unaffected
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// One URL's fetch pipeline exceeded its deadline
    #[error("timed out fetching {url} after {secs}s")]
    Timeout { url: String, secs: u64 },

    /// A fix request referenced an issue type this engine does not know
    #[error("unknown issue type: {0}")]
    UnknownIssueType(String),

    /// Configuration file was present but unusable
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
