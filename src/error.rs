//! Error types for the xsmtpapi crate.

use thiserror::Error;

pub type Result<T, E = HeaderError> = std::result::Result<T, E>;

/// Errors that can occur while working with a header document.
///
/// Mutation is infallible; only rendering the document can fail.
#[derive(Debug, Error)]
pub enum HeaderError {
    /// The header document could not be serialized to JSON.
    #[error("Failed to render X-SMTPAPI value: {0}")]
    Render(#[from] serde_json::Error),
}
