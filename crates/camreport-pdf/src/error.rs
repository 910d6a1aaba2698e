//! Report assembly error types.

use thiserror::Error;

/// Result type for report assembly.
pub type ReportResult<T> = Result<T, ReportError>;

/// Errors that abort report assembly.
///
/// Per-capture failures are not errors here; they render as placeholders.
/// These variants cover conditions the assembler cannot work around.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("logo image could not be decoded: {0}")]
    Logo(String),

    #[error("image processing failed: {0}")]
    Image(String),
}

impl ReportError {
    pub fn logo(msg: impl Into<String>) -> Self {
        Self::Logo(msg.into())
    }

    pub fn image(msg: impl Into<String>) -> Self {
        Self::Image(msg.into())
    }
}
