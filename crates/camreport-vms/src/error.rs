//! VMS client error types.

use camreport_models::CaptureFailure;
use thiserror::Error;

/// Result type for VMS API operations.
pub type VmsResult<T> = Result<T, VmsError>;

/// Classified outcome of a failed VMS API call.
///
/// The client never lets an opaque transport error past its boundary;
/// every failure is normalized into one of these variants.
#[derive(Debug, Error)]
pub enum VmsError {
    #[error("authentication rejected by the server")]
    Auth,

    #[error("camera not found")]
    NotFound,

    #[error("no archive data at the requested time")]
    NoArchiveData,

    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("server error (HTTP {0})")]
    Server(u16),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl VmsError {
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// True for failures worth a bounded retry. Auth rejections and
    /// missing data are permanent for the request that hit them.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            VmsError::Timeout | VmsError::Network(_) | VmsError::Server(_)
        )
    }

    /// The user-visible failure reason recorded in a capture result.
    pub fn to_failure(&self) -> CaptureFailure {
        match self {
            VmsError::Auth => CaptureFailure::Auth,
            VmsError::NotFound => CaptureFailure::NotFound,
            VmsError::NoArchiveData => CaptureFailure::NoArchiveData,
            VmsError::Timeout => CaptureFailure::Timeout,
            VmsError::Network(msg) => CaptureFailure::Network(msg.clone()),
            VmsError::Server(status) => CaptureFailure::Server(*status),
            VmsError::InvalidResponse(msg) => CaptureFailure::InvalidResponse(msg.clone()),
        }
    }
}
