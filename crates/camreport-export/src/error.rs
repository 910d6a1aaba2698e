//! Export-level error types.
//!
//! Per-camera capture failures are not represented here; they travel in
//! the outcome's status list. These variants are the conditions that
//! abort a whole export.

use thiserror::Error;

use camreport_models::RequestError;
use camreport_pdf::ReportError;
use camreport_vms::VmsError;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("invalid export request: {0}")]
    InvalidRequest(#[from] RequestError),

    /// The pre-export connection probe failed; with bad credentials or an
    /// unreachable server no camera could succeed.
    #[error("server connection failed: {0}")]
    Connection(#[source] VmsError),

    #[error("report assembly failed: {0}")]
    Assembly(#[from] ReportError),

    #[error("failed to write document: {0}")]
    Io(#[from] std::io::Error),
}
