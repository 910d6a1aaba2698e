//! Export pipeline: acquisition orchestration and the caller-facing
//! facade that turns an [`ExportRequest`](camreport_models::ExportRequest)
//! into a finished document on disk.

pub mod config;
pub mod error;
pub mod facade;
pub mod orchestrator;
pub mod progress;
pub mod retry;

pub use config::ExportConfig;
pub use error::{ExportError, ExportResult};
pub use facade::{ExportTermination, Exporter};
pub use orchestrator::SnapshotSource;
pub use progress::{ProgressEvent, ProgressSender};
