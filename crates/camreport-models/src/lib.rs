//! Shared data models for the camreport exporter.
//!
//! This crate provides Serde-serializable types for:
//! - Server sessions and camera references
//! - Capture requests, outcomes and resolutions
//! - Project metadata and export requests
//! - Archive timestamp wire formatting

pub mod camera;
pub mod capture;
pub mod export;
pub mod project;
pub mod session;
pub mod timestamp;

// Re-export common types
pub use camera::{CameraRef, VideoSourceId};
pub use capture::{CaptureFailure, CaptureKind, CaptureOutcome, CaptureRequest, CaptureResult, Resolution};
pub use export::{ExportOutcome, ExportRequest, RequestError};
pub use project::ProjectMetadata;
pub use session::Session;
pub use timestamp::format_archive_timestamp;
