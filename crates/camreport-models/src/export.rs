//! Export request and outcome.

use std::collections::HashSet;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::CameraRef;
use crate::capture::{CaptureResult, Resolution};
use crate::project::ProjectMetadata;
use crate::session::Session;

/// Validation errors for an [`ExportRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("camera list is empty")]
    EmptyCameraList,
    #[error("camera '{0}' selected more than once")]
    DuplicateCamera(String),
    #[error("archive capture enabled but no timestamp given")]
    MissingArchiveTimestamp,
    #[error("output path is empty")]
    EmptyOutputPath,
}

/// The unit of work for one full export.
///
/// Camera order is the user's selection order and is preserved through to
/// the final document. Live captures are always taken; archive captures
/// are optional and share one timestamp across all cameras.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRequest {
    pub session: Session,
    /// Ordered set of cameras, no duplicates.
    pub cameras: Vec<CameraRef>,
    pub resolution: Resolution,
    /// Also capture an archive snapshot per camera.
    pub include_archive: bool,
    /// Shared UTC instant for all archive captures.
    pub archive_timestamp: Option<DateTime<Utc>>,
    pub metadata: ProjectMetadata,
    /// Where the finished document is written.
    pub output_path: PathBuf,
}

impl ExportRequest {
    /// Check the request before any network call is made.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.cameras.is_empty() {
            return Err(RequestError::EmptyCameraList);
        }

        let mut seen = HashSet::new();
        for camera in &self.cameras {
            if !seen.insert(&camera.id) {
                return Err(RequestError::DuplicateCamera(camera.id.to_string()));
            }
        }

        if self.include_archive && self.archive_timestamp.is_none() {
            return Err(RequestError::MissingArchiveTimestamp);
        }

        if self.output_path.as_os_str().is_empty() {
            return Err(RequestError::EmptyOutputPath);
        }

        Ok(())
    }

    /// Number of captures this request will attempt.
    pub fn capture_count(&self) -> usize {
        let per_camera = if self.include_archive { 2 } else { 1 };
        self.cameras.len() * per_camera
    }
}

/// Terminal result of a completed export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportOutcome {
    /// Path of the written document.
    pub document_path: PathBuf,
    /// One entry per requested capture, in camera order (live before
    /// archive for each camera). Failed captures are present here, not
    /// export-level errors.
    pub results: Vec<CaptureResult>,
}

impl ExportOutcome {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    /// One-line summary for user feedback.
    pub fn summary(&self) -> String {
        format!(
            "document produced, {} of {} captures succeeded",
            self.succeeded(),
            self.results.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn request() -> ExportRequest {
        ExportRequest {
            session: Session::new("10.0.0.5", 80, "root", "root"),
            cameras: vec![
                CameraRef::new("S/DeviceIpint.1/SourceEndpoint.video:0:0", "Gate"),
                CameraRef::new("S/DeviceIpint.2/SourceEndpoint.video:0:0", "Lobby"),
            ],
            resolution: Resolution::FullHd,
            include_archive: false,
            archive_timestamp: None,
            metadata: ProjectMetadata::default(),
            output_path: PathBuf::from("/tmp/report.pdf"),
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_empty_camera_list_rejected() {
        let mut req = request();
        req.cameras.clear();
        assert_eq!(req.validate(), Err(RequestError::EmptyCameraList));
    }

    #[test]
    fn test_duplicate_camera_rejected() {
        let mut req = request();
        let dup = req.cameras[0].clone();
        req.cameras.push(dup);
        assert!(matches!(
            req.validate(),
            Err(RequestError::DuplicateCamera(_))
        ));
    }

    #[test]
    fn test_archive_requires_timestamp() {
        let mut req = request();
        req.include_archive = true;
        assert_eq!(req.validate(), Err(RequestError::MissingArchiveTimestamp));

        req.archive_timestamp = Some(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_capture_count() {
        let mut req = request();
        assert_eq!(req.capture_count(), 2);
        req.include_archive = true;
        assert_eq!(req.capture_count(), 4);
    }
}
