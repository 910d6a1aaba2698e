//! Capture requests and per-capture results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::CameraRef;

/// Which retrieval semantics apply to a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureKind {
    /// Still image from the camera's current feed.
    Live,
    /// Still image reconstructed from recorded video at a past instant.
    Archive,
}

impl std::fmt::Display for CaptureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Live => f.write_str("live"),
            Self::Archive => f.write_str("archive"),
        }
    }
}

/// Requested snapshot resolution.
///
/// The pixel values are the same fixed table the selection control offers;
/// `Original` leaves `w`/`h` unset so the server delivers the native
/// camera resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    Original,
    Hd,
    FullHd,
    Uhd4k,
}

impl Resolution {
    /// Concrete pixel dimensions, or `None` for the native resolution.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match self {
            Self::Original => None,
            Self::Hd => Some((1280, 720)),
            Self::FullHd => Some((1920, 1080)),
            Self::Uhd4k => Some((3840, 2160)),
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Original => f.write_str("original"),
            Self::Hd => f.write_str("1280x720"),
            Self::FullHd => f.write_str("1920x1080"),
            Self::Uhd4k => f.write_str("3840x2160"),
        }
    }
}

/// One logical snapshot request for one camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureRequest {
    pub camera: CameraRef,
    pub kind: CaptureKind,
    /// UTC instant for archive captures; `None` for live.
    pub timestamp: Option<DateTime<Utc>>,
    pub resolution: Resolution,
}

impl CaptureRequest {
    pub fn live(camera: CameraRef, resolution: Resolution) -> Self {
        Self {
            camera,
            kind: CaptureKind::Live,
            timestamp: None,
            resolution,
        }
    }

    pub fn archive(camera: CameraRef, timestamp: DateTime<Utc>, resolution: Resolution) -> Self {
        Self {
            camera,
            kind: CaptureKind::Archive,
            timestamp: Some(timestamp),
            resolution,
        }
    }
}

/// User-visible reason a capture failed.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureFailure {
    #[error("authentication rejected")]
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

/// Terminal outcome of one capture attempt chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureOutcome {
    Success { bytes: Vec<u8>, mime: String },
    Failure { reason: CaptureFailure },
}

/// Result record for one `(camera, kind)` pair, immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureResult {
    pub request: CaptureRequest,
    pub outcome: CaptureOutcome,
    /// Total tries including the first; `attempts > 1` means retries happened.
    pub attempts: u32,
}

impl CaptureResult {
    pub fn success(request: CaptureRequest, bytes: Vec<u8>, mime: impl Into<String>, attempts: u32) -> Self {
        Self {
            request,
            outcome: CaptureOutcome::Success {
                bytes,
                mime: mime.into(),
            },
            attempts,
        }
    }

    pub fn failure(request: CaptureRequest, reason: CaptureFailure, attempts: u32) -> Self {
        Self {
            request,
            outcome: CaptureOutcome::Failure { reason },
            attempts,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, CaptureOutcome::Success { .. })
    }

    /// Image bytes for successful captures.
    pub fn bytes(&self) -> Option<&[u8]> {
        match &self.outcome {
            CaptureOutcome::Success { bytes, .. } => Some(bytes),
            CaptureOutcome::Failure { .. } => None,
        }
    }

    /// Failure reason for failed captures.
    pub fn reason(&self) -> Option<&CaptureFailure> {
        match &self.outcome {
            CaptureOutcome::Success { .. } => None,
            CaptureOutcome::Failure { reason } => Some(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_table() {
        assert_eq!(Resolution::Original.dimensions(), None);
        assert_eq!(Resolution::Hd.dimensions(), Some((1280, 720)));
        assert_eq!(Resolution::FullHd.dimensions(), Some((1920, 1080)));
        assert_eq!(Resolution::Uhd4k.dimensions(), Some((3840, 2160)));
    }

    #[test]
    fn test_capture_result_accessors() {
        let camera = CameraRef::new("S/DeviceIpint.1/SourceEndpoint.video:0:0", "Entrance");
        let request = CaptureRequest::live(camera, Resolution::Hd);

        let ok = CaptureResult::success(request.clone(), vec![0xff, 0xd8], "image/jpeg", 1);
        assert!(ok.is_success());
        assert_eq!(ok.bytes(), Some(&[0xff, 0xd8][..]));
        assert_eq!(ok.reason(), None);

        let failed = CaptureResult::failure(request, CaptureFailure::Timeout, 3);
        assert!(!failed.is_success());
        assert_eq!(failed.reason(), Some(&CaptureFailure::Timeout));
        assert_eq!(failed.attempts, 3);
    }
}
