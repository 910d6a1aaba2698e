//! VMS API client.
//!
//! Wraps the server's HTTP snapshot API: camera listing, live snapshots
//! and archive snapshots. All calls authenticate with HTTP Basic auth from
//! the session and carry a bound timeout, so no call can block
//! indefinitely.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use camreport_models::{format_archive_timestamp, CameraRef, Resolution, Session, VideoSourceId};

use crate::error::{VmsError, VmsResult};

/// Default per-call timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Smallest byte count accepted as a plausible JPEG frame.
const MIN_JPEG_SIZE: usize = 100;

/// Raw image returned by a snapshot endpoint.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub bytes: Vec<u8>,
    pub mime: String,
}

/// Camera list entry as the server reports it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCamera {
    display_id: Option<String>,
    id: Option<String>,
    display_name: Option<String>,
    #[serde(default)]
    video_streams: Vec<RawStream>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStream {
    access_point: Option<String>,
}

/// Envelope shape some server versions use for the camera list.
#[derive(Debug, Deserialize)]
struct CameraListBody {
    #[serde(default)]
    cameras: Vec<RawCamera>,
}

/// Archive responses may carry stream URLs instead of image bytes.
#[derive(Debug, Deserialize)]
struct ArchiveStreamBody {
    httpproxy: Option<String>,
    http: Option<String>,
}

/// Client for the VMS snapshot API.
///
/// Cheap to clone; the underlying connection pool is shared and safe for
/// concurrent use, so one client serves all parallel captures of an
/// export.
#[derive(Clone)]
pub struct VmsClient {
    http: Client,
    session: Session,
}

impl VmsClient {
    /// Create a client with the default per-call timeout.
    pub fn new(session: Session) -> VmsResult<Self> {
        Self::with_timeout(session, DEFAULT_TIMEOUT)
    }

    /// Create a client with an explicit per-call timeout.
    pub fn with_timeout(session: Session, timeout: Duration) -> VmsResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VmsError::network(e.to_string()))?;

        Ok(Self { http, session })
    }

    fn get(&self, url: &str) -> RequestBuilder {
        self.http
            .get(url)
            .basic_auth(&self.session.username, Some(&self.session.password))
    }

    /// Lightweight authenticated probe, used before any export starts.
    pub async fn test_connection(&self) -> VmsResult<()> {
        let url = format!("{}/camera/list", self.session.base_url());
        debug!(url = %url, "probing server connection");

        let response = self.get(&url).send().await.map_err(classify_transport)?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(classify_status(response.status(), false))
        }
    }

    /// List the cameras the server exposes, in server order.
    ///
    /// Cameras without a video stream cannot deliver snapshots and are
    /// skipped.
    pub async fn list_cameras(&self) -> VmsResult<Vec<CameraRef>> {
        let url = format!("{}/camera/list", self.session.base_url());

        let response = self.get(&url).send().await.map_err(classify_transport)?;
        if !response.status().is_success() {
            return Err(classify_status(response.status(), false));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| VmsError::invalid_response(format!("camera list is not JSON: {e}")))?;

        // The list arrives either as a bare array or wrapped in a
        // `cameras` key, depending on the server version.
        let raw: Vec<RawCamera> = if body.is_array() {
            serde_json::from_value(body)
                .map_err(|e| VmsError::invalid_response(format!("malformed camera list: {e}")))?
        } else {
            serde_json::from_value::<CameraListBody>(body)
                .map_err(|e| VmsError::invalid_response(format!("malformed camera list: {e}")))?
                .cameras
        };

        let mut cameras = Vec::with_capacity(raw.len());
        for camera in raw {
            let Some(access_point) = camera
                .video_streams
                .first()
                .and_then(|s| s.access_point.clone())
            else {
                warn!(
                    camera = camera.display_id.as_deref().unwrap_or("?"),
                    "skipping camera without video stream"
                );
                continue;
            };

            let name = camera
                .display_name
                .or(camera.display_id)
                .or(camera.id)
                .unwrap_or_else(|| "Unknown camera".to_string());

            cameras.push(CameraRef::new(access_point, name));
        }

        debug!(count = cameras.len(), "listed cameras");
        Ok(cameras)
    }

    /// Fetch a still from the camera's current feed.
    ///
    /// `w`/`h` are omitted for [`Resolution::Original`] so the server
    /// delivers the native resolution.
    pub async fn fetch_live_snapshot(
        &self,
        camera: &VideoSourceId,
        resolution: Resolution,
    ) -> VmsResult<Snapshot> {
        let url = format!("{}/live/media/snapshot/{}", self.session.base_url(), camera);
        debug!(camera = %camera, resolution = %resolution, "fetching live snapshot");

        let mut request = self.get(&url);
        if let Some((w, h)) = resolution.dimensions() {
            request = request.query(&[("w", w.to_string()), ("h", h.to_string())]);
        }

        let response = request.send().await.map_err(classify_transport)?;
        if !response.status().is_success() {
            return Err(classify_status(response.status(), false));
        }

        Self::snapshot_body(response).await
    }

    /// Fetch a still reconstructed from recorded video at `timestamp`.
    ///
    /// The instant is serialized UTC with no local offset; converting from
    /// the operator's local time is the caller's job.
    pub async fn fetch_archive_snapshot(
        &self,
        camera: &VideoSourceId,
        timestamp: &DateTime<Utc>,
        resolution: Resolution,
    ) -> VmsResult<Snapshot> {
        let url = format!(
            "{}/archive/media/{}/{}",
            self.session.base_url(),
            camera,
            format_archive_timestamp(timestamp)
        );
        debug!(camera = %camera, url = %url, "fetching archive snapshot");

        let mut request = self.get(&url).query(&[("format", "mjpeg")]);
        if let Some((w, h)) = resolution.dimensions() {
            request = request.query(&[("w", w.to_string()), ("h", h.to_string())]);
        }

        let response = request.send().await.map_err(classify_transport)?;
        if !response.status().is_success() {
            return Err(classify_status(response.status(), true));
        }

        let content_type = content_type_of(&response);

        if content_type.contains("json") {
            // Some server versions answer with stream URLs; follow the
            // proxy URL and take the first JPEG frame of the MJPEG body.
            let body: ArchiveStreamBody = response
                .json()
                .await
                .map_err(|e| VmsError::invalid_response(format!("archive body: {e}")))?;

            let stream_url = body
                .httpproxy
                .or(body.http)
                .ok_or_else(|| VmsError::invalid_response("archive response has no stream URL"))?;

            let stream = self
                .get(&stream_url)
                .send()
                .await
                .map_err(classify_transport)?;
            if !stream.status().is_success() {
                return Err(classify_status(stream.status(), true));
            }

            let bytes = stream
                .bytes()
                .await
                .map_err(classify_transport)?
                .to_vec();
            let frame = extract_first_jpeg_frame(&bytes)?;

            Ok(Snapshot {
                bytes: frame,
                mime: "image/jpeg".to_string(),
            })
        } else {
            Self::snapshot_body(response).await
        }
    }

    /// Read an image body, keeping the delivered MIME type.
    async fn snapshot_body(response: Response) -> VmsResult<Snapshot> {
        let mime = content_type_of(&response);
        let mime = if mime.is_empty() {
            "image/jpeg".to_string()
        } else {
            mime
        };

        let bytes = response.bytes().await.map_err(classify_transport)?.to_vec();
        if bytes.is_empty() {
            return Err(VmsError::invalid_response("empty image body"));
        }

        Ok(Snapshot { bytes, mime })
    }
}

fn content_type_of(response: &Response) -> String {
    response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

/// Map a non-2xx status onto the error taxonomy. 404 on the archive
/// endpoint means the instant has no recorded data, not a missing camera.
fn classify_status(status: StatusCode, archive: bool) -> VmsError {
    match status.as_u16() {
        401 | 403 => VmsError::Auth,
        404 if archive => VmsError::NoArchiveData,
        404 => VmsError::NotFound,
        500..=599 => VmsError::Server(status.as_u16()),
        other => VmsError::InvalidResponse(format!("unexpected status {other}")),
    }
}

fn classify_transport(e: reqwest::Error) -> VmsError {
    if e.is_timeout() {
        VmsError::Timeout
    } else {
        VmsError::Network(e.to_string())
    }
}

/// Extract the first complete JPEG (FFD8..FFD9) from an MJPEG body.
fn extract_first_jpeg_frame(bytes: &[u8]) -> VmsResult<Vec<u8>> {
    let start = bytes
        .windows(2)
        .position(|w| w == [0xff, 0xd8])
        .ok_or_else(|| VmsError::invalid_response("no JPEG frame in stream"))?;

    let end = bytes[start..]
        .windows(2)
        .position(|w| w == [0xff, 0xd9])
        .map(|p| start + p + 2)
        .ok_or_else(|| VmsError::invalid_response("truncated JPEG frame in stream"))?;

    let frame = &bytes[start..end];
    if frame.len() < MIN_JPEG_SIZE {
        return Err(VmsError::invalid_response("JPEG frame too small"));
    }

    Ok(frame.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn framed(payload_len: usize) -> Vec<u8> {
        let mut body = b"--boundary\r\nContent-Type: image/jpeg\r\n\r\n".to_vec();
        body.extend_from_slice(&[0xff, 0xd8]);
        body.extend(std::iter::repeat(0xab).take(payload_len));
        body.extend_from_slice(&[0xff, 0xd9]);
        body.extend_from_slice(b"\r\n--boundary--");
        body
    }

    #[test]
    fn test_extract_first_jpeg_frame() {
        let body = framed(200);
        let frame = extract_first_jpeg_frame(&body).unwrap();
        assert_eq!(&frame[..2], &[0xff, 0xd8]);
        assert_eq!(&frame[frame.len() - 2..], &[0xff, 0xd9]);
        assert_eq!(frame.len(), 204);
    }

    #[test]
    fn test_extract_rejects_tiny_frame() {
        let body = framed(10);
        assert!(matches!(
            extract_first_jpeg_frame(&body),
            Err(VmsError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_extract_rejects_missing_markers() {
        assert!(extract_first_jpeg_frame(b"not a stream").is_err());
        // Start marker without an end marker.
        let mut body = vec![0xff, 0xd8];
        body.extend(std::iter::repeat(0x00).take(300));
        assert!(extract_first_jpeg_frame(&body).is_err());
    }

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            classify_status(StatusCode::UNAUTHORIZED, false),
            VmsError::Auth
        ));
        assert!(matches!(
            classify_status(StatusCode::NOT_FOUND, false),
            VmsError::NotFound
        ));
        assert!(matches!(
            classify_status(StatusCode::NOT_FOUND, true),
            VmsError::NoArchiveData
        ));
        assert!(matches!(
            classify_status(StatusCode::BAD_GATEWAY, false),
            VmsError::Server(502)
        ));
    }
}
