//! Snapshot acquisition orchestration.
//!
//! Turns one export request into an ordered list of capture results.
//! Cameras are fetched in parallel under a semaphore bound, but results
//! are always emitted in input order, live immediately followed by
//! archive per camera. One camera's failure never aborts the run; it
//! becomes a failure record in that camera's slot.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{watch, Semaphore};
use tracing::{error, info, warn};

use camreport_models::{
    CameraRef, CaptureRequest, CaptureResult, ExportRequest, Resolution, VideoSourceId,
};
use camreport_vms::{Snapshot, VmsClient, VmsError, VmsResult};

use crate::config::ExportConfig;
use crate::progress::ProgressSender;
use crate::retry::{retry_classified, RetryPolicy};

/// Where snapshots come from. The orchestrator is generic over this seam
/// so acquisition logic can be exercised against scripted sources.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Lightweight authenticated probe, called once before an export.
    async fn probe(&self) -> VmsResult<()>;

    async fn live_snapshot(
        &self,
        camera: &VideoSourceId,
        resolution: Resolution,
    ) -> VmsResult<Snapshot>;

    async fn archive_snapshot(
        &self,
        camera: &VideoSourceId,
        timestamp: &DateTime<Utc>,
        resolution: Resolution,
    ) -> VmsResult<Snapshot>;
}

#[async_trait]
impl SnapshotSource for VmsClient {
    async fn probe(&self) -> VmsResult<()> {
        self.test_connection().await
    }

    async fn live_snapshot(
        &self,
        camera: &VideoSourceId,
        resolution: Resolution,
    ) -> VmsResult<Snapshot> {
        self.fetch_live_snapshot(camera, resolution).await
    }

    async fn archive_snapshot(
        &self,
        camera: &VideoSourceId,
        timestamp: &DateTime<Utc>,
        resolution: Resolution,
    ) -> VmsResult<Snapshot> {
        self.fetch_archive_snapshot(camera, timestamp, resolution)
            .await
    }
}

/// Fetch every requested capture for `request`.
///
/// The cancellation signal is checked between camera launches: an
/// in-flight fetch is allowed to finish, but no new camera is started
/// after cancellation. Results of cameras never started are simply
/// absent.
pub async fn acquire<S: SnapshotSource + 'static>(
    source: &Arc<S>,
    request: &ExportRequest,
    config: &ExportConfig,
    cancel: &watch::Receiver<bool>,
    progress: &ProgressSender,
) -> Vec<CaptureResult> {
    let semaphore = Arc::new(Semaphore::new(config.max_parallel_fetches.max(1)));
    let policy = config.retry_policy();
    let total = request.cameras.len();
    let archive_ts = if request.include_archive {
        request.archive_timestamp
    } else {
        None
    };

    let mut handles = Vec::with_capacity(total);
    for (index, camera) in request.cameras.iter().enumerate() {
        let permit = match semaphore.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => break,
        };
        // Waiting on the permit may have taken a while; re-check before
        // launching.
        if *cancel.borrow() {
            info!(remaining = total - index, "cancellation requested, not starting further cameras");
            break;
        }

        progress.camera_started(index, total, &camera.name);

        let source = Arc::clone(source);
        let camera = camera.clone();
        let policy = policy.clone();
        let progress = progress.clone();
        let resolution = request.resolution;
        handles.push(tokio::spawn(async move {
            let _permit = permit;
            capture_camera(&*source, &camera, resolution, archive_ts, &policy, &progress).await
        }));
    }

    // Joining in spawn order restores the deterministic input order no
    // matter how the fetches were scheduled.
    let mut results = Vec::with_capacity(handles.len() * 2);
    for handle in handles {
        match handle.await {
            Ok(mut camera_results) => results.append(&mut camera_results),
            Err(e) => error!("capture task panicked: {e}"),
        }
    }
    results
}

/// All captures for one camera: live, then archive when requested.
async fn capture_camera<S: SnapshotSource + ?Sized>(
    source: &S,
    camera: &CameraRef,
    resolution: Resolution,
    archive_ts: Option<DateTime<Utc>>,
    policy: &RetryPolicy,
    progress: &ProgressSender,
) -> Vec<CaptureResult> {
    let mut results = Vec::with_capacity(2);

    let live_request = CaptureRequest::live(camera.clone(), resolution);
    let retried = retry_classified(policy, "live_snapshot", VmsError::is_transient, || {
        source.live_snapshot(&camera.id, resolution)
    })
    .await;
    results.push(finish_capture(live_request, retried, progress));

    if let Some(timestamp) = archive_ts {
        let archive_request = CaptureRequest::archive(camera.clone(), timestamp, resolution);
        let retried = retry_classified(policy, "archive_snapshot", VmsError::is_transient, || {
            source.archive_snapshot(&camera.id, &timestamp, resolution)
        })
        .await;
        results.push(finish_capture(archive_request, retried, progress));
    }

    results
}

fn finish_capture(
    request: CaptureRequest,
    retried: crate::retry::Retried<Snapshot, VmsError>,
    progress: &ProgressSender,
) -> CaptureResult {
    let name = request.camera.name.clone();
    let kind = request.kind;

    let result = match retried.result {
        Ok(snapshot) => {
            CaptureResult::success(request, snapshot.bytes, snapshot.mime, retried.attempts)
        }
        Err(e) => {
            warn!(
                camera = %name,
                kind = %kind,
                attempts = retried.attempts,
                error = %e,
                "capture failed"
            );
            CaptureResult::failure(request, e.to_failure(), retried.attempts)
        }
    };

    progress.capture_finished(&name, kind, result.is_success(), result.attempts);
    result
}
