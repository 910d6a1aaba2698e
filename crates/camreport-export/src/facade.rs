//! Export facade: the single entry point callers drive.
//!
//! One `Exporter` owns a snapshot source and configuration; `run` takes
//! a request through validation, connection probe, acquisition, and
//! document assembly, emitting progress events along the way.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use camreport_models::{ExportOutcome, ExportRequest};
use camreport_pdf::assemble;
use camreport_vms::{VmsClient, VmsError};

use crate::config::ExportConfig;
use crate::error::{ExportError, ExportResult};
use crate::orchestrator::{acquire, SnapshotSource};
use crate::progress::ProgressSender;

/// How a run ended when it did not error out.
#[derive(Debug)]
pub enum ExportTermination {
    /// The document was written.
    Done(ExportOutcome),
    /// The caller's cancellation signal stopped the run before the
    /// document was produced. Nothing was written.
    Cancelled,
}

/// Drives one export at a time against a snapshot source.
pub struct Exporter<S> {
    source: Arc<S>,
    config: ExportConfig,
}

impl Exporter<VmsClient> {
    /// Exporter backed by a real server connection from `request.session`.
    pub fn connect(request: &ExportRequest, config: ExportConfig) -> Result<Self, VmsError> {
        let client = VmsClient::with_timeout(request.session.clone(), config.request_timeout)?;
        Ok(Self::new(Arc::new(client), config))
    }
}

impl<S: SnapshotSource + 'static> Exporter<S> {
    pub fn new(source: Arc<S>, config: ExportConfig) -> Self {
        Self { source, config }
    }

    /// Run the export to completion, cancellation, or failure.
    ///
    /// Every terminal state is also reported on `progress`, so a UI can
    /// subscribe to the channel alone.
    pub async fn run(
        &self,
        request: &ExportRequest,
        cancel: &watch::Receiver<bool>,
        progress: &ProgressSender,
    ) -> ExportResult<ExportTermination> {
        match self.run_inner(request, cancel, progress).await {
            Ok(ExportTermination::Done(outcome)) => {
                progress.done(&outcome.document_path);
                Ok(ExportTermination::Done(outcome))
            }
            Ok(ExportTermination::Cancelled) => {
                progress.cancelled();
                Ok(ExportTermination::Cancelled)
            }
            Err(e) => {
                progress.failed(e.to_string());
                Err(e)
            }
        }
    }

    async fn run_inner(
        &self,
        request: &ExportRequest,
        cancel: &watch::Receiver<bool>,
        progress: &ProgressSender,
    ) -> ExportResult<ExportTermination> {
        request.validate()?;

        progress.connecting();
        self.source
            .probe()
            .await
            .map_err(ExportError::Connection)?;

        if *cancel.borrow() {
            return Ok(ExportTermination::Cancelled);
        }

        info!(
            cameras = request.cameras.len(),
            captures = request.capture_count(),
            resolution = %request.resolution,
            "starting acquisition"
        );
        let results = acquire(&self.source, request, &self.config, cancel, progress).await;

        if *cancel.borrow() {
            return Ok(ExportTermination::Cancelled);
        }

        progress.assembling();
        let document = assemble(&request.metadata, &results)?;
        write_atomic(&request.output_path, &document).await?;

        let outcome = ExportOutcome {
            document_path: request.output_path.clone(),
            results,
        };
        info!("{}", outcome.summary());
        Ok(ExportTermination::Done(outcome))
    }
}

/// Write the document so the target path never holds a partial file:
/// a sibling temp file is written first and renamed into place.
async fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp);

    tokio::fs::write(&tmp, bytes).await?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        if let Err(cleanup) = tokio::fs::remove_file(&tmp).await {
            warn!("failed to remove temp file {}: {cleanup}", tmp.display());
        }
        return Err(e);
    }
    Ok(())
}
