//! Progress events for the caller's UI.
//!
//! The facade reports its progress over an in-process channel the caller
//! may subscribe to. Sending is fire-and-forget: a dropped receiver never
//! affects the export.

use std::path::{Path, PathBuf};

use tokio::sync::mpsc;

use camreport_models::CaptureKind;

/// One step of an export, as shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// Probing the server connection.
    Connecting,
    /// Capture for one camera has been scheduled.
    CameraStarted {
        index: usize,
        total: usize,
        name: String,
    },
    /// One capture finished, successfully or not.
    CaptureFinished {
        name: String,
        kind: CaptureKind,
        success: bool,
        attempts: u32,
    },
    /// All captures done, rendering the document.
    Assembling,
    /// Export finished and the document was written.
    Done { path: PathBuf },
    /// Export aborted with an error.
    Failed { message: String },
    /// Export stopped on the caller's cancellation signal.
    Cancelled,
}

/// Cloneable sending half; `disabled()` produces a no-op sender.
#[derive(Debug, Clone, Default)]
pub struct ProgressSender {
    tx: Option<mpsc::UnboundedSender<ProgressEvent>>,
}

impl ProgressSender {
    /// Create a connected sender/receiver pair.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// A sender that drops every event.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn send(&self, event: ProgressEvent) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }

    pub fn connecting(&self) {
        self.send(ProgressEvent::Connecting);
    }

    pub fn camera_started(&self, index: usize, total: usize, name: &str) {
        self.send(ProgressEvent::CameraStarted {
            index,
            total,
            name: name.to_string(),
        });
    }

    pub fn capture_finished(&self, name: &str, kind: CaptureKind, success: bool, attempts: u32) {
        self.send(ProgressEvent::CaptureFinished {
            name: name.to_string(),
            kind,
            success,
            attempts,
        });
    }

    pub fn assembling(&self) {
        self.send(ProgressEvent::Assembling);
    }

    pub fn done(&self, path: &Path) {
        self.send(ProgressEvent::Done {
            path: path.to_path_buf(),
        });
    }

    pub fn failed(&self, message: impl Into<String>) {
        self.send(ProgressEvent::Failed {
            message: message.into(),
        });
    }

    pub fn cancelled(&self) {
        self.send(ProgressEvent::Cancelled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_events_arrive_in_order() {
        let (sender, mut rx) = ProgressSender::channel();
        sender.connecting();
        sender.camera_started(0, 2, "Gate");
        sender.assembling();

        assert_eq!(rx.recv().await, Some(ProgressEvent::Connecting));
        assert!(matches!(
            rx.recv().await,
            Some(ProgressEvent::CameraStarted { index: 0, total: 2, .. })
        ));
        assert_eq!(rx.recv().await, Some(ProgressEvent::Assembling));
    }

    #[test]
    fn test_disabled_sender_ignores_events() {
        let sender = ProgressSender::disabled();
        sender.connecting();
        sender.failed("nothing listens");
    }

    #[test]
    fn test_dropped_receiver_is_harmless() {
        let (sender, rx) = ProgressSender::channel();
        drop(rx);
        sender.assembling();
    }
}
