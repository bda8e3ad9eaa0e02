//! The export job: one in-flight export at a time, latest request wins.
//!
//! Status moves `Idle -> Generating -> Ready | Failed`. A new request aborts
//! the task of the previous one, and a result is only published while the
//! status still names the request that produced it, so a superseded export
//! can never overwrite a newer one.

use std::sync::{Arc, Mutex};

use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::errors::StudioError;
use crate::export::{export_document, ExportArtifact};
use crate::models::ResumeContent;

#[derive(Debug, Clone, PartialEq)]
pub enum ExportStatus {
    Idle,
    Generating {
        request: u64,
    },
    Ready {
        request: u64,
        artifact: Arc<ExportArtifact>,
    },
    Failed {
        request: u64,
        code: &'static str,
        message: String,
    },
}

impl ExportStatus {
    pub fn request(&self) -> Option<u64> {
        match self {
            ExportStatus::Idle => None,
            ExportStatus::Generating { request }
            | ExportStatus::Ready { request, .. }
            | ExportStatus::Failed { request, .. } => Some(*request),
        }
    }

    pub fn is_generating(&self) -> bool {
        matches!(self, ExportStatus::Generating { .. })
    }
}

type ExportOutcome = Result<Arc<ExportArtifact>, StudioError>;

/// Handle to one export request.
#[derive(Debug)]
pub struct ExportTicket {
    request: u64,
    rx: oneshot::Receiver<ExportOutcome>,
}

impl ExportTicket {
    pub fn request(&self) -> u64 {
        self.request
    }

    /// Resolves to the artifact, or `Superseded` when a newer request or a
    /// cancel replaced this one first.
    pub async fn wait(self) -> ExportOutcome {
        self.rx.await.unwrap_or(Err(StudioError::Superseded))
    }
}

#[derive(Debug, Default)]
struct InFlight {
    last_request: u64,
    task: Option<JoinHandle<()>>,
}

/// Runs exports off the caller's thread and publishes their status.
///
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct ExportController {
    status: Arc<watch::Sender<ExportStatus>>,
    in_flight: Mutex<InFlight>,
}

impl Default for ExportController {
    fn default() -> Self {
        Self::new()
    }
}

impl ExportController {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ExportStatus::Idle);
        Self {
            status: Arc::new(tx),
            in_flight: Mutex::new(InFlight::default()),
        }
    }

    pub fn status(&self) -> ExportStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ExportStatus> {
        self.status.subscribe()
    }

    /// Starts exporting `content`, superseding any export still running.
    /// The export works on this snapshot; later store mutations do not
    /// affect it.
    pub fn request(&self, content: Arc<ResumeContent>) -> ExportTicket {
        let mut in_flight = self.lock();
        in_flight.last_request += 1;
        let request = in_flight.last_request;
        if let Some(previous) = in_flight.task.take() {
            if !previous.is_finished() {
                debug!(request, "Superseding in-flight export");
            }
            previous.abort();
        }

        self.status.send_replace(ExportStatus::Generating { request });
        info!(request, template = %content.metadata.template, "Export started");

        let (tx, rx) = oneshot::channel();
        let status = Arc::clone(&self.status);
        in_flight.task = Some(tokio::spawn(async move {
            let outcome = match tokio::task::spawn_blocking(move || export_document(&content)).await {
                Ok(result) => result.map(Arc::new),
                Err(e) => Err(StudioError::Export(format!("export task failed: {e}"))),
            };

            let published = status.send_if_modified(|current| {
                if *current != (ExportStatus::Generating { request }) {
                    return false;
                }
                *current = match &outcome {
                    Ok(artifact) => ExportStatus::Ready {
                        request,
                        artifact: Arc::clone(artifact),
                    },
                    Err(e) => ExportStatus::Failed {
                        request,
                        code: e.code(),
                        message: e.user_message(),
                    },
                };
                true
            });

            if !published {
                debug!(request, "Discarding result of superseded export");
                let _ = tx.send(Err(StudioError::Superseded));
                return;
            }
            match &outcome {
                Ok(artifact) => info!(request, filename = %artifact.filename, "Export ready"),
                Err(e) => warn!(request, code = e.code(), "Export failed"),
            }
            let _ = tx.send(outcome);
        }));

        ExportTicket { request, rx }
    }

    /// Abandons the in-flight export, if any, and returns to `Idle`.
    /// A finished `Ready` or `Failed` status is left alone.
    pub fn cancel(&self) {
        let mut in_flight = self.lock();
        if let Some(task) = in_flight.task.take() {
            task.abort();
        }
        let cancelled = self.status.send_if_modified(|current| {
            if current.is_generating() {
                *current = ExportStatus::Idle;
                true
            } else {
                false
            }
        });
        if cancelled {
            info!(request = in_flight.last_request, "Export cancelled");
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, InFlight> {
        self.in_flight.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for ExportController {
    fn drop(&mut self) {
        if let Some(task) = self.lock().task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::fixtures::make_content;
    use crate::models::{PersonalInfoPatch, TemplateId};
    use crate::store::ResumeStore;

    #[tokio::test]
    async fn test_request_reaches_ready() {
        let controller = ExportController::new();
        assert_eq!(controller.status(), ExportStatus::Idle);

        let ticket = controller.request(Arc::new(make_content()));
        let request = ticket.request();
        assert_eq!(controller.status(), ExportStatus::Generating { request });

        let artifact = ticket.wait().await.unwrap();
        assert_eq!(artifact.filename, "Ada_Lovelace.pdf");
        match controller.status() {
            ExportStatus::Ready { request: r, artifact: published } => {
                assert_eq!(r, request);
                assert_eq!(published, artifact);
            }
            other => panic!("expected Ready, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_latest_request_wins() {
        let controller = ExportController::new();
        let mut corporate = make_content();
        corporate.metadata.template = TemplateId::CorporateBlue;

        let first = controller.request(Arc::new(make_content()));
        let second = controller.request(Arc::new(corporate));
        assert!(second.request() > first.request());

        assert!(matches!(first.wait().await, Err(StudioError::Superseded)));
        let artifact = second.wait().await.unwrap();
        assert_eq!(artifact.template, TemplateId::CorporateBlue);
        assert_eq!(controller.status().request(), Some(2));
    }

    #[tokio::test]
    async fn test_failure_surfaces_as_failed_status() {
        let controller = ExportController::new();
        let mut content = make_content();
        content.metadata.template = TemplateId::ModernProfessional;
        content.personal_info.full_name = "word ".repeat(3000);

        let ticket = controller.request(Arc::new(content));
        let err = ticket.wait().await.unwrap_err();
        assert_eq!(err.code(), "LAYOUT_ERROR");
        assert!(matches!(
            controller.status(),
            ExportStatus::Failed { code: "LAYOUT_ERROR", .. }
        ));
    }

    #[tokio::test]
    async fn test_retry_after_failure_can_succeed() {
        let controller = ExportController::new();
        let mut broken = make_content();
        broken.metadata.template = TemplateId::ModernProfessional;
        broken.personal_info.full_name = "word ".repeat(3000);
        assert!(controller.request(Arc::new(broken)).wait().await.is_err());

        let artifact = controller.request(Arc::new(make_content())).wait().await.unwrap();
        assert_eq!(artifact.page_count, 1);
        assert!(matches!(controller.status(), ExportStatus::Ready { .. }));
    }

    #[tokio::test]
    async fn test_cancel_returns_to_idle() {
        let controller = ExportController::new();
        let ticket = controller.request(Arc::new(make_content()));
        controller.cancel();
        assert_eq!(controller.status(), ExportStatus::Idle);
        assert!(matches!(ticket.wait().await, Err(StudioError::Superseded)));
    }

    #[tokio::test]
    async fn test_subscribers_observe_transitions() {
        let controller = ExportController::new();
        let mut rx = controller.subscribe();
        let ticket = controller.request(Arc::new(make_content()));
        assert!(rx.borrow_and_update().is_generating());

        rx.changed().await.unwrap();
        assert!(matches!(*rx.borrow(), ExportStatus::Ready { .. }));
        ticket.wait().await.unwrap();
    }

    #[tokio::test]
    async fn test_export_uses_captured_snapshot() {
        let mut store = ResumeStore::in_memory();
        store.update_personal_info(PersonalInfoPatch {
            full_name: Some("Ada Lovelace".to_string()),
            ..Default::default()
        });

        let controller = ExportController::new();
        let ticket = controller.request(store.snapshot());
        store.update_personal_info(PersonalInfoPatch {
            full_name: Some("Grace Hopper".to_string()),
            ..Default::default()
        });

        let artifact = ticket.wait().await.unwrap();
        assert_eq!(artifact.filename, "Ada_Lovelace.pdf");
        assert_eq!(store.snapshot().personal_info.full_name, "Grace Hopper");
    }
}
