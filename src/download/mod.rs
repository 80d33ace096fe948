//! Download service boundary.
//!
//! The UI never transfers bytes itself: it enqueues a request, gets an id
//! back, and later receives a `DownloadEvent::Complete` for that id on the
//! channel returned by `subscribe`. The outcome is then read with `query`.

pub mod errors;
pub mod http;
pub mod types;

pub use errors::DownloadError;
pub use http::HttpDownloadService;
pub use types::{DownloadEvent, DownloadId, DownloadRecord, DownloadRequest, DownloadStatus};

use tokio::sync::mpsc;

pub trait DownloadService {
    /// Queue a transfer and return its id. Fails only for requests that can
    /// never succeed (malformed URL, unsupported scheme).
    fn enqueue(&mut self, request: DownloadRequest) -> Result<DownloadId, DownloadError>;

    /// Current bookkeeping for a transfer, `None` for unknown ids.
    fn query(&self, id: DownloadId) -> Option<DownloadRecord>;

    /// Register the completion listener. A later call replaces the earlier one.
    fn subscribe(&mut self) -> mpsc::UnboundedReceiver<DownloadEvent>;

    /// Drop the completion listener; its receiver sees the channel close.
    fn unsubscribe(&mut self);
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;

    /// In-memory service that records requests and lets tests decide when and
    /// how each transfer completes.
    #[derive(Default)]
    pub struct FakeDownloadService {
        pub requests: Vec<DownloadRequest>,
        pub records: HashMap<DownloadId, DownloadRecord>,
        pub fail_enqueue: bool,
        listener: Option<mpsc::UnboundedSender<DownloadEvent>>,
        next_id: u64,
    }

    impl FakeDownloadService {
        pub fn new() -> Self {
            Self::default()
        }

        /// Mark a transfer finished and broadcast its completion.
        pub fn complete(&mut self, id: DownloadId, status: DownloadStatus) {
            if let Some(record) = self.records.get_mut(&id) {
                record.status = status;
            }
            self.emit(id);
        }

        /// Broadcast a completion without touching the record.
        pub fn emit(&mut self, id: DownloadId) {
            if let Some(tx) = &self.listener {
                let _ = tx.send(DownloadEvent::Complete { id });
            }
        }

        pub fn forget(&mut self, id: DownloadId) {
            self.records.remove(&id);
        }
    }

    impl DownloadService for FakeDownloadService {
        fn enqueue(&mut self, request: DownloadRequest) -> Result<DownloadId, DownloadError> {
            if self.fail_enqueue {
                return Err(DownloadError::general("enqueue refused"));
            }
            self.next_id += 1;
            let id = DownloadId(self.next_id);
            self.records.insert(
                id,
                DownloadRecord {
                    id,
                    title: request.title.clone(),
                    description: request.description.clone(),
                    url: request.url.clone(),
                    destination: PathBuf::from(format!("/tmp/{}", id.0)),
                    status: DownloadStatus::Pending,
                    bytes_downloaded: 0,
                    total_bytes: None,
                },
            );
            self.requests.push(request);
            Ok(id)
        }

        fn query(&self, id: DownloadId) -> Option<DownloadRecord> {
            self.records.get(&id).cloned()
        }

        fn subscribe(&mut self) -> mpsc::UnboundedReceiver<DownloadEvent> {
            let (tx, rx) = mpsc::unbounded_channel();
            self.listener = Some(tx);
            rx
        }

        fn unsubscribe(&mut self) {
            self.listener = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request = DownloadRequest::new("https://example.com/a.zip")
            .title("A")
            .description("archive");
        assert_eq!(request.title, "A");
        assert_eq!(request.description, "archive");
        assert!(!request.requires_charging);
        assert!(request.allowed_over_metered);
        assert!(request.allowed_over_roaming);
    }

    #[test]
    fn test_status_helpers() {
        assert!(DownloadStatus::Successful.is_successful());
        assert!(!DownloadStatus::Running.is_successful());
        assert!(!DownloadStatus::Failed("x".into()).is_successful());
        assert_eq!(DownloadId(7).to_string(), "#7");
    }
}
