//! HTTP implementation of the download service.
//!
//! Each request becomes one streaming GET on the tokio runtime, written into
//! the download directory. Records live behind a mutex so the UI thread can
//! query them while transfers run.

use super::errors::DownloadError;
use super::types::{DownloadEvent, DownloadId, DownloadRecord, DownloadRequest, DownloadStatus};
use super::DownloadService;
use futures_util::StreamExt;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::io::AsyncWriteExt;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use url::Url;

type Records = Arc<Mutex<HashMap<DownloadId, DownloadRecord>>>;
type Listener = Arc<Mutex<Option<mpsc::UnboundedSender<DownloadEvent>>>>;

pub struct HttpDownloadService {
    client: reqwest::Client,
    download_dir: PathBuf,
    runtime: Handle,
    next_id: AtomicU64,
    records: Records,
    listener: Listener,
}

impl HttpDownloadService {
    /// Create a service writing into `download_dir`. Must be called from
    /// within a tokio runtime.
    pub fn new(download_dir: PathBuf) -> Result<Self, DownloadError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("loadapp/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Self::with_client(download_dir, client)
    }

    pub fn with_client(download_dir: PathBuf, client: reqwest::Client) -> Result<Self, DownloadError> {
        let runtime = Handle::try_current()
            .map_err(|e| DownloadError::general(format!("No tokio runtime: {}", e)))?;

        Ok(Self {
            client,
            download_dir,
            runtime,
            next_id: AtomicU64::new(1),
            records: Arc::new(Mutex::new(HashMap::new())),
            listener: Arc::new(Mutex::new(None)),
        })
    }
}

impl DownloadService for HttpDownloadService {
    fn enqueue(&mut self, request: DownloadRequest) -> Result<DownloadId, DownloadError> {
        let url = Url::parse(&request.url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(DownloadError::UnsupportedScheme(url.scheme().to_string()));
        }

        let id = DownloadId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let destination = self.download_dir.join(file_name_for(&url, id));

        info!(
            "Enqueued download {} '{}' from {} -> {:?} (charging={}, metered={}, roaming={})",
            id,
            request.title,
            url,
            destination,
            request.requires_charging,
            request.allowed_over_metered,
            request.allowed_over_roaming
        );

        lock(&self.records).insert(
            id,
            DownloadRecord {
                id,
                title: request.title,
                description: request.description,
                url: url.to_string(),
                destination: destination.clone(),
                status: DownloadStatus::Pending,
                bytes_downloaded: 0,
                total_bytes: None,
            },
        );

        let client = self.client.clone();
        let records = Arc::clone(&self.records);
        let listener = Arc::clone(&self.listener);
        self.runtime.spawn(async move {
            run_download(client, url, destination, id, records, listener).await;
        });

        Ok(id)
    }

    fn query(&self, id: DownloadId) -> Option<DownloadRecord> {
        lock(&self.records).get(&id).cloned()
    }

    fn subscribe(&mut self) -> mpsc::UnboundedReceiver<DownloadEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        *lock(&self.listener) = Some(tx);
        rx
    }

    fn unsubscribe(&mut self) {
        lock(&self.listener).take();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// `<id>-<last path segment>`, so repeated downloads of the same archive
/// don't overwrite each other.
pub fn file_name_for(url: &Url, id: DownloadId) -> String {
    let name = url
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .unwrap_or("download");
    format!("{}-{}", id.0, name)
}

async fn run_download(
    client: reqwest::Client,
    url: Url,
    destination: PathBuf,
    id: DownloadId,
    records: Records,
    listener: Listener,
) {
    update(&records, id, |record| record.status = DownloadStatus::Running);

    let status = match transfer(&client, url, &destination, id, &records).await {
        Ok(bytes) => {
            info!("Download {} finished ({} bytes)", id, bytes);
            DownloadStatus::Successful
        }
        Err(e) => {
            warn!("Download {} failed: {}", id, e);
            discard_partial(&destination).await;
            DownloadStatus::Failed(e.to_string())
        }
    };
    update(&records, id, |record| record.status = status);

    match lock(&listener).as_ref() {
        Some(tx) => {
            if tx.send(DownloadEvent::Complete { id }).is_err() {
                debug!("Completion listener for {} went away", id);
            }
        }
        None => debug!("No completion listener registered for {}", id),
    }
}

async fn transfer(
    client: &reqwest::Client,
    url: Url,
    destination: &Path,
    id: DownloadId,
    records: &Records,
) -> Result<u64, DownloadError> {
    if let Some(parent) = destination.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let response = client.get(url).send().await?.error_for_status()?;
    let total = response.content_length();
    update(records, id, |record| record.total_bytes = total);

    let mut file = tokio::fs::File::create(destination).await?;
    let mut stream = response.bytes_stream();
    let mut written = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
        update(records, id, |record| record.bytes_downloaded = written);
    }
    file.flush().await?;

    Ok(written)
}

/// A failed transfer must not leave a truncated file in the download directory.
async fn discard_partial(destination: &Path) {
    match tokio::fs::remove_file(destination).await {
        Ok(()) => debug!("Removed partial download {:?}", destination),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove partial download {:?}: {}", destination, e),
    }
}

fn update(records: &Records, id: DownloadId, apply: impl FnOnce(&mut DownloadRecord)) {
    if let Some(record) = lock(records).get_mut(&id) {
        apply(record);
    }
}
