use std::fmt;
use std::path::PathBuf;

/// Opaque handle returned by `enqueue`, used to correlate completion events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DownloadId(pub u64);

impl fmt::Display for DownloadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What to download, plus the network policy the transfer is allowed to use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    pub title: String,
    pub description: String,
    pub requires_charging: bool,
    pub allowed_over_metered: bool,
    pub allowed_over_roaming: bool,
}

impl DownloadRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: String::new(),
            description: String::new(),
            requires_charging: false,
            allowed_over_metered: true,
            allowed_over_roaming: true,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn requires_charging(mut self, requires: bool) -> Self {
        self.requires_charging = requires;
        self
    }

    pub fn allowed_over_metered(mut self, allowed: bool) -> Self {
        self.allowed_over_metered = allowed;
        self
    }

    pub fn allowed_over_roaming(mut self, allowed: bool) -> Self {
        self.allowed_over_roaming = allowed;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadStatus {
    Pending,
    Running,
    Successful,
    Failed(String),
}

impl DownloadStatus {
    pub fn is_successful(&self) -> bool {
        matches!(self, DownloadStatus::Successful)
    }
}

/// The service's bookkeeping for one transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRecord {
    pub id: DownloadId,
    pub title: String,
    pub description: String,
    pub url: String,
    pub destination: PathBuf,
    pub status: DownloadStatus,
    pub bytes_downloaded: u64,
    pub total_bytes: Option<u64>,
}

/// Broadcast by the service when a transfer finishes, whatever the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadEvent {
    Complete { id: DownloadId },
}
