//! Screen-level state shared by the core and the frontend.

use super::detail::DetailScreen;
use std::time::{Duration, Instant};

/// Which screen is showing.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    /// Target list, progress button and notification tray
    Main,
    /// Outcome of a finished download, opened from a notification
    Detail(DetailScreen),
}

/// Transient single-line message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub expires_at: Instant,
}

impl Toast {
    pub fn new(message: impl Into<String>, now: Instant, duration: Duration) -> Self {
        Self {
            message: message.into(),
            expires_at: now + duration,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_expiry() {
        let now = Instant::now();
        let toast = Toast::new("hello", now, Duration::from_millis(3500));
        assert!(!toast.is_expired(now));
        assert!(!toast.is_expired(now + Duration::from_millis(3499)));
        assert!(toast.is_expired(now + Duration::from_millis(3500)));
    }
}
