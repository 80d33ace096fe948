//! In-app notification tray.
//!
//! Mirrors what a desktop/mobile notification shade offers the app: named
//! channels that must exist before posting, notifications keyed by id (posting
//! the same id replaces the earlier one), a tap action carrying a serialized
//! payload, and bulk cancellation.

use crate::config::Strings;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Id used for every download-finished notification, so a newer one replaces
/// the older.
pub const NOTIFICATION_ID: u32 = 5460;

/// Payload handed from the download screen to the detail screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationBody {
    pub title: String,
    pub status: String,
    pub description: String,
}

impl NotificationBody {
    pub fn new(
        title: impl Into<String>,
        status: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            status: status.into(),
            description: description.into(),
        }
    }

    pub fn to_payload(&self) -> Result<String> {
        serde_json::to_string(self).context("Failed to serialize notification body")
    }

    pub fn from_payload(payload: &str) -> Result<Self> {
        serde_json::from_str(payload).context("Failed to parse notification body")
    }
}

/// Interruption level of a channel. Download results always use `High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Importance {
    High,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationChannel {
    pub id: String,
    pub name: String,
    pub description: String,
    pub importance: Importance,
    pub enable_lights: bool,
    pub light_color: String,
    pub enable_vibration: bool,
    pub show_badge: bool,
}

impl NotificationChannel {
    /// High-importance channel with lights and vibration, used for downloads.
    pub fn downloads(strings: &Strings) -> Self {
        Self {
            id: strings.channel_id.clone(),
            name: strings.channel_name.clone(),
            description: strings.channel_description.clone(),
            importance: Importance::High,
            enable_lights: true,
            light_color: "#ff0000".to_string(),
            enable_vibration: true,
            show_badge: false,
        }
    }
}

/// A posted notification.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u32,
    pub channel_id: String,
    pub content_title: String,
    pub content_text: String,
    /// Label of the action button; the action opens the same payload as a tap
    pub action_label: Option<String>,
    /// Serialized `NotificationBody` delivered to the detail screen
    pub payload: String,
    /// Remove from the tray once opened
    pub auto_cancel: bool,
    pub posted_at: DateTime<Local>,
}

impl Notification {
    pub fn body(&self) -> Result<NotificationBody> {
        NotificationBody::from_payload(&self.payload)
    }
}

/// Owner of channels and currently posted notifications.
#[derive(Debug, Default)]
pub struct NotificationManager {
    channels: BTreeMap<String, NotificationChannel>,
    active: BTreeMap<u32, Notification>,
}

impl NotificationManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a channel. Creating an existing channel only refreshes its
    /// name and description.
    pub fn create_notification_channel(&mut self, channel: NotificationChannel) {
        match self.channels.get_mut(&channel.id) {
            Some(existing) => {
                existing.name = channel.name;
                existing.description = channel.description;
            }
            None => {
                tracing::debug!(
                    "Created notification channel '{}' ({:?}, lights={} {}, vibration={}, badge={})",
                    channel.id,
                    channel.importance,
                    channel.enable_lights,
                    channel.light_color,
                    channel.enable_vibration,
                    channel.show_badge
                );
                self.channels.insert(channel.id.clone(), channel);
            }
        }
    }

    pub fn channel(&self, id: &str) -> Option<&NotificationChannel> {
        self.channels.get(id)
    }

    /// Post a notification, replacing any with the same id.
    pub fn notify(&mut self, notification: Notification) -> Result<()> {
        if !self.channels.contains_key(&notification.channel_id) {
            anyhow::bail!(
                "Notification channel '{}' does not exist",
                notification.channel_id
            );
        }
        if self.active.insert(notification.id, notification).is_some() {
            tracing::debug!("Replaced existing notification");
        }
        Ok(())
    }

    /// Build and post the download-finished notification for `body`.
    pub fn send_notification(&mut self, strings: &Strings, body: &NotificationBody) -> Result<()> {
        self.create_notification_channel(NotificationChannel::downloads(strings));

        let notification = Notification {
            id: NOTIFICATION_ID,
            channel_id: strings.channel_id.clone(),
            content_title: strings.notification_title.clone(),
            content_text: body.description.clone(),
            action_label: Some(strings.notification_button.clone()),
            payload: body.to_payload()?,
            auto_cancel: true,
            posted_at: Local::now(),
        };

        tracing::info!(
            "Posting notification for '{}' ({})",
            body.title,
            body.status
        );
        self.notify(notification)
    }

    /// Tap (or action) on a notification: returns its body and removes it when
    /// auto-cancel is set. Returns `None` for unknown ids.
    pub fn open(&mut self, id: u32) -> Option<Result<NotificationBody>> {
        let notification = self.active.get(&id)?;
        let body = notification.body();
        if notification.auto_cancel {
            self.active.remove(&id);
        }
        Some(body)
    }

    pub fn cancel_notifications(&mut self) {
        if !self.active.is_empty() {
            tracing::debug!("Clearing {} notifications", self.active.len());
        }
        self.active.clear();
    }

    /// Posted notifications, newest first.
    pub fn active_notifications(&self) -> Vec<&Notification> {
        let mut list: Vec<&Notification> = self.active.values().collect();
        list.sort_by(|a, b| b.posted_at.cmp(&a.posted_at));
        list
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.active_notifications().into_iter().next()
    }
}

#[cfg(test)]
impl NotificationManager {
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn strings() -> Strings {
        Config::embedded().unwrap().strings
    }

    #[test]
    fn test_payload_survives_screen_boundary() {
        let body = NotificationBody::new("archive.zip", "Success!", "Success!");
        let payload = body.to_payload().unwrap();
        assert_eq!(NotificationBody::from_payload(&payload).unwrap(), body);
        assert!(NotificationBody::from_payload("not json").is_err());
    }

    #[test]
    fn test_send_creates_channel_once() {
        let strings = strings();
        let mut manager = NotificationManager::new();
        let body = NotificationBody::new("Glide", "Success!", "Success!");

        manager.send_notification(&strings, &body).unwrap();
        manager.send_notification(&strings, &body).unwrap();

        assert_eq!(manager.channel_count(), 1);
        let channel = manager.channel(&strings.channel_id).unwrap();
        assert_eq!(channel.importance, Importance::High);
        assert!(channel.enable_lights);
        assert!(channel.enable_vibration);
    }

    #[test]
    fn test_same_id_replaces() {
        let strings = strings();
        let mut manager = NotificationManager::new();
        manager
            .send_notification(&strings, &NotificationBody::new("Glide", "Failed", "Failed"))
            .unwrap();
        manager
            .send_notification(&strings, &NotificationBody::new("Retrofit", "Success!", "Success!"))
            .unwrap();

        let active = manager.active_notifications();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, NOTIFICATION_ID);
        assert_eq!(active[0].content_text, "Success!");
        assert_eq!(active[0].content_title, strings.notification_title);
        assert_eq!(active[0].action_label.as_deref(), Some("Check the status"));
        assert_eq!(active[0].body().unwrap().title, "Retrofit");
    }

    #[test]
    fn test_open_auto_cancels() {
        let strings = strings();
        let mut manager = NotificationManager::new();
        let body = NotificationBody::new("archive.zip", "Success!", "Success!");
        manager.send_notification(&strings, &body).unwrap();

        let opened = manager.open(NOTIFICATION_ID).unwrap().unwrap();
        assert_eq!(opened, body);
        assert!(manager.is_empty());
        assert!(manager.open(NOTIFICATION_ID).is_none());
    }

    #[test]
    fn test_notify_requires_channel() {
        let mut manager = NotificationManager::new();
        let notification = Notification {
            id: 1,
            channel_id: "missing".to_string(),
            content_title: String::new(),
            content_text: String::new(),
            action_label: None,
            payload: String::new(),
            auto_cancel: false,
            posted_at: Local::now(),
        };
        assert!(manager.notify(notification).is_err());
    }

    #[test]
    fn test_cancel_notifications() {
        let strings = strings();
        let mut manager = NotificationManager::new();
        manager
            .send_notification(&strings, &NotificationBody::new("a", "b", "c"))
            .unwrap();
        assert!(manager.latest().is_some());
        manager.cancel_notifications();
        assert!(manager.is_empty());
        assert!(manager.latest().is_none());
    }
}
