use super::detail::DetailScreen;
use super::input_router::Action;
use super::state::{Screen, Toast};
use crate::config::{Config, DownloadTarget};
use crate::download::{DownloadEvent, DownloadId, DownloadRequest, DownloadService};
use crate::notification::{NotificationBody, NotificationManager};
use crate::widgets::{ButtonState, ButtonStyle, ProgressButton};
use std::time::{Duration, Instant};

/// Core application state (frontend-agnostic)
///
/// Owns the selection, the progress button, the notification tray and the
/// current screen. Collaborators that talk to the outside world (the download
/// service) are passed in per call so tests can hand in a fake.
pub struct AppCore {
    /// Application configuration
    pub config: Config,

    /// Application running flag
    pub running: bool,

    /// Set whenever something visible changed since the last frame
    pub needs_render: bool,

    /// Current screen
    pub screen: Screen,

    /// Progress button on the main screen
    pub button: ProgressButton,

    /// Posted notifications
    pub notifications: NotificationManager,

    /// Transient message line
    pub toast: Option<Toast>,

    /// Highlighted row in the target list
    pub cursor: usize,

    /// Chosen target (radio selection), if any
    selected: Option<usize>,

    /// Id of the transfer the button is waiting on
    active_download: Option<DownloadId>,
}

impl AppCore {
    pub fn new(config: Config) -> Self {
        let button = ProgressButton::new(ButtonStyle::from_config(&config.button, &config.strings));
        Self {
            config,
            running: true,
            needs_render: true,
            screen: Screen::Main,
            button,
            notifications: NotificationManager::new(),
            toast: None,
            cursor: 0,
            selected: None,
            active_download: None,
        }
    }

    pub fn targets(&self) -> &[DownloadTarget] {
        &self.config.downloads.targets
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_target(&self) -> Option<&DownloadTarget> {
        self.selected.and_then(|idx| self.targets().get(idx))
    }

    pub fn active_download(&self) -> Option<DownloadId> {
        self.active_download
    }

    /// Apply a routed action.
    pub fn apply(&mut self, action: Action, service: &mut dyn DownloadService, now: Instant) {
        match action {
            Action::Quit => self.running = false,
            Action::CursorUp => self.move_cursor(-1),
            Action::CursorDown => self.move_cursor(1),
            Action::SelectCursor => self.select_target(self.cursor),
            Action::Select(idx) => self.select_target(idx),
            Action::Click => self.click_button(service, now),
            Action::OpenNotification => self.open_latest_notification(),
            Action::Dismiss => self.dismiss_detail(),
            Action::None => return,
        }
        self.needs_render = true;
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = self.targets().len();
        if len == 0 {
            return;
        }
        self.cursor = (self.cursor as isize + delta).rem_euclid(len as isize) as usize;
    }

    /// Radio selection. Out-of-range indices are ignored.
    pub fn select_target(&mut self, idx: usize) {
        if let Some(target) = self.targets().get(idx) {
            tracing::debug!("Selected download target '{}'", target.key);
            self.selected = Some(idx);
            self.cursor = idx;
        }
    }

    pub fn show_toast(&mut self, message: impl Into<String>, now: Instant) {
        let message = message.into();
        tracing::info!("Toast: {}", message);
        let duration = Duration::from_millis(self.config.ui.toast_duration_ms);
        self.toast = Some(Toast::new(message, now, duration));
        self.needs_render = true;
    }

    /// The user pressed the progress button.
    pub fn click_button(&mut self, service: &mut dyn DownloadService, now: Instant) {
        if !self.button.is_enabled() {
            tracing::debug!("Ignoring click while a download is in flight");
            return;
        }

        let Some(target) = self.selected_target().cloned() else {
            let message = self.config.strings.empty_option.clone();
            self.show_toast(message, now);
            return;
        };

        self.button.set_state_at(ButtonState::Clicked, now);
        self.button.set_state_at(ButtonState::Loading, now);

        let request = DownloadRequest::new(target.url.clone())
            .title(target.title.clone())
            .description(target.description.clone())
            .requires_charging(false)
            .allowed_over_metered(true)
            .allowed_over_roaming(true);

        match service.enqueue(request) {
            Ok(id) => {
                tracing::info!("Download {} started for '{}'", id, target.key);
                self.active_download = Some(id);
            }
            Err(e) => {
                tracing::warn!("Failed to enqueue '{}': {}", target.key, e);
                self.button.set_state_at(ButtonState::Completed, now);
                let message = format!("{}: {}", self.config.strings.failed, e);
                self.show_toast(message, now);
            }
        }
        self.needs_render = true;
    }

    /// Completion broadcast from the download service.
    pub fn handle_download_event(&mut self, event: DownloadEvent, service: &dyn DownloadService) {
        let DownloadEvent::Complete { id } = event;
        if self.active_download != Some(id) {
            tracing::debug!("Ignoring completion for unrelated download {}", id);
            return;
        }
        self.active_download = None;

        let strings = &self.config.strings;
        let body = match service.query(id) {
            Some(record) if record.status.is_successful() => {
                tracing::info!(
                    "Download {} saved {} bytes to {:?}",
                    record.id,
                    record.bytes_downloaded,
                    record.destination
                );
                NotificationBody::new(record.title, &strings.success, &strings.success)
            }
            Some(record) => {
                tracing::warn!(
                    "Download {} ({}) from {} ended with {:?} after {} of {:?} bytes",
                    record.id,
                    record.description,
                    record.url,
                    record.status,
                    record.bytes_downloaded,
                    record.total_bytes
                );
                NotificationBody::new(record.title, &strings.failed, &strings.failed)
            }
            None => {
                tracing::warn!("No record for finished download {}", id);
                let title = self
                    .selected_target()
                    .map(|t| t.title.clone())
                    .unwrap_or_default();
                NotificationBody::new(title, &strings.failed, &strings.failed)
            }
        };

        self.button.set_state(ButtonState::Completed);

        if let Err(e) = self
            .notifications
            .send_notification(&self.config.strings, &body)
        {
            tracing::warn!("Failed to post notification: {:#}", e);
        }
        self.needs_render = true;
    }

    /// Tap on the newest notification in the tray.
    pub fn open_latest_notification(&mut self) {
        let Some(id) = self.notifications.latest().map(|n| n.id) else {
            return;
        };
        self.open_notification(id);
    }

    pub fn open_notification(&mut self, id: u32) {
        match self.notifications.open(id) {
            Some(Ok(body)) => self.show_detail(body),
            Some(Err(e)) => tracing::warn!("Unreadable notification payload: {:#}", e),
            None => tracing::debug!("Notification {} no longer posted", id),
        }
    }

    /// Switch to the detail screen. Showing it clears the tray.
    pub fn show_detail(&mut self, body: NotificationBody) {
        self.notifications.cancel_notifications();
        self.screen = Screen::Detail(DetailScreen::new(
            body,
            &self.config.strings,
            &self.config.colors,
        ));
        self.needs_render = true;
    }

    pub fn dismiss_detail(&mut self) {
        if matches!(self.screen, Screen::Detail(_)) {
            self.screen = Screen::Main;
            self.needs_render = true;
        }
    }

    /// Per-frame housekeeping: animation and toast expiry.
    pub fn tick(&mut self, now: Instant) {
        if self.button.tick(now) {
            self.needs_render = true;
        }
        if self.toast.as_ref().is_some_and(|t| t.is_expired(now)) {
            self.toast = None;
            self.needs_render = true;
        }
    }
}
