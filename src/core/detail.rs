//! Detail screen: shows the body of an opened download notification.

use crate::config::{parse_color, StatusColors, Strings};
use crate::notification::NotificationBody;
use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailScreen {
    body: NotificationBody,
    kind: StatusKind,
    status_color: Color,
}

impl DetailScreen {
    /// The status counts as success only when it matches the configured
    /// success string; anything else is rendered as a failure.
    pub fn new(body: NotificationBody, strings: &Strings, colors: &StatusColors) -> Self {
        let (kind, color) = if body.status == strings.success {
            (StatusKind::Success, parse_color(&colors.success).unwrap_or(Color::Green))
        } else {
            (StatusKind::Failure, parse_color(&colors.failure).unwrap_or(Color::Red))
        };

        Self {
            body,
            kind,
            status_color: color,
        }
    }

    pub fn title(&self) -> &str {
        &self.body.title
    }

    pub fn status(&self) -> &str {
        &self.body.status
    }

    pub fn description(&self) -> &str {
        &self.body.description
    }

    pub fn kind(&self) -> StatusKind {
        self.kind
    }

    pub fn status_color(&self) -> Color {
        self.status_color
    }
}
