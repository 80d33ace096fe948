//! Main screen: toolbar, target list, progress button, toast line and the
//! notification tray.

use super::progress_button::paint;
use crate::core::AppCore;
use crate::notification::NotificationManager;
use crate::widgets::{Constraints, MeasureSpec};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Where things landed on the last frame, for mouse hit-testing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MainLayout {
    /// Inner area of the target list, one row per target
    pub targets: Rect,
    pub button: Rect,
    pub tray: Rect,
}

const HELP: &str = "↑/↓ move  space select  enter download  n open notification  q quit";

pub fn render(core: &mut AppCore, area: Rect, buf: &mut Buffer) -> MainLayout {
    // First pass asks for the natural height, the final pass hands over the
    // row the layout actually granted.
    let button_width = area.width.saturating_sub(4);
    let wanted = core.button.measure(Constraints {
        width: MeasureSpec::AtMost(button_width),
        height: MeasureSpec::Unspecified,
    });

    let list_height = core.targets().len() as u16 + 2;
    let [toolbar, list, _, button_row, toast, tray, help] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(list_height),
        Constraint::Min(0),
        Constraint::Length(wanted.height),
        Constraint::Length(1),
        Constraint::Length(5),
        Constraint::Length(1),
    ])
    .areas(area);

    render_toolbar(&core.config.ui.title, toolbar, buf);
    let targets = render_targets(core, list, buf);

    let button = Rect::new(
        button_row.x + 2,
        button_row.y,
        button_width.min(button_row.width),
        button_row.height,
    );
    core.button.measure(Constraints::exactly(button.width, button.height));
    paint(&core.button.render(), button, buf);

    if let Some(message) = core.toast.as_ref().map(|t| t.message.as_str()) {
        Paragraph::new(Line::from(Span::styled(
            format!(" {} ", message),
            Style::default().add_modifier(Modifier::REVERSED),
        )))
        .centered()
        .render(toast, buf);
    }

    render_tray(&core.notifications, tray, buf);

    Paragraph::new(HELP)
        .style(Style::default().fg(Color::DarkGray))
        .render(help, buf);

    MainLayout {
        targets,
        button,
        tray,
    }
}

pub fn render_toolbar(title: &str, area: Rect, buf: &mut Buffer) {
    Paragraph::new(Line::from(Span::styled(
        format!(" {}", title),
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .style(Style::default().fg(Color::White).bg(Color::Rgb(0x00, 0x43, 0x49)))
    .render(area, buf);
}

fn render_targets(core: &AppCore, area: Rect, buf: &mut Buffer) -> Rect {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Choose a file ");
    let inner = block.inner(area);
    block.render(area, buf);

    let lines: Vec<Line> = core
        .targets()
        .iter()
        .enumerate()
        .map(|(idx, target)| {
            let marker = if core.selected() == Some(idx) { "(•)" } else { "( )" };
            let mut style = Style::default();
            if idx == core.cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            Line::from(Span::styled(format!("{} {}", marker, target.label), style))
        })
        .collect();
    Paragraph::new(lines).render(inner, buf);

    inner
}

fn render_tray(notifications: &NotificationManager, area: Rect, buf: &mut Buffer) {
    let latest = notifications.latest();
    let title = match latest.and_then(|n| notifications.channel(&n.channel_id)) {
        Some(channel) => format!(" Notifications: {} ", channel.name),
        None => " Notifications ".to_string(),
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    block.render(area, buf);

    let lines = match latest {
        Some(notification) => {
            let mut lines = vec![
                Line::from(vec![
                    Span::styled(
                        notification.content_title.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("  {}", notification.posted_at.format("%H:%M:%S")),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]),
                Line::from(notification.content_text.clone()),
            ];
            if let Some(label) = &notification.action_label {
                lines.push(Line::from(Span::styled(
                    format!("[ {} ]", label),
                    Style::default().fg(Color::Cyan),
                )));
            }
            lines
        }
        None => vec![Line::from(Span::styled(
            "No notifications",
            Style::default().fg(Color::DarkGray),
        ))],
    };
    Paragraph::new(lines).render(inner, buf);
}
