//! Detail screen: file name, colored status, description and an OK button.

use super::main_screen::render_toolbar;
use crate::core::detail::{DetailScreen, StatusKind};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetailLayout {
    pub ok: Rect,
}

const OK_LABEL: &str = "OK";

pub fn render(title: &str, detail: &DetailScreen, area: Rect, buf: &mut Buffer) -> DetailLayout {
    let [toolbar, content, _, ok_row, help] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(8),
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_toolbar(title, toolbar, buf);

    let label = Style::default().fg(Color::DarkGray);
    let lines = vec![
        Line::from(Span::styled("File name", label)),
        Line::from(Span::styled(
            detail.title().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled("Status", label)),
        Line::from(Span::styled(
            format!("{} {}", status_mark(detail.kind()), detail.status()),
            Style::default().fg(detail.status_color()),
        )),
        Line::from(detail.description().to_string()),
    ];
    let block = Block::default().borders(Borders::ALL).title(" Details ");
    Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true })
        .render(content, buf);

    let ok_width = (OK_LABEL.len() as u16 + 8).min(ok_row.width);
    let ok = Rect::new(
        ok_row.x + ok_row.width.saturating_sub(ok_width) / 2,
        ok_row.y,
        ok_width,
        ok_row.height,
    );
    Paragraph::new(OK_LABEL)
        .centered()
        .block(Block::default().borders(Borders::ALL))
        .render(ok, buf);

    Paragraph::new("enter/esc back  q quit")
        .style(Style::default().fg(Color::DarkGray))
        .render(help, buf);

    DetailLayout { ok }
}

fn status_mark(kind: StatusKind) -> char {
    match kind {
        StatusKind::Success => '✔',
        StatusKind::Failure => '✘',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::notification::NotificationBody;

    fn find(buf: &Buffer, area: Rect, needle: &str) -> Option<(u16, u16)> {
        for y in area.y..area.y + area.height {
            let row: String = (area.x..area.x + area.width)
                .map(|x| buf[(x, y)].symbol().to_string())
                .collect();
            if let Some(idx) = row.find(needle) {
                let col = row[..idx].chars().count() as u16;
                return Some((area.x + col, y));
            }
        }
        None
    }

    fn render_body(status: &str) -> (Buffer, Rect, DetailScreen) {
        let config = Config::embedded().unwrap();
        let detail = DetailScreen::new(
            NotificationBody::new("archive.zip", status, status),
            &config.strings,
            &config.colors,
        );
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        render("LoadApp", &detail, area, &mut buf);
        (buf, area, detail)
    }

    #[test]
    fn test_success_status_is_green() {
        let (buf, area, detail) = render_body("Success!");
        assert!(find(&buf, area, "archive.zip").is_some());
        let (x, y) = find(&buf, area, "Success!").unwrap();
        assert_eq!(buf[(x, y)].fg, detail.status_color());
        assert_eq!(buf[(x, y)].fg, Color::Rgb(0x00, 0xc8, 0x53));
    }

    #[test]
    fn test_failed_status_is_red() {
        let (buf, area, _) = render_body("Failed");
        let (x, y) = find(&buf, area, "Failed").unwrap();
        assert_eq!(buf[(x, y)].fg, Color::Rgb(0xef, 0x53, 0x50));
        assert!(find(&buf, area, "✘").is_some());
        assert!(find(&buf, area, "✔").is_none());
    }

    #[test]
    fn test_ok_button_is_centered() {
        let config = Config::embedded().unwrap();
        let detail = DetailScreen::new(
            NotificationBody::new("a", "b", "c"),
            &config.strings,
            &config.colors,
        );
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        let layout = render("LoadApp", &detail, area, &mut buf);
        assert_eq!(layout.ok.width, 10);
        assert_eq!(layout.ok.x, 25);
        assert_eq!(layout.ok.y, 16);
    }
}
