//! Paints the progress button's draw operations into a ratatui buffer.
//!
//! The fill rectangle only recolors the background so the caption painted
//! before it stays readable on top of the sweep.

use crate::widgets::DrawOp;
use ratatui::{buffer::Buffer, layout::Rect, style::Style};

pub fn paint(ops: &[DrawOp], area: Rect, buf: &mut Buffer) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    for op in ops {
        match op {
            DrawOp::Background { color } => {
                fill(area, buf, 0, 0, area.width, area.height, |cell| {
                    cell.set_char(' ');
                    cell.set_bg(*color);
                });
            }
            DrawOp::Text { text, x, y, color } => {
                if *x >= area.width || *y >= area.height {
                    continue;
                }
                let pos = (area.x + *x, area.y + *y);
                if !in_buffer(buf, pos) {
                    continue;
                }
                // Advances by display width, so wide glyphs take two cells
                let right = (area.x + area.width).min(buf.area().right());
                let max_width = usize::from(right - pos.0);
                buf.set_stringn(pos.0, pos.1, text, max_width, Style::default().fg(*color));
            }
            DrawOp::Rect {
                x0,
                y0,
                x1,
                y1,
                color,
            } => {
                fill(area, buf, *x0, *y0, *x1, *y1, |cell| {
                    cell.set_bg(*color);
                });
            }
            DrawOp::Arc { x, y, sweep, color } => {
                if *x >= area.width || *y >= area.height {
                    continue;
                }
                let pos = (area.x + *x, area.y + *y);
                if in_buffer(buf, pos) {
                    buf[pos].set_char(arc_glyph(*sweep));
                    buf[pos].set_fg(*color);
                }
            }
        }
    }
}

/// Closest circle glyph for a pie sweep in degrees.
pub fn arc_glyph(sweep: u16) -> char {
    match sweep {
        0 => '○',
        1..=89 => '◔',
        90..=179 => '◑',
        180..=269 => '◕',
        _ => '●',
    }
}

fn in_buffer(buf: &Buffer, (x, y): (u16, u16)) -> bool {
    let bounds = buf.area();
    x >= bounds.x && y >= bounds.y && x < bounds.x + bounds.width && y < bounds.y + bounds.height
}

fn fill(
    area: Rect,
    buf: &mut Buffer,
    x0: u16,
    y0: u16,
    x1: u16,
    y1: u16,
    mut apply: impl FnMut(&mut ratatui::buffer::Cell),
) {
    for row in y0..y1.min(area.height) {
        for col in x0..x1.min(area.width) {
            let pos = (area.x + col, area.y + row);
            if in_buffer(buf, pos) {
                apply(&mut buf[pos]);
            }
        }
    }
}
