#![forbid(unsafe_code)]

use ftui::Frame;
use ftui::core::geometry::Rect;
use ftui::render::cell::PackedRgba;
use ftui::style::Style;
use ftui::text::{Text, WrapMode};
use ftui::widgets::Widget;
use ftui::widgets::block::Block;
use ftui::widgets::paragraph::Paragraph;

use crate::app::{AppState, ThemeColors};
use crate::render::{BoxRect, BoxText, RenderedFrame, render_frame};

pub fn render_screen(frame: &mut Frame, state: &AppState, theme: &ThemeColors) {
    frame.set_cursor(None);
    let full = Rect::new(0, 0, frame.width(), frame.height());
    Block::new()
        .style(Style::new().fg(theme.panel_fg).bg(theme.screen_bg))
        .render(full, frame);

    match render_frame(state, full.width, full.height) {
        RenderedFrame::TooSmall { lines } => {
            Paragraph::new(Text::from(lines.join("\n")))
                .wrap(WrapMode::None)
                .style(Style::new().fg(theme.warning_fg).bg(theme.screen_bg))
                .render(full, frame);
        }
        RenderedFrame::Full {
            layout,
            left,
            right,
            terminal,
        } => {
            paint_box(frame, layout.left, &left, theme.panel_fg, theme);
            paint_box(frame, layout.right, &right, theme.panel_fg, theme);
            paint_box(frame, layout.terminal, &terminal, theme.terminal_fg, theme);
        }
    }
}

fn paint_box(frame: &mut Frame, rect: BoxRect, text: &BoxText, fg: PackedRgba, theme: &ThemeColors) {
    let area = Rect::new(rect.x, rect.y, rect.width, rect.height);
    let border = if text.focused {
        theme.border_active
    } else {
        theme.border_inactive
    };
    Paragraph::new(Text::from(text.lines.join("\n")))
        .wrap(WrapMode::None)
        .style(Style::new().fg(fg).bg(theme.panel_bg))
        .render(area, frame);

    // borders go over the content in their own colour
    let last = text.lines.len().saturating_sub(1);
    for (row, line) in text.lines.iter().enumerate() {
        let y = rect.y + row as u16;
        if row == 0 || row == last {
            paint_line(frame, Rect::new(rect.x, y, rect.width, 1), line, border, theme.panel_bg);
        } else {
            paint_line(frame, Rect::new(rect.x, y, 1, 1), "|", border, theme.panel_bg);
            let right = rect.x + rect.width.saturating_sub(1);
            paint_line(frame, Rect::new(right, y, 1, 1), "|", border, theme.panel_bg);
        }
    }

    if !text.focused {
        return;
    }
    let Some(row) = text.highlight else {
        return;
    };
    let Some(line) = text.lines.get(row) else {
        return;
    };
    // rows are `|content|` with ASCII edges
    let inner = line.get(1..line.len().saturating_sub(1)).unwrap_or("");
    let area = Rect::new(rect.x + 1, rect.y + row as u16, rect.width.saturating_sub(2), 1);
    let marker_end = inner.char_indices().nth(1).map_or(inner.len(), |(i, _)| i);
    paint_line(frame, area, inner, theme.selection_fg, theme.selection_bg);
    paint_line(
        frame,
        Rect::new(area.x, area.y, 1, 1),
        &inner[..marker_end],
        theme.cursor_fg,
        theme.selection_bg,
    );
}

fn paint_line(frame: &mut Frame, area: Rect, text: &str, fg: PackedRgba, bg: PackedRgba) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    Paragraph::new(Text::from(text.to_string()))
        .wrap(WrapMode::None)
        .style(Style::new().fg(fg).bg(bg))
        .render(area, frame);
}
