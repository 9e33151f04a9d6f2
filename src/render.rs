#![forbid(unsafe_code)]

//! Deterministic text layout of the whole screen.
//!
//! Rendering never touches the filesystem or the terminal: the same state
//! and size always produce the same rows, each exactly `width` cells wide.
//! `ui` paints these rows with colours.

use crate::app::AppState;
use crate::model::{Pane, PaneSide};
use crate::scroll::ScrollWindow;
use crate::terminal::TerminalSession;
use crate::text::{ellipsize_left, fit_to_width, sanitize_line, str_width, tail_to_width};

pub const MIN_WIDTH: u16 = 12;
pub const MIN_HEIGHT: u16 = 7;
pub const PANE_GAP: u16 = 2;
const MIN_PANEL_HEIGHT: u16 = 3;
const MIN_TERMINAL_HEIGHT: u16 = 3;
const TOO_SMALL: &str = "terminal too small";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxRect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl BoxRect {
    pub fn inner_width(&self) -> usize {
        usize::from(self.width.saturating_sub(2))
    }

    pub fn inner_height(&self) -> usize {
        usize::from(self.height.saturating_sub(2))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub left: BoxRect,
    pub right: BoxRect,
    pub terminal: BoxRect,
}

impl Layout {
    /// `None` when the screen is below the minimum usable size.
    pub fn compute(width: u16, height: u16, panel_percent: u16) -> Option<Self> {
        if width < MIN_WIDTH || height < MIN_HEIGHT {
            return None;
        }
        let panes_width = width - PANE_GAP;
        let left_width = panes_width / 2;
        let right_width = panes_width - left_width;
        let wanted = u32::from(height) * u32::from(panel_percent) / 100;
        let panel_height = u16::try_from(wanted)
            .unwrap_or(height)
            .clamp(MIN_PANEL_HEIGHT, height - MIN_TERMINAL_HEIGHT);
        Some(Self {
            left: BoxRect {
                x: 0,
                y: 0,
                width: left_width,
                height: panel_height,
            },
            right: BoxRect {
                x: left_width + PANE_GAP,
                y: 0,
                width: right_width,
                height: panel_height,
            },
            terminal: BoxRect {
                x: 0,
                y: panel_height,
                width,
                height: height - panel_height,
            },
        })
    }

    pub fn pane(&self, side: PaneSide) -> BoxRect {
        match side {
            PaneSide::Left => self.left,
            PaneSide::Right => self.right,
        }
    }

    /// Entry rows per pane.
    pub fn pane_viewport(&self) -> usize {
        self.left.inner_height()
    }

    /// Output rows in the terminal box; one inner row holds the input line.
    pub fn terminal_viewport(&self) -> usize {
        self.terminal.inner_height().saturating_sub(1)
    }
}

/// Rows of one bordered box. `highlight` is the row holding the cursor
/// entry, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxText {
    pub lines: Vec<String>,
    pub focused: bool,
    pub highlight: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedFrame {
    TooSmall {
        lines: Vec<String>,
    },
    Full {
        layout: Layout,
        left: BoxText,
        right: BoxText,
        terminal: BoxText,
    },
}

impl RenderedFrame {
    pub fn lines(&self) -> Vec<String> {
        match self {
            RenderedFrame::TooSmall { lines } => lines.clone(),
            RenderedFrame::Full {
                left,
                right,
                terminal,
                ..
            } => {
                let gap = " ".repeat(usize::from(PANE_GAP));
                let mut rows: Vec<String> = left
                    .lines
                    .iter()
                    .zip(&right.lines)
                    .map(|(l, r)| format!("{l}{gap}{r}"))
                    .collect();
                rows.extend(terminal.lines.iter().cloned());
                rows
            }
        }
    }

    pub fn to_text(&self) -> String {
        self.lines().join("\n")
    }
}

pub fn render_frame(state: &AppState, width: u16, height: u16) -> RenderedFrame {
    let Some(layout) = Layout::compute(width, height, state.panel_percent) else {
        return too_small(width, height);
    };
    let focused = state.focus.focused_pane();
    let pane_box = |side| render_pane(state.pane(side), layout.pane(side), focused == Some(side));
    RenderedFrame::Full {
        layout,
        left: pane_box(PaneSide::Left),
        right: pane_box(PaneSide::Right),
        terminal: render_terminal(&state.terminal, layout.terminal, state.focus.is_terminal()),
    }
}

fn too_small(width: u16, height: u16) -> RenderedFrame {
    let width = usize::from(width);
    let lines = (0..height)
        .map(|row| fit_to_width(if row == 0 { TOO_SMALL } else { "" }, width))
        .collect();
    RenderedFrame::TooSmall { lines }
}

pub fn render_pane(pane: &Pane, rect: BoxRect, focused: bool) -> BoxText {
    let inner = rect.inner_width();
    let viewport = rect.inner_height();
    let window = ScrollWindow::compute(pane.entries.len(), viewport, pane.cursor, pane.offset);

    let mut lines = Vec::with_capacity(usize::from(rect.height));
    let mut highlight = None;
    lines.push(top_border(&pane.cwd.display().to_string(), inner, focused));
    for row in 0..viewport {
        let index = window.start + row;
        let content = match pane.entries.get(index) {
            Some(entry) if index < window.end => {
                let marker = if index == pane.cursor {
                    highlight = Some(row + 1);
                    '>'
                } else {
                    ' '
                };
                format!("{marker} {}", entry.display_name())
            }
            _ => String::new(),
        };
        lines.push(side_row(&content, inner));
    }
    let footer = (!pane.entries.is_empty()).then(|| format!("{}/{}", pane.cursor + 1, pane.entries.len()));
    lines.push(bottom_border(footer.as_deref(), inner, focused));

    BoxText {
        lines,
        focused,
        highlight,
    }
}

pub fn render_terminal(session: &TerminalSession, rect: BoxRect, focused: bool) -> BoxText {
    let inner = rect.inner_width();
    let viewport = rect.inner_height().saturating_sub(1);
    let output = session.output();
    let window = ScrollWindow::from_tail(output.len(), viewport, session.scroll_offset());

    let mut lines = Vec::with_capacity(usize::from(rect.height));
    lines.push(top_border(&session.cwd().display().to_string(), inner, focused));
    let mut visible = output.range(window.range());
    for _ in 0..viewport {
        let content = visible.next().map_or("", String::as_str);
        lines.push(side_row(content, inner));
    }
    lines.push(side_row(&input_line(session, inner, focused), inner));
    let footer = (window.offset > 0).then(|| format!("scroll {}", window.offset));
    lines.push(bottom_border(footer.as_deref(), inner, focused));

    BoxText {
        lines,
        focused,
        highlight: None,
    }
}

/// `$ before_after` with leading text dropped so the cursor stays on screen.
fn input_line(session: &TerminalSession, width: usize, focused: bool) -> String {
    let (before, after) = session.input().split_at(session.edit_cursor());
    let before: String = before.iter().collect();
    let after: String = after.iter().collect();
    let marker = if focused { "_" } else { "" };
    let head = format!("$ {before}{marker}");
    let head = if str_width(&head) > width {
        tail_to_width(&head, width)
    } else {
        head
    };
    fit_to_width(&format!("{head}{after}"), width)
}

fn border_fill(focused: bool) -> &'static str {
    if focused { "=" } else { "-" }
}

fn top_border(title: &str, inner: usize, focused: bool) -> String {
    let fill = border_fill(focused);
    if inner < 4 {
        return format!("+{}+", fill.repeat(inner));
    }
    let label = format!(" {} ", ellipsize_left(&sanitize_line(title), inner - 3));
    let rest = inner - 1 - str_width(&label);
    format!("+{fill}{label}{}+", fill.repeat(rest))
}

fn bottom_border(label: Option<&str>, inner: usize, focused: bool) -> String {
    let fill = border_fill(focused);
    match label {
        Some(label) if str_width(label) + 3 <= inner => {
            let label = format!(" {label} ");
            let rest = inner - 1 - str_width(&label);
            format!("+{}{label}{fill}+", fill.repeat(rest))
        }
        _ => format!("+{}+", fill.repeat(inner)),
    }
}

/// File names and typed input may carry newlines, tabs or escapes.
fn side_row(content: &str, inner: usize) -> String {
    format!("|{}|", fit_to_width(&sanitize_line(content), inner))
}
