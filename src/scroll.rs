#![forbid(unsafe_code)]

use std::ops::Range;

/// Visible slice of a list.
///
/// For cursor-driven lists `offset == start`. For tail-anchored lists
/// (terminal scrollback) `offset` counts lines back from the end and
/// `start..end` is the slice that results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollWindow {
    pub offset: usize,
    pub start: usize,
    pub end: usize,
}

impl ScrollWindow {
    const EMPTY: Self = Self {
        offset: 0,
        start: 0,
        end: 0,
    };

    /// Keeps `cursor` inside a viewport of `viewport_height` rows.
    pub fn compute(item_count: usize, viewport_height: usize, cursor: usize, offset: usize) -> Self {
        if item_count == 0 {
            return Self::EMPTY;
        }
        let cursor = cursor.min(item_count - 1);
        if viewport_height == 0 {
            let offset = offset.min(cursor);
            return Self {
                offset,
                start: offset,
                end: offset,
            };
        }
        let offset =
            ensure_visible(cursor, offset, viewport_height).min(item_count.saturating_sub(viewport_height));
        Self {
            offset,
            start: offset,
            end: (offset + viewport_height).min(item_count),
        }
    }

    /// Window over the last lines of a buffer, `back` lines up from the bottom.
    pub fn from_tail(line_count: usize, viewport_height: usize, back: usize) -> Self {
        let back = back.min(max_tail_offset(line_count, viewport_height));
        let end = line_count - back;
        Self {
            offset: back,
            start: end.saturating_sub(viewport_height),
            end,
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

pub fn max_tail_offset(line_count: usize, viewport_height: usize) -> usize {
    line_count.saturating_sub(viewport_height)
}

pub fn ensure_visible(cursor: usize, offset: usize, view_height: usize) -> usize {
    if view_height == 0 {
        return offset;
    }
    if cursor < offset {
        cursor
    } else if cursor >= offset + view_height {
        cursor - (view_height - 1)
    } else {
        offset
    }
}
