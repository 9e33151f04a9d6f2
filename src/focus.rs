#![forbid(unsafe_code)]

use tracing::debug;

use crate::model::{FocusTarget, PaneSide};

/// Tracks which region receives keys and which pane was last active.
///
/// While the terminal has focus the active pane is remembered so toggling
/// back returns to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusController {
    focus: FocusTarget,
    active_pane: PaneSide,
}

impl Default for FocusController {
    fn default() -> Self {
        Self {
            focus: FocusTarget::Left,
            active_pane: PaneSide::Left,
        }
    }
}

impl FocusController {
    pub fn focus(&self) -> FocusTarget {
        self.focus
    }

    #[cfg(test)]
    pub fn active_pane(&self) -> PaneSide {
        self.active_pane
    }

    pub fn is_terminal(&self) -> bool {
        self.focus == FocusTarget::Terminal
    }

    pub fn focused_pane(&self) -> Option<PaneSide> {
        match self.focus {
            FocusTarget::Left => Some(PaneSide::Left),
            FocusTarget::Right => Some(PaneSide::Right),
            FocusTarget::Terminal => None,
        }
    }

    pub fn toggle_terminal(&mut self) {
        self.focus = if self.is_terminal() {
            self.active_pane.into()
        } else {
            FocusTarget::Terminal
        };
        debug!(focus = ?self.focus, "focus toggled");
    }

    /// No effect while the terminal is focused.
    pub fn set_active_pane(&mut self, side: PaneSide) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.active_pane = side;
        self.focus = side.into();
        debug!(pane = ?side, "active pane");
        true
    }

    pub fn switch_pane(&mut self) -> bool {
        self.set_active_pane(self.active_pane.other())
    }
}
