#![forbid(unsafe_code)]

use std::path::PathBuf;

use tracing::{info, warn};

use crate::fs_ops::Filesystem;
use crate::model::{Entry, Pane};
use crate::scroll::ScrollWindow;

/// What happened when the cursor entry was activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Entered,
    FileOpened(PathBuf),
    Nothing,
}

impl Pane {
    /// Re-reads the listing and resets the cursor. A directory that cannot
    /// be read shows as empty.
    pub fn refresh(&mut self, fs: &dyn Filesystem) {
        let listing = match fs.list_directory(&self.cwd) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(path = %self.cwd.display(), %err, "directory listing failed");
                Vec::new()
            }
        };
        self.entries = if self.show_hidden {
            listing
        } else {
            listing.into_iter().filter(|e| !e.is_hidden()).collect()
        };
        self.cursor = 0;
        self.offset = 0;
    }

    pub fn selected_entry(&self) -> Option<&Entry> {
        self.entries.get(self.cursor)
    }

    pub fn move_cursor(&mut self, delta: isize, view_height: usize) {
        if self.entries.is_empty() {
            self.cursor = 0;
            self.offset = 0;
            return;
        }
        let last = self.entries.len() - 1;
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
        self.clamp_view(view_height);
    }

    pub fn move_to_start(&mut self, view_height: usize) {
        self.cursor = 0;
        self.clamp_view(view_height);
    }

    pub fn move_to_end(&mut self, view_height: usize) {
        self.cursor = self.entries.len().saturating_sub(1);
        self.clamp_view(view_height);
    }

    /// Brings `offset` back in line after the cursor moved or the viewport
    /// changed size.
    pub fn clamp_view(&mut self, view_height: usize) {
        let window = ScrollWindow::compute(self.entries.len(), view_height, self.cursor, self.offset);
        self.cursor = self.cursor.min(self.entries.len().saturating_sub(1));
        self.offset = window.offset;
    }

    /// Goes to the parent directory. The root is its own parent.
    pub fn navigate_up(&mut self, fs: &dyn Filesystem) {
        if let Some(parent) = self.cwd.parent() {
            self.cwd = parent.to_path_buf();
            info!(path = %self.cwd.display(), "pane moved up");
            self.refresh(fs);
        }
    }

    pub fn navigate_into(&mut self, entry: &Entry, fs: &dyn Filesystem) -> Navigation {
        let target = self.cwd.join(&entry.file_name);
        if entry.is_dir {
            self.cwd = target;
            info!(path = %self.cwd.display(), "pane entered directory");
            self.refresh(fs);
            Navigation::Entered
        } else {
            Navigation::FileOpened(target)
        }
    }

    pub fn enter_selected(&mut self, fs: &dyn Filesystem) -> Navigation {
        match self.selected_entry().cloned() {
            Some(entry) => self.navigate_into(&entry, fs),
            None => Navigation::Nothing,
        }
    }
}
