#![forbid(unsafe_code)]

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::SystemTime;

/// `name` is for display and may be lossy; paths are built from `file_name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub file_name: OsString,
    pub is_dir: bool,
    pub size: u64,
    pub modified: Option<SystemTime>,
}

impl Entry {
    /// Directories are shown with a trailing `/`.
    pub fn display_name(&self) -> String {
        if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneSide {
    Left,
    Right,
}

impl PaneSide {
    pub fn other(self) -> Self {
        match self {
            PaneSide::Left => PaneSide::Right,
            PaneSide::Right => PaneSide::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    Left,
    Right,
    Terminal,
}

impl From<PaneSide> for FocusTarget {
    fn from(side: PaneSide) -> Self {
        match side {
            PaneSide::Left => FocusTarget::Left,
            PaneSide::Right => FocusTarget::Right,
        }
    }
}

/// One directory view. `cursor` and `offset` are always valid for
/// `entries`: both are zero when the list is empty.
#[derive(Debug, Clone)]
pub struct Pane {
    pub cwd: PathBuf,
    pub entries: Vec<Entry>,
    pub cursor: usize,
    pub offset: usize,
    pub show_hidden: bool,
}

impl Pane {
    pub fn new(cwd: PathBuf, show_hidden: bool) -> Self {
        Self {
            cwd,
            entries: Vec::new(),
            cursor: 0,
            offset: 0,
            show_hidden,
        }
    }
}

#[cfg(test)]
impl Entry {
    pub fn file(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            file_name: OsString::from(&name),
            name,
            is_dir: false,
            size: 0,
            modified: None,
        }
    }

    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            is_dir: true,
            ..Self::file(name)
        }
    }
}
