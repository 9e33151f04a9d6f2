#![forbid(unsafe_code)]

use std::cmp::Ordering;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use crate::model::Entry;

/// Everything the panes and terminal builtins need from the filesystem.
pub trait Filesystem {
    /// Entries of `path`, directories first, then by name ignoring case.
    fn list_directory(&self, path: &Path) -> io::Result<Vec<Entry>>;
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;
    /// Creates `path` if missing. Existing content is left alone.
    fn create_file(&self, path: &Path) -> io::Result<()>;
    fn create_directory(&self, path: &Path) -> io::Result<()>;
    fn remove_file(&self, path: &Path) -> io::Result<()>;
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
    fn copy(&self, from: &Path, to: &Path) -> io::Result<()>;
    fn is_directory(&self, path: &Path) -> bool;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

impl Filesystem for LocalFs {
    fn list_directory(&self, path: &Path) -> io::Result<Vec<Entry>> {
        read_entries(path)
    }

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn create_file(&self, path: &Path) -> io::Result<()> {
        OpenOptions::new().create(true).append(true).open(path)?;
        Ok(())
    }

    fn create_directory(&self, path: &Path) -> io::Result<()> {
        fs::create_dir(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::copy(from, to).map(|_| ())
    }

    fn is_directory(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

pub fn read_entries(dir: &Path) -> io::Result<Vec<Entry>> {
    let mut entries = Vec::new();
    for item in fs::read_dir(dir)? {
        let item = item?;
        // follow symlinks so a link to a directory can be entered
        let metadata = match fs::metadata(item.path()) {
            Ok(metadata) => metadata,
            Err(_) => item.metadata()?,
        };
        let file_name = item.file_name();
        entries.push(Entry {
            name: file_name.to_string_lossy().into_owned(),
            file_name,
            is_dir: metadata.is_dir(),
            size: metadata.len(),
            modified: metadata.modified().ok(),
        });
    }
    sort_entries(&mut entries);
    Ok(entries)
}

pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by(|a, b| {
        if a.is_dir != b.is_dir {
            return if a.is_dir { Ordering::Less } else { Ordering::Greater };
        }
        cmp_name(a, b)
    });
}

pub fn cmp_name(a: &Entry, b: &Entry) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
}

pub fn format_time(time: Option<SystemTime>) -> String {
    let Some(time) = time else {
        return String::new();
    };
    let Ok(format) = time::format_description::parse("[day]-[month]-[year repr:last_two] [hour]:[minute]")
    else {
        return String::new();
    };
    let offset = time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC);
    time::OffsetDateTime::from(time)
        .to_offset(offset)
        .format(&format)
        .unwrap_or_default()
}

/// Resolves `arg` against `cwd` without touching the filesystem.
pub fn resolve(cwd: &Path, arg: &str) -> PathBuf {
    normalize(&cwd.join(arg))
}

/// Lexically removes `.` and `..` components. `..` at the root stays at
/// the root.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}
