#![forbid(unsafe_code)]

use std::io;
use std::path::Path;

use thiserror::Error;

/// Failures of terminal commands. Each one becomes a single `Error: ...`
/// line in the scrollback.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Wrong number of operands.
    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("{command}: unknown option -{flag}")]
    UnknownFlag { command: &'static str, flag: char },

    /// Filesystem operation failed on `path`.
    #[error("{command}: {path}: {source}")]
    Io {
        command: &'static str,
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("cd: {0}: no such directory")]
    NotADirectory(String),

    #[error("cd: home directory unknown")]
    NoHomeDirectory,

    /// The program could not be started at all.
    #[error("{command}: {reason}")]
    Spawn { command: String, reason: String },

    #[error("{command}: exited with status {code}")]
    ExitStatus { command: String, code: i32 },

    #[error("{command}: terminated by signal")]
    Terminated { command: String },
}

impl CommandError {
    pub fn io(command: &'static str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            command,
            path: path.display().to_string(),
            source,
        }
    }

    pub fn to_line(&self) -> String {
        format!("Error: {self}")
    }
}

/// A configuration value that was present but could not be used.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key}: invalid value {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_line_has_single_prefix() {
        let err = CommandError::NotADirectory("nosuchdir".into());
        assert_eq!(err.to_line(), "Error: cd: nosuchdir: no such directory");
    }

    #[test]
    fn io_error_names_path() {
        let err = CommandError::io(
            "cat",
            Path::new("/tmp/missing"),
            io::Error::new(io::ErrorKind::NotFound, "not found"),
        );
        assert_eq!(err.to_line(), "Error: cat: /tmp/missing: not found");
    }
}
