#![forbid(unsafe_code)]

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

/// Result of running an external program to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutput {
    /// stdout followed by stderr.
    pub output: Vec<u8>,
    pub success: bool,
    /// `None` when the process was killed by a signal or never started.
    pub exit_code: Option<i32>,
    pub spawn_error: Option<String>,
}

impl ExecOutput {
    pub fn spawn_failure(reason: impl Into<String>) -> Self {
        Self {
            spawn_error: Some(reason.into()),
            ..Self::default()
        }
    }
}

pub trait ProcessRunner {
    fn execute(&self, command: &str, args: &[&str], cwd: &Path) -> ExecOutput;
}

/// Runs programs synchronously with stdin closed.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn execute(&self, command: &str, args: &[&str], cwd: &Path) -> ExecOutput {
        debug!(command, ?args, cwd = %cwd.display(), "spawning");
        let result = Command::new(command)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .output();
        match result {
            Ok(out) => {
                let mut combined = out.stdout;
                combined.extend_from_slice(&out.stderr);
                ExecOutput {
                    output: combined,
                    success: out.status.success(),
                    exit_code: out.status.code(),
                    spawn_error: None,
                }
            }
            Err(err) => ExecOutput::spawn_failure(err.to_string()),
        }
    }
}
