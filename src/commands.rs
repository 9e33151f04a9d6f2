#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::CommandError;
use crate::exec::{ExecOutput, ProcessRunner};
use crate::fs_ops::{Filesystem, format_time, resolve};
use crate::model::Entry;
use crate::text::sanitize_line;

const HELP_LINES: &[&str] = &[
    "builtins:",
    "  ls [-a] [-l] [dir]   list directory",
    "  cd [dir]             change directory",
    "  pwd                  print working directory",
    "  cat <file>           print file contents",
    "  mkdir <dir>          create directory",
    "  touch <file>         create empty file",
    "  rm <file>            remove file",
    "  cp <src> <dst>       copy file",
    "  mv <src> <dst>       move or rename",
    "  echo [text]          print text",
    "  ping <host>          send four echo requests",
    "  clear                clear the screen",
    "  help                 show this list",
    "anything else runs as an external program",
];

const PING_COUNT: &str = "4";

/// What the terminal should do with the result of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Output(Vec<String>),
    ChangeDirectory(PathBuf),
    Clear,
}

/// Maps a command name to a builtin or to an external program.
pub struct CommandRouter<'a> {
    fs: &'a dyn Filesystem,
    runner: &'a dyn ProcessRunner,
}

impl<'a> CommandRouter<'a> {
    pub fn new(fs: &'a dyn Filesystem, runner: &'a dyn ProcessRunner) -> Self {
        Self { fs, runner }
    }

    /// Runs one command. Failures never escape: they come back as a single
    /// `Error: ...` line.
    pub fn dispatch(&self, command: &str, args: &[&str], cwd: &Path) -> Outcome {
        let result = match command {
            "pwd" => Ok(Outcome::Output(vec![cwd.display().to_string()])),
            "ls" => self.ls(args, cwd).map(Outcome::Output),
            "cd" => self.cd(args, cwd).map(Outcome::ChangeDirectory),
            "cat" => self.cat(args, cwd).map(Outcome::Output),
            "mkdir" => self.mkdir(args, cwd).map(silent),
            "touch" => self.touch(args, cwd).map(silent),
            "rm" => self.rm(args, cwd).map(silent),
            "cp" => self.cp(args, cwd).map(silent),
            "mv" => self.mv(args, cwd).map(silent),
            "echo" => Ok(Outcome::Output(vec![args.join(" ")])),
            "clear" => Ok(Outcome::Clear),
            "help" => Ok(Outcome::Output(HELP_LINES.iter().map(|l| l.to_string()).collect())),
            "ping" => self.ping(args, cwd).map(Outcome::Output),
            _ => Ok(Outcome::Output(self.external(command, args, cwd))),
        };
        result.unwrap_or_else(|err| {
            warn!(command, %err, "command failed");
            Outcome::Output(vec![err.to_line()])
        })
    }

    fn ls(&self, args: &[&str], cwd: &Path) -> Result<Vec<String>, CommandError> {
        let mut show_all = false;
        let mut long = false;
        let mut target = None;
        for arg in args {
            match arg.strip_prefix('-') {
                Some(flags) if !flags.is_empty() => {
                    for flag in flags.chars() {
                        match flag {
                            'a' => show_all = true,
                            'l' => long = true,
                            other => {
                                return Err(CommandError::UnknownFlag {
                                    command: "ls",
                                    flag: other,
                                });
                            }
                        }
                    }
                }
                _ => {
                    if target.is_none() {
                        target = Some(*arg);
                    }
                }
            }
        }
        let dir = resolve(cwd, target.unwrap_or("."));
        let entries = self
            .fs
            .list_directory(&dir)
            .map_err(|err| CommandError::io("ls", &dir, err))?;
        Ok(entries
            .iter()
            .filter(|e| show_all || !e.is_hidden())
            .map(|e| if long { long_line(e) } else { e.display_name() })
            .collect())
    }

    fn cd(&self, args: &[&str], cwd: &Path) -> Result<PathBuf, CommandError> {
        let target = match args.first() {
            Some(arg) => resolve(cwd, arg),
            None => dirs::home_dir().ok_or(CommandError::NoHomeDirectory)?,
        };
        if !self.fs.is_directory(&target) {
            let shown = args.first().map_or_else(|| target.display().to_string(), |a| a.to_string());
            return Err(CommandError::NotADirectory(shown));
        }
        info!(path = %target.display(), "terminal directory changed");
        Ok(target)
    }

    fn cat(&self, args: &[&str], cwd: &Path) -> Result<Vec<String>, CommandError> {
        let [file, ..] = args else {
            return Err(CommandError::Usage("cat <file>"));
        };
        let path = resolve(cwd, file);
        let data = self
            .fs
            .read_file(&path)
            .map_err(|err| CommandError::io("cat", &path, err))?;
        Ok(split_lines(&data))
    }

    fn mkdir(&self, args: &[&str], cwd: &Path) -> Result<(), CommandError> {
        let [dir, ..] = args else {
            return Err(CommandError::Usage("mkdir <dir>"));
        };
        let path = resolve(cwd, dir);
        self.fs
            .create_directory(&path)
            .map_err(|err| CommandError::io("mkdir", &path, err))
    }

    fn touch(&self, args: &[&str], cwd: &Path) -> Result<(), CommandError> {
        let [file, ..] = args else {
            return Err(CommandError::Usage("touch <file>"));
        };
        let path = resolve(cwd, file);
        self.fs
            .create_file(&path)
            .map_err(|err| CommandError::io("touch", &path, err))
    }

    fn rm(&self, args: &[&str], cwd: &Path) -> Result<(), CommandError> {
        let [file, ..] = args else {
            return Err(CommandError::Usage("rm <file>"));
        };
        let path = resolve(cwd, file);
        self.fs
            .remove_file(&path)
            .map_err(|err| CommandError::io("rm", &path, err))
    }

    fn cp(&self, args: &[&str], cwd: &Path) -> Result<(), CommandError> {
        let [src, dst, ..] = args else {
            return Err(CommandError::Usage("cp <src> <dst>"));
        };
        let (from, to) = self.transfer_paths(src, dst, cwd);
        self.fs
            .copy(&from, &to)
            .map_err(|err| CommandError::io("cp", &from, err))
    }

    fn mv(&self, args: &[&str], cwd: &Path) -> Result<(), CommandError> {
        let [src, dst, ..] = args else {
            return Err(CommandError::Usage("mv <src> <dst>"));
        };
        let (from, to) = self.transfer_paths(src, dst, cwd);
        self.fs
            .rename(&from, &to)
            .map_err(|err| CommandError::io("mv", &from, err))
    }

    /// A destination that is an existing directory receives the source
    /// under its own name.
    fn transfer_paths(&self, src: &str, dst: &str, cwd: &Path) -> (PathBuf, PathBuf) {
        let from = resolve(cwd, src);
        let mut to = resolve(cwd, dst);
        if self.fs.is_directory(&to) {
            if let Some(name) = from.file_name() {
                to.push(name);
            }
        }
        (from, to)
    }

    fn ping(&self, args: &[&str], cwd: &Path) -> Result<Vec<String>, CommandError> {
        let [host, ..] = args else {
            return Err(CommandError::Usage("ping <host>"));
        };
        Ok(self.external("ping", &["-c", PING_COUNT, *host], cwd))
    }

    fn external(&self, command: &str, args: &[&str], cwd: &Path) -> Vec<String> {
        let out = self.runner.execute(command, args, cwd);
        info!(command, success = out.success, code = ?out.exit_code, "external command finished");
        let mut lines = split_lines(&out.output);
        if let Some(err) = exec_failure(command, &out) {
            lines.push(err.to_line());
        }
        lines
    }
}

fn silent(_: ()) -> Outcome {
    Outcome::Output(Vec::new())
}

fn exec_failure(command: &str, out: &ExecOutput) -> Option<CommandError> {
    if let Some(reason) = &out.spawn_error {
        return Some(CommandError::Spawn {
            command: command.to_string(),
            reason: reason.clone(),
        });
    }
    if out.success {
        return None;
    }
    Some(match out.exit_code {
        Some(code) => CommandError::ExitStatus {
            command: command.to_string(),
            code,
        },
        None => CommandError::Terminated {
            command: command.to_string(),
        },
    })
}

fn long_line(entry: &Entry) -> String {
    format!(
        "{:<24} {:>10}  {}",
        entry.display_name(),
        entry.size,
        format_time(entry.modified)
    )
    .trim_end()
    .to_string()
}

pub fn split_lines(data: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(data).lines().map(sanitize_line).collect()
}
