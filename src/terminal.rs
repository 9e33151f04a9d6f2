#![forbid(unsafe_code)]

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::commands::{CommandRouter, Outcome};
use crate::scroll::max_tail_offset;
use crate::text::sanitize_line;

/// The embedded shell: an editable input line, command history and a
/// bounded scrollback.
#[derive(Debug, Clone)]
pub struct TerminalSession {
    input: Vec<char>,
    edit_cursor: usize,
    history: Vec<String>,
    history_index: Option<usize>,
    output: VecDeque<String>,
    scroll_offset: usize,
    cwd: PathBuf,
    scrollback_limit: usize,
}

impl TerminalSession {
    pub fn new(cwd: PathBuf, scrollback_limit: usize) -> Self {
        Self {
            input: Vec::new(),
            edit_cursor: 0,
            history: Vec::new(),
            history_index: None,
            output: VecDeque::new(),
            scroll_offset: 0,
            cwd,
            scrollback_limit: scrollback_limit.max(1),
        }
    }

    pub fn input(&self) -> &[char] {
        &self.input
    }

    pub fn input_text(&self) -> String {
        self.input.iter().collect()
    }

    pub fn edit_cursor(&self) -> usize {
        self.edit_cursor
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn output(&self) -> &VecDeque<String> {
        &self.output
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Inserts at the edit cursor. Control characters are dropped.
    pub fn insert(&mut self, text: &str) {
        for ch in text.chars().filter(|c| !c.is_control()) {
            self.input.insert(self.edit_cursor, ch);
            self.edit_cursor += 1;
        }
    }

    pub fn backspace(&mut self) {
        if self.edit_cursor > 0 {
            self.edit_cursor -= 1;
            self.input.remove(self.edit_cursor);
        }
    }

    pub fn delete_forward(&mut self) {
        if self.edit_cursor < self.input.len() {
            self.input.remove(self.edit_cursor);
        }
    }

    pub fn move_cursor(&mut self, delta: isize) {
        self.edit_cursor = self.edit_cursor.saturating_add_signed(delta).min(self.input.len());
    }

    pub fn move_to_start(&mut self) {
        self.edit_cursor = 0;
    }

    pub fn move_to_end(&mut self) {
        self.edit_cursor = self.input.len();
    }

    pub fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let index = match self.history_index {
            None => self.history.len() - 1,
            Some(i) => i.saturating_sub(1),
        };
        self.recall(index);
    }

    /// Past the newest entry the buffer is cleared and browsing ends.
    pub fn history_next(&mut self) {
        let Some(i) = self.history_index else {
            return;
        };
        if i + 1 < self.history.len() {
            self.recall(i + 1);
        } else {
            self.history_index = None;
            self.input.clear();
            self.edit_cursor = 0;
        }
    }

    fn recall(&mut self, index: usize) {
        self.history_index = Some(index);
        self.input = self.history[index].chars().collect();
        self.edit_cursor = self.input.len();
    }

    /// Moves the view `delta` lines back into the scrollback (negative moves
    /// toward the newest line).
    pub fn scroll_by(&mut self, delta: isize, viewport_height: usize) {
        let max = max_tail_offset(self.output.len(), viewport_height);
        self.scroll_offset = self.scroll_offset.saturating_add_signed(delta).min(max);
    }

    pub fn clamp_scroll(&mut self, viewport_height: usize) {
        self.scroll_offset = self
            .scroll_offset
            .min(max_tail_offset(self.output.len(), viewport_height));
    }

    pub fn push_output(&mut self, line: impl AsRef<str>) {
        self.output.push_back(sanitize_line(line.as_ref()));
        while self.output.len() > self.scrollback_limit {
            self.output.pop_front();
        }
    }

    pub fn extend_output<I>(&mut self, lines: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for line in lines {
            self.push_output(line);
        }
    }

    pub fn clear_output(&mut self) {
        self.output.clear();
        self.scroll_offset = 0;
    }

    /// Runs the current input line. Blank input only clears the buffer.
    pub fn submit(&mut self, router: &CommandRouter<'_>) {
        let line = self.input_text();
        self.input.clear();
        self.edit_cursor = 0;
        self.history_index = None;

        let line = line.trim();
        if line.is_empty() {
            return;
        }
        if self.history.last().map(String::as_str) != Some(line) {
            self.history.push(line.to_string());
        }
        self.push_output(format!("$ {line}"));
        self.scroll_offset = 0;

        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return;
        };
        let args: Vec<&str> = words.collect();
        info!(command, args = args.len(), cwd = %self.cwd.display(), "command submitted");
        match router.dispatch(command, &args, &self.cwd) {
            Outcome::Output(lines) => self.extend_output(lines),
            Outcome::ChangeDirectory(dir) => self.cwd = dir,
            Outcome::Clear => self.clear_output(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::{ExecOutput, ProcessRunner};
    use crate::fs_ops::LocalFs;

    struct QuietRunner;

    impl ProcessRunner for QuietRunner {
        fn execute(&self, _: &str, _: &[&str], _: &Path) -> ExecOutput {
            ExecOutput {
                success: true,
                exit_code: Some(0),
                ..ExecOutput::default()
            }
        }
    }

    fn session() -> TerminalSession {
        TerminalSession::new(PathBuf::from("/"), 1000)
    }

    fn run(term: &mut TerminalSession, line: &str) {
        let router = CommandRouter::new(&LocalFs, &QuietRunner);
        term.insert(line);
        term.submit(&router);
    }

    #[test]
    fn editing_keeps_cursor_in_range() {
        let mut term = session();
        term.insert("helo");
        term.move_cursor(-1);
        term.insert("l");
        assert_eq!(term.input_text(), "hello");
        assert_eq!(term.edit_cursor(), 4);
        term.move_to_start();
        term.backspace();
        assert_eq!(term.input_text(), "hello");
        term.delete_forward();
        assert_eq!(term.input_text(), "ello");
        term.move_cursor(50);
        assert_eq!(term.edit_cursor(), 4);
        term.delete_forward();
        assert_eq!(term.input_text(), "ello");
        term.backspace();
        assert_eq!(term.input_text(), "ell");
        assert_eq!(term.edit_cursor(), 3);
    }

    #[test]
    fn history_walks_back_and_forward() {
        let mut term = session();
        for cmd in ["a", "b", "c"] {
            run(&mut term, cmd);
        }
        term.history_prev();
        term.history_prev();
        term.history_prev();
        assert_eq!(term.input_text(), "a");
        term.history_prev();
        assert_eq!(term.input_text(), "a");
        term.history_next();
        assert_eq!(term.input_text(), "b");
        term.history_next();
        term.history_next();
        assert_eq!(term.input_text(), "");
        term.history_next();
        assert_eq!(term.input_text(), "");
    }

    #[test]
    fn editing_a_recalled_line_leaves_history_alone() {
        let mut term = session();
        run(&mut term, "echo one");
        term.history_prev();
        term.insert("!");
        assert_eq!(term.input_text(), "echo one!");
        assert_eq!(term.history(), ["echo one"]);
    }

    #[test]
    fn blank_submit_changes_nothing() {
        let mut term = session();
        term.push_output("banner");
        run(&mut term, "   ");
        assert!(term.history().is_empty());
        assert_eq!(term.output().len(), 1);
        assert_eq!(term.input_text(), "");
    }

    #[test]
    fn submit_echoes_and_records_trimmed_line() {
        let mut term = session();
        run(&mut term, "  echo  hi  ");
        assert_eq!(term.history(), ["echo  hi"]);
        assert_eq!(term.output(), &VecDeque::from(vec!["$ echo  hi".to_string(), "hi".to_string()]));
        run(&mut term, "echo  hi");
        assert_eq!(term.history().len(), 1);
    }

    #[test]
    fn cd_changes_only_terminal_cwd() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let mut term = TerminalSession::new(dir.path().to_path_buf(), 1000);
        run(&mut term, "cd sub");
        assert_eq!(term.cwd(), dir.path().join("sub"));
        run(&mut term, "cd nosuchdir");
        assert_eq!(term.cwd(), dir.path().join("sub"));
        let last = term.output().back().unwrap();
        assert!(last.starts_with("Error: "));
    }

    #[test]
    fn clear_empties_scrollback() {
        let mut term = session();
        run(&mut term, "echo x");
        run(&mut term, "clear");
        assert!(term.output().is_empty());
        assert_eq!(term.scroll_offset(), 0);
    }

    #[test]
    fn scrollback_drops_oldest_lines() {
        let mut term = TerminalSession::new(PathBuf::from("/"), 10);
        term.extend_output((0..25).map(|i| format!("line {i}")));
        assert_eq!(term.output().len(), 10);
        assert_eq!(term.output().front().unwrap(), "line 15");
        assert_eq!(term.output().back().unwrap(), "line 24");
    }

    #[test]
    fn scrolling_is_clamped() {
        let mut term = session();
        term.extend_output((0..30).map(|i| i.to_string()));
        term.scroll_by(8, 10);
        assert_eq!(term.scroll_offset(), 8);
        term.scroll_by(100, 10);
        assert_eq!(term.scroll_offset(), 20);
        term.scroll_by(-100, 10);
        assert_eq!(term.scroll_offset(), 0);
        term.scroll_by(15, 10);
        term.clamp_scroll(25);
        assert_eq!(term.scroll_offset(), 5);
    }

    #[test]
    fn submit_resets_scroll() {
        let mut term = session();
        term.extend_output((0..30).map(|i| i.to_string()));
        term.scroll_by(5, 10);
        run(&mut term, "pwd");
        assert_eq!(term.scroll_offset(), 0);
        assert_eq!(term.output().back().unwrap(), "/");
    }
}
