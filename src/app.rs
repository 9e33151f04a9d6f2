#![forbid(unsafe_code)]

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use ftui::prelude::*;
use ftui::render::budget::FrameBudgetConfig;
use ftui::render::cell::PackedRgba;
use ftui::{Program, ProgramConfig};
use tracing::{debug, info};

use crate::commands::CommandRouter;
use crate::config::Config;
use crate::exec::{ProcessRunner, SystemRunner};
use crate::focus::FocusController;
use crate::fs_ops::{Filesystem, LocalFs};
use crate::keymap::{Action, translate_event};
use crate::model::{FocusTarget, Pane, PaneSide};
use crate::pane::Navigation;
use crate::render::Layout;
use crate::terminal::TerminalSession;
use crate::ui::render_screen;

const BANNER: &str = "twinpane ready - type help";
const FALLBACK_SIZE: (u16, u16) = (80, 24);

#[derive(Debug, Clone, Copy)]
pub struct ThemeColors {
    pub screen_bg: PackedRgba,
    pub panel_bg: PackedRgba,
    pub panel_fg: PackedRgba,
    pub border_active: PackedRgba,
    pub border_inactive: PackedRgba,
    pub cursor_fg: PackedRgba,
    pub selection_bg: PackedRgba,
    pub selection_fg: PackedRgba,
    pub terminal_fg: PackedRgba,
    pub warning_fg: PackedRgba,
}

impl ThemeColors {
    pub fn classic() -> Self {
        Self {
            screen_bg: PackedRgba::rgb(0, 0, 0),
            panel_bg: PackedRgba::rgb(0, 0, 0),
            panel_fg: PackedRgba::rgb(170, 170, 170),     // light gray
            border_active: PackedRgba::rgb(85, 255, 85),  // bright green
            border_inactive: PackedRgba::rgb(85, 85, 85), // dark gray
            cursor_fg: PackedRgba::rgb(255, 255, 85),     // yellow
            selection_bg: PackedRgba::rgb(0, 0, 170),     // dark blue
            selection_fg: PackedRgba::rgb(255, 255, 85),
            terminal_fg: PackedRgba::rgb(255, 255, 255),
            warning_fg: PackedRgba::rgb(255, 85, 85),
        }
    }
}

/// The collaborators the state machine reaches out to.
pub struct Services {
    fs: Box<dyn Filesystem>,
    runner: Box<dyn ProcessRunner>,
}

impl Services {
    pub fn new(fs: Box<dyn Filesystem>, runner: Box<dyn ProcessRunner>) -> Self {
        Self { fs, runner }
    }

    pub fn local() -> Self {
        Self::new(Box::new(LocalFs), Box::new(SystemRunner))
    }

    pub fn fs(&self) -> &dyn Filesystem {
        self.fs.as_ref()
    }

    pub fn router(&self) -> CommandRouter<'_> {
        CommandRouter::new(self.fs.as_ref(), self.runner.as_ref())
    }
}

/// Everything on screen. Actions that do not apply to the focused region
/// are ignored.
#[derive(Debug, Clone)]
pub struct AppState {
    pub left: Pane,
    pub right: Pane,
    pub focus: FocusController,
    pub terminal: TerminalSession,
    pub width: u16,
    pub height: u16,
    pub panel_percent: u16,
    pub should_quit: bool,
}

impl AppState {
    /// Both panes and the terminal start in `start_dir`; nothing is listed yet.
    pub fn empty(start_dir: PathBuf, config: &Config) -> Self {
        Self {
            left: Pane::new(start_dir.clone(), config.show_hidden),
            right: Pane::new(start_dir.clone(), config.show_hidden),
            focus: FocusController::default(),
            terminal: TerminalSession::new(start_dir, config.scrollback_limit),
            width: 0,
            height: 0,
            panel_percent: config.panel_percent,
            should_quit: false,
        }
    }

    pub fn new(start_dir: PathBuf, config: &Config, fs: &dyn Filesystem) -> Self {
        let mut state = Self::empty(start_dir, config);
        state.left.refresh(fs);
        state.right.refresh(fs);
        state.terminal.push_output(BANNER);
        state
    }

    pub fn pane(&self, side: PaneSide) -> &Pane {
        match side {
            PaneSide::Left => &self.left,
            PaneSide::Right => &self.right,
        }
    }

    pub fn pane_mut(&mut self, side: PaneSide) -> &mut Pane {
        match side {
            PaneSide::Left => &mut self.left,
            PaneSide::Right => &mut self.right,
        }
    }

    pub fn layout(&self) -> Option<Layout> {
        Layout::compute(self.width, self.height, self.panel_percent)
    }

    pub fn pane_viewport(&self) -> usize {
        self.layout().map_or(0, |layout| layout.pane_viewport())
    }

    pub fn terminal_viewport(&self) -> usize {
        self.layout().map_or(0, |layout| layout.terminal_viewport())
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let pane_viewport = self.pane_viewport();
        self.left.clamp_view(pane_viewport);
        self.right.clamp_view(pane_viewport);
        self.terminal.clamp_scroll(self.terminal_viewport());
        debug!(width, height, "resized");
    }

    pub fn dispatch(&mut self, action: Action, services: &Services) {
        match action {
            Action::Quit => {
                info!("quit requested");
                self.should_quit = true;
            }
            Action::Resize { width, height } => self.resize(width, height),
            Action::ToggleTerminal => self.focus.toggle_terminal(),
            Action::FocusPane(side) => {
                self.focus.set_active_pane(side);
            }
            Action::SwitchPane => {
                self.focus.switch_pane();
            }
            action => match self.focus.focus() {
                FocusTarget::Left => self.dispatch_pane(PaneSide::Left, action, services),
                FocusTarget::Right => self.dispatch_pane(PaneSide::Right, action, services),
                FocusTarget::Terminal => self.dispatch_terminal(action, services),
            },
        }
    }

    fn dispatch_pane(&mut self, side: PaneSide, action: Action, services: &Services) {
        let viewport = self.pane_viewport();
        let page = viewport.max(1) as isize;
        let pane = self.pane_mut(side);
        match action {
            Action::CursorUp => pane.move_cursor(-1, viewport),
            Action::CursorDown => pane.move_cursor(1, viewport),
            Action::PageUp => pane.move_cursor(-page, viewport),
            Action::PageDown => pane.move_cursor(page, viewport),
            Action::CursorHome => pane.move_to_start(viewport),
            Action::CursorEnd => pane.move_to_end(viewport),
            Action::NavigateUp => pane.navigate_up(services.fs()),
            Action::EnterItem => {
                if let Navigation::FileOpened(path) = pane.enter_selected(services.fs()) {
                    info!(path = %path.display(), "file opened");
                    self.terminal.push_output(format!("file opened: {}", path.display()));
                }
            }
            _ => {}
        }
    }

    fn dispatch_terminal(&mut self, action: Action, services: &Services) {
        let viewport = self.terminal_viewport();
        let page = viewport.max(1) as isize;
        let term = &mut self.terminal;
        match action {
            Action::Insert(text) => term.insert(&text),
            Action::Backspace => term.backspace(),
            Action::DeleteForward => term.delete_forward(),
            Action::EditLeft => term.move_cursor(-1),
            Action::EditRight => term.move_cursor(1),
            Action::EditHome => term.move_to_start(),
            Action::EditEnd => term.move_to_end(),
            Action::HistoryPrev => term.history_prev(),
            Action::HistoryNext => term.history_next(),
            Action::ScrollUp => term.scroll_by(page, viewport),
            Action::ScrollDown => term.scroll_by(-page, viewport),
            Action::Submit => term.submit(&services.router()),
            _ => {}
        }
    }
}

#[derive(Debug, Clone)]
pub enum Msg {
    Event(Event),
}

impl From<Event> for Msg {
    fn from(event: Event) -> Self {
        Msg::Event(event)
    }
}

pub struct App {
    state: AppState,
    services: Services,
    theme: ThemeColors,
}

impl App {
    pub fn new(config: &Config) -> io::Result<Self> {
        let cwd = std::env::current_dir()?;
        let services = Services::local();
        let mut state = AppState::new(cwd, config, services.fs());
        let (width, height) = crossterm::terminal::size().unwrap_or(FALLBACK_SIZE);
        state.resize(width, height);
        info!(width, height, cwd = %state.terminal.cwd().display(), "starting");
        Ok(Self::with_state(state, services))
    }

    pub fn with_state(state: AppState, services: Services) -> Self {
        Self {
            state,
            services,
            theme: ThemeColors::classic(),
        }
    }

    pub fn run(config: &Config) -> io::Result<()> {
        let mut budget = FrameBudgetConfig::with_total(Duration::from_millis(50));
        budget.allow_frame_skip = false;
        let program_config = ProgramConfig::fullscreen().with_budget(budget);
        let mut program = Program::with_config(App::new(config)?, program_config)?;
        program.run()
    }
}

impl Model for App {
    type Message = Msg;

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::Event(event) => {
                if let Some(action) = translate_event(&event, self.state.focus.focus()) {
                    self.state.dispatch(action, &self.services);
                }
                if self.state.should_quit {
                    Cmd::quit()
                } else {
                    Cmd::none()
                }
            }
        }
    }

    fn view(&self, frame: &mut Frame) {
        render_screen(frame, &self.state, &self.theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::ExecOutput;
    use ftui::core::event::{KeyCode, KeyEvent, KeyEventKind, Modifiers};
    use std::cell::RefCell;
    use std::fs;
    use std::path::Path;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct RecordingRunner {
        calls: Rc<RefCell<Vec<String>>>,
    }

    impl ProcessRunner for RecordingRunner {
        fn execute(&self, command: &str, _: &[&str], _: &Path) -> ExecOutput {
            self.calls.borrow_mut().push(command.to_string());
            ExecOutput {
                output: b"ran\n".to_vec(),
                success: true,
                exit_code: Some(0),
                spawn_error: None,
            }
        }
    }

    fn setup(dir: &Path) -> (AppState, Services, Rc<RefCell<Vec<String>>>) {
        let runner = RecordingRunner::default();
        let calls = runner.calls.clone();
        let services = Services::new(Box::new(LocalFs), Box::new(runner));
        let mut state = AppState::new(dir.to_path_buf(), &Config::default(), services.fs());
        state.resize(80, 24);
        (state, services, calls)
    }

    fn type_line(state: &mut AppState, services: &Services, line: &str) {
        state.dispatch(Action::Insert(line.to_string()), services);
        state.dispatch(Action::Submit, services);
    }

    fn sample_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("readme.txt"), "hello").unwrap();
        dir
    }

    #[test]
    fn starts_with_listing_and_banner() {
        let dir = sample_dir();
        let (state, _, _) = setup(dir.path());
        assert_eq!(state.left.entries.len(), 2);
        assert_eq!(state.right.entries.len(), 2);
        assert_eq!(state.focus.focus(), FocusTarget::Left);
        assert_eq!(state.terminal.output().back().unwrap(), BANNER);
    }

    #[test]
    fn pane_keys_move_and_navigate() {
        let dir = sample_dir();
        let (mut state, services, _) = setup(dir.path());
        state.dispatch(Action::CursorDown, &services);
        assert_eq!(state.left.cursor, 1);
        state.dispatch(Action::CursorDown, &services);
        assert_eq!(state.left.cursor, 1);
        state.dispatch(Action::CursorHome, &services);
        state.dispatch(Action::EnterItem, &services);
        assert_eq!(state.left.cwd, dir.path().join("docs"));
        assert_eq!(state.right.cwd, dir.path());
        state.dispatch(Action::NavigateUp, &services);
        assert_eq!(state.left.cwd, dir.path());
    }

    #[test]
    fn entering_file_reports_in_terminal() {
        let dir = sample_dir();
        let (mut state, services, _) = setup(dir.path());
        state.dispatch(Action::CursorEnd, &services);
        state.dispatch(Action::EnterItem, &services);
        let expected = format!("file opened: {}", dir.path().join("readme.txt").display());
        assert_eq!(state.terminal.output().back().unwrap(), &expected);
    }

    #[test]
    fn pane_switch_targets_other_pane() {
        let dir = sample_dir();
        let (mut state, services, _) = setup(dir.path());
        state.dispatch(Action::FocusPane(PaneSide::Right), &services);
        state.dispatch(Action::CursorDown, &services);
        assert_eq!(state.right.cursor, 1);
        assert_eq!(state.left.cursor, 0);
        state.dispatch(Action::SwitchPane, &services);
        assert_eq!(state.focus.focus(), FocusTarget::Left);
    }

    #[test]
    fn terminal_actions_ignored_in_panes_and_vice_versa() {
        let dir = sample_dir();
        let (mut state, services, calls) = setup(dir.path());
        state.dispatch(Action::Insert("ls".into()), &services);
        state.dispatch(Action::Submit, &services);
        assert_eq!(state.terminal.input_text(), "");
        assert!(state.terminal.history().is_empty());

        state.dispatch(Action::ToggleTerminal, &services);
        state.dispatch(Action::CursorDown, &services);
        state.dispatch(Action::FocusPane(PaneSide::Right), &services);
        assert_eq!(state.left.cursor, 0);
        assert_eq!(state.focus.focus(), FocusTarget::Terminal);
        assert_eq!(state.focus.active_pane(), PaneSide::Left);
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn terminal_runs_builtins_and_externals() {
        let dir = sample_dir();
        let (mut state, services, calls) = setup(dir.path());
        state.dispatch(Action::ToggleTerminal, &services);

        type_line(&mut state, &services, "cd docs");
        assert_eq!(state.terminal.cwd(), dir.path().join("docs"));
        assert_eq!(state.left.cwd, dir.path());

        type_line(&mut state, &services, "make all");
        assert_eq!(*calls.borrow(), vec!["make".to_string()]);
        assert_eq!(state.terminal.output().back().unwrap(), "ran");

        state.dispatch(Action::HistoryPrev, &services);
        assert_eq!(state.terminal.input_text(), "make all");
    }

    #[test]
    fn terminal_scrolls_by_viewport() {
        let dir = sample_dir();
        let (mut state, services, _) = setup(dir.path());
        state.dispatch(Action::ToggleTerminal, &services);
        state.terminal.extend_output((0..100).map(|i| i.to_string()));
        let viewport = state.terminal_viewport();
        state.dispatch(Action::ScrollUp, &services);
        assert_eq!(state.terminal.scroll_offset(), viewport);
        state.dispatch(Action::ScrollDown, &services);
        state.dispatch(Action::ScrollDown, &services);
        assert_eq!(state.terminal.scroll_offset(), 0);
    }

    #[test]
    fn resize_reclamps_offsets() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..50 {
            fs::write(dir.path().join(format!("f{i:02}")), "").unwrap();
        }
        let (mut state, services, _) = setup(dir.path());
        state.dispatch(Action::CursorEnd, &services);
        assert_eq!(state.left.cursor, 49);
        assert!(state.left.offset > 0);
        state.dispatch(Action::Resize { width: 80, height: 200 }, &services);
        assert_eq!(state.left.offset, 0);
        state.dispatch(Action::Resize { width: 80, height: 10 }, &services);
        let viewport = state.pane_viewport();
        assert!(state.left.cursor < state.left.offset + viewport);
    }

    #[test]
    fn quit_sets_flag_and_returns_quit() {
        let dir = sample_dir();
        let (state, services, _) = setup(dir.path());
        let mut app = App::with_state(state, services);
        let key = KeyEvent::new(KeyCode::Char('q'))
            .with_modifiers(Modifiers::CTRL)
            .with_kind(KeyEventKind::Press);
        let cmd = app.update(Msg::Event(Event::Key(key)));
        assert!(app.state.should_quit);
        assert!(matches!(cmd, Cmd::Quit));
    }

    #[test]
    fn view_paints_without_panicking() {
        let dir = sample_dir();
        let (state, services, _) = setup(dir.path());
        let app = App::with_state(state, services);
        let mut pool = ftui::GraphemePool::new();
        for (w, h) in [(80, 24), (20, 8), (5, 3)] {
            let mut frame = ftui::Frame::new(w, h, &mut pool);
            app.view(&mut frame);
        }
    }
}
