#![forbid(unsafe_code)]

use ftui::core::event::{Event, KeyCode, KeyEvent, KeyEventKind, Modifiers};

use crate::model::{FocusTarget, PaneSide};

/// Everything the state machine reacts to. Keys mean different things
/// depending on whether a pane or the terminal has focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    ToggleTerminal,
    SwitchPane,
    FocusPane(PaneSide),
    Resize { width: u16, height: u16 },

    // panes
    CursorUp,
    CursorDown,
    PageUp,
    PageDown,
    CursorHome,
    CursorEnd,
    NavigateUp,
    EnterItem,

    // terminal
    Insert(String),
    Backspace,
    DeleteForward,
    EditLeft,
    EditRight,
    EditHome,
    EditEnd,
    HistoryPrev,
    HistoryNext,
    ScrollUp,
    ScrollDown,
    Submit,
}

pub fn translate_event(event: &Event, focus: FocusTarget) -> Option<Action> {
    match event {
        Event::Key(key) => translate_key(key, focus),
        Event::Resize { width, height } => Some(Action::Resize {
            width: *width,
            height: *height,
        }),
        Event::Paste(paste) if focus == FocusTarget::Terminal => {
            let text: String = paste
                .text
                .chars()
                .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
                .collect();
            Some(Action::Insert(text))
        }
        _ => None,
    }
}

pub fn translate_key(key: &KeyEvent, focus: FocusTarget) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let ctrl = key.modifiers.contains(Modifiers::CTRL);
    let alt = key.modifiers.contains(Modifiers::ALT);
    let shift = key.modifiers.contains(Modifiers::SHIFT);
    let in_terminal = focus == FocusTarget::Terminal;

    let action = match key.code {
        KeyCode::Char('q') | KeyCode::Char('c') if ctrl => Action::Quit,
        KeyCode::F(10) => Action::Quit,
        KeyCode::Tab if shift => Action::SwitchPane,
        KeyCode::Tab => Action::ToggleTerminal,
        KeyCode::BackTab => Action::SwitchPane,
        KeyCode::Left if alt => Action::FocusPane(PaneSide::Left),
        KeyCode::Right if alt => Action::FocusPane(PaneSide::Right),

        KeyCode::Up if in_terminal => Action::HistoryPrev,
        KeyCode::Down if in_terminal => Action::HistoryNext,
        KeyCode::PageUp if in_terminal => Action::ScrollUp,
        KeyCode::PageDown if in_terminal => Action::ScrollDown,
        KeyCode::Home if in_terminal => Action::EditHome,
        KeyCode::End if in_terminal => Action::EditEnd,
        KeyCode::Left if in_terminal => Action::EditLeft,
        KeyCode::Right if in_terminal => Action::EditRight,
        KeyCode::Backspace if in_terminal => Action::Backspace,
        KeyCode::Delete if in_terminal => Action::DeleteForward,
        KeyCode::Enter if in_terminal => Action::Submit,
        KeyCode::Char(ch) if in_terminal && !ctrl && !alt => Action::Insert(ch.to_string()),

        KeyCode::Up => Action::CursorUp,
        KeyCode::Down => Action::CursorDown,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::Home => Action::CursorHome,
        KeyCode::End => Action::CursorEnd,
        KeyCode::Left | KeyCode::Backspace => Action::NavigateUp,
        KeyCode::Right | KeyCode::Enter => Action::EnterItem,
        _ => return None,
    };
    Some(action)
}
