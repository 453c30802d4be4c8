use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::state::FocusPane;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ToggleFocus,
    NewNote,
    EditNote,
    DeleteNote,
    StartSearch,
    MoveDown,
    MoveUp,
    Activate,
}

/// Browse-mode bindings. Editor, search input and overlays consume their
/// keys before this mapping is consulted.
pub fn map_browse_key(key: KeyEvent, focus: FocusPane) -> Option<Action> {
    let plain = !key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER);
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Char('q') if plain => Some(Action::Quit),
        KeyCode::Tab => Some(Action::ToggleFocus),
        KeyCode::Char('n') | KeyCode::Char('a') if plain => Some(Action::NewNote),
        KeyCode::Char('e') if plain => Some(Action::EditNote),
        KeyCode::Char('d') if plain => Some(Action::DeleteNote),
        KeyCode::Char('/') if plain => Some(Action::StartSearch),
        KeyCode::Char('j') | KeyCode::Down if focus != FocusPane::Viewer => Some(Action::MoveDown),
        KeyCode::Char('k') | KeyCode::Up if focus != FocusPane::Viewer => Some(Action::MoveUp),
        KeyCode::Enter => Some(Action::Activate),
        _ => None,
    }
}
