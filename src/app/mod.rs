use std::io::Stdout;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::config::AppConfig;
use crate::ui::{self, ViewState};

mod actions;
pub mod editor;
pub mod state;

use self::actions::{map_browse_key, Action};
pub use editor::{EditorField, EditorState, TextField};
pub use state::{AppState, FocusPane, OverlayState};

pub struct App {
    pub config: Arc<AppConfig>,
    state: AppState,
    view: ViewState,
    should_quit: bool,
    tick_rate: Duration,
}

impl App {
    pub fn new(config: Arc<AppConfig>) -> Self {
        let state = AppState::from_config(&config);
        tracing::debug!(notes = state.len(), "session started");
        Self {
            config,
            state,
            view: ViewState::default(),
            should_quit: false,
            tick_rate: Duration::from_millis(250),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn run(&mut self) -> Result<()> {
        let mut terminal = setup_terminal()?;
        let result = self.event_loop(&mut terminal);
        restore_terminal(&mut terminal)?;
        result
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            terminal
                .draw(|frame| ui::draw_app(frame, &self.state, &mut self.view))
                .context("rendering frame")?;

            if self.should_quit {
                break;
            }

            if event::poll(self.tick_rate).context("polling for terminal events")? {
                match event::read().context("reading terminal event")? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Resize(_, _) => {
                        // next draw picks up the new size
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if self.handle_overlay_key(key) {
            return;
        }

        if self.state.is_editing() {
            self.handle_editor_key(key);
            return;
        }

        if self.state.search.active && self.handle_search_key(key) {
            return;
        }

        if let Some(action) = map_browse_key(key, self.state.focus) {
            self.handle_action(action);
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::ToggleFocus => self.state.toggle_focus(),
            Action::NewNote => {
                self.state.begin_create();
                self.state.set_status_message(Some(
                    "New note: Tab switches field • Ctrl-s save • Esc cancel",
                ));
            }
            Action::EditNote => {
                if self.state.edit_selected() {
                    self.state.set_status_message(Some(
                        "Editing: Tab switches field • Ctrl-s save • Ctrl-d delete • Esc cancel",
                    ));
                } else {
                    self.state.set_status_message(Some("Select a note to edit"));
                }
            }
            Action::DeleteNote => {
                if !self.state.request_delete_selected() {
                    self.state.set_status_message(Some("Select a note to delete"));
                }
            }
            Action::StartSearch => self.state.begin_search(),
            Action::MoveDown => self.move_cursor(1),
            Action::MoveUp => self.move_cursor(-1),
            Action::Activate => match self.state.focus {
                FocusPane::Sidebar => {
                    self.state.apply_sidebar_category();
                    self.state.set_status_message(None::<String>);
                }
                FocusPane::Notes => {
                    if self.state.selected_id().is_some() {
                        self.state.focus = FocusPane::Viewer;
                    }
                }
                FocusPane::Viewer => {}
            },
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        match self.state.focus {
            FocusPane::Sidebar => self.state.move_sidebar_cursor(delta),
            FocusPane::Notes => self.state.select_relative(delta),
            FocusPane::Viewer => {}
        }
    }

    fn handle_overlay_key(&mut self, key: KeyEvent) -> bool {
        match self.state.overlay() {
            Some(OverlayState::ConfirmDelete(_)) => {
                match key.code {
                    KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                        if let Some(note) = self.state.confirm_delete() {
                            self.state
                                .set_status_message(Some(format!("Deleted \"{}\"", note.title)));
                        }
                    }
                    KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                        self.state.cancel_delete();
                        self.state.set_status_message(Some("Delete canceled"));
                    }
                    _ => {}
                }
                true
            }
            Some(OverlayState::Alert(_)) => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                    self.state.dismiss_alert();
                }
                true
            }
            None => false,
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => {
                self.state.clear_search();
                true
            }
            KeyCode::Enter => {
                self.state.finish_search();
                true
            }
            KeyCode::Backspace => {
                self.state.pop_search_char();
                true
            }
            KeyCode::Char(ch)
                if !key.modifiers.intersects(
                    KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER,
                ) =>
            {
                self.state.push_search_char(ch);
                true
            }
            _ => false,
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('s') => self.save_draft(),
                KeyCode::Char('d') => {
                    if !self.state.request_delete_from_editor() {
                        self.state
                            .set_status_message(Some("Nothing to delete: this note is not saved yet"));
                    }
                }
                KeyCode::Char('c') => self.should_quit = true,
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc => {
                self.state.cancel_edit();
                self.state.set_status_message(Some("Edit canceled"));
                return;
            }
            KeyCode::Tab => {
                self.state.editor_next_field();
                return;
            }
            KeyCode::BackTab => {
                self.state.editor_previous_field();
                return;
            }
            _ => {}
        }

        let Some(field) = self.state.editor().map(|editor| editor.field) else {
            return;
        };
        match field {
            EditorField::Category => match key.code {
                KeyCode::Left | KeyCode::Up | KeyCode::Char('h') | KeyCode::Char('k') => {
                    self.state.editor_cycle_category(-1)
                }
                KeyCode::Right
                | KeyCode::Down
                | KeyCode::Char('l')
                | KeyCode::Char('j')
                | KeyCode::Char(' ') => self.state.editor_cycle_category(1),
                KeyCode::Enter => self.state.editor_next_field(),
                _ => {}
            },
            EditorField::Title if key.code == KeyCode::Enter => self.state.editor_next_field(),
            EditorField::Title | EditorField::Content => {
                let Some(text) = self.state.editor_mut().and_then(EditorState::active_text_mut)
                else {
                    return;
                };
                match key.code {
                    KeyCode::Enter => {
                        text.insert_newline();
                    }
                    KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::ALT) => {
                        text.insert_char(ch);
                    }
                    KeyCode::Backspace => {
                        text.backspace();
                    }
                    KeyCode::Delete => {
                        text.delete();
                    }
                    KeyCode::Left => {
                        text.move_left();
                    }
                    KeyCode::Right => {
                        text.move_right();
                    }
                    KeyCode::Up => {
                        text.move_up();
                    }
                    KeyCode::Down => {
                        text.move_down();
                    }
                    KeyCode::Home => {
                        text.move_home();
                    }
                    KeyCode::End => {
                        text.move_end();
                    }
                    _ => {}
                }
            }
        }
    }

    fn save_draft(&mut self) {
        match self.state.save_draft() {
            Ok(Some(_)) => self.state.set_status_message(Some("Note saved")),
            Ok(None) => {}
            Err(_) => self.state.set_status_message(None::<String>),
        }
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen).context("switching to alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("creating terminal backend")?;
    terminal.hide_cursor().context("hiding cursor")?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    terminal.show_cursor().ok();
    disable_raw_mode().context("disabling raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).context("restoring screen state")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(Arc::new(AppConfig::default()))
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn ctrl(app: &mut App, ch: char) {
        app.handle_key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL));
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    #[test]
    fn create_note_through_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        assert!(app.state.is_editing());
        type_text(&mut app, "Standup");
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Yesterday");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "Today");
        ctrl(&mut app, 's');

        assert!(!app.state.is_editing());
        let note = app.state.selected_note().expect("selected");
        assert_eq!(note.id, 5);
        assert_eq!(note.title, "Standup");
        assert_eq!(note.category, "Work");
        assert_eq!(note.content, "Yesterday\nToday");
        assert_eq!(app.state.status_message(), Some("Note saved"));
    }

    #[test]
    fn empty_save_shows_alert_until_dismissed() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        ctrl(&mut app, 's');
        assert!(matches!(app.state.overlay(), Some(OverlayState::Alert(_))));
        // typing is swallowed by the alert
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.state.editor().unwrap().title.as_str(), "");
        press(&mut app, KeyCode::Enter);
        assert!(app.state.overlay().is_none());
        assert!(app.state.is_editing());
        assert_eq!(app.state.len(), 4);
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut app = app();
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.state.len(), 4);
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.state.len(), 3);
        assert_eq!(app.state.selected_id(), Some(2));
    }

    #[test]
    fn search_input_filters_live() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "milk");
        assert_eq!(app.state.filtered_notes().len(), 1);
        // 'q' while typing is text, not quit
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Enter);
        assert!(!app.state.search.active);
        assert_eq!(app.state.search_query(), "milk");
        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state.search_query(), "");
        assert_eq!(app.state.filtered_notes().len(), 4);
    }

    #[test]
    fn sidebar_enter_applies_filter() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.state.focus, FocusPane::Sidebar);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state.active_category(), "Work");
        assert_eq!(app.state.selected_id(), None);
    }

    #[test]
    fn escape_cancels_edit() {
        let mut app = app();
        press(&mut app, KeyCode::Char('e'));
        type_text(&mut app, " changed");
        press(&mut app, KeyCode::Esc);
        assert!(!app.state.is_editing());
        assert_eq!(app.state.selected_note().unwrap().title, "Welcome to Notes");
    }

    #[test]
    fn quit_key_stops_loop() {
        let mut app = app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
