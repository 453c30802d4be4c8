use crate::config::AppConfig;
use crate::notes::{Note, NoteId, NotesError, NotesStore, ValidationError};
use crate::search::NoteFilter;

use super::editor::{EditorField, EditorState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum FocusPane {
    Sidebar,
    Notes,
    Viewer,
}

#[derive(Debug, Clone)]
pub struct DeleteNoteOverlay {
    pub note_id: NoteId,
    pub title: String,
    /// Set when the prompt was raised from the open editor.
    pub from_editor: bool,
}

#[derive(Debug, Clone)]
pub struct AlertOverlay {
    pub message: String,
}

#[derive(Debug, Clone)]
pub enum OverlayState {
    ConfirmDelete(DeleteNoteOverlay),
    Alert(AlertOverlay),
}

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub active: bool,
}

/// Whole application state. Every user operation is a method here; the
/// event loop only translates keys into calls.
#[derive(Debug, Clone)]
pub struct AppState {
    store: NotesStore,
    selected: Option<NoteId>,
    filter: NoteFilter,
    pub focus: FocusPane,
    pub search: SearchState,
    sidebar_cursor: usize,
    editor: Option<EditorState>,
    overlay: Option<OverlayState>,
    status_message: Option<String>,
    pub wrap_enabled: bool,
    pub highlight_matches: bool,
}

impl AppState {
    pub fn new(store: NotesStore) -> Self {
        let selected = store.first_id();
        Self {
            store,
            selected,
            filter: NoteFilter::default(),
            focus: FocusPane::Notes,
            search: SearchState::default(),
            sidebar_cursor: 0,
            editor: None,
            overlay: None,
            status_message: None,
            wrap_enabled: true,
            highlight_matches: true,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let seeds = config.seed_categories.clone();
        let store = if config.seed_demo_notes {
            NotesStore::with_demo_notes(seeds)
        } else {
            NotesStore::new(seeds)
        };
        let mut state = Self::new(store);
        state.wrap_enabled = config.wrap_content;
        state.highlight_matches = config.search.highlight_matches;
        state
    }

    pub fn store(&self) -> &NotesStore {
        &self.store
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn selected_id(&self) -> Option<NoteId> {
        self.selected
    }

    /// The selected note, looked up in the full collection so it stays
    /// visible even when the active filter hides it from the list.
    pub fn selected_note(&self) -> Option<&Note> {
        self.selected.and_then(|id| self.store.get(id))
    }

    pub fn categories(&self) -> Vec<String> {
        self.store.categories()
    }

    pub fn active_category(&self) -> &str {
        &self.filter.category
    }

    pub fn filter(&self) -> &NoteFilter {
        &self.filter
    }

    pub fn filtered_notes(&self) -> Vec<&Note> {
        self.filter.apply(self.store.notes())
    }

    /// Row of the selected note within the filtered list.
    pub fn selected_position(&self) -> Option<usize> {
        let id = self.selected?;
        self.filtered_notes().iter().position(|note| note.id == id)
    }

    pub fn editor(&self) -> Option<&EditorState> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut EditorState> {
        self.editor.as_mut()
    }

    pub fn is_editing(&self) -> bool {
        self.editor.is_some()
    }

    pub fn overlay(&self) -> Option<&OverlayState> {
        self.overlay.as_ref()
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn set_status_message<S: Into<String>>(&mut self, message: Option<S>) {
        self.status_message = message.map(Into::into);
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            FocusPane::Sidebar => FocusPane::Notes,
            FocusPane::Notes => FocusPane::Viewer,
            FocusPane::Viewer => FocusPane::Sidebar,
        };
    }

    pub fn begin_create(&mut self) {
        self.editor = Some(EditorState::for_new_note());
        self.selected = None;
        self.focus = FocusPane::Viewer;
    }

    pub fn begin_edit(&mut self, id: NoteId) -> bool {
        let Some(note) = self.store.get(id) else {
            tracing::warn!(note_id = id, "edit requested for missing note");
            return false;
        };
        self.editor = Some(EditorState::for_note(note));
        self.selected = Some(id);
        self.focus = FocusPane::Viewer;
        true
    }

    pub fn edit_selected(&mut self) -> bool {
        match self.selected {
            Some(id) => self.begin_edit(id),
            None => false,
        }
    }

    /// Validates and commits the open draft. A rejected draft raises the
    /// alert overlay and leaves the collection and editor untouched.
    pub fn save_draft(&mut self) -> Result<Option<NoteId>, ValidationError> {
        let Some(editor) = self.editor.as_ref() else {
            return Ok(None);
        };
        let draft = editor.draft();
        if let Err(err) = draft.validate() {
            self.overlay = Some(OverlayState::Alert(AlertOverlay {
                message: err.to_string(),
            }));
            return Err(err);
        }

        let saved = match editor.note_id() {
            Some(id) => {
                if let Err(err) = self.store.update(id, draft) {
                    tracing::warn!(%err, "dropping edit for missing note");
                }
                id
            }
            None => {
                let id = self.store.create(draft);
                self.selected = Some(id);
                id
            }
        };
        self.editor = None;
        Ok(Some(saved))
    }

    pub fn cancel_edit(&mut self) {
        self.editor = None;
    }

    pub fn request_delete(&mut self, id: NoteId) -> bool {
        let Some(note) = self.store.get(id) else {
            return false;
        };
        self.overlay = Some(OverlayState::ConfirmDelete(DeleteNoteOverlay {
            note_id: id,
            title: note.title.clone(),
            from_editor: self.editor.is_some(),
        }));
        true
    }

    pub fn request_delete_selected(&mut self) -> bool {
        match self.selected {
            Some(id) => self.request_delete(id),
            None => false,
        }
    }

    /// Delete is only offered while editing an existing note.
    pub fn request_delete_from_editor(&mut self) -> bool {
        match self.editor.as_ref().and_then(EditorState::note_id) {
            Some(id) => self.request_delete(id),
            None => false,
        }
    }

    pub fn confirm_delete(&mut self) -> Option<Note> {
        if !matches!(self.overlay, Some(OverlayState::ConfirmDelete(_))) {
            return None;
        }
        let Some(OverlayState::ConfirmDelete(prompt)) = self.overlay.take() else {
            return None;
        };
        let removed = match self.store.remove(prompt.note_id) {
            Ok(note) => note,
            Err(NotesError::UnknownNote(id)) => {
                tracing::warn!(note_id = id, "delete confirmed for missing note");
                self.editor = None;
                return None;
            }
        };
        // Replacement comes from the whole collection, not the filtered view.
        if self.selected == Some(removed.id) {
            self.selected = self.store.first_id();
        }
        self.editor = None;
        Some(removed)
    }

    pub fn cancel_delete(&mut self) {
        if !matches!(self.overlay, Some(OverlayState::ConfirmDelete(_))) {
            return;
        }
        if let Some(OverlayState::ConfirmDelete(prompt)) = self.overlay.take() {
            if prompt.from_editor {
                self.editor = None;
            }
        }
    }

    pub fn dismiss_alert(&mut self) {
        if matches!(self.overlay, Some(OverlayState::Alert(_))) {
            self.overlay = None;
        }
    }

    pub fn select_note(&mut self, id: NoteId) {
        self.selected = Some(id);
        self.editor = None;
    }

    /// Moves the selection through the filtered list. With no visible
    /// selection, down picks the first row and up the last.
    pub fn select_relative(&mut self, delta: isize) {
        let ids: Vec<NoteId> = self.filtered_notes().iter().map(|note| note.id).collect();
        if ids.is_empty() {
            return;
        }
        let last = ids.len() as isize - 1;
        let next = match self.selected_position() {
            Some(idx) => (idx as isize + delta).clamp(0, last),
            None if delta >= 0 => 0,
            None => last,
        };
        self.select_note(ids[next as usize]);
    }

    pub fn select_category(&mut self, category: &str) {
        tracing::debug!(category, "category filter changed");
        self.filter.category = category.to_string();
        self.selected = None;
        self.editor = None;
        if let Some(idx) = self.categories().iter().position(|c| c == category) {
            self.sidebar_cursor = idx;
        }
    }

    pub fn sidebar_cursor(&self) -> usize {
        let count = self.categories().len();
        self.sidebar_cursor.min(count.saturating_sub(1))
    }

    pub fn move_sidebar_cursor(&mut self, delta: isize) {
        let last = self.categories().len() as isize - 1;
        let current = self.sidebar_cursor() as isize;
        self.sidebar_cursor = (current + delta).clamp(0, last.max(0)) as usize;
    }

    pub fn apply_sidebar_category(&mut self) {
        let categories = self.categories();
        if let Some(category) = categories.get(self.sidebar_cursor()) {
            self.select_category(category);
        }
    }

    pub fn search_query(&self) -> &str {
        &self.filter.query
    }

    pub fn begin_search(&mut self) {
        self.search.active = true;
    }

    pub fn finish_search(&mut self) {
        self.search.active = false;
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.filter.query = query.into();
    }

    pub fn push_search_char(&mut self, ch: char) {
        self.filter.query.push(ch);
    }

    pub fn pop_search_char(&mut self) {
        self.filter.query.pop();
    }

    pub fn clear_search(&mut self) {
        self.filter.query.clear();
        self.search.active = false;
    }

    pub fn editor_next_field(&mut self) {
        if let Some(editor) = self.editor.as_mut() {
            editor.field = editor.field.next();
        }
    }

    pub fn editor_previous_field(&mut self) {
        if let Some(editor) = self.editor.as_mut() {
            editor.field = editor.field.previous();
        }
    }

    pub fn editor_cycle_category(&mut self, delta: isize) {
        let choices = self.categories();
        if let Some(editor) = self.editor.as_mut() {
            if editor.field == EditorField::Category {
                editor.cycle_category(&choices, delta);
            }
        }
    }
}
