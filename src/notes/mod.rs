use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type NoteId = i64;

/// Category that matches every note when used as a filter.
pub const ALL_CATEGORY: &str = "All";

pub const DEFAULT_SEED_CATEGORIES: [&str; 5] = ["All", "Work", "Personal", "Ideas", "Archive"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub category: String,
}

impl Default for NoteDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            category: ALL_CATEGORY.to_string(),
        }
    }
}

impl NoteDraft {
    pub fn from_note(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            content: note.content.clone(),
            category: note.category.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() || self.content.trim().is_empty() {
            return Err(ValidationError::EmptyTitleOrContent);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title and content cannot be empty.")]
    EmptyTitleOrContent,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotesError {
    #[error("note #{0} does not exist")]
    UnknownNote(NoteId),
}

/// Ordered in-memory note collection. Newest notes sit at the front.
#[derive(Debug, Clone, Default)]
pub struct NotesStore {
    notes: Vec<Note>,
    seed_categories: Vec<String>,
    highest_issued: NoteId,
}

impl NotesStore {
    pub fn new(seed_categories: Vec<String>) -> Self {
        Self {
            notes: Vec::new(),
            seed_categories,
            highest_issued: 0,
        }
    }

    pub fn with_demo_notes(seed_categories: Vec<String>) -> Self {
        let notes = demo_notes();
        let highest_issued = max_id(&notes);
        Self {
            notes,
            seed_categories,
            highest_issued,
        }
    }

    pub fn from_notes(notes: Vec<Note>, seed_categories: Vec<String>) -> Self {
        let highest_issued = max_id(&notes);
        Self {
            notes,
            seed_categories,
            highest_issued,
        }
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn contains(&self, id: NoteId) -> bool {
        self.get(id).is_some()
    }

    pub fn first_id(&self) -> Option<NoteId> {
        self.notes.first().map(|note| note.id)
    }

    pub fn seed_categories(&self) -> &[String] {
        &self.seed_categories
    }

    /// Next id: one past the largest id ever issued or present, so ids of
    /// deleted notes are never handed out again.
    pub fn next_id(&self) -> NoteId {
        self.highest_issued.max(max_id(&self.notes)) + 1
    }

    /// Inserts a note built from `draft` at the front of the collection.
    pub fn create(&mut self, draft: NoteDraft) -> NoteId {
        let id = self.next_id();
        self.highest_issued = id;
        self.notes.insert(
            0,
            Note {
                id,
                title: draft.title,
                content: draft.content,
                category: draft.category,
            },
        );
        tracing::debug!(note_id = id, "note created");
        id
    }

    pub fn update(&mut self, id: NoteId, draft: NoteDraft) -> Result<(), NotesError> {
        let note = self
            .notes
            .iter_mut()
            .find(|note| note.id == id)
            .ok_or(NotesError::UnknownNote(id))?;
        note.title = draft.title;
        note.content = draft.content;
        note.category = draft.category;
        tracing::debug!(note_id = id, "note updated");
        Ok(())
    }

    pub fn remove(&mut self, id: NoteId) -> Result<Note, NotesError> {
        let idx = self
            .notes
            .iter()
            .position(|note| note.id == id)
            .ok_or(NotesError::UnknownNote(id))?;
        let removed = self.notes.remove(idx);
        tracing::debug!(note_id = id, "note deleted");
        Ok(removed)
    }

    pub fn categories(&self) -> Vec<String> {
        category_set(&self.notes, &self.seed_categories)
    }
}

/// `"All"` first, then every category in use (collection order), then the
/// seed categories. Duplicates keep their first position.
pub fn category_set(notes: &[Note], seed_categories: &[String]) -> Vec<String> {
    let mut set: IndexSet<&str> = IndexSet::with_capacity(notes.len() + seed_categories.len() + 1);
    set.insert(ALL_CATEGORY);
    for note in notes {
        set.insert(note.category.as_str());
    }
    for category in seed_categories {
        set.insert(category.as_str());
    }
    set.into_iter().map(str::to_string).collect()
}

pub fn default_seed_categories() -> Vec<String> {
    DEFAULT_SEED_CATEGORIES
        .iter()
        .map(|category| category.to_string())
        .collect()
}

pub fn demo_notes() -> Vec<Note> {
    let seed = [
        (
            1,
            "Welcome to Notes",
            "This is a sample note. You can edit or delete it.",
            "All",
        ),
        (
            2,
            "Work Meeting",
            "Meeting about project X next Tuesday at 10am.",
            "Work",
        ),
        (3, "Grocery List", "Milk, eggs, bread, bananas.", "Personal"),
        (
            4,
            "App Idea",
            "Build a simple note organizer using React.",
            "Ideas",
        ),
    ];
    seed.into_iter()
        .map(|(id, title, content, category)| Note {
            id,
            title: title.to_string(),
            content: content.to_string(),
            category: category.to_string(),
        })
        .collect()
}

fn max_id(notes: &[Note]) -> NoteId {
    notes.iter().map(|note| note.id).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn draft(title: &str, content: &str, category: &str) -> NoteDraft {
        NoteDraft {
            title: title.into(),
            content: content.into(),
            category: category.into(),
        }
    }

    #[test]
    fn empty_store_issues_id_one() {
        let mut store = NotesStore::new(default_seed_categories());
        assert_eq!(store.next_id(), 1);
        let id = store.create(draft("a", "b", "All"));
        assert_eq!(id, 1);
    }

    #[test]
    fn create_prepends_with_fresh_id() {
        let mut store = NotesStore::with_demo_notes(default_seed_categories());
        let id = store.create(draft("Plan", "Write it down", "Work"));
        assert_eq!(id, 5);
        assert_eq!(store.len(), 5);
        assert_eq!(store.first_id(), Some(5));
    }

    #[test]
    fn deleted_top_id_is_not_reissued() {
        let mut store = NotesStore::with_demo_notes(default_seed_categories());
        let id = store.create(draft("Temp", "gone soon", "All"));
        store.remove(id).expect("remove");
        assert_eq!(store.create(draft("Next", "body", "All")), id + 1);
    }

    #[test]
    fn update_overwrites_fields_in_place() {
        let mut store = NotesStore::with_demo_notes(default_seed_categories());
        store
            .update(3, draft("Shopping", "Milk only", "Archive"))
            .expect("update");
        let ids: Vec<_> = store.notes().iter().map(|note| note.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        let note = store.get(3).expect("note");
        assert_eq!(note.title, "Shopping");
        assert_eq!(note.category, "Archive");
    }

    #[test]
    fn unknown_ids_are_reported() {
        let mut store = NotesStore::with_demo_notes(default_seed_categories());
        assert_matches!(
            store.update(42, NoteDraft::default()),
            Err(NotesError::UnknownNote(42))
        );
        assert_matches!(store.remove(42), Err(NotesError::UnknownNote(42)));
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn category_set_orders_all_then_used_then_seed() {
        let notes = vec![
            Note {
                id: 1,
                title: "t".into(),
                content: "c".into(),
                category: "Travel".into(),
            },
            Note {
                id: 2,
                title: "t".into(),
                content: "c".into(),
                category: "Work".into(),
            },
        ];
        let categories = category_set(&notes, &default_seed_categories());
        assert_eq!(
            categories,
            vec!["All", "Travel", "Work", "Personal", "Ideas", "Archive"]
        );
    }

    #[test]
    fn category_set_keeps_all_without_seeds() {
        assert_eq!(category_set(&[], &[]), vec!["All"]);
    }

    #[test]
    fn validation_rejects_blank_fields() {
        assert_matches!(
            draft("   ", "body", "All").validate(),
            Err(ValidationError::EmptyTitleOrContent)
        );
        assert_matches!(
            draft("Title", "\n\t ", "All").validate(),
            Err(ValidationError::EmptyTitleOrContent)
        );
        assert!(draft("Title", "body", "All").validate().is_ok());
    }

    #[test]
    fn new_draft_defaults_to_all() {
        assert_eq!(NoteDraft::default().category, ALL_CATEGORY);
    }
}
