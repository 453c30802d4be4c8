use crate::notes::{Note, ALL_CATEGORY};

/// Category filter combined with a free-text term. Both must match.
#[derive(Debug, Clone)]
pub struct NoteFilter {
    pub category: String,
    pub query: String,
}

impl Default for NoteFilter {
    fn default() -> Self {
        Self {
            category: ALL_CATEGORY.to_string(),
            query: String::new(),
        }
    }
}

impl NoteFilter {
    pub fn new(category: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            query: query.into(),
        }
    }

    pub fn has_category(&self) -> bool {
        !self.category.is_empty() && self.category != ALL_CATEGORY
    }

    /// Lower-cased, trimmed query; `None` when only whitespace was typed.
    pub fn needle(&self) -> Option<String> {
        let trimmed = self.query.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_lowercase())
        }
    }

    pub fn matches(&self, note: &Note) -> bool {
        if self.has_category() && note.category != self.category {
            return false;
        }
        match self.needle() {
            Some(needle) => matches_text(note, &needle),
            None => true,
        }
    }

    pub fn apply<'a>(&self, notes: &'a [Note]) -> Vec<&'a Note> {
        let needle = self.needle();
        notes
            .iter()
            .filter(|note| !self.has_category() || note.category == self.category)
            .filter(|note| match needle.as_deref() {
                Some(needle) => matches_text(note, needle),
                None => true,
            })
            .collect()
    }
}

fn matches_text(note: &Note, needle: &str) -> bool {
    note.title.to_lowercase().contains(needle) || note.content.to_lowercase().contains(needle)
}
