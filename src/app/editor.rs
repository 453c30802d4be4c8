use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::notes::{Note, NoteDraft, NoteId, ALL_CATEGORY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum EditorField {
    Title,
    Category,
    Content,
}

impl EditorField {
    pub fn next(self) -> Self {
        match self {
            EditorField::Title => EditorField::Category,
            EditorField::Category => EditorField::Content,
            EditorField::Content => EditorField::Title,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            EditorField::Title => EditorField::Content,
            EditorField::Category => EditorField::Title,
            EditorField::Content => EditorField::Category,
        }
    }
}

/// Open create/edit form. `note_id` is `None` while composing a new note.
#[derive(Debug, Clone)]
pub struct EditorState {
    note_id: Option<NoteId>,
    pub title: TextField,
    pub content: TextField,
    pub category: String,
    pub field: EditorField,
}

impl EditorState {
    pub fn for_new_note() -> Self {
        Self {
            note_id: None,
            title: TextField::single_line(""),
            content: TextField::multi_line(""),
            category: ALL_CATEGORY.to_string(),
            field: EditorField::Title,
        }
    }

    pub fn for_note(note: &Note) -> Self {
        Self {
            note_id: Some(note.id),
            title: TextField::single_line(&note.title),
            content: TextField::multi_line(&note.content),
            category: note.category.clone(),
            field: EditorField::Title,
        }
    }

    pub fn note_id(&self) -> Option<NoteId> {
        self.note_id
    }

    pub fn is_new(&self) -> bool {
        self.note_id.is_none()
    }

    pub fn draft(&self) -> NoteDraft {
        NoteDraft {
            title: self.title.as_str().to_string(),
            content: self.content.as_str().to_string(),
            category: self.category.clone(),
        }
    }

    pub fn active_text_mut(&mut self) -> Option<&mut TextField> {
        match self.field {
            EditorField::Title => Some(&mut self.title),
            EditorField::Content => Some(&mut self.content),
            EditorField::Category => None,
        }
    }

    /// Steps through `choices`, wrapping at both ends. An unknown current
    /// category restarts from the first choice.
    pub fn cycle_category(&mut self, choices: &[String], delta: isize) {
        if choices.is_empty() {
            return;
        }
        let len = choices.len() as isize;
        let next = match choices.iter().position(|c| *c == self.category) {
            Some(idx) => (idx as isize + delta).rem_euclid(len),
            None => 0,
        };
        self.category = choices[next as usize].clone();
    }
}

#[derive(Debug, Clone)]
pub struct TextField {
    buffer: String,
    cursor: usize,
    multiline: bool,
    preferred_column: Option<usize>,
}

impl TextField {
    pub fn single_line(text: &str) -> Self {
        Self::new(text, false)
    }

    pub fn multi_line(text: &str) -> Self {
        Self::new(text, true)
    }

    fn new(text: &str, multiline: bool) -> Self {
        Self {
            buffer: text.to_string(),
            cursor: text.len(),
            multiline,
            preferred_column: None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Row index and display column of the cursor, for terminal placement.
    pub fn cursor_position(&self) -> (u16, u16) {
        let row = self.buffer[..self.cursor].matches('\n').count();
        let start = line_start(&self.buffer, self.cursor);
        let col = UnicodeWidthStr::width(&self.buffer[start..self.cursor]);
        (row as u16, col as u16)
    }

    pub fn insert_char(&mut self, ch: char) -> bool {
        if ch == '\n' {
            return self.insert_newline();
        }
        self.buffer.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
        self.preferred_column = None;
        true
    }

    pub fn insert_newline(&mut self) -> bool {
        if !self.multiline {
            return false;
        }
        self.buffer.insert(self.cursor, '\n');
        self.cursor += 1;
        self.preferred_column = Some(0);
        true
    }

    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let prev = prev_grapheme_boundary(&self.buffer, self.cursor);
        self.buffer.drain(prev..self.cursor);
        self.cursor = prev;
        self.preferred_column = None;
        true
    }

    pub fn delete(&mut self) -> bool {
        let next = next_grapheme_boundary(&self.buffer, self.cursor);
        if next == self.cursor {
            return false;
        }
        self.buffer.drain(self.cursor..next);
        self.preferred_column = None;
        true
    }

    pub fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor = prev_grapheme_boundary(&self.buffer, self.cursor);
        self.preferred_column = None;
        true
    }

    pub fn move_right(&mut self) -> bool {
        let next = next_grapheme_boundary(&self.buffer, self.cursor);
        if next == self.cursor {
            return false;
        }
        self.cursor = next;
        self.preferred_column = None;
        true
    }

    pub fn move_home(&mut self) -> bool {
        let start = line_start(&self.buffer, self.cursor);
        self.preferred_column = Some(0);
        if start == self.cursor {
            return false;
        }
        self.cursor = start;
        true
    }

    pub fn move_end(&mut self) -> bool {
        let end = line_end(&self.buffer, self.cursor);
        self.preferred_column = None;
        if end == self.cursor {
            return false;
        }
        self.cursor = end;
        true
    }

    pub fn move_up(&mut self) -> bool {
        let start = line_start(&self.buffer, self.cursor);
        if start == 0 {
            return false;
        }
        let column = self.current_column(start);
        let prev_start = line_start(&self.buffer, start - 1);
        self.cursor = position_for_column(&self.buffer, prev_start, column);
        self.preferred_column = Some(column);
        true
    }

    pub fn move_down(&mut self) -> bool {
        let end = line_end(&self.buffer, self.cursor);
        if end == self.buffer.len() {
            return false;
        }
        let start = line_start(&self.buffer, self.cursor);
        let column = self.current_column(start);
        self.cursor = position_for_column(&self.buffer, end + 1, column);
        self.preferred_column = Some(column);
        true
    }

    fn current_column(&self, line_start: usize) -> usize {
        self.preferred_column
            .unwrap_or_else(|| self.buffer[line_start..self.cursor].graphemes(true).count())
    }
}

fn prev_grapheme_boundary(text: &str, cursor: usize) -> usize {
    text[..cursor]
        .grapheme_indices(true)
        .next_back()
        .map(|(idx, _)| idx)
        .unwrap_or(0)
}

fn next_grapheme_boundary(text: &str, cursor: usize) -> usize {
    text[cursor..]
        .graphemes(true)
        .next()
        .map(|g| cursor + g.len())
        .unwrap_or(cursor)
}

fn line_start(text: &str, cursor: usize) -> usize {
    text[..cursor].rfind('\n').map(|idx| idx + 1).unwrap_or(0)
}

fn line_end(text: &str, cursor: usize) -> usize {
    text[cursor..]
        .find('\n')
        .map(|idx| cursor + idx)
        .unwrap_or(text.len())
}

fn position_for_column(text: &str, line_start: usize, column: usize) -> usize {
    let end = line_end(text, line_start);
    text[line_start..end]
        .graphemes(true)
        .take(column)
        .fold(line_start, |pos, g| pos + g.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line_rejects_newlines() {
        let mut field = TextField::single_line("abc");
        assert!(!field.insert_newline());
        assert!(!field.insert_char('\n'));
        assert_eq!(field.as_str(), "abc");
    }

    #[test]
    fn backspace_removes_whole_grapheme() {
        let mut field = TextField::single_line("cafe\u{301}");
        assert!(field.backspace());
        assert_eq!(field.as_str(), "caf");
    }

    #[test]
    fn inserts_at_cursor() {
        let mut field = TextField::single_line("ac");
        field.move_left();
        field.insert_char('b');
        assert_eq!(field.as_str(), "abc");
        assert_eq!(field.cursor(), 2);
        assert!(field.delete());
        assert_eq!(field.as_str(), "ab");
    }

    #[test]
    fn vertical_moves_keep_column() {
        let mut field = TextField::multi_line("alpha\nbe\ngamma");
        assert!(field.move_up());
        assert_eq!(field.cursor_position(), (1, 2));
        assert!(field.move_up());
        assert_eq!(field.cursor_position(), (0, 5));
        assert!(!field.move_up());
        assert!(field.move_down());
        assert!(field.move_down());
        assert_eq!(field.cursor_position(), (2, 5));
    }

    #[test]
    fn home_and_end_stay_on_line() {
        let mut field = TextField::multi_line("one\ntwo");
        assert!(field.move_home());
        assert_eq!(field.cursor(), 4);
        assert!(field.move_end());
        assert_eq!(field.cursor(), 7);
    }

    #[test]
    fn cycle_category_wraps() {
        let choices: Vec<String> = ["All", "Work", "Ideas"].iter().map(|c| c.to_string()).collect();
        let mut editor = EditorState::for_new_note();
        editor.cycle_category(&choices, -1);
        assert_eq!(editor.category, "Ideas");
        editor.cycle_category(&choices, 1);
        assert_eq!(editor.category, "All");
        editor.category = "Gone".into();
        editor.cycle_category(&choices, 1);
        assert_eq!(editor.category, "All");
    }

    #[test]
    fn fields_cycle_both_ways() {
        assert_eq!(EditorField::Title.next(), EditorField::Category);
        assert_eq!(EditorField::Title.previous(), EditorField::Content);
        assert_eq!(EditorField::Content.next(), EditorField::Title);
    }
}
