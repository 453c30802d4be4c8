pub mod app;
pub mod cli;
pub mod config;
pub mod highlight;
pub mod notes;
pub mod search;
pub mod ui;

pub use config::{AppConfig, ConfigLoader, ConfigPaths};
pub use notes::{Note, NoteDraft, NoteId, NotesStore, ValidationError};
