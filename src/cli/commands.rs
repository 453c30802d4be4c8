use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use crate::app::{App, AppState};
use crate::config::AppConfig;
use crate::notes::{Note, ALL_CATEGORY};
use crate::search::NoteFilter;

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Only show notes in this category ("All" disables the filter)
    #[arg(long, default_value = ALL_CATEGORY)]
    pub category: String,
    /// Case-insensitive text to look for in titles and content
    #[arg(long)]
    pub search: Option<String>,
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

pub fn run_tui(app: &mut App) -> Result<()> {
    app.run()
}

pub fn list_notes(config: Arc<AppConfig>, args: ListArgs) -> Result<()> {
    let state = AppState::from_config(&config);
    let output = render_list(&state, &args)?;
    print!("{output}");
    Ok(())
}

pub fn print_categories(config: Arc<AppConfig>) -> Result<()> {
    let state = AppState::from_config(&config);
    for category in state.categories() {
        println!("{category}");
    }
    Ok(())
}

fn render_list(state: &AppState, args: &ListArgs) -> Result<String> {
    let filter = NoteFilter::new(
        args.category.clone(),
        args.search.clone().unwrap_or_default(),
    );
    let notes = filter.apply(state.store().notes());
    if args.json {
        let mut out = serde_json::to_string_pretty(&notes).context("serializing notes")?;
        out.push('\n');
        return Ok(out);
    }
    Ok(format_notes(&notes))
}

fn format_notes(notes: &[&Note]) -> String {
    if notes.is_empty() {
        return "No notes found.\n".to_string();
    }
    let mut out = String::new();
    for note in notes {
        let _ = writeln!(&mut out, "#{}  {}  [{}]", note.id, note.title, note.category);
        for line in note.content.split('\n') {
            let _ = writeln!(&mut out, "    {line}");
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult<T = ()> = Result<T>;

    fn args(category: &str, search: Option<&str>, json: bool) -> ListArgs {
        ListArgs {
            category: category.into(),
            search: search.map(Into::into),
            json,
        }
    }

    fn demo_state() -> AppState {
        AppState::from_config(&AppConfig::default())
    }

    #[test]
    fn list_filters_by_category_and_search() -> TestResult {
        let output = render_list(&demo_state(), &args("Work", Some("meeting"), false))?;
        assert!(output.contains("#2  Work Meeting  [Work]"));
        assert!(!output.contains("Grocery List"));
        Ok(())
    }

    #[test]
    fn list_reports_empty_result() -> TestResult {
        let output = render_list(&demo_state(), &args("Personal", Some("pizza"), false))?;
        assert_eq!(output, "No notes found.\n");
        Ok(())
    }

    #[test]
    fn list_json_round_trips_notes() -> TestResult {
        let output = render_list(&demo_state(), &args(ALL_CATEGORY, None, true))?;
        let notes: Vec<Note> = serde_json::from_str(&output)?;
        assert_eq!(notes.len(), 4);
        assert_eq!(notes[2].title, "Grocery List");
        Ok(())
    }

    #[test]
    fn list_respects_empty_seed_config() -> TestResult {
        let config = AppConfig {
            seed_demo_notes: false,
            ..AppConfig::default()
        };
        let state = AppState::from_config(&config);
        let output = render_list(&state, &args(ALL_CATEGORY, None, false))?;
        assert_eq!(output, "No notes found.\n");
        Ok(())
    }
}
