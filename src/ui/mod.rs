use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use regex::Regex;

use crate::app::{AppState, EditorField, EditorState, FocusPane, OverlayState};
use crate::highlight::build_highlight_regex;
use crate::notes::Note;

const SIDEBAR_WIDTH: u16 = 22;

/// Widget state that survives between frames.
#[derive(Debug, Default)]
pub struct ViewState {
    pub notes: ListState,
    pub categories: ListState,
}

pub fn draw_app(frame: &mut Frame, state: &AppState, view: &mut ViewState) {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(2)])
        .split(frame.size());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(vertical[0]);

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(columns[1]);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(main[1]);

    let highlight_regex = if state.highlight_matches {
        build_highlight_regex(state.search_query())
    } else {
        None
    };

    draw_sidebar(frame, state, view, columns[0]);
    draw_search_bar(frame, state, main[0]);
    draw_note_list(frame, state, view, content[0], highlight_regex.as_ref());
    match state.editor() {
        Some(editor) => draw_editor(frame, state, editor, content[1]),
        None => draw_viewer(frame, state, content[1], highlight_regex.as_ref()),
    }

    let status = build_status_line(state);
    frame.render_widget(
        Paragraph::new(status).style(Style::default().fg(Color::Gray)),
        vertical[1],
    );

    render_overlay(frame, state);
}

fn pane_style(state: &AppState, pane: FocusPane) -> Style {
    if state.focus == pane && !state.is_editing() {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn draw_sidebar(frame: &mut Frame, state: &AppState, view: &mut ViewState, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    let active = state.active_category();
    let items: Vec<ListItem> = state
        .categories()
        .into_iter()
        .map(|category| {
            if category == active {
                ListItem::new(Line::from(vec![
                    Span::styled("● ", Style::default().fg(Color::Cyan)),
                    Span::styled(category, Style::default().add_modifier(Modifier::BOLD)),
                ]))
            } else {
                ListItem::new(Line::from(format!("  {category}")))
            }
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title("Categories")
                .borders(Borders::ALL)
                .border_style(pane_style(state, FocusPane::Sidebar)),
        )
        .highlight_style(Style::default().bg(Color::DarkGray));
    if state.focus == FocusPane::Sidebar {
        view.categories.select(Some(state.sidebar_cursor()));
    } else {
        view.categories.select(None);
    }
    frame.render_stateful_widget(list, rows[0], &mut view.categories);

    let footer = Paragraph::new(Line::from(vec![
        Span::styled(
            "n",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  New note"),
    ]))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, rows[1]);
}

fn draw_search_bar(frame: &mut Frame, state: &AppState, area: Rect) {
    let query = state.search_query();
    let line = if query.is_empty() && !state.search.active {
        Line::from(Span::styled(
            "Search notes…",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(query.to_string())
    };
    let border = if state.search.active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let input = Paragraph::new(line).block(
        Block::default()
            .title("Search (/)")
            .borders(Borders::ALL)
            .border_style(border),
    );
    frame.render_widget(input, area);
    if state.search.active {
        let width = unicode_width::UnicodeWidthStr::width(query) as u16;
        let x = (area.x + 1 + width).min(area.right().saturating_sub(2));
        frame.set_cursor(x, area.y + 1);
    }
}

fn draw_note_list(
    frame: &mut Frame,
    state: &AppState,
    view: &mut ViewState,
    area: Rect,
    highlight_regex: Option<&Regex>,
) {
    let highlight_style = match_style();
    let filtered = state.filtered_notes();
    let mut items = Vec::with_capacity(filtered.len().max(1));
    for note in &filtered {
        let title = Line::from(highlight_line(
            &note.title,
            highlight_regex,
            highlight_style,
            Style::default().add_modifier(Modifier::BOLD),
        ));
        let category = Line::from(Span::styled(
            note.category.clone(),
            Style::default().fg(Color::Gray),
        ));
        items.push(ListItem::new(vec![title, category]));
    }
    let empty = items.is_empty();
    if empty {
        items.push(ListItem::new(Span::styled(
            "No notes found.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let title = format!("Notes ({}/{})", filtered.len(), state.len());
    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(pane_style(state, FocusPane::Notes)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");
    view.notes
        .select(if empty { None } else { state.selected_position() });
    frame.render_stateful_widget(list, area, &mut view.notes);
}

fn draw_viewer(frame: &mut Frame, state: &AppState, area: Rect, highlight_regex: Option<&Regex>) {
    let block = Block::default()
        .title("Note")
        .borders(Borders::ALL)
        .border_style(pane_style(state, FocusPane::Viewer));
    let text = match state.selected_note() {
        Some(note) => viewer_text(note, highlight_regex),
        None => Text::from(Span::styled(
            "Select a note or create a new one.",
            Style::default().fg(Color::DarkGray),
        )),
    };
    let mut paragraph = Paragraph::new(text).block(block);
    if state.wrap_enabled {
        paragraph = paragraph.wrap(Wrap { trim: false });
    }
    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn viewer_text(note: &Note, highlight_regex: Option<&Regex>) -> Text<'static> {
    let highlight_style = match_style();
    let mut lines = Vec::new();
    lines.push(Line::from(highlight_line(
        &note.title,
        highlight_regex,
        highlight_style,
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        note.category.clone(),
        Style::default().fg(Color::Cyan),
    )));
    lines.push(Line::from(""));
    for line in note.content.split('\n') {
        lines.push(Line::from(highlight_line(
            line,
            highlight_regex,
            highlight_style,
            Style::default(),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "e Edit • d Delete",
        Style::default().fg(Color::DarkGray),
    )));
    Text::from(lines)
}

fn draw_editor(frame: &mut Frame, state: &AppState, editor: &EditorState, area: Rect) {
    let title = if editor.is_new() { "New note" } else { "Edit note" };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(inner);

    let field_block = |label: &'static str, field: EditorField| {
        let style = if editor.field == field {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        Block::default()
            .title(label)
            .borders(Borders::ALL)
            .border_style(style)
    };

    let title_text = if editor.title.as_str().is_empty() && editor.field != EditorField::Title {
        Line::from(Span::styled("Note Title", Style::default().fg(Color::DarkGray)))
    } else {
        Line::from(editor.title.as_str().to_string())
    };
    frame.render_widget(
        Paragraph::new(title_text).block(field_block("Title", EditorField::Title)),
        rows[0],
    );

    let choices = state.categories();
    let position = choices
        .iter()
        .position(|c| *c == editor.category)
        .map(|idx| format!("  ({}/{})", idx + 1, choices.len()))
        .unwrap_or_default();
    let category_line = Line::from(vec![
        Span::raw("◂ "),
        Span::styled(
            editor.category.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" ▸"),
        Span::styled(position, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(
        Paragraph::new(category_line).block(field_block("Category", EditorField::Category)),
        rows[1],
    );

    let content_text = if editor.content.as_str().is_empty() && editor.field != EditorField::Content
    {
        Text::from(Span::styled(
            "Write your note…",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Text::from(
            editor
                .content
                .as_str()
                .split('\n')
                .map(|line| Line::from(line.to_string()))
                .collect::<Vec<_>>(),
        )
    };
    frame.render_widget(
        Paragraph::new(content_text).block(field_block("Content", EditorField::Content)),
        rows[2],
    );

    let actions = if editor.is_new() {
        "Ctrl-s Save • Esc Cancel"
    } else {
        "Ctrl-s Save • Ctrl-d Delete • Esc Cancel"
    };
    frame.render_widget(
        Paragraph::new(Span::styled(actions, Style::default().fg(Color::DarkGray))),
        rows[3],
    );

    if state.overlay().is_none() {
        let cursor = match editor.field {
            EditorField::Title => Some((rows[0], editor.title.cursor_position())),
            EditorField::Content => Some((rows[2], editor.content.cursor_position())),
            EditorField::Category => None,
        };
        if let Some((field_area, (row, col))) = cursor {
            let x = field_area.x + 1 + col;
            let y = field_area.y + 1 + row;
            if x < field_area.right().saturating_sub(1) && y < field_area.bottom().saturating_sub(1)
            {
                frame.set_cursor(x, y);
            }
        }
    }
}

fn build_status_line(state: &AppState) -> Text<'static> {
    let mode = match state.editor() {
        Some(editor) if editor.is_new() => "NEW",
        Some(_) => "EDIT",
        None => "VIEW",
    };
    let mut spans = vec![
        Span::raw(format!("Total: {}", state.len())),
        Span::raw(" | Category: "),
        Span::styled(
            state.active_category().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | Focus: "),
        Span::styled(
            state.focus.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | Mode: "),
        Span::styled(
            mode,
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(message) = state.status_message() {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Yellow),
        ));
    }
    let help = Line::from(Span::styled(
        "Tab focus • j/k move • Enter open • / search • n new • e edit • d delete • q quit",
        Style::default().fg(Color::DarkGray),
    ));
    Text::from(vec![Line::from(spans), help])
}

fn match_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

fn highlight_line(
    text: &str,
    regex: Option<&Regex>,
    highlight_style: Style,
    base_style: Style,
) -> Vec<Span<'static>> {
    let Some(regex) = regex else {
        return vec![Span::styled(text.to_string(), base_style)];
    };
    let mut spans = Vec::new();
    let mut last = 0;
    for found in regex.find_iter(text) {
        if found.start() > last {
            spans.push(Span::styled(text[last..found.start()].to_string(), base_style));
        }
        spans.push(Span::styled(
            found.as_str().to_string(),
            base_style.patch(highlight_style),
        ));
        last = found.end();
    }
    if last < text.len() || spans.is_empty() {
        spans.push(Span::styled(text[last..].to_string(), base_style));
    }
    spans
}

fn render_overlay(frame: &mut Frame, state: &AppState) {
    match state.overlay() {
        Some(OverlayState::ConfirmDelete(prompt)) => {
            let area = centered_rect(50, 25, frame.size());
            frame.render_widget(Clear, area);
            let lines = vec![
                Line::from(Span::styled(
                    "Delete this note? This cannot be undone.",
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(format!("\"{}\"", prompt.title)),
                Line::from(""),
                Line::from(Span::styled(
                    "y / Enter delete • n / Esc cancel",
                    Style::default().fg(Color::Gray),
                )),
            ];
            let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
                Block::default()
                    .title("Confirm")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red)),
            );
            frame.render_widget(paragraph, area);
        }
        Some(OverlayState::Alert(alert)) => {
            let area = centered_rect(50, 20, frame.size());
            frame.render_widget(Clear, area);
            let lines = vec![
                Line::from(Span::styled(
                    alert.message.clone(),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Enter to continue",
                    Style::default().fg(Color::Gray),
                )),
            ];
            let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
                Block::default()
                    .title("Alert")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            );
            frame.render_widget(paragraph, area);
        }
        None => {}
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::{default_seed_categories, NotesStore};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render(state: &AppState) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(110, 32)).expect("terminal");
        let mut view = ViewState::default();
        terminal
            .draw(|frame| draw_app(frame, state, &mut view))
            .expect("draw");
        let buffer = terminal.backend().buffer().clone();
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect()
    }

    fn screen_contains(rows: &[String], needle: &str) -> bool {
        rows.iter().any(|row| row.contains(needle))
    }

    fn seeded() -> AppState {
        AppState::new(NotesStore::with_demo_notes(default_seed_categories()))
    }

    fn span_texts(spans: &[Span<'static>]) -> Vec<String> {
        spans
            .iter()
            .map(|span| span.content.clone().into_owned())
            .collect()
    }

    #[test]
    fn highlight_splits_around_matches() {
        let regex = build_highlight_regex("milk").expect("regex");
        let spans = highlight_line(
            "Milk, eggs, milk",
            Some(&regex),
            Style::default(),
            Style::default(),
        );
        assert_eq!(span_texts(&spans), vec!["Milk", ", eggs, ", "milk"]);
    }

    #[test]
    fn highlight_without_regex_is_single_span() {
        let spans = highlight_line("plain", None, Style::default(), Style::default());
        assert_eq!(span_texts(&spans), vec!["plain"]);
    }

    #[test]
    fn renders_sidebar_list_and_viewer() {
        let rows = render(&seeded());
        for category in ["All", "Work", "Personal", "Ideas", "Archive"] {
            assert!(screen_contains(&rows, category), "missing {category}");
        }
        assert!(screen_contains(&rows, "Grocery List"));
        assert!(screen_contains(&rows, "This is a sample note."));
        assert!(screen_contains(&rows, "New note"));
        assert!(screen_contains(&rows, "Search notes…"));
    }

    #[test]
    fn empty_filter_shows_empty_states() {
        let mut state = seeded();
        state.select_category("Personal");
        state.set_search_query("pizza");
        let rows = render(&state);
        assert!(screen_contains(&rows, "No notes found."));
        assert!(screen_contains(&rows, "Select a note or create a new one."));
    }

    #[test]
    fn viewer_splits_content_lines() {
        let mut state = seeded();
        state.begin_edit(3);
        state.editor_mut().unwrap().content =
            crate::app::TextField::multi_line("first line\nsecond line");
        state.save_draft().expect("valid");
        let rows = render(&state);
        let first = rows.iter().position(|row| row.contains("first line")).expect("first");
        let second = rows.iter().position(|row| row.contains("second line")).expect("second");
        assert_eq!(second, first + 1);
    }

    #[test]
    fn editor_and_alert_render() {
        let mut state = seeded();
        state.begin_create();
        let rows = render(&state);
        assert!(screen_contains(&rows, "New note"));
        assert!(screen_contains(&rows, "Ctrl-s Save • Esc Cancel"));
        assert!(!screen_contains(&rows, "Ctrl-d Delete"));

        let _ = state.save_draft();
        let rows = render(&state);
        assert!(screen_contains(&rows, "Title and content cannot be empty."));
    }

    #[test]
    fn confirm_prompt_renders_title() {
        let mut state = seeded();
        state.request_delete(2);
        let rows = render(&state);
        assert!(screen_contains(&rows, "Delete this note?"));
        assert!(screen_contains(&rows, "\"Work Meeting\""));
    }
}
