use regex::{Regex, RegexBuilder};

/// Case-insensitive matcher for the active search term. The term is matched
/// literally, exactly like the list filter does.
pub fn build_highlight_regex(query: &str) -> Option<Regex> {
    let term = query.trim();
    if term.is_empty() {
        return None;
    }
    RegexBuilder::new(&regex::escape(term))
        .case_insensitive(true)
        .build()
        .ok()
}
