use std::sync::LazyLock;

use pulldown_cmark::{html, Options, Parser};
use regex::Regex;

// Greedy: a run such as `[1] [2] ` goes in one match.
static CITATION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\[.*\]\s)").expect("citation marker pattern is valid"));

/// Render markdown to an HTML fragment.
pub fn render_markdown(text: &str) -> String {
    let parser = Parser::new_ext(text, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH);
    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Remove bracketed citation markers (and the whitespace after them).
pub fn strip_citation_markers(html: &str) -> String {
    CITATION_MARKER.replace_all(html, "").into_owned()
}
