//! User-facing reply text.

use scribe_core::Document;

/// One `- **title** (edited YYYY-MM-DD)` line per document.
pub fn note_list(docs: &[Document]) -> String {
    docs.iter().map(note_line).collect::<Vec<_>>().join("\n")
}

fn note_line(doc: &Document) -> String {
    match doc.edited_date() {
        Some(date) => format!("- **{}** (edited {})", doc.title, date),
        None => format!("- **{}**", doc.title),
    }
}

/// Title header followed by page text, or a placeholder for empty pages.
pub fn note_body(title: &str, content: &str) -> String {
    if content.is_empty() {
        format!("**{}**\n(This page has no text content.)", title)
    } else {
        format!("**{}**\n{}", title, content)
    }
}

pub fn not_found(title: &str) -> String {
    format!("Couldn't find a note titled \"{}\".", title)
}
