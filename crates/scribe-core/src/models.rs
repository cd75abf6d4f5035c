//! Data models shared across scribe crates.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Embedding vector as returned by the embedding service.
pub type Vector = Vec<f32>;

// =============================================================================
// DOCUMENTS
// =============================================================================

/// A page in the remote workspace, snapshotted at fetch time.
///
/// Identity is `id`; the authoritative copy lives in the workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub url: String,
    /// Edit time with the offset the workspace reported.
    pub last_edited: Option<DateTime<FixedOffset>>,
    pub created: Option<DateTime<FixedOffset>>,
}

impl Document {
    /// Create a document snapshot with no url or timestamps.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: String::new(),
            last_edited: None,
            created: None,
        }
    }

    /// Date part (`YYYY-MM-DD`) of the last edit as written by the
    /// workspace, without converting to another timezone.
    pub fn edited_date(&self) -> Option<String> {
        self.last_edited
            .map(|ts| ts.format("%Y-%m-%d").to_string())
    }
}

/// Ordering requested when fetching pages from the workspace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PageOrder {
    /// Most recently edited first.
    #[default]
    LastEditedDesc,
    /// Whatever order the workspace returns.
    Unspecified,
}

/// Parameters for a workspace page fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    pub order: PageOrder,
    pub page_size: usize,
}

impl PageQuery {
    /// Most-recently-edited pages first.
    pub fn recent(page_size: usize) -> Self {
        Self {
            order: PageOrder::LastEditedDesc,
            page_size,
        }
    }

    /// Any accessible pages, in workspace order.
    pub fn any(page_size: usize) -> Self {
        Self {
            order: PageOrder::Unspecified,
            page_size,
        }
    }
}

// =============================================================================
// BLOCKS
// =============================================================================

/// A content block inside a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// Plain text paragraph.
    Paragraph { text: String },
    /// Checklist item.
    ToDo { text: String, checked: bool },
    /// Any other block type; only its plain text is kept.
    Other { kind: String, text: String },
}

impl Block {
    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph { text: text.into() }
    }

    /// An unchecked checklist item.
    pub fn todo(text: impl Into<String>) -> Self {
        Block::ToDo {
            text: text.into(),
            checked: false,
        }
    }

    pub fn plain_text(&self) -> &str {
        match self {
            Block::Paragraph { text } => text,
            Block::ToDo { text, .. } => text,
            Block::Other { text, .. } => text,
        }
    }
}

/// Join the non-empty plain text of each block, one block per line.
pub fn blocks_to_text(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(Block::plain_text)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

// =============================================================================
// EMBEDDINGS
// =============================================================================

/// A cached title embedding.
///
/// Valid only while `title` equals the document's current title; a mismatch
/// means the page was renamed and the vector must be recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingEntry {
    pub title: String,
    pub vector: Vector,
}

impl EmbeddingEntry {
    pub fn new(title: impl Into<String>, vector: Vector) -> Self {
        Self {
            title: title.into(),
            vector,
        }
    }

    pub fn is_fresh_for(&self, title: &str) -> bool {
        self.title == title
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_edited_date_is_date_prefix() {
        let mut doc = Document::new("p1", "Plan");
        doc.last_edited = Some(Utc.with_ymd_and_hms(2026, 3, 14, 15, 9, 26).unwrap().fixed_offset());
        assert_eq!(doc.edited_date().as_deref(), Some("2026-03-14"));
    }

    #[test]
    fn test_edited_date_absent() {
        let doc = Document::new("p1", "Plan");
        assert!(doc.edited_date().is_none());
    }

    #[test]
    fn test_document_deserialize_iso_timestamps() {
        let json = r#"{
            "id": "abc",
            "title": "Meeting Notes",
            "url": "https://example.test/abc",
            "last_edited": "2026-01-02T03:04:05.000Z",
            "created": null
        }"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        assert_eq!(doc.title, "Meeting Notes");
        assert_eq!(doc.edited_date().as_deref(), Some("2026-01-02"));
        assert!(doc.created.is_none());
    }

    #[test]
    fn test_edited_date_keeps_reported_offset() {
        let json = r#"{"id": "abc", "title": "Late", "last_edited": "2026-03-14T23:30:00-05:00"}"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        assert_eq!(doc.edited_date().as_deref(), Some("2026-03-14"));
    }

    #[test]
    fn test_page_query_constructors() {
        assert_eq!(PageQuery::recent(100).order, PageOrder::LastEditedDesc);
        assert_eq!(PageQuery::any(1).order, PageOrder::Unspecified);
        assert_eq!(PageQuery::any(1).page_size, 1);
    }

    #[test]
    fn test_block_plain_text() {
        assert_eq!(Block::paragraph("hello").plain_text(), "hello");
        assert_eq!(Block::todo("buy milk").plain_text(), "buy milk");
        let other = Block::Other {
            kind: "heading_1".to_string(),
            text: "Title".to_string(),
        };
        assert_eq!(other.plain_text(), "Title");
    }

    #[test]
    fn test_todo_is_unchecked() {
        assert_eq!(
            Block::todo("x"),
            Block::ToDo {
                text: "x".to_string(),
                checked: false
            }
        );
    }

    #[test]
    fn test_blocks_to_text_skips_empty() {
        let blocks = vec![
            Block::paragraph("first"),
            Block::Other {
                kind: "divider".to_string(),
                text: String::new(),
            },
            Block::todo("second"),
        ];
        assert_eq!(blocks_to_text(&blocks), "first\nsecond");
        assert_eq!(blocks_to_text(&[]), "");
    }

    #[test]
    fn test_embedding_entry_freshness() {
        let entry = EmbeddingEntry::new("Roadmap", vec![1.0, 0.0]);
        assert!(entry.is_fresh_for("Roadmap"));
        assert!(!entry.is_fresh_for("Roadmap 2027"));
    }
}
