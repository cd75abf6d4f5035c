//! Notion API wire types and their conversion to core models.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};

use scribe_core::defaults::UNTITLED;
use scribe_core::{Block, Document, PageOrder, PageQuery};

/// Maximum characters Notion accepts in a single rich text object.
pub const RICH_TEXT_LIMIT: usize = 2000;

// =============================================================================
// RESPONSES
// =============================================================================

/// Paginated list envelope used by search and block children.
#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    pub results: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// A page object as returned by search and page creation.
#[derive(Debug, Clone, Deserialize)]
pub struct PageObject {
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub created_time: Option<String>,
    #[serde(default)]
    pub last_edited_time: Option<String>,
    #[serde(default)]
    pub properties: Map<String, JsonValue>,
}

impl PageObject {
    /// Plain text of the page's title property, or `(untitled)`.
    pub fn title(&self) -> String {
        self.properties
            .values()
            .find(|prop| prop.get("type").and_then(JsonValue::as_str) == Some("title"))
            .and_then(|prop| prop.get("title"))
            .map(plain_text_of)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNTITLED.to_string())
    }

    pub fn into_document(self) -> Document {
        let title = self.title();
        Document {
            last_edited: parse_timestamp(self.last_edited_time.as_deref()),
            created: parse_timestamp(self.created_time.as_deref()),
            id: self.id,
            title,
            url: self.url,
        }
    }
}

/// Error body returned by Notion for non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct NotionErrorBody {
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<FixedOffset>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
}

/// Concatenate the `plain_text` of every segment in a rich text array.
fn plain_text_of(rich_text: &JsonValue) -> String {
    rich_text
        .as_array()
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.get("plain_text").and_then(JsonValue::as_str))
                .collect::<String>()
        })
        .unwrap_or_default()
}

/// Convert a raw block object into a core block.
pub fn block_from_raw(raw: &JsonValue) -> Block {
    let kind = raw
        .get("type")
        .and_then(JsonValue::as_str)
        .unwrap_or_default()
        .to_string();
    let body = raw.get(&kind);
    let text = body
        .and_then(|b| b.get("rich_text"))
        .map(plain_text_of)
        .unwrap_or_default();

    match kind.as_str() {
        "paragraph" => Block::Paragraph { text },
        "to_do" => Block::ToDo {
            text,
            checked: body
                .and_then(|b| b.get("checked"))
                .and_then(JsonValue::as_bool)
                .unwrap_or(false),
        },
        _ => Block::Other { kind, text },
    }
}

// =============================================================================
// REQUESTS
// =============================================================================

/// Body for `POST /search` restricted to pages.
#[derive(Debug, Serialize)]
pub struct SearchRequest {
    pub query: String,
    pub filter: JsonValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<JsonValue>,
    pub page_size: usize,
}

impl From<PageQuery> for SearchRequest {
    fn from(query: PageQuery) -> Self {
        let sort = match query.order {
            PageOrder::LastEditedDesc => Some(json!({
                "direction": "descending",
                "timestamp": "last_edited_time"
            })),
            PageOrder::Unspecified => None,
        };
        Self {
            query: String::new(),
            filter: json!({"value": "page", "property": "object"}),
            sort,
            page_size: query.page_size,
        }
    }
}

/// Rich text array for `text`, split to respect [`RICH_TEXT_LIMIT`].
pub fn rich_text(text: &str) -> JsonValue {
    let chars: Vec<char> = text.chars().collect();
    let segments: Vec<JsonValue> = chars
        .chunks(RICH_TEXT_LIMIT)
        .map(|chunk| {
            json!({
                "type": "text",
                "text": {"content": chunk.iter().collect::<String>()}
            })
        })
        .collect();
    JsonValue::Array(segments)
}

/// Serialize a core block into a Notion block object.
pub fn block_to_raw(block: &Block) -> JsonValue {
    match block {
        Block::ToDo { text, checked } => json!({
            "object": "block",
            "type": "to_do",
            "to_do": {"rich_text": rich_text(text), "checked": checked}
        }),
        Block::Paragraph { text } | Block::Other { text, .. } => json!({
            "object": "block",
            "type": "paragraph",
            "paragraph": {"rich_text": rich_text(text)}
        }),
    }
}

/// Body for `POST /pages`.
pub fn create_page_body(parent_id: &str, title: &str, children: &[Block]) -> JsonValue {
    json!({
        "parent": {"page_id": parent_id},
        "properties": {"title": rich_text(title)},
        "children": children.iter().map(block_to_raw).collect::<Vec<_>>()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(json: JsonValue) -> PageObject {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_page_title_from_title_property() {
        let p = page(json!({
            "id": "p1",
            "url": "https://www.notion.so/p1",
            "last_edited_time": "2026-05-01T10:00:00.000Z",
            "created_time": "2026-04-01T09:00:00.000Z",
            "properties": {
                "Status": {"type": "select", "select": null},
                "Name": {"type": "title", "title": [
                    {"plain_text": "Project "},
                    {"plain_text": "Plan"}
                ]}
            }
        }));
        let doc = p.into_document();
        assert_eq!(doc.title, "Project Plan");
        assert_eq!(doc.edited_date().as_deref(), Some("2026-05-01"));
        assert!(doc.created.is_some());
    }

    #[test]
    fn test_page_without_title_is_untitled() {
        let p = page(json!({"id": "p1", "properties": {"title": {"type": "title", "title": []}}}));
        assert_eq!(p.title(), UNTITLED);

        let p = page(json!({"id": "p2"}));
        assert_eq!(p.title(), UNTITLED);
    }

    #[test]
    fn test_bad_timestamp_is_dropped() {
        let p = page(json!({"id": "p1", "last_edited_time": "yesterday"}));
        assert!(p.into_document().last_edited.is_none());
    }

    #[test]
    fn test_offset_timestamp_keeps_local_date() {
        let p = page(json!({"id": "p1", "last_edited_time": "2026-05-01T22:00:00.000-04:00"}));
        assert_eq!(p.into_document().edited_date().as_deref(), Some("2026-05-01"));
    }

    #[test]
    fn test_block_from_raw_paragraph_and_todo() {
        let para = block_from_raw(&json!({
            "type": "paragraph",
            "paragraph": {"rich_text": [{"plain_text": "hello "}, {"plain_text": "world"}]}
        }));
        assert_eq!(para, Block::paragraph("hello world"));

        let todo = block_from_raw(&json!({
            "type": "to_do",
            "to_do": {"rich_text": [{"plain_text": "ship"}], "checked": true}
        }));
        assert_eq!(
            todo,
            Block::ToDo {
                text: "ship".to_string(),
                checked: true
            }
        );
    }

    #[test]
    fn test_block_from_raw_other_kinds() {
        let heading = block_from_raw(&json!({
            "type": "heading_2",
            "heading_2": {"rich_text": [{"plain_text": "Goals"}]}
        }));
        assert_eq!(heading.plain_text(), "Goals");

        let divider = block_from_raw(&json!({"type": "divider", "divider": {}}));
        assert_eq!(divider.plain_text(), "");
    }

    #[test]
    fn test_search_request_recent_sorts_by_last_edited() {
        let req = SearchRequest::from(PageQuery::recent(100));
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["sort"]["timestamp"], "last_edited_time");
        assert_eq!(body["sort"]["direction"], "descending");
        assert_eq!(body["filter"]["value"], "page");
        assert_eq!(body["page_size"], 100);
    }

    #[test]
    fn test_search_request_any_has_no_sort() {
        let body = serde_json::to_value(SearchRequest::from(PageQuery::any(1))).unwrap();
        assert!(body.get("sort").is_none());
    }

    #[test]
    fn test_rich_text_splits_long_text() {
        let long = "a".repeat(RICH_TEXT_LIMIT + 5);
        let rt = rich_text(&long);
        let parts = rt.as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1]["text"]["content"], "aaaaa");
    }

    #[test]
    fn test_block_to_raw_todo_unchecked() {
        let raw = block_to_raw(&Block::todo("call Sam"));
        assert_eq!(raw["type"], "to_do");
        assert_eq!(raw["to_do"]["checked"], false);
        assert_eq!(raw["to_do"]["rich_text"][0]["text"]["content"], "call Sam");
    }

    #[test]
    fn test_create_page_body() {
        let body = create_page_body("root", "Ideas", &[Block::paragraph("first")]);
        assert_eq!(body["parent"]["page_id"], "root");
        assert_eq!(body["properties"]["title"][0]["text"]["content"], "Ideas");
        assert_eq!(body["children"][0]["type"], "paragraph");
    }

    #[test]
    fn test_create_page_body_without_children() {
        let body = create_page_body("root", "Empty", &[]);
        assert_eq!(body["children"], json!([]));
    }
}
