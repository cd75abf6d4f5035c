//! Intents the agent understands, with typed parameters.
//!
//! The classifier produces loosely-typed JSON (`{"intent": ..., "params":
//! {...}}`); [`Intent::from_parts`] turns that into an [`Intent`], applying
//! every default and coercion in one place so handlers never see raw maps.

use serde_json::{Map, Value};
use std::fmt;

use scribe_core::defaults;

/// The closed set of intent names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntentKind {
    Connect,
    Search,
    List,
    Read,
    Create,
    Append,
    AddTodo,
    Archive,
    GeneralQuery,
}

impl IntentKind {
    pub const ALL: [IntentKind; 9] = [
        IntentKind::Connect,
        IntentKind::Search,
        IntentKind::List,
        IntentKind::Read,
        IntentKind::Create,
        IntentKind::Append,
        IntentKind::AddTodo,
        IntentKind::Archive,
        IntentKind::GeneralQuery,
    ];

    /// Name used in classifier output.
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentKind::Connect => "connect_notion",
            IntentKind::Search => "search_notes",
            IntentKind::List => "list_notes",
            IntentKind::Read => "read_note",
            IntentKind::Create => "create_note",
            IntentKind::Append => "append_note",
            IntentKind::AddTodo => "add_todo",
            IntentKind::Archive => "archive_note",
            IntentKind::GeneralQuery => "general_query",
        }
    }

    fn short_name(&self) -> &'static str {
        match self {
            IntentKind::Connect => "connect",
            IntentKind::Search => "search",
            IntentKind::List => "list",
            IntentKind::Read => "read",
            IntentKind::Create => "create",
            IntentKind::Append => "append",
            IntentKind::AddTodo => "addTodo",
            IntentKind::Archive => "archive",
            IntentKind::GeneralQuery => "generalQuery",
        }
    }

    /// Parse a wire name or its short alias. Case and surrounding space are ignored.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|kind| {
            kind.as_str().eq_ignore_ascii_case(name) || kind.short_name().eq_ignore_ascii_case(name)
        })
    }
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Empty means "most recent".
    pub query: String,
    pub limit: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub limit: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadParams {
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateParams {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendParams {
    pub title: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoParams {
    pub title: Option<String>,
    pub task: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveParams {
    pub title: Option<String>,
}

/// A classified request. Required-but-missing parameters are `None` so the
/// handler can ask for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Connect,
    Search(SearchParams),
    List(ListParams),
    Read(ReadParams),
    Create(CreateParams),
    Append(AppendParams),
    AddTodo(TodoParams),
    Archive(ArchiveParams),
    GeneralQuery,
}

impl Intent {
    pub fn kind(&self) -> IntentKind {
        match self {
            Intent::Connect => IntentKind::Connect,
            Intent::Search(_) => IntentKind::Search,
            Intent::List(_) => IntentKind::List,
            Intent::Read(_) => IntentKind::Read,
            Intent::Create(_) => IntentKind::Create,
            Intent::Append(_) => IntentKind::Append,
            Intent::AddTodo(_) => IntentKind::AddTodo,
            Intent::Archive(_) => IntentKind::Archive,
            Intent::GeneralQuery => IntentKind::GeneralQuery,
        }
    }

    /// Build an intent from a name and a parameter map. Unknown names become
    /// [`Intent::GeneralQuery`].
    pub fn from_parts(name: &str, params: &Map<String, Value>) -> Self {
        let Some(kind) = IntentKind::parse(name) else {
            return Intent::GeneralQuery;
        };

        match kind {
            IntentKind::Connect => Intent::Connect,
            IntentKind::Search => Intent::Search(SearchParams {
                query: string_param(params, "query").unwrap_or_default(),
                limit: limit_param(params),
            }),
            IntentKind::List => Intent::List(ListParams {
                limit: limit_param(params),
            }),
            IntentKind::Read => Intent::Read(ReadParams {
                title: string_param(params, "title"),
            }),
            IntentKind::Create => Intent::Create(CreateParams {
                title: string_param(params, "title")
                    .unwrap_or_else(|| defaults::NEW_PAGE_TITLE.to_string()),
                content: string_param(params, "content").unwrap_or_default(),
            }),
            IntentKind::Append => Intent::Append(AppendParams {
                title: string_param(params, "title"),
                text: string_param(params, "text"),
            }),
            IntentKind::AddTodo => Intent::AddTodo(TodoParams {
                title: string_param(params, "title"),
                task: string_param(params, "task"),
            }),
            IntentKind::Archive => Intent::Archive(ArchiveParams {
                title: string_param(params, "title"),
            }),
            IntentKind::GeneralQuery => Intent::GeneralQuery,
        }
    }
}

/// Non-blank string parameter. Numbers are accepted as their decimal form.
fn string_param(params: &Map<String, Value>, key: &str) -> Option<String> {
    let value = match params.get(key)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!value.is_empty()).then_some(value)
}

/// Result limit: integer or numeric string, clamped to `1..=FETCH_PAGE_SIZE`.
/// Missing, non-positive or unparseable values give the default.
fn limit_param(params: &Map<String, Value>) -> usize {
    let raw = match params.get("limit") {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    match raw {
        Some(n) if n > 0 => (n as usize).min(defaults::FETCH_PAGE_SIZE),
        _ => defaults::RESULT_LIMIT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_parse_wire_and_short_names() {
        assert_eq!(IntentKind::parse("list_notes"), Some(IntentKind::List));
        assert_eq!(IntentKind::parse("list"), Some(IntentKind::List));
        assert_eq!(IntentKind::parse("addTodo"), Some(IntentKind::AddTodo));
        assert_eq!(IntentKind::parse(" ADD_TODO "), Some(IntentKind::AddTodo));
        assert_eq!(IntentKind::parse("generalQuery"), Some(IntentKind::GeneralQuery));
        assert_eq!(IntentKind::parse("dance"), None);
    }

    #[test]
    fn test_wire_names_round_trip() {
        for kind in IntentKind::ALL {
            assert_eq!(IntentKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_unknown_intent_is_general_query() {
        let intent = Intent::from_parts("order_pizza", &params(json!({"size": "L"})));
        assert_eq!(intent, Intent::GeneralQuery);
    }

    #[test]
    fn test_search_defaults() {
        let intent = Intent::from_parts("search_notes", &Map::new());
        assert_eq!(
            intent,
            Intent::Search(SearchParams {
                query: String::new(),
                limit: 5
            })
        );
    }

    #[test]
    fn test_limit_coercion() {
        let limit = |v: Value| match Intent::from_parts("list", &params(json!({ "limit": v }))) {
            Intent::List(p) => p.limit,
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(limit(json!(3)), 3);
        assert_eq!(limit(json!("7")), 7);
        assert_eq!(limit(json!(" 2 ")), 2);
        assert_eq!(limit(json!(0)), 5);
        assert_eq!(limit(json!(-4)), 5);
        assert_eq!(limit(json!("lots")), 5);
        assert_eq!(limit(json!(null)), 5);
        assert_eq!(limit(json!(4.0)), 4);
        assert_eq!(limit(json!(5000)), 100);
    }

    #[test]
    fn test_create_defaults_title_and_content() {
        let intent = Intent::from_parts("create_note", &params(json!({"title": "  "})));
        assert_eq!(
            intent,
            Intent::Create(CreateParams {
                title: "Untitled".to_string(),
                content: String::new()
            })
        );
    }

    #[test]
    fn test_blank_required_params_are_missing() {
        let intent = Intent::from_parts("append_note", &params(json!({"title": "X", "text": ""})));
        assert_eq!(
            intent,
            Intent::Append(AppendParams {
                title: Some("X".to_string()),
                text: None
            })
        );
    }

    #[test]
    fn test_non_string_title_is_ignored() {
        let intent = Intent::from_parts("archive_note", &params(json!({"title": ["a"]})));
        assert_eq!(intent, Intent::Archive(ArchiveParams { title: None }));
    }

    #[test]
    fn test_kind_matches_variant() {
        let intent = Intent::from_parts("add_todo", &params(json!({"title": "T", "task": "do"})));
        assert_eq!(intent.kind(), IntentKind::AddTodo);
        assert_eq!(intent.kind().to_string(), "add_todo");
    }
}
