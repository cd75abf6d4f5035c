//! LLM-backed intent classification.
//!
//! The reasoning service is asked for a single JSON object naming one intent
//! and its parameters. Its reply is treated as untrusted text: code fences are
//! stripped, and anything that does not parse into an intent degrades to
//! [`Intent::GeneralQuery`]. Classification never fails.

use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn};

use scribe_core::defaults;
use scribe_core::{Error, GenerationBackend, Result};

use crate::intent::Intent;

/// Instruction set sent with every classification request.
pub const SYSTEM_PROMPT: &str = r#"You are an intent classifier for a Notion notes assistant.
Given the user message, respond ONLY with valid JSON (no markdown fences).

Possible intents:
- connect_notion   : user wants to test or verify the Notion connection
- search_notes     : user wants to find notes by keyword
- list_notes       : user wants to see recent/latest notes
- read_note        : user wants to read the content of a specific note (by title)
- create_note      : user wants to create a new note/page
- append_note      : user wants to add text to an existing note
- add_todo         : user wants to add a to-do/task item to a note
- archive_note     : user wants to archive/delete a note
- general_query    : anything else / general question

For search_notes, extract: query (search keyword string), limit (int, default 5).
For list_notes, extract: limit (int, default 5).
For read_note, extract: title (the note title to look up).
For create_note, extract: title (new page title), content (optional body text, default "").
For append_note, extract: title (existing note title), text (the text to append).
For add_todo, extract: title (existing note title to add the task to), task (the to-do item text).
For archive_note, extract: title (the note title to archive).

Response format:
{"intent": "<intent>", "params": {<extracted params or empty dict>}}
"#;

/// Maps free text to an [`Intent`] via a [`GenerationBackend`].
pub struct IntentClassifier {
    backend: Arc<dyn GenerationBackend>,
}

impl IntentClassifier {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    #[instrument(
        skip(self, text),
        fields(subsystem = "agent", component = "classifier", op = "classify", prompt_len = text.len())
    )]
    pub async fn classify(&self, text: &str) -> Intent {
        let start = Instant::now();

        let raw = match self
            .backend
            .complete(SYSTEM_PROMPT, text, defaults::CLASSIFY_MAX_TOKENS)
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Classification request failed, falling back to general query");
                return Intent::GeneralQuery;
            }
        };

        match parse_classification(&raw) {
            Ok(intent) => {
                debug!(
                    intent = %intent.kind(),
                    response_len = raw.len(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Classified message"
                );
                intent
            }
            Err(e) => {
                warn!(
                    error = %e,
                    response_len = raw.len(),
                    "Unparseable classification, falling back to general query"
                );
                Intent::GeneralQuery
            }
        }
    }
}

/// Remove a surrounding markdown code fence (with optional language tag).
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the opening fence line, including any language tag.
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parse a classifier reply of the form `{"intent": ..., "params": {...}}`.
///
/// A missing or non-object `params` is treated as empty; a missing `intent`
/// is an error.
pub fn parse_classification(raw: &str) -> Result<Intent> {
    let value: Value = serde_json::from_str(strip_code_fence(raw))?;

    let object = value
        .as_object()
        .ok_or_else(|| Error::InvalidInput("classification is not a JSON object".to_string()))?;

    let name = object
        .get("intent")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::InvalidInput("classification has no intent".to_string()))?;

    let empty = Map::new();
    let params = object
        .get("params")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    Ok(Intent::from_parts(name, params))
}
