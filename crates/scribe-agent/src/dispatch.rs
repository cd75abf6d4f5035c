//! Intent dispatch: one handler per [`Intent`] variant, each producing the
//! reply text.
//!
//! Handlers that refer to an existing note by title resolve it through the
//! semantic retriever (top-1 above the relevance floor), so fuzzy titles
//! match. Writes invalidate the affected page's cached title embedding.
//! Every failure is turned into a reply string here; [`Dispatcher::dispatch`]
//! never returns an error.

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use scribe_core::defaults;
use scribe_core::{blocks_to_text, Block, Document, Error, GenerationBackend, PageQuery, Result};

use crate::format;
use crate::intent::{
    AppendParams, ArchiveParams, CreateParams, Intent, IntentKind, ListParams, ReadParams,
    SearchParams, TodoParams,
};
use crate::workspace::{Workspace, WorkspaceHandle};

/// System prompt for free-form answers.
pub const GENERAL_QUERY_PROMPT: &str =
    "You are a helpful Notion notes assistant. Answer the user's question concisely.";

pub const CONNECT_OK: &str = "Notion connection successful!";
pub const CONNECT_FAILED: &str = "Failed to connect to Notion. Check your API key.";
pub const GENERAL_QUERY_FAILED: &str = "Sorry, I wasn't able to process that.";
pub const NO_NOTES: &str = "No notes found in your Notion workspace.";
pub const NO_PARENT: &str = "No accessible pages found to use as parent.";

pub const ASK_READ_TITLE: &str = "I need the title of the note to read.";
pub const ASK_APPEND_FIELDS: &str = "I need both a note title and the text to append.";
pub const ASK_TODO_FIELDS: &str = "I need both a note title and the task text.";
pub const ASK_ARCHIVE_TITLE: &str = "I need the title of the note to archive.";

/// Routes classified intents to workspace and reasoning operations.
pub struct Dispatcher {
    workspace: Arc<WorkspaceHandle>,
    generator: Arc<dyn GenerationBackend>,
}

impl Dispatcher {
    pub fn new(workspace: Arc<WorkspaceHandle>, generator: Arc<dyn GenerationBackend>) -> Self {
        Self {
            workspace,
            generator,
        }
    }

    pub fn workspace(&self) -> &Arc<WorkspaceHandle> {
        &self.workspace
    }

    /// Execute `intent` and return the reply. `raw_text` is the original
    /// utterance, used only for general queries.
    #[instrument(
        skip(self, intent, raw_text),
        fields(subsystem = "agent", component = "dispatcher", op = "dispatch", intent = %intent.kind())
    )]
    pub async fn dispatch(&self, intent: Intent, raw_text: &str) -> String {
        let start = Instant::now();
        let kind = intent.kind();

        // General questions never touch the workspace.
        let reply = if let Intent::GeneralQuery = intent {
            self.general_query(raw_text).await
        } else {
            match self.workspace.get().await {
                Ok(ws) => self
                    .run(ws, intent, raw_text)
                    .await
                    .unwrap_or_else(|e| failure_reply(kind, &e)),
                Err(e) => not_configured(&e),
            }
        };

        info!(
            duration_ms = start.elapsed().as_millis() as u64,
            response_len = reply.len(),
            "Dispatch complete"
        );
        reply
    }

    async fn run(&self, ws: &Workspace, intent: Intent, raw_text: &str) -> Result<String> {
        match intent {
            Intent::Connect => Ok(connect(ws).await),
            Intent::Search(p) => search(ws, p).await,
            Intent::List(p) => list(ws, p).await,
            Intent::Read(p) => read(ws, p).await,
            Intent::Create(p) => create(ws, p).await,
            Intent::Append(p) => append(ws, p).await,
            Intent::AddTodo(p) => add_todo(ws, p).await,
            Intent::Archive(p) => archive(ws, p).await,
            Intent::GeneralQuery => Ok(self.general_query(raw_text).await),
        }
    }

    async fn general_query(&self, text: &str) -> String {
        match self
            .generator
            .complete(GENERAL_QUERY_PROMPT, text, defaults::ANSWER_MAX_TOKENS)
            .await
        {
            Ok(answer) => answer,
            Err(e) => {
                warn!(error = %e, "General query failed");
                GENERAL_QUERY_FAILED.to_string()
            }
        }
    }
}

fn not_configured(e: &Error) -> String {
    match e {
        Error::Config(msg) => format!("Notion is not configured: {}", msg),
        other => format!("Notion is not configured: {}", other),
    }
}

fn failure_reply(kind: IntentKind, e: &Error) -> String {
    warn!(intent = %kind, error = %e, "Intent handler failed");
    let action = match kind {
        IntentKind::Search => "search notes",
        IntentKind::List => "list notes",
        IntentKind::Read => "read note",
        IntentKind::Create => "create note",
        IntentKind::Append => "append to note",
        IntentKind::AddTodo => "add to-do",
        IntentKind::Archive => "archive note",
        IntentKind::Connect | IntentKind::GeneralQuery => "process request",
    };
    format!("Failed to {}: {}", action, e)
}

async fn connect(ws: &Workspace) -> String {
    match ws.client.search_pages(PageQuery::any(1)).await {
        Ok(_) => CONNECT_OK.to_string(),
        Err(e) => {
            warn!(error = %e, "Connection test failed");
            CONNECT_FAILED.to_string()
        }
    }
}

async fn search(ws: &Workspace, p: SearchParams) -> Result<String> {
    debug!(query = %p.query, limit = p.limit, "Searching notes");
    let docs = ws.retriever.search(&p.query, p.limit).await?;
    if docs.is_empty() {
        return Ok(format!("No notes found matching \"{}\".", p.query));
    }
    Ok(format::note_list(&docs))
}

async fn list(ws: &Workspace, p: ListParams) -> Result<String> {
    let docs = ws.retriever.list_recent(p.limit).await?;
    if docs.is_empty() {
        return Ok(NO_NOTES.to_string());
    }
    Ok(format::note_list(&docs))
}

async fn read(ws: &Workspace, p: ReadParams) -> Result<String> {
    let Some(title) = p.title else {
        return Ok(ASK_READ_TITLE.to_string());
    };
    let Some(doc) = ws.retriever.resolve(&title).await? else {
        return Ok(format::not_found(&title));
    };

    let blocks = ws.client.get_blocks(&doc.id).await?;
    Ok(format::note_body(&doc.title, &blocks_to_text(&blocks)))
}

async fn create(ws: &Workspace, p: CreateParams) -> Result<String> {
    let parent = root_page(ws).await?;
    let children = if p.content.is_empty() {
        vec![]
    } else {
        vec![Block::paragraph(p.content)]
    };

    let doc = ws.client.create_page(&parent.id, &p.title, children).await?;
    ws.retriever.cache().invalidate(&doc.id);
    info!(document_id = %doc.id, parent_id = %parent.id, "Created note");
    Ok(format!("Created note **{}**\n{}", p.title, doc.url))
}

/// First accessible page, used as the parent for new notes.
async fn root_page(ws: &Workspace) -> Result<Document> {
    ws.client
        .search_pages(PageQuery::any(1))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| Error::NotFound(NO_PARENT.to_string()))
}

async fn append(ws: &Workspace, p: AppendParams) -> Result<String> {
    let (Some(title), Some(text)) = (p.title, p.text) else {
        return Ok(ASK_APPEND_FIELDS.to_string());
    };
    let Some(doc) = ws.retriever.resolve(&title).await? else {
        return Ok(format::not_found(&title));
    };

    ws.client
        .append_blocks(&doc.id, vec![Block::paragraph(text)])
        .await?;
    ws.retriever.cache().invalidate(&doc.id);
    Ok(format!("Added text to **{}**.", doc.title))
}

async fn add_todo(ws: &Workspace, p: TodoParams) -> Result<String> {
    let (Some(title), Some(task)) = (p.title, p.task) else {
        return Ok(ASK_TODO_FIELDS.to_string());
    };
    let Some(doc) = ws.retriever.resolve(&title).await? else {
        return Ok(format::not_found(&title));
    };

    ws.client
        .append_blocks(&doc.id, vec![Block::todo(task.clone())])
        .await?;
    ws.retriever.cache().invalidate(&doc.id);
    Ok(format!("Added to-do \"**{}**\" to **{}**.", task, doc.title))
}

async fn archive(ws: &Workspace, p: ArchiveParams) -> Result<String> {
    let Some(title) = p.title else {
        return Ok(ASK_ARCHIVE_TITLE.to_string());
    };
    let Some(doc) = ws.retriever.resolve(&title).await? else {
        return Ok(format::not_found(&title));
    };

    ws.client.update_page(&doc.id, true).await?;
    ws.retriever.cache().invalidate(&doc.id);
    info!(document_id = %doc.id, "Archived note");
    Ok(format!("Archived **{}**.", doc.title))
}
