//! # scribe-agent
//!
//! Conversational front end for a Notion notes workspace.
//!
//! Each chat message is acknowledged, classified into an [`Intent`] by the
//! reasoning service, dispatched to a workspace operation, and answered with
//! a single reply.
//!
//! ## Example
//!
//! ```ignore
//! use scribe_agent::{Dispatcher, IntentClassifier, SessionHandler, WorkspaceHandle};
//!
//! let workspace = Arc::new(WorkspaceHandle::notion_from_env(embedder, EmbeddingCache::in_memory()));
//! let session = SessionHandler::new(
//!     IntentClassifier::new(reasoner.clone()),
//!     Dispatcher::new(workspace, reasoner),
//! );
//!
//! let outbox = Outbox::new();
//! session.handle_message("agent1q...", message, &outbox).await?;
//! ```

pub mod classifier;
pub mod config;
pub mod dispatch;
pub mod envelope;
pub mod format;
pub mod intent;
pub mod server;
pub mod session;
pub mod workspace;

pub use classifier::IntentClassifier;
pub use config::AgentConfig;
pub use dispatch::Dispatcher;
pub use envelope::{ChatAcknowledgement, ChatContent, ChatMessage, Envelope};
pub use intent::{Intent, IntentKind};
pub use server::{router, AppState, ChatRequest, ChatResponse};
pub use session::{Outbox, ReplySink, SessionHandler};
pub use workspace::{Workspace, WorkspaceHandle};
