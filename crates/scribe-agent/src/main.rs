//! scribe-agent - chat endpoint for the Notion notes agent

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scribe_agent::{
    router, AgentConfig, AppState, Dispatcher, IntentClassifier, SessionHandler, WorkspaceHandle,
};
use scribe_core::{EmbeddingBackend, GenerationBackend};
use scribe_inference::OpenAIBackend;
use scribe_search::EmbeddingCache;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with configurable output
    //
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   LOG_FILE    - path to log file (optional, enables file logging)
    //   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
    //   RUST_LOG    - standard env filter
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "scribe_agent=debug,scribe_search=debug,tower_http=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    // Daily-rotated file output when LOG_FILE is set
    let _file_guard = if let Some(ref path) = log_file {
        let file_dir = std::path::Path::new(path)
            .parent()
            .unwrap_or(std::path::Path::new("."));
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("scribe-agent.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(log_ansi.unwrap_or(false));
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        if log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer();
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );

    let config = AgentConfig::from_env();
    if config.reasoning.api_key.is_none() {
        warn!("ASI_ONE_API_KEY not set, classification will fall back to general queries");
    }

    let embedder: Arc<dyn EmbeddingBackend> =
        Arc::new(OpenAIBackend::new(config.embedding.clone())?);
    let reasoner: Arc<dyn GenerationBackend> =
        Arc::new(OpenAIBackend::new(config.reasoning.clone())?);

    let workspace = Arc::new(WorkspaceHandle::notion_from_env(
        embedder,
        EmbeddingCache::in_memory(),
    ));

    // Early connection attempt; the agent still starts without a workspace.
    match workspace.get().await {
        Ok(_) => info!("Notion connection verified"),
        Err(e) => warn!(error = %e, "Notion not connected on startup"),
    }

    let session = SessionHandler::new(
        IntentClassifier::new(reasoner.clone()),
        Dispatcher::new(workspace, reasoner),
    );

    let app = router(AppState {
        session: Arc::new(session),
        agent_name: config.agent_name.clone().into(),
    });

    let addr = config.socket_addr()?;
    info!(agent = %config.agent_name, "Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
