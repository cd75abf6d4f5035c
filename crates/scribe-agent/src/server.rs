//! HTTP adapter for the chat protocol.
//!
//! `POST /chat` takes `{ "sender", "message" }` and returns the envelopes the
//! agent would send back, in order. `GET /health` reports liveness.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::envelope::Envelope;
use crate::session::{Outbox, SessionHandler};

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<SessionHandler>,
    pub agent_name: Arc<str>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub sender: String,
    pub message: Envelope,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub messages: Vec<Envelope>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/health", get(health_check))
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    match req.message {
        Envelope::Acknowledgement(ack) => {
            state.session.handle_acknowledgement(&req.sender, &ack);
            Ok(Json(ChatResponse { messages: vec![] }))
        }
        Envelope::Message(msg) => {
            let outbox = Outbox::new();
            state
                .session
                .handle_message(&req.sender, msg, &outbox)
                .await?;
            Ok(Json(ChatResponse {
                messages: outbox.into_envelopes(),
            }))
        }
    }
}

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "agent": &*state.agent_name,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[derive(Debug)]
pub enum ApiError {
    Internal(String),
}

impl From<scribe_core::Error> for ApiError {
    fn from(err: scribe_core::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
