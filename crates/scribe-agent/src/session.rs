//! Per-message conversation handling.
//!
//! Each inbound message is acknowledged before anything else happens, then
//! classified and dispatched, and answered with exactly one reply. Nothing is
//! carried between messages.

use async_trait::async_trait;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

use scribe_core::Result;

use crate::classifier::IntentClassifier;
use crate::dispatch::{Dispatcher, GENERAL_QUERY_FAILED};
use crate::envelope::{ChatAcknowledgement, ChatMessage, Envelope};

pub const EMPTY_MESSAGE_REPLY: &str = "I didn't receive any text. Please send me a message!";

/// Delivers outbound envelopes to a peer.
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn send(&self, recipient: &str, envelope: Envelope) -> Result<()>;
}

/// Sink that buffers envelopes in send order.
#[derive(Default)]
pub struct Outbox {
    sent: Mutex<Vec<Envelope>>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_envelopes(self) -> Vec<Envelope> {
        self.sent.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ReplySink for Outbox {
    async fn send(&self, _recipient: &str, envelope: Envelope) -> Result<()> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(envelope);
        Ok(())
    }
}

/// Drives one message through acknowledge, classify, dispatch and reply.
pub struct SessionHandler {
    classifier: IntentClassifier,
    dispatcher: Dispatcher,
}

impl SessionHandler {
    pub fn new(classifier: IntentClassifier, dispatcher: Dispatcher) -> Self {
        Self {
            classifier,
            dispatcher,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Acknowledge `msg`, then send exactly one reply to `sender`.
    ///
    /// Fails only if the reply itself cannot be delivered.
    #[instrument(
        skip(self, msg, sink),
        fields(subsystem = "agent", component = "session", sender = %sender, msg_id = %msg.msg_id)
    )]
    pub async fn handle_message(
        &self,
        sender: &str,
        msg: ChatMessage,
        sink: &dyn ReplySink,
    ) -> Result<()> {
        let start = Instant::now();

        let ack = ChatAcknowledgement::for_message(&msg);
        if let Err(e) = sink.send(sender, Envelope::Acknowledgement(ack)).await {
            warn!(error = %e, "Failed to send acknowledgement");
        }

        let reply = self.respond(&msg).await;
        sink.send(sender, Envelope::Message(ChatMessage::reply(reply)))
            .await?;

        info!(
            duration_ms = start.elapsed().as_millis() as u64,
            "Message handled"
        );
        Ok(())
    }

    /// Peer acknowledgements need no response.
    pub fn handle_acknowledgement(&self, sender: &str, ack: &ChatAcknowledgement) {
        debug!(
            subsystem = "agent",
            component = "session",
            sender = %sender,
            msg_id = %ack.acknowledged_msg_id,
            "Received acknowledgement"
        );
    }

    /// Reply text for `msg`. Never fails; panics below are turned into an
    /// apology.
    pub async fn respond(&self, msg: &ChatMessage) -> String {
        let text = msg.text();
        if text.trim().is_empty() {
            debug!("Message has no text content");
            return EMPTY_MESSAGE_REPLY.to_string();
        }

        match AssertUnwindSafe(self.classify_and_dispatch(&text))
            .catch_unwind()
            .await
        {
            Ok(reply) => reply,
            Err(_) => {
                error!(msg_id = %msg.msg_id, "Message handling panicked");
                GENERAL_QUERY_FAILED.to_string()
            }
        }
    }

    async fn classify_and_dispatch(&self, text: &str) -> String {
        let intent = self.classifier.classify(text).await;
        info!(intent = %intent.kind(), "Intent classified");
        self.dispatcher.dispatch(intent, text).await
    }
}
