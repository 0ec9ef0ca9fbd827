//! Single-user chatbot pipeline.
//!
//! A send renders the user's text and a "Thinking..." placeholder at
//! once; the request itself runs elsewhere and its result is handed
//! back through [`ChatbotPanel::complete`]. Several sends may overlap,
//! each tracked by its own placeholder.

use crate::client::{ApiClient, ApiError};
use crate::models::ChatReply;
use crate::panel::{EntryId, EntryKind, Panel};
use tracing::{debug, warn};

/// Placeholder shown while a reply is outstanding.
pub const THINKING_TEXT: &str = "Thinking...";

/// Shown instead of a reply when the round-trip fails.
pub const CHAT_ERROR_TEXT: &str = "Error: Could not connect to the chatbot.";

/// Where the chatbot pipeline is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatbotState {
    #[default]
    Idle,
    /// At least one request is outstanding.
    Sending,
}

/// A request that has been rendered but not yet answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingChat {
    /// Placeholder entry to remove when the reply arrives.
    pub placeholder: EntryId,
    /// Trimmed text to send.
    pub query: String,
}

/// Chatbot panel with its request bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct ChatbotPanel {
    panel: Panel,
    in_flight: Vec<EntryId>,
}

impl ChatbotPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut Panel {
        &mut self.panel
    }

    pub fn state(&self) -> ChatbotState {
        if self.in_flight.is_empty() {
            ChatbotState::Idle
        } else {
            ChatbotState::Sending
        }
    }

    /// Start a send from raw input.
    ///
    /// Returns `None` for blank input, in which case nothing is rendered.
    /// The caller clears its input field when this returns `Some`.
    pub fn begin(&mut self, raw: &str) -> Option<PendingChat> {
        let query = raw.trim();
        if query.is_empty() {
            return None;
        }

        self.panel.append(query, EntryKind::User);
        let placeholder = self.panel.append(THINKING_TEXT, EntryKind::Placeholder);
        self.in_flight.push(placeholder);

        Some(PendingChat {
            placeholder,
            query: query.to_string(),
        })
    }

    /// Resolve a send: drop its placeholder, then render the reply or the
    /// fixed error text.
    pub fn complete(&mut self, placeholder: EntryId, result: Result<ChatReply, ApiError>) {
        self.in_flight.retain(|id| *id != placeholder);
        self.panel.remove(placeholder);

        match result {
            Ok(reply) => {
                debug!(chars = reply.reply.len(), "chatbot reply received");
                self.panel.append(reply.reply, EntryKind::Bot);
            }
            Err(e) => {
                warn!(error = %e, "error communicating with chatbot API");
                self.panel.append(CHAT_ERROR_TEXT, EntryKind::Error);
            }
        }
    }
}

/// Run the network half of a send.
pub async fn exchange(client: &ApiClient, pending: &PendingChat) -> Result<ChatReply, ApiError> {
    client.send_chat(&pending.query).await
}
