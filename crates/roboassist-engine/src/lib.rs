//! roboassist-engine: Headless engine for the roboassist chat client
//!
//! This crate provides the core logic behind the two chat panels:
//! - Configuration loading
//! - Wire types and the HTTP client for the backend
//! - The panel model (ordered entries, scroll position)
//! - The chatbot and community pipelines

pub mod chatbot;
pub mod client;
pub mod community;
pub mod config;
pub mod models;
pub mod panel;

// Re-export commonly used types
pub use chatbot::{ChatbotPanel, ChatbotState, PendingChat, CHAT_ERROR_TEXT, THINKING_TEXT};
pub use client::{ApiClient, ApiError};
pub use community::{
    post_and_refresh, CommunityPanel, PostOutcome, PostResolution, LOAD_ERROR_TEXT,
    POST_FAILED_ALERT, POST_UNREACHABLE_ALERT,
};
pub use config::{Config, ConfigError, DEFAULT_BASE_URL};
pub use models::{ChatReply, CommunityMessage, PostResponse};
pub use panel::{Entry, EntryId, EntryKind, Panel};
