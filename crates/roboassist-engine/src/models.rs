//! Wire types exchanged with the backend.
//!
//! Request bodies borrow their text so the caller keeps ownership of
//! the input; response bodies are owned.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Status value the backend reports for an accepted community post.
pub const STATUS_SUCCESS: &str = "success";

/// Body of `POST /chat`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ChatRequest<'a> {
    pub query: &'a str,
}

/// Body returned by `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

/// Body of `POST /community/post`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CommunityPost<'a> {
    pub message: &'a str,
}

/// Body returned by `POST /community/post`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PostResponse {
    /// Whether the backend accepted the post.
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}

/// One entry of the shared community list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityMessage {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl CommunityMessage {
    /// Create a message without a timestamp.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timestamp: None,
            id: None,
        }
    }

    /// Attach a raw ISO-8601 timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Text shown in the community panel, with the timestamp in local time.
    pub fn display_text(&self) -> String {
        self.display_text_in(&Local)
    }

    /// Text shown in the community panel, with the timestamp in `tz`.
    pub fn display_text_in<Tz>(&self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        match self.timestamp.as_deref() {
            Some(ts) if !ts.is_empty() => {
                format!("{} ({})", self.message, format_timestamp_in(ts, tz))
            }
            _ => self.message.clone(),
        }
    }
}

/// Render an ISO-8601 timestamp in the given time zone.
///
/// Naive timestamps are read as UTC. Anything unparseable comes back
/// unchanged.
pub fn format_timestamp_in<Tz>(raw: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.to_utc())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|n| n.and_utc()));

    match parsed {
        Ok(utc) => utc.with_timezone(tz).format("%Y-%m-%d %H:%M:%S").to_string(),
        Err(_) => raw.to_string(),
    }
}
