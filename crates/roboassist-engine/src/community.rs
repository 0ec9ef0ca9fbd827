//! Shared community pipeline.
//!
//! The community panel never appends optimistically. Every accepted
//! post is followed by a full re-fetch, and the panel is rebuilt from
//! whatever list the backend returns, in its order.

use crate::client::{ApiClient, ApiError};
use crate::models::CommunityMessage;
use crate::panel::{EntryKind, Panel};
use tracing::{debug, warn};

/// Alert raised when the backend refuses a post.
pub const POST_FAILED_ALERT: &str = "Failed to send community message.";

/// Alert raised when the post request itself fails.
pub const POST_UNREACHABLE_ALERT: &str = "Could not connect to the community server.";

/// Single entry shown when the list cannot be loaded.
pub const LOAD_ERROR_TEXT: &str = "Error loading community messages.";

/// Result of a post round-trip, including the follow-up refresh.
#[derive(Debug)]
pub enum PostOutcome {
    /// The backend accepted the post; carries the refreshed list.
    Posted(Result<Vec<CommunityMessage>, ApiError>),
    /// The backend answered with a non-success status.
    Rejected(Option<String>),
    /// The post could not be sent or its response not decoded.
    Unreachable(ApiError),
}

/// What the front end must do with its input field after a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostResolution {
    /// The post went through; empty the input.
    ClearInput,
    /// Show a blocking alert and leave the input alone.
    Alert(&'static str),
}

/// Community panel with its request bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct CommunityPanel {
    panel: Panel,
    /// Posts and refreshes not yet resolved.
    in_flight: usize,
}

impl CommunityPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut Panel {
        &mut self.panel
    }

    /// Whether any post or refresh is outstanding.
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    /// Start a post from raw input.
    ///
    /// Returns the trimmed message to send, or `None` when the input is
    /// blank. Outstanding requests do not hold a post back.
    pub fn begin_post(&mut self, raw: &str) -> Option<String> {
        let message = raw.trim();
        if message.is_empty() {
            return None;
        }
        self.in_flight += 1;
        Some(message.to_string())
    }

    /// Start a standalone refresh.
    pub fn begin_refresh(&mut self) {
        self.in_flight += 1;
    }

    fn finish(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    /// Rebuild the panel from a fetch result.
    pub fn apply_refresh(&mut self, result: Result<Vec<CommunityMessage>, ApiError>) {
        self.finish();
        self.render_list(result);
    }

    fn render_list(&mut self, result: Result<Vec<CommunityMessage>, ApiError>) {
        self.panel.clear();

        match result {
            Ok(messages) => {
                debug!(count = messages.len(), "community messages loaded");
                for msg in &messages {
                    self.panel.append(msg.display_text(), EntryKind::Community);
                }
            }
            Err(e) => {
                warn!(error = %e, "error fetching community messages");
                self.panel.append(LOAD_ERROR_TEXT, EntryKind::Error);
            }
        }
    }

    /// Resolve a post.
    pub fn complete_post(&mut self, outcome: PostOutcome) -> PostResolution {
        self.finish();

        match outcome {
            PostOutcome::Posted(list) => {
                self.render_list(list);
                PostResolution::ClearInput
            }
            PostOutcome::Rejected(reason) => {
                warn!(reason = reason.as_deref().unwrap_or(""), "error posting community message");
                PostResolution::Alert(POST_FAILED_ALERT)
            }
            PostOutcome::Unreachable(e) => {
                warn!(error = %e, "network error posting community message");
                PostResolution::Alert(POST_UNREACHABLE_ALERT)
            }
        }
    }
}

/// Post a message and, if the backend accepts it, fetch the full list.
pub async fn post_and_refresh(client: &ApiClient, message: &str) -> PostOutcome {
    match client.post_community(message).await {
        Ok(response) if response.is_success() => {
            PostOutcome::Posted(client.fetch_community().await)
        }
        Ok(response) => PostOutcome::Rejected(response.message),
        Err(e) => PostOutcome::Unreachable(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_error() -> ApiError {
        ApiError::Decode(serde_json::from_str::<Vec<CommunityMessage>>("{}").unwrap_err())
    }

    fn list(texts: &[&str]) -> Vec<CommunityMessage> {
        texts.iter().map(|t| CommunityMessage::new(*t)).collect()
    }

    #[test]
    fn test_blank_post_is_rejected() {
        let mut community = CommunityPanel::new();
        assert_eq!(community.begin_post("   "), None);
        assert!(!community.is_busy());
    }

    #[test]
    fn test_post_during_refresh_is_issued() {
        let mut community = CommunityPanel::new();
        community.begin_refresh();
        assert_eq!(community.begin_post(" hi "), Some("hi".to_string()));
        assert_eq!(community.begin_post("again"), Some("again".to_string()));

        community.apply_refresh(Ok(list(&[])));
        assert!(community.is_busy());
        community.complete_post(PostOutcome::Posted(Ok(list(&["hi"]))));
        assert!(community.is_busy());
        community.complete_post(PostOutcome::Posted(Ok(list(&["hi", "again"]))));
        assert!(!community.is_busy());
        assert_eq!(community.panel().texts(), vec!["hi", "again"]);
    }

    #[test]
    fn test_refresh_renders_in_fetched_order() {
        let mut community = CommunityPanel::new();
        community.begin_refresh();
        community.apply_refresh(Ok(list(&["c", "a", "b"])));

        assert_eq!(community.panel().texts(), vec!["c", "a", "b"]);
        assert!(!community.is_busy());
    }

    #[test]
    fn test_refresh_replaces_previous_contents() {
        let mut community = CommunityPanel::new();
        community.apply_refresh(Ok(list(&["one", "two"])));
        community.apply_refresh(Ok(list(&["one", "two", "three"])));
        assert_eq!(community.panel().texts(), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_failed_refresh_shows_single_error() {
        let mut community = CommunityPanel::new();
        community.apply_refresh(Ok(list(&["stale"])));
        community.apply_refresh(Err(decode_error()));

        assert_eq!(community.panel().texts(), vec![LOAD_ERROR_TEXT]);
        assert_eq!(community.panel().count(EntryKind::Error), 1);
    }

    #[test]
    fn test_posted_outcome_clears_input_and_rebuilds() {
        let mut community = CommunityPanel::new();
        community.begin_post("new").unwrap();
        let resolution = community.complete_post(PostOutcome::Posted(Ok(list(&["old", "new"]))));

        assert_eq!(resolution, PostResolution::ClearInput);
        assert_eq!(community.panel().texts(), vec!["old", "new"]);
        assert!(!community.is_busy());
    }

    #[test]
    fn test_rejected_post_leaves_panel_unchanged() {
        let mut community = CommunityPanel::new();
        community.apply_refresh(Ok(list(&["existing"])));
        community.begin_post("new").unwrap();

        let resolution =
            community.complete_post(PostOutcome::Rejected(Some("Failed to post message.".into())));
        assert_eq!(resolution, PostResolution::Alert(POST_FAILED_ALERT));
        assert_eq!(community.panel().texts(), vec!["existing"]);
        assert!(!community.is_busy());
    }

    #[test]
    fn test_unreachable_post_alerts() {
        let mut community = CommunityPanel::new();
        community.begin_post("new").unwrap();
        let resolution = community.complete_post(PostOutcome::Unreachable(decode_error()));
        assert_eq!(resolution, PostResolution::Alert(POST_UNREACHABLE_ALERT));
        assert!(community.panel().is_empty());
    }
}
