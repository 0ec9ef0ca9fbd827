//! HTTP client for the chatbot/community backend.
//!
//! Response bodies are decoded regardless of HTTP status: the backend
//! reports application errors inside a JSON body (a `reply` text for
//! `/chat`, a `status` field for `/community/post`), and those bodies
//! are meant to reach the user. Only a transport failure or an
//! undecodable body is an [`ApiError`].

use crate::config::Config;
use crate::models::{ChatReply, ChatRequest, CommunityMessage, CommunityPost, PostResponse};
use serde::de::DeserializeOwned;
use tracing::debug;

const CHAT_PATH: &str = "/chat";
const COMMUNITY_POST_PATH: &str = "/community/post";
const COMMUNITY_MESSAGES_PATH: &str = "/community/messages";

/// Errors from a backend round-trip.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The configured base URL is not a valid absolute URL.
    #[error("invalid base URL: {0}")]
    InvalidUrl(String),

    /// The request could not be sent or the response could not be read.
    #[error("http request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not the expected JSON.
    #[error("invalid JSON payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Client for the three backend endpoints.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client from configuration.
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url).map_err(|_| ApiError::InvalidUrl(config.base_url.clone()))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self { http, base_url })
    }

    /// The base URL requests are sent to, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `POST /chat` with `{ query }`.
    pub async fn send_chat(&self, query: &str) -> Result<ChatReply, ApiError> {
        let response = self
            .http
            .post(self.endpoint(CHAT_PATH))
            .json(&ChatRequest { query })
            .send()
            .await?;
        decode(CHAT_PATH, response).await
    }

    /// `POST /community/post` with `{ message }`.
    pub async fn post_community(&self, message: &str) -> Result<PostResponse, ApiError> {
        let response = self
            .http
            .post(self.endpoint(COMMUNITY_POST_PATH))
            .json(&CommunityPost { message })
            .send()
            .await?;
        decode(COMMUNITY_POST_PATH, response).await
    }

    /// `GET /community/messages`, in the backend's order.
    pub async fn fetch_community(&self) -> Result<Vec<CommunityMessage>, ApiError> {
        let response = self
            .http
            .get(self.endpoint(COMMUNITY_MESSAGES_PATH))
            .send()
            .await?;
        decode(COMMUNITY_MESSAGES_PATH, response).await
    }
}

async fn decode<T: DeserializeOwned>(path: &str, response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.bytes().await?;
    debug!(path, %status, bytes = body.len(), "backend response");
    Ok(serde_json::from_slice(&body)?)
}
