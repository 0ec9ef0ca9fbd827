//! Round-trips against an in-process stub of the chatbot/community backend.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use roboassist_engine::{
    chatbot, post_and_refresh, ApiClient, ApiError, ChatbotPanel, CommunityPanel, Config,
    EntryKind, PostOutcome, PostResolution, CHAT_ERROR_TEXT, LOAD_ERROR_TEXT, POST_FAILED_ALERT,
    POST_UNREACHABLE_ALERT,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Backend {
    messages: Arc<Mutex<Vec<String>>>,
    reject_posts: bool,
}

async fn chat(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    match body.get("query").and_then(Value::as_str) {
        Some(q) if !q.is_empty() => (StatusCode::OK, Json(json!({ "reply": format!("echo: {q}") }))),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "reply": "Error: No query provided." })),
        ),
    }
}

async fn community_post(
    State(backend): State<Backend>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let message = body.get("message").and_then(Value::as_str).unwrap_or_default();
    if backend.reject_posts || message.is_empty() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "status": "error", "message": "Failed to post message." })),
        );
    }
    backend.messages.lock().unwrap().push(message.to_string());
    (
        StatusCode::CREATED,
        Json(json!({ "status": "success", "message": "Message posted successfully!" })),
    )
}

async fn community_messages(State(backend): State<Backend>) -> Json<Value> {
    let messages = backend.messages.lock().unwrap();
    let list: Vec<Value> = messages
        .iter()
        .enumerate()
        .map(|(i, m)| {
            json!({
                "id": i + 1,
                "message": m,
                "timestamp": format!("2024-05-01T10:00:{:02}.000000", i),
            })
        })
        .collect();
    Json(Value::Array(list))
}

async fn spawn_backend(backend: Backend) -> String {
    let app = Router::new()
        .route("/chat", post(chat))
        .route("/community/post", post(community_post))
        .route("/community/messages", get(community_messages))
        .with_state(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// A backend that answers everything with non-JSON.
async fn spawn_garbage_backend() -> String {
    let app = Router::new().fallback(|| async { "<html>oops</html>" });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// An address nothing listens on.
async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

fn client_for(base_url: String) -> ApiClient {
    ApiClient::new(&Config::default().with_base_url(Some(base_url))).unwrap()
}

#[tokio::test]
async fn test_chat_round_trip() {
    let client = client_for(spawn_backend(Backend::default()).await);
    let mut panel = ChatbotPanel::new();

    let pending = panel.begin("  forward kinematics  ").unwrap();
    let result = chatbot::exchange(&client, &pending).await;
    panel.complete(pending.placeholder, result);

    assert_eq!(
        panel.panel().texts(),
        vec!["forward kinematics", "echo: forward kinematics"]
    );
    assert_eq!(panel.panel().count(EntryKind::Placeholder), 0);
}

#[tokio::test]
async fn test_chat_error_body_is_rendered_as_reply() {
    let client = client_for(spawn_backend(Backend::default()).await);
    let reply = client.send_chat("").await.unwrap();
    assert_eq!(reply.reply, "Error: No query provided.");
}

#[tokio::test]
async fn test_chat_unreachable_renders_fixed_error() {
    let client = client_for(unreachable_url().await);
    let mut panel = ChatbotPanel::new();

    let pending = panel.begin("hello").unwrap();
    let result = chatbot::exchange(&client, &pending).await;
    assert!(matches!(result, Err(ApiError::Transport(_))));
    panel.complete(pending.placeholder, result);

    assert_eq!(panel.panel().texts(), vec!["hello", CHAT_ERROR_TEXT]);
}

#[tokio::test]
async fn test_chat_garbage_response_is_decode_error() {
    let client = client_for(spawn_garbage_backend().await);
    let result = client.send_chat("hello").await;
    assert!(matches!(result, Err(ApiError::Decode(_))));
}

#[tokio::test]
async fn test_post_then_refresh_returns_authoritative_list() {
    let backend = Backend::default();
    backend.messages.lock().unwrap().push("first".into());
    let client = client_for(spawn_backend(backend.clone()).await);

    let mut community = CommunityPanel::new();
    let message = community.begin_post(" second ").unwrap();
    let outcome = post_and_refresh(&client, &message).await;
    let resolution = community.complete_post(outcome);

    assert_eq!(resolution, PostResolution::ClearInput);
    let texts = community.panel().texts();
    assert_eq!(texts.len(), 2);
    assert!(texts[0].starts_with("first ("));
    assert!(texts[1].starts_with("second ("));
    assert_eq!(backend.messages.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_rejected_post_alerts() {
    let backend = Backend {
        reject_posts: true,
        ..Backend::default()
    };
    let client = client_for(spawn_backend(backend).await);

    let outcome = post_and_refresh(&client, "hi").await;
    assert!(matches!(&outcome, PostOutcome::Rejected(Some(m)) if m == "Failed to post message."));

    let mut community = CommunityPanel::new();
    community.begin_post("hi").unwrap();
    assert_eq!(
        community.complete_post(outcome),
        PostResolution::Alert(POST_FAILED_ALERT)
    );
}

#[tokio::test]
async fn test_unreachable_post_alerts() {
    let client = client_for(unreachable_url().await);
    let outcome = post_and_refresh(&client, "hi").await;
    assert!(matches!(outcome, PostOutcome::Unreachable(ApiError::Transport(_))));

    let mut community = CommunityPanel::new();
    community.begin_post("hi").unwrap();
    assert_eq!(
        community.complete_post(outcome),
        PostResolution::Alert(POST_UNREACHABLE_ALERT)
    );
}

#[tokio::test]
async fn test_initial_load_failure_shows_single_error() {
    let client = client_for(spawn_garbage_backend().await);
    let mut community = CommunityPanel::new();

    community.begin_refresh();
    community.apply_refresh(client.fetch_community().await);

    assert_eq!(community.panel().texts(), vec![LOAD_ERROR_TEXT]);
}

#[tokio::test]
async fn test_repeated_refresh_has_no_duplicates() {
    let backend = Backend::default();
    backend
        .messages
        .lock()
        .unwrap()
        .extend(["a".to_string(), "b".to_string()]);
    let client = client_for(spawn_backend(backend).await);
    let mut community = CommunityPanel::new();

    for _ in 0..3 {
        community.begin_refresh();
        community.apply_refresh(client.fetch_community().await);
    }

    assert_eq!(community.panel().len(), 2);
}
