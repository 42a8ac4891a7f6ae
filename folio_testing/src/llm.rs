use std::{
    net::{IpAddr, SocketAddr},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use anyhow::Context;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tracing::info;

pub const COMPLETIONS_ROUTE: &str = "/openai/v1/chat/completions";

/// User prompts containing this marker make the server respond with a 500.
pub const FAIL_MARKER: &str = "[fail]";
/// User prompts containing this marker make the model answer with non-JSON text.
pub const GARBAGE_MARKER: &str = "[garbage]";

pub const GREETING: &str = "Hello from the model,";
pub const RESPONSE: &str = "Thanks a lot for your message, I will have a look at it.";
pub const CLOSING: &str = "Cheers";

pub async fn start_server(host: IpAddr, port: u16, api_key: String) -> anyhow::Result<()> {
    info!("Starting chat completion testing server on {host}:{port}");
    info!("Chat completion endpoint: http://{host}:{port}{COMPLETIONS_ROUTE}");
    info!("API key: {api_key:?}");
    info!(
        "Prompts containing {FAIL_MARKER:?} fail with status 500, prompts containing \
         {GARBAGE_MARKER:?} produce a completion that is not valid JSON"
    );

    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind to {host}:{port}"))?;
    axum::serve(listener, router(api_key, Default::default()))
        .await
        .context("Failed to start HTTP server")
}

/// Handle to an in-process chat completion server.
#[derive(Debug, Clone)]
pub struct FakeLlmServer {
    pub addr: SocketAddr,
    requests: Arc<AtomicUsize>,
}

impl FakeLlmServer {
    /// Start a server on a random local port.
    pub async fn spawn(api_key: impl Into<String>) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
        let addr = listener.local_addr()?;
        let requests = Arc::new(AtomicUsize::new(0));
        let router = router(api_key.into(), Arc::clone(&requests));
        tokio::spawn(async move { axum::serve(listener, router).await });
        Ok(Self { addr, requests })
    }

    pub fn endpoint(&self) -> String {
        format!("http://{}{COMPLETIONS_ROUTE}", self.addr)
    }

    /// Number of completion requests received so far.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
struct AppState {
    api_key: Arc<str>,
    requests: Arc<AtomicUsize>,
}

fn router(api_key: String, requests: Arc<AtomicUsize>) -> Router<()> {
    Router::new()
        .route(COMPLETIONS_ROUTE, routing::post(completions))
        .with_state(AppState {
            api_key: api_key.into(),
            requests,
        })
}

#[derive(Deserialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<CompletionMessage>,
}

#[derive(Deserialize)]
struct CompletionMessage {
    role: String,
    content: String,
}

async fn completions(
    state: State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CompletionRequest>,
) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);

    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|key| key == &*state.api_key);
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {"message": "Invalid API Key"}})),
        )
            .into_response();
    }

    let prompt = request
        .messages
        .iter()
        .rev()
        .find(|message| message.role == "user")
        .map(|message| message.content.as_str())
        .unwrap_or_default();

    if prompt.contains(FAIL_MARKER) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": {"message": "Internal server error"}})),
        )
            .into_response();
    }

    let content = if prompt.contains(GARBAGE_MARKER) {
        "Sure! Here is a reply for you.".to_owned()
    } else {
        json!({"greeting": GREETING, "response": RESPONSE, "closing": CLOSING}).to_string()
    };

    Json(json!({
        "id": "chatcmpl-folio-testing",
        "object": "chat.completion",
        "model": request.model,
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop",
        }],
    }))
    .into_response()
}
