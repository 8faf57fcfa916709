//! MCP over server-sent events
//!
//! A client opens `GET /sse` and receives an `endpoint` event naming the URL
//! to POST JSON-RPC messages to. Responses come back on the same event
//! stream as `message` events, correlated by JSON-RPC id.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Router,
};
use dashmap::DashMap;
use futures::stream::{self, Stream, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use uuid::Uuid;

use super::protocol::{McpHandler, McpRequest, McpResponse};

/// Path where clients open a session stream
pub const SSE_PATH: &str = "/sse";

/// Path where clients post messages for an open session
pub const MESSAGES_PATH: &str = "/messages/";

/// Responses buffered per session before senders wait
const SESSION_BUFFER: usize = 32;

type SessionMap = DashMap<String, mpsc::Sender<Event>>;

/// Shared state of the SSE transport
#[derive(Clone)]
pub struct SseState {
    handler: Arc<dyn McpHandler>,
    sessions: Arc<SessionMap>,
}

impl SseState {
    pub fn new(handler: Arc<dyn McpHandler>) -> Self {
        Self {
            handler,
            sessions: Arc::new(DashMap::new()),
        }
    }

    /// Number of open session streams
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

/// Removes the session from the registry once its stream is dropped
struct SessionGuard {
    id: String,
    sessions: Arc<SessionMap>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.sessions.remove(&self.id);
        tracing::info!(session_id = %self.id, "SSE session closed");
    }
}

/// Routes for the SSE transport
pub fn routes(state: SseState) -> Router {
    Router::new()
        .route(SSE_PATH, get(sse_handler))
        .route(MESSAGES_PATH, post(message_handler))
        .with_state(state)
}

async fn sse_handler(
    State(state): State<SseState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let session_id = Uuid::new_v4().simple().to_string();
    let (tx, rx) = mpsc::channel(SESSION_BUFFER);
    state.sessions.insert(session_id.clone(), tx);
    tracing::info!(session_id = %session_id, "SSE session opened");

    let endpoint = Event::default()
        .event("endpoint")
        .data(format!("{}?session_id={}", MESSAGES_PATH, session_id));

    let guard = SessionGuard {
        id: session_id,
        sessions: state.sessions.clone(),
    };

    let events = stream::once(async move { endpoint })
        .chain(ReceiverStream::new(rx))
        .map(move |event| {
            let _session = &guard;
            Ok::<_, Infallible>(event)
        });

    Sse::new(events).keep_alive(KeepAlive::default())
}

#[derive(Debug, Deserialize)]
struct MessageQuery {
    session_id: Option<String>,
}

async fn message_handler(
    State(state): State<SseState>,
    Query(query): Query<MessageQuery>,
    body: String,
) -> Response {
    let Some(session_id) = query.session_id else {
        return (StatusCode::BAD_REQUEST, "session_id is required").into_response();
    };

    let Some(sender) = state
        .sessions
        .get(&session_id)
        .map(|entry| entry.value().clone())
    else {
        return (StatusCode::NOT_FOUND, "Could not find session").into_response();
    };

    let request = match serde_json::from_str::<McpRequest>(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!(session_id = %session_id, "Unparseable message: {}", e);
            let response = McpResponse::parse_error(&e);
            if let Ok(json) = serde_json::to_string(&response) {
                let _ = sender.try_send(Event::default().event("message").data(json));
            }
            return (StatusCode::BAD_REQUEST, "Could not parse message").into_response();
        }
    };

    let handler = state.handler.clone();
    tokio::spawn(async move {
        let Some(response) = handler.handle_request(request).await else {
            return;
        };
        match serde_json::to_string(&response) {
            Ok(json) => {
                let event = Event::default().event("message").data(json);
                if sender.send(event).await.is_err() {
                    tracing::debug!(
                        session_id = %session_id,
                        "Session closed before the response was delivered"
                    );
                }
            }
            Err(e) => tracing::error!("Failed to serialize MCP response: {}", e),
        }
    });

    (StatusCode::ACCEPTED, "Accepted").into_response()
}
