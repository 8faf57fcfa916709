//! HTTP host for the SSE transport

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{extract::State, middleware, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::auth::{bearer_gate, AccessGate};
use crate::engine::SessionContext;
use crate::error::Result;
use crate::mcp::{sse, MemoryToolHandler, SseState};

/// Build the application router: MCP SSE routes and a health check, all
/// behind the access gate.
pub fn router(session: SessionContext, gate: AccessGate) -> Router {
    let state = SseState::new(Arc::new(MemoryToolHandler::new(session)));

    Router::new()
        .route("/health", get(health_handler))
        .with_state(state.clone())
        .merge(sse::routes(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn_with_state(gate, bearer_gate)),
        )
}

/// Health check endpoint
async fn health_handler(State(state): State<SseState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "sessions": state.session_count(),
    }))
}

/// Resolves when the process is asked to stop
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to listen for SIGTERM: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutdown signal received");
}

/// Bind `addr` and serve until a shutdown signal arrives
pub async fn serve(addr: SocketAddr, session: SessionContext, gate: AccessGate) -> Result<()> {
    if gate.is_enforcing() {
        tracing::info!(
            path = gate.protected_path(),
            "Bearer authentication enabled"
        );
    } else {
        tracing::warn!(
            "MCP_SERVER_AUTH_TOKEN environment variable not set. Authentication will be bypassed."
        );
    }

    let app = router(session, gate);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("MCP server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
