//! Gateway server — the HTTP side of the open-URL service.
//!
//! Every request under the prefix goes through the same steps:
//! 1. Take the target URL out of the path
//! 2. Validate it (settings reload, cooldown, protocol, domain)
//! 3. If accepted: hand it to the launcher without waiting
//! 4. Answer `200` with the echoed target and `True`/`False`
//!
//! A path without the `openURL` marker gets `400`. A failure inside the
//! handler gets `500` and a log line; the listener keeps serving.

use crate::audit::ActivityLog;
use crate::gateway::launcher::{self, Launcher};
use crate::gateway::protocol::{self, ExtractError};
use crate::policy::engine::UrlValidator;
use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use std::any::Any;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Everything a request handler needs.
pub struct GatewayState {
    /// Decides whether a target may be opened
    validator: UrlValidator,
    /// Opens accepted targets
    launcher: Arc<dyn Launcher>,
    /// Activity log shared with the validator
    log: Arc<ActivityLog>,
    /// Requests outside this path prefix get 404
    prefix: String,
}

impl GatewayState {
    pub fn new(
        validator: UrlValidator,
        launcher: Arc<dyn Launcher>,
        log: Arc<ActivityLog>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            validator,
            launcher,
            log,
            prefix: prefix.into(),
        }
    }
}

/// Build the router. Any method and any path reach the dispatcher.
pub fn router(state: Arc<GatewayState>) -> Router {
    Router::new()
        .fallback(dispatch)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The open-URL listener.
pub struct GatewayServer {
    addr: SocketAddr,
    state: Arc<GatewayState>,
}

impl GatewayServer {
    pub fn new(addr: SocketAddr, state: GatewayState) -> Self {
        Self {
            addr,
            state: Arc::new(state),
        }
    }

    /// Bind and serve until `shutdown` resolves. A bind failure is returned.
    pub async fn run(self, shutdown: impl Future<Output = ()> + Send + 'static) -> Result<()> {
        let listener = TcpListener::bind(self.addr)
            .await
            .with_context(|| format!("Failed to bind {}", self.addr))?;
        serve(listener, self.state, shutdown).await
    }
}

/// Serve on an already bound listener until `shutdown` resolves.
/// In-flight requests are allowed to finish.
pub async fn serve(
    listener: TcpListener,
    state: Arc<GatewayState>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let local = listener.local_addr()?;
    tracing::info!("Gateway listening on http://{}{}{}", local, state.prefix, protocol::MARKER);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("Gateway server failed")
}

async fn dispatch(State(state): State<Arc<GatewayState>>, uri: Uri) -> Response {
    let request_id = Uuid::new_v4();

    if !uri.path().starts_with(&state.prefix) {
        return text(StatusCode::NOT_FOUND, "Not Found".to_string());
    }

    let target = match protocol::extract_target(uri.path(), uri.query()) {
        Ok(t) => t,
        Err(e) => {
            tracing::warn!(%request_id, path = uri.path(), "Bad request: {}", e);
            let detail = e.to_string();
            state.log.log(&["Bad request", uri.path(), detail.as_str()]);
            return text(StatusCode::BAD_REQUEST, bad_request_body(&e));
        }
    };

    // Settings are read from disk; keep that off the async workers.
    let worker = state.clone();
    let checked = target.clone();
    let verdict =
        match tokio::task::spawn_blocking(move || worker.validator.validate(&checked)).await {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(%request_id, target = %target, "Validation task failed: {}", e);
                state.log.log(&["Unexpected error", target.as_str()]);
                return text(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error, see the log".to_string(),
                );
            }
        };

    let accepted = verdict.is_accepted();
    if accepted {
        launcher::open_url(state.launcher.as_ref(), &state.log, &target);
    }

    tracing::info!(
        %request_id,
        target = %target,
        accepted,
        reason = verdict.rejection().map(|r| r.kind()),
        "Handled open-URL request"
    );

    text(StatusCode::OK, protocol::response_body(&target, accepted))
}

fn bad_request_body(e: &ExtractError) -> String {
    format!("Bad Request: {}", e)
}

fn text(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, TEXT_PLAIN)], body).into_response()
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(detail, "Unexpected error while handling request");
    text(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Unexpected error, see the log".to_string(),
    )
}
