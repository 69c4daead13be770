//! Dispatch engine over HTTP.
//!
//! Owns the immutable route table and serves requests against it: match,
//! optional artificial delay, template rendering, JSON response. Unmatched
//! requests get a structured 404 envelope and the server keeps running.

use crate::definition::{Method, ResolvedEndpoint};
use crate::observer::{RequestEvent, RequestObserver, TracingObserver};
use crate::render::{render_template, RenderContext};
use crate::router::RouteTable;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Json, Response},
    routing::any,
    Router,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

struct Engine {
    table: RouteTable,
    observer: Arc<dyn RequestObserver>,
}

/// The mock server: a route table plus an observer, exposed as an axum
/// router. Nothing is mutated after construction, so requests share the
/// engine without locks.
pub struct MockServer {
    engine: Arc<Engine>,
}

impl MockServer {
    /// Build a server from resolved endpoints, logging through the default
    /// tracing observer.
    pub fn new(endpoints: Vec<ResolvedEndpoint>) -> Self {
        Self::with_observer(endpoints, Arc::new(TracingObserver))
    }

    /// Build a server with a custom event sink.
    pub fn with_observer(
        endpoints: Vec<ResolvedEndpoint>,
        observer: Arc<dyn RequestObserver>,
    ) -> Self {
        let table = RouteTable::build(endpoints);
        info!(routes = table.len(), "Mock engine initialized");
        Self {
            engine: Arc::new(Engine { table, observer }),
        }
    }

    /// Number of distinct registered routes.
    pub fn route_count(&self) -> usize {
        self.engine.table.len()
    }

    /// Turn the server into an axum router. Every method and path funnels
    /// into the dispatch handler; route selection is the engine's own.
    pub fn into_router(self) -> Router {
        Router::new()
            .route("/", any(dispatch))
            .route("/{*path}", any(dispatch))
            .with_state(self.engine)
    }

    /// Serve until ctrl-c.
    pub async fn serve(self, listener: tokio::net::TcpListener) -> std::io::Result<()> {
        axum::serve(listener, self.into_router())
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(%error, "Failed to listen for shutdown signal");
    }
}

/// Handle one request: `received -> (matched | unmatched)`;
/// `matched -> delay? -> rendered -> sent`; `unmatched -> sent(404)`.
async fn dispatch(
    State(engine): State<Arc<Engine>>,
    method: axum::http::Method,
    uri: Uri,
    Query(query_params): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response {
    let started = Instant::now();
    let path = uri.path();

    let matched = Method::parse(method.as_str())
        .ok()
        .and_then(|m| engine.table.lookup(m, path));

    let Some(route) = matched else {
        let duration = started.elapsed();
        engine.observer.observe(RequestEvent::Unmatched {
            method: method.as_str(),
            path,
            duration,
        });
        let envelope = json!({
            "error": "not_found",
            "path": path,
            "method": method.as_str(),
            "message": format!("No mock endpoint is registered for {} {}", method, path),
        });
        return (StatusCode::NOT_FOUND, Json(envelope)).into_response();
    };

    let endpoint = route.endpoint;

    // Suspends only this request; concurrent requests keep flowing.
    if endpoint.delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(endpoint.delay_ms)).await;
    }

    let request_body = serde_json::from_slice::<serde_json::Value>(&body).ok();
    let ctx = RenderContext::new(route.path_params, query_params, request_body.as_ref());
    let rendered = render_template(&endpoint.body, &ctx);

    engine.observer.observe(RequestEvent::Matched {
        method: endpoint.method,
        path,
        source: &endpoint.source,
        status: endpoint.status,
        delay_ms: endpoint.delay_ms,
        duration: started.elapsed(),
    });

    // Status was range-checked at load time.
    let status =
        StatusCode::from_u16(endpoint.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(rendered)).into_response()
}
