//! Structured request events.
//!
//! The engine never logs directly; it reports each request's outcome through
//! an injected observer so the logging collaborator decides presentation.

use crate::definition::Method;
use std::time::Duration;

/// Outcome of one handled request.
#[derive(Debug)]
pub enum RequestEvent<'a> {
    Matched {
        method: Method,
        path: &'a str,
        /// Definition file the endpoint came from.
        source: &'a str,
        status: u16,
        /// Declared artificial latency that was applied.
        delay_ms: u64,
        duration: Duration,
    },
    Unmatched {
        /// Raw request method; unmatched requests may use methods outside
        /// the recognized set.
        method: &'a str,
        path: &'a str,
        duration: Duration,
    },
}

/// Sink for request events.
pub trait RequestObserver: Send + Sync {
    fn observe(&self, event: RequestEvent<'_>);
}

/// Default observer: renders events as tracing records. Unmatched requests
/// are informational, not errors.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl RequestObserver for TracingObserver {
    fn observe(&self, event: RequestEvent<'_>) {
        match event {
            RequestEvent::Matched {
                method,
                path,
                source,
                status,
                delay_ms,
                duration,
            } => {
                tracing::info!(
                    method = %method,
                    path,
                    source,
                    status,
                    delay_ms,
                    duration_ms = duration.as_millis() as u64,
                    "Request matched"
                );
            }
            RequestEvent::Unmatched {
                method,
                path,
                duration,
            } => {
                tracing::info!(
                    method,
                    path,
                    status = 404u16,
                    duration_ms = duration.as_millis() as u64,
                    "No matching endpoint"
                );
            }
        }
    }
}
