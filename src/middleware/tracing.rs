use std::time::Duration;

use tracing::info;

use super::Middleware;
use crate::dispatcher::{HandlerRequest, Outcome};

/// Logs one structured line per handled request with the outcome and
/// latency. Add it last so earlier middleware is reflected in the outcome.
pub struct TracingMiddleware;

impl Middleware for TracingMiddleware {
    fn after(&self, req: &HandlerRequest, outcome: &Outcome, latency: Duration) {
        info!(
            request_id = %req.request_id,
            method = %req.method,
            pattern = %req.pattern,
            outcome = outcome.kind(),
            latency_ms = latency.as_millis() as u64,
            "request"
        );
    }
}
