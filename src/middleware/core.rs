use std::time::Duration;

use crate::dispatcher::{HandlerRequest, Outcome};

/// Hook points around handler execution. `before` may short-circuit with an
/// early outcome; `after` observes the outcome and the handler latency.
pub trait Middleware: Send + Sync {
    fn before(&self, _req: &HandlerRequest) -> Option<Outcome> {
        None
    }
    fn after(&self, _req: &HandlerRequest, _outcome: &Outcome, _latency: Duration) {}
}
