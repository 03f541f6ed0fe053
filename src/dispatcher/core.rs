//! Dispatcher core module - handler registration and invocation.
//!
//! Handlers are plain synchronous functions registered by name. A matched
//! route names its handler; the dispatcher looks it up, runs the middleware
//! chain around it, and returns the handler's cooperative [`Outcome`].
//! NotFound and Redirect are ordinary return variants, never exceptions:
//! they interrupt rendering and the service finalizes the corresponding
//! response directly.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::context::RequestContext;
use crate::ids::RequestId;
use crate::metadata::PageMetadata;
use crate::middleware::Middleware;
use crate::router::ParamVec;
use http::Method;

/// Response body produced by a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// No body (redirects, handler-declined responses).
    Empty,
    /// Markup or plain text.
    Text(String),
    /// JSON payload.
    Json(Value),
}

/// Content a handler rendered for the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// HTTP status code, 200 unless the handler overrides it.
    pub status: u16,
    /// Response body.
    pub body: Body,
}

impl Rendered {
    /// HTML content with status 200.
    #[must_use]
    pub fn html(markup: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: Body::Text(markup.into()),
        }
    }

    /// JSON content with status 200.
    #[must_use]
    pub fn json(value: Value) -> Self {
        Self {
            status: 200,
            body: Body::Json(value),
        }
    }

    /// Override the status code.
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }
}

/// Cooperative outcome of handler execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Normal content response.
    Render(Rendered),
    /// The handler declined the request (e.g. a business rule on a dynamic
    /// parameter failed); the service finalizes a NotFound response.
    NotFound,
    /// The handler redirects to the given target path.
    Redirect(String),
}

impl Outcome {
    /// Short outcome label for log fields.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Render(_) => "render",
            Outcome::NotFound => "not_found",
            Outcome::Redirect(_) => "redirect",
        }
    }
}

/// The matched-request view passed to a handler alongside its context.
#[derive(Debug, Clone)]
pub struct HandlerRequest {
    /// Request id for tracing and correlation.
    pub request_id: RequestId,
    /// HTTP method.
    pub method: Method,
    /// The matched route pattern, as registered.
    pub pattern: String,
    /// Path parameters extracted by the router.
    pub params: ParamVec,
    /// Metadata resolved along the matched route chain.
    pub metadata: PageMetadata,
}

impl HandlerRequest {
    /// Get a dynamic-segment parameter by name (deepest binding wins).
    #[inline]
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .and_then(|(_, v)| v.as_str())
    }

    /// Get a catch-all parameter's segments by name.
    #[inline]
    #[must_use]
    pub fn segments(&self, name: &str) -> Option<&[String]> {
        self.params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .and_then(|(_, v)| v.as_segments())
    }
}

/// A registered handler function. Runs synchronously to completion; reads
/// the request view and may write outgoing headers/cookies through the
/// context before returning its outcome.
pub type Handler = Arc<dyn Fn(&HandlerRequest, &mut RequestContext) -> Outcome + Send + Sync>;

/// Dispatcher that maps handler names to handler functions and applies the
/// middleware chain around execution.
#[derive(Clone, Default)]
pub struct Dispatcher {
    handlers: HashMap<Arc<str>, Handler>,
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl Dispatcher {
    /// A dispatcher with no handlers registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under `name`. Registering the same name again
    /// replaces the previous handler.
    pub fn register_handler<F>(&mut self, name: &str, handler_fn: F)
    where
        F: Fn(&HandlerRequest, &mut RequestContext) -> Outcome + Send + Sync + 'static,
    {
        if self.handlers.remove(name).is_some() {
            warn!(handler_name = %name, "Replaced existing handler");
        }
        info!(
            handler_name = %name,
            total_handlers = self.handlers.len() + 1,
            "Handler registered"
        );
        self.handlers.insert(Arc::from(name), Arc::new(handler_fn));
    }

    /// Add middleware to the processing pipeline. Middleware runs in the
    /// order it was added: every `before` ahead of the handler, every
    /// `after` once the outcome is known.
    pub fn add_middleware(&mut self, mw: Arc<dyn Middleware>) {
        self.middlewares.push(mw);
    }

    /// Whether a handler is registered under `name`.
    #[must_use]
    pub fn has_handler(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Invoke the named handler for a matched request.
    ///
    /// Returns `None` when no handler is registered under the route's name;
    /// the service reports that as NotFound (it is a registration defect,
    /// logged as such, but this core's response vocabulary has nothing
    /// stronger).
    #[must_use]
    pub fn dispatch(
        &self,
        handler_name: &str,
        request: &HandlerRequest,
        ctx: &mut RequestContext,
    ) -> Option<Outcome> {
        debug!(
            request_id = %request.request_id,
            handler_name = %handler_name,
            available_handlers = self.handlers.len(),
            "Handler lookup"
        );

        let Some(handler) = self.handlers.get(handler_name) else {
            error!(
                request_id = %request.request_id,
                handler_name = %handler_name,
                "Handler not found - registration defect"
            );
            return None;
        };

        let mut early: Option<Outcome> = None;
        for mw in &self.middlewares {
            if early.is_none() {
                early = mw.before(request);
            }
        }

        let start = Instant::now();
        let outcome = match early {
            Some(outcome) => outcome,
            None => {
                info!(
                    request_id = %request.request_id,
                    handler_name = %handler_name,
                    method = %request.method,
                    pattern = %request.pattern,
                    "Request dispatched to handler"
                );
                handler(request, ctx)
            }
        };
        let latency = start.elapsed();

        info!(
            request_id = %request.request_id,
            handler_name = %handler_name,
            outcome = outcome.kind(),
            latency_ms = latency.as_millis() as u64,
            "Handler execution complete"
        );

        for mw in &self.middlewares {
            mw.after(request, &outcome, latency);
        }

        Some(outcome)
    }
}
