//! The page service: composes router, metadata resolution, request context,
//! and dispatcher into the per-request state machine
//! `Received -> Matching -> (NotFound | Matched) -> Executing -> Finalized`.
//!
//! The service is a library entry point invoked by a host transport; it owns
//! no sockets and no connection timeouts. Each call to [`PageService::handle`]
//! handles one request independently: the only shared state is the read-only
//! route tree built at registration time.

use http::Method;
use tracing::{debug, info, warn};

use crate::context::{HeaderVec, RequestContext, SetCookie};
use crate::dispatcher::{Body, Dispatcher, HandlerRequest, Outcome};
use crate::ids::RequestId;
use crate::metadata::resolve_with_params;
use crate::router::Router;

/// An incoming request as captured by the host transport. The path may carry
/// a query string; headers include the `cookie` header when present.
#[derive(Debug, Clone)]
pub struct PageRequest {
    /// HTTP method.
    pub method: Method,
    /// Request path, optionally with `?query`.
    pub path: String,
    /// Raw header pairs.
    pub headers: Vec<(String, String)>,
}

impl PageRequest {
    /// A request with no headers.
    #[must_use]
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            headers: Vec::new(),
        }
    }

    /// A GET request; the common case for page rendering.
    #[must_use]
    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    /// Append a header pair.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// Response status classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// Normal content response with the given status code.
    Ok(u16),
    /// No route matched, or the handler signaled NotFound.
    NotFound,
    /// The handler signaled a redirect to the given target path.
    Redirect(String),
}

impl Status {
    /// The HTTP status code for this classification.
    #[must_use]
    pub fn code(&self) -> u16 {
        match self {
            Status::Ok(code) => *code,
            Status::NotFound => 404,
            Status::Redirect(_) => 302,
        }
    }
}

fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        302 => "Found",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "OK",
    }
}

/// The finalized response handed back to the host transport.
#[derive(Debug, Clone)]
pub struct PageResponse {
    /// Status classification.
    pub status: Status,
    /// Body content; opaque to this core.
    pub body: Body,
    /// Merged response headers: framework defaults overlaid by handler-set
    /// headers.
    pub headers: HeaderVec,
    /// Outgoing cookie directives, regardless of any same-named incoming
    /// cookie.
    pub cookies: Vec<SetCookie>,
}

impl PageResponse {
    /// Get a response header by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The reason phrase for the status code.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        status_reason(self.status.code())
    }
}

/// Composes a [`Router`] and a [`Dispatcher`] into a request-handling
/// service.
#[derive(Clone)]
pub struct PageService {
    router: Router,
    dispatcher: Dispatcher,
}

impl PageService {
    /// Build the service. Routes whose handler name has no registered
    /// handler are logged as registration defects here; at request time they
    /// finalize as NotFound.
    #[must_use]
    pub fn new(router: Router, dispatcher: Dispatcher) -> Self {
        for name in router.handler_names() {
            if !dispatcher.has_handler(name) {
                warn!(handler_name = %name, "Route references an unregistered handler");
            }
        }
        Self { router, dispatcher }
    }

    /// Handle one request to completion and finalize its response.
    #[must_use]
    pub fn handle(&self, req: PageRequest) -> PageResponse {
        // Received: capture the raw request and assign a request id.
        let request_id = RequestId::from_header_or_new(
            req.headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case("x-request-id"))
                .map(|(_, v)| v.as_str()),
        );
        let (path, raw_query) = match req.path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (req.path.as_str(), None),
        };
        debug!(
            request_id = %request_id,
            method = %req.method,
            path = %path,
            "Request received"
        );

        // Matching: consult the route tree.
        let Some(route_match) = self.router.route(&req.method, path) else {
            return Self::finalize(request_id, Outcome::NotFound, HeaderVec::new(), Vec::new());
        };

        // Matched: resolve metadata along the chain, build the context.
        let chain = self.router.metadata_chain(&route_match.route.pattern);
        let metadata = resolve_with_params(chain, &route_match.params);
        let mut ctx = RequestContext::new(req.headers, raw_query);

        let Some(handler_name) = route_match.route.handler_name.clone() else {
            // Scope entries carry no handler and are never terminal matches;
            // reaching one here is a tree defect, reported as NotFound.
            warn!(request_id = %request_id, pattern = %route_match.route.pattern,
                  "Matched route has no handler");
            return Self::finalize(request_id, Outcome::NotFound, HeaderVec::new(), Vec::new());
        };

        // Executing: run the handler (middleware around it).
        let handler_request = HandlerRequest {
            request_id,
            method: req.method,
            pattern: route_match.route.pattern.to_string(),
            params: route_match.params,
            metadata,
        };
        let outcome = self
            .dispatcher
            .dispatch(&handler_name, &handler_request, &mut ctx)
            .unwrap_or(Outcome::NotFound);

        // Finalized: merge headers/cookies and assemble the response.
        let (out_headers, out_cookies) = ctx.into_outgoing();
        Self::finalize(request_id, outcome, out_headers, out_cookies)
    }

    fn finalize(
        request_id: RequestId,
        outcome: Outcome,
        out_headers: HeaderVec,
        out_cookies: Vec<SetCookie>,
    ) -> PageResponse {
        let (status, body, mut headers) = match outcome {
            Outcome::Render(rendered) => {
                let mut headers = HeaderVec::new();
                match &rendered.body {
                    Body::Text(_) => {
                        headers.push(("content-type".into(), "text/html".to_string()));
                    }
                    Body::Json(_) => {
                        headers.push(("content-type".into(), "application/json".to_string()));
                    }
                    Body::Empty => {}
                }
                (Status::Ok(rendered.status), rendered.body, headers)
            }
            Outcome::NotFound => {
                let mut headers = HeaderVec::new();
                headers.push(("content-type".into(), "text/html".to_string()));
                (
                    Status::NotFound,
                    Body::Text("<h1>404 - Page Not Found</h1>".to_string()),
                    headers,
                )
            }
            Outcome::Redirect(target) => {
                let mut headers = HeaderVec::new();
                headers.push(("location".into(), target.clone()));
                (Status::Redirect(target), Body::Empty, headers)
            }
        };

        // Handler-set headers override framework defaults; defaults survive
        // for names the handler left unset.
        for (name, value) in out_headers {
            headers.retain(|(k, _)| !k.eq_ignore_ascii_case(&name));
            headers.push((name, value));
        }

        info!(
            request_id = %request_id,
            status = status.code(),
            cookie_count = out_cookies.len(),
            "Response finalized"
        );

        PageResponse {
            status,
            body,
            headers,
            cookies: out_cookies,
        }
    }
}
