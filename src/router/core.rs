//! Router core module - hot path for route matching.

use http::Method;
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::metadata::MetadataEntry;
use crate::pattern::RoutePattern;
use crate::router::tree::PathNode;

/// Maximum number of path parameters before heap allocation.
/// Page routes rarely nest deeper than a handful of dynamic segments
/// (e.g. `/products/{productsId}/review/{reviewId}`).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Value bound to one pattern parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// Binding of a dynamic segment: exactly one path segment.
    Single(String),
    /// Binding of a catch-all segment: the absorbed segments in path order,
    /// possibly empty.
    Multi(Vec<String>),
}

impl ParamValue {
    /// The single-segment value, if this binding came from a dynamic segment.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Single(v) => Some(v.as_str()),
            ParamValue::Multi(_) => None,
        }
    }

    /// The absorbed segments, if this binding came from a catch-all segment.
    #[must_use]
    pub fn as_segments(&self) -> Option<&[String]> {
        match self {
            ParamValue::Single(_) => None,
            ParamValue::Multi(segments) => Some(segments),
        }
    }
}

/// Stack-allocated parameter storage for the hot path. Parameter names come
/// from the static route tree, so they are shared `Arc<str>`s; values are
/// per-request data from the URL.
pub type ParamVec = SmallVec<[(Arc<str>, ParamValue); MAX_INLINE_PARAMS]>;

/// One registered route: a method, a parsed pattern, the name of the handler
/// that serves it, and optional metadata inherited by descendants.
///
/// Scope entries (built with [`Route::scope`]) carry metadata but no handler;
/// they decorate an interior tree node the way a layout decorates a directory
/// of pages.
#[derive(Debug, Clone)]
pub struct Route {
    /// HTTP method this route answers.
    pub method: Method,
    /// Parsed route pattern.
    pub pattern: RoutePattern,
    /// Handler name resolved by the dispatcher; `None` for scope entries.
    pub handler_name: Option<Arc<str>>,
    /// Metadata attached to this route's tree node.
    pub metadata: Option<MetadataEntry>,
}

impl Route {
    /// A handler route for an arbitrary method.
    ///
    /// # Errors
    ///
    /// Fails when the pattern text is invalid.
    pub fn page(method: Method, pattern: &str, handler: &str) -> anyhow::Result<Self> {
        Ok(Self {
            method,
            pattern: RoutePattern::parse(pattern)?,
            handler_name: Some(Arc::from(handler)),
            metadata: None,
        })
    }

    /// A GET handler route; the common case for page rendering.
    ///
    /// # Errors
    ///
    /// Fails when the pattern text is invalid.
    pub fn get(pattern: &str, handler: &str) -> anyhow::Result<Self> {
        Self::page(Method::GET, pattern, handler)
    }

    /// A metadata-only scope entry. Decorates the tree node for `pattern`
    /// without registering a handler there.
    ///
    /// # Errors
    ///
    /// Fails when the pattern text is invalid.
    pub fn scope(pattern: &str, metadata: MetadataEntry) -> anyhow::Result<Self> {
        Ok(Self {
            method: Method::GET,
            pattern: RoutePattern::parse(pattern)?,
            handler_name: None,
            metadata: Some(metadata),
        })
    }

    /// Attach metadata to this route.
    #[must_use]
    pub fn with_metadata(mut self, metadata: MetadataEntry) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Result of successfully matching a request path to a route.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The matched route (Arc-shared with the route tree).
    pub route: Arc<Route>,
    /// Parameters extracted from the path, in binding order.
    pub params: ParamVec,
}

impl RouteMatch {
    /// Get a dynamic-segment parameter by name.
    ///
    /// Uses "last write wins" semantics: if duplicate parameter names exist
    /// at different path depths, the deepest binding is returned.
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

/// Router that matches request paths against the registered route tree.
///
/// Built once at registration time from an ordered route list; read-only
/// afterward, so it is safe to share across concurrently handled requests
/// without synchronization.
#[derive(Clone)]
pub struct Router {
    root: PathNode,
    routes: Vec<Arc<Route>>,
}

impl Router {
    /// Build a router from the registration list. Routes registered later
    /// replace earlier ones with the same method and pattern.
    #[must_use]
    pub fn new(routes: Vec<Route>) -> Self {
        let routes: Vec<Arc<Route>> = routes.into_iter().map(Arc::new).collect();

        let mut root = PathNode::root();
        for route in &routes {
            let segments = route.pattern.segments().to_vec();
            root.insert(&segments, Arc::clone(route));
        }

        let routes_summary: Vec<String> = routes
            .iter()
            .take(10)
            .map(|r| match &r.handler_name {
                Some(handler) => format!("{} {} -> {}", r.method, r.pattern, handler),
                None => format!("scope {}", r.pattern),
            })
            .collect();
        info!(
            routes_count = routes.len(),
            routes_summary = ?routes_summary,
            "Route table built"
        );

        Self { root, routes }
    }

    /// Match a request to a route and extract its parameters.
    ///
    /// Literal segments win over dynamic ones and dynamic over catch-all,
    /// evaluated left-to-right, so the most specific registered pattern
    /// serves the path. Returns `None` when nothing matches (the service
    /// maps that to NotFound); matching never errors.
    #[must_use]
    pub fn route(&self, method: &Method, path: &str) -> Option<RouteMatch> {
        debug!(method = %method, path = %path, "Route match attempt");

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let mut params = ParamVec::new();
        match self.root.search(&segments, method, &mut params) {
            Some(route) => {
                info!(
                    method = %method,
                    path = %path,
                    pattern = %route.pattern,
                    params = ?params,
                    "Route matched"
                );
                Some(RouteMatch { route, params })
            }
            None => {
                warn!(method = %method, path = %path, "No route matched");
                None
            }
        }
    }

    /// Collect the metadata entries along the tree chain from the root to
    /// the node addressed by `pattern`, root first.
    #[must_use]
    pub fn metadata_chain(&self, pattern: &RoutePattern) -> Vec<&MetadataEntry> {
        let mut chain = Vec::new();
        self.root.metadata_chain(pattern.segments(), &mut chain);
        chain
    }

    /// Iterate over the handler names referenced by the route table.
    pub fn handler_names(&self) -> impl Iterator<Item = &str> {
        self.routes
            .iter()
            .filter_map(|r| r.handler_name.as_deref())
    }

    /// Print all registered routes to stdout, most specific first within a
    /// shared prefix. Useful when verifying a manifest loaded as expected.
    pub fn dump_routes(&self) {
        let mut routes: Vec<&Arc<Route>> = self.routes.iter().collect();
        routes.sort_by(|a, b| b.pattern.cmp_specificity(&a.pattern));
        println!("[routes] count={}", routes.len());
        for route in routes {
            match &route.handler_name {
                Some(handler) => {
                    println!("[route] {} {} -> {}", route.method, route.pattern, handler)
                }
                None => println!("[scope] {}", route.pattern),
            }
        }
    }
}
