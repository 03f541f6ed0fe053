//! # leafroute
//!
//! **leafroute** is a segment-tree page router with per-route metadata
//! inheritance and request-scoped header/cookie state. It is a library core
//! invoked by a host transport: the host parses HTTP off the wire, hands
//! this crate a method, path, and headers, and writes the finalized response
//! back out.
//!
//! ## Architecture
//!
//! - **[`pattern`]** - route pattern parsing (`/products/{id}`,
//!   `/docs/{...slug}`) and specificity ordering
//! - **[`router`]** - the segment tree: path matching, parameter extraction,
//!   and the most-specific-wins tie-break
//! - **[`metadata`]** - title/description resolution along the route chain,
//!   with default/template/absolute title semantics
//! - **[`context`]** - per-request incoming headers, cookies, and query
//!   parameters, plus the outgoing header/cookie set
//! - **[`dispatcher`]** - named handler registry, cooperative
//!   render/not-found/redirect outcomes, and the middleware chain
//! - **[`service`]** - the per-request state machine
//!   `Received -> Matching -> (NotFound | Matched) -> Executing -> Finalized`
//! - **[`manifest`]** - YAML-driven route and metadata registration
//!
//! Registration happens once at startup; the route tree and its metadata are
//! immutable afterward and safe for unsynchronized concurrent reads. Every
//! request owns its own context and match result exclusively, so concurrent
//! requests share no mutable state.
//!
//! ## Quick start
//!
//! ```
//! use leafroute::dispatcher::{Dispatcher, Outcome, Rendered};
//! use leafroute::metadata::MetadataEntry;
//! use leafroute::router::{Route, Router};
//! use leafroute::service::{PageRequest, PageService};
//!
//! let routes = vec![
//!     Route::scope("/", MetadataEntry::with_default_title("Global title")).unwrap(),
//!     Route::get("/products/{productsId}", "product_details").unwrap(),
//! ];
//! let router = Router::new(routes);
//!
//! let mut dispatcher = Dispatcher::new();
//! dispatcher.register_handler("product_details", |req, _ctx| {
//!     let id = req.param("productsId").unwrap_or("?");
//!     Outcome::Render(Rendered::html(format!("<h1>Product details for {id}</h1>")))
//! });
//!
//! let service = PageService::new(router, dispatcher);
//! let response = service.handle(PageRequest::get("/products/42"));
//! assert_eq!(response.status.code(), 200);
//! ```
//!
//! ## Handler contract
//!
//! A handler reads its [`dispatcher::HandlerRequest`] (path parameters,
//! resolved metadata) and its mutable [`context::RequestContext`] (incoming
//! headers/cookies/query, outgoing header/cookie writes), then returns one
//! of three cooperative outcomes: rendered content, NotFound, or a redirect
//! target. NotFound and Redirect are ordinary return variants; the service
//! finalizes the matching response without any unwinding.

pub mod context;
pub mod dispatcher;
pub mod ids;
pub mod manifest;
pub mod metadata;
pub mod middleware;
pub mod pattern;
pub mod router;
pub mod service;

pub use context::{RequestContext, SetCookie};
pub use dispatcher::{Dispatcher, HandlerRequest, Outcome, Rendered};
pub use manifest::load_manifest;
pub use metadata::{MetadataEntry, PageMetadata};
pub use pattern::{RoutePattern, Segment};
pub use router::{Route, RouteMatch, Router};
pub use service::{PageRequest, PageResponse, PageService, Status};
