//! Handler dispatch: named handler registry, cooperative outcomes, and the
//! middleware chain.

mod core;

pub use core::{Body, Dispatcher, Handler, HandlerRequest, Outcome, Rendered};
