//! Route matching: the segment tree and the router facade over it.

mod core;
mod tree;

pub use core::{ParamValue, ParamVec, Route, RouteMatch, Router, MAX_INLINE_PARAMS};
