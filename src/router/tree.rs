//! Segment tree for route matching.
//!
//! Each node represents one path segment. Static segments match exactly,
//! parameter segments match any single non-empty segment, and a catch-all
//! child absorbs every remaining segment (possibly none). Handler routes are
//! stored at terminal nodes keyed by HTTP method; metadata entries may be
//! attached to any node and are collected along the root-to-leaf chain at
//! resolution time.
//!
//! Search order encodes the tie-break law: literal children are tried first,
//! then parameter children (with backtracking), then the catch-all. Evaluated
//! left-to-right while descending, this makes the most specific matching
//! pattern win.

use http::Method;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use crate::metadata::MetadataEntry;
use crate::pattern::Segment;
use crate::router::core::{ParamValue, ParamVec, Route};

/// Interior node of the segment tree.
#[derive(Clone, Default)]
pub(crate) struct PathNode {
    /// The literal segment this node represents ("" for the root and for
    /// parameter nodes).
    segment: Cow<'static, str>,
    /// Parameter name if this is a dynamic node.
    param_name: Option<Arc<str>>,
    /// Handler routes terminating at this node, keyed by method.
    routes: HashMap<Method, Arc<Route>>,
    /// Metadata attached to this node, inherited by descendants.
    metadata: Option<MetadataEntry>,
    /// Literal children.
    children: Vec<PathNode>,
    /// Dynamic children. Multiple entries are possible when sibling patterns
    /// use different parameter names at the same position.
    param_children: Vec<PathNode>,
    /// Trailing catch-all child, always terminal.
    catch_all: Option<Box<CatchAllNode>>,
}

/// Terminal catch-all node; absorbs all remaining segments.
#[derive(Clone)]
pub(crate) struct CatchAllNode {
    name: Arc<str>,
    routes: HashMap<Method, Arc<Route>>,
    metadata: Option<MetadataEntry>,
}

impl PathNode {
    pub(crate) fn root() -> Self {
        Self::default()
    }

    fn new_literal(segment: &str) -> Self {
        Self {
            segment: Cow::Owned(segment.to_string()),
            ..Self::default()
        }
    }

    fn new_param(name: Arc<str>) -> Self {
        Self {
            param_name: Some(name),
            ..Self::default()
        }
    }

    /// Insert a route at the node addressed by `segments`. A route for an
    /// already-registered (method, pattern) pair replaces the previous one;
    /// metadata attached to an already-decorated node likewise replaces it.
    pub(crate) fn insert(&mut self, segments: &[Segment], route: Arc<Route>) {
        let Some((segment, remaining)) = segments.split_first() else {
            self.attach(route);
            return;
        };

        match segment {
            Segment::Literal(text) => {
                if let Some(child) = self.children.iter_mut().find(|c| c.segment == *text) {
                    child.insert(remaining, route);
                    return;
                }
                let mut child = PathNode::new_literal(text);
                child.insert(remaining, route);
                self.children.push(child);
            }
            Segment::Dynamic(name) => {
                if let Some(child) = self
                    .param_children
                    .iter_mut()
                    .find(|c| c.param_name.as_deref() == Some(name.as_str()))
                {
                    child.insert(remaining, route);
                    return;
                }
                let mut child = PathNode::new_param(Arc::from(name.as_str()));
                child.insert(remaining, route);
                self.param_children.push(child);
            }
            Segment::CatchAll(name) => {
                // Pattern validation guarantees this is the last segment.
                let node = self.catch_all.get_or_insert_with(|| {
                    Box::new(CatchAllNode {
                        name: Arc::from(name.as_str()),
                        routes: HashMap::new(),
                        metadata: None,
                    })
                });
                node.name = Arc::from(name.as_str());
                if let Some(metadata) = &route.metadata {
                    node.metadata = Some(metadata.clone());
                }
                if route.handler_name.is_some() {
                    node.routes.insert(route.method.clone(), route);
                }
            }
        }
    }

    fn attach(&mut self, route: Arc<Route>) {
        if let Some(metadata) = &route.metadata {
            self.metadata = Some(metadata.clone());
        }
        if route.handler_name.is_some() {
            self.routes.insert(route.method.clone(), route);
        }
    }

    /// Depth-first search for a matching route, binding parameters into
    /// `params`. Bindings made on branches that fail are backtracked before
    /// the next branch is tried.
    pub(crate) fn search(
        &self,
        segments: &[&str],
        method: &Method,
        params: &mut ParamVec,
    ) -> Option<Arc<Route>> {
        let Some((segment, remaining)) = segments.split_first() else {
            if let Some(route) = self.routes.get(method) {
                return Some(Arc::clone(route));
            }
            // A trailing catch-all matches with an empty binding, so
            // `/docs/{...slug}` also serves `/docs`.
            if let Some(node) = &self.catch_all {
                if let Some(route) = node.routes.get(method) {
                    params.push((Arc::clone(&node.name), ParamValue::Multi(Vec::new())));
                    return Some(Arc::clone(route));
                }
            }
            return None;
        };

        for child in &self.children {
            if child.segment == *segment {
                if let Some(route) = child.search(remaining, method, params) {
                    return Some(route);
                }
            }
        }

        for child in &self.param_children {
            if let Some(name) = &child.param_name {
                params.push((Arc::clone(name), ParamValue::Single((*segment).to_string())));
                if let Some(route) = child.search(remaining, method, params) {
                    return Some(route);
                }
                params.pop();
            }
        }

        if let Some(node) = &self.catch_all {
            if let Some(route) = node.routes.get(method) {
                let rest: Vec<String> = segments.iter().map(|s| (*s).to_string()).collect();
                params.push((Arc::clone(&node.name), ParamValue::Multi(rest)));
                return Some(Arc::clone(route));
            }
        }

        None
    }

    /// Collect the metadata entries along the node chain addressed by
    /// `segments`, root first. Used by the metadata resolver after a match.
    pub(crate) fn metadata_chain<'a>(
        &'a self,
        segments: &[Segment],
        chain: &mut Vec<&'a MetadataEntry>,
    ) {
        if let Some(metadata) = &self.metadata {
            chain.push(metadata);
        }
        let Some((segment, remaining)) = segments.split_first() else {
            return;
        };
        match segment {
            Segment::Literal(text) => {
                if let Some(child) = self.children.iter().find(|c| c.segment == *text) {
                    child.metadata_chain(remaining, chain);
                }
            }
            Segment::Dynamic(name) => {
                if let Some(child) = self
                    .param_children
                    .iter()
                    .find(|c| c.param_name.as_deref() == Some(name.as_str()))
                {
                    child.metadata_chain(remaining, chain);
                }
            }
            Segment::CatchAll(_) => {
                if let Some(node) = &self.catch_all {
                    if let Some(metadata) = &node.metadata {
                        chain.push(metadata);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::RoutePattern;

    fn insert(root: &mut PathNode, method: Method, pattern: &str, handler: &str) {
        let route = Route::page(method, pattern, handler).unwrap();
        let segments = route.pattern.segments().to_vec();
        root.insert(&segments, Arc::new(route));
    }

    fn search<'a>(root: &PathNode, method: Method, path: &str) -> Option<(Arc<Route>, ParamVec)> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut params = ParamVec::new();
        root.search(&segments, &method, &mut params)
            .map(|route| (route, params))
    }

    #[test]
    fn test_literal_child_preferred_over_param() {
        let mut root = PathNode::root();
        insert(&mut root, Method::GET, "/products/featured", "featured");
        insert(&mut root, Method::GET, "/products/{id}", "product");

        let (route, params) = search(&root, Method::GET, "/products/featured").unwrap();
        assert_eq!(route.handler_name.as_deref(), Some("featured"));
        assert!(params.is_empty());

        let (route, params) = search(&root, Method::GET, "/products/42").unwrap();
        assert_eq!(route.handler_name.as_deref(), Some("product"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_backtracks_when_literal_branch_dead_ends() {
        let mut root = PathNode::root();
        insert(&mut root, Method::GET, "/files/static/logo", "logo");
        insert(&mut root, Method::GET, "/files/{dir}/readme", "readme");

        // "static" matches the literal branch but "readme" only exists under
        // the parameter branch, so the search must back out and rebind.
        let (route, params) = search(&root, Method::GET, "/files/static/readme").unwrap();
        assert_eq!(route.handler_name.as_deref(), Some("readme"));
        let (name, value) = &params[0];
        assert_eq!(name.as_ref(), "dir");
        assert_eq!(value.as_str(), Some("static"));
    }

    #[test]
    fn test_catch_all_binds_zero_segments() {
        let mut root = PathNode::root();
        insert(&mut root, Method::GET, "/docs/{...slug}", "docs");

        let (_, params) = search(&root, Method::GET, "/docs").unwrap();
        let (name, value) = &params[0];
        assert_eq!(name.as_ref(), "slug");
        assert_eq!(value.as_segments(), Some(&[][..]));
    }

    #[test]
    fn test_catch_all_preserves_segment_order() {
        let mut root = PathNode::root();
        insert(&mut root, Method::GET, "/docs/{...slug}", "docs");

        let (_, params) = search(&root, Method::GET, "/docs/a/b/c").unwrap();
        let (_, value) = &params[0];
        assert_eq!(
            value.as_segments(),
            Some(&["a".to_string(), "b".to_string(), "c".to_string()][..])
        );
    }

    #[test]
    fn test_method_mismatch_is_no_match() {
        let mut root = PathNode::root();
        insert(&mut root, Method::GET, "/about", "about");
        assert!(search(&root, Method::POST, "/about").is_none());
    }

    #[test]
    fn test_metadata_chain_collects_ancestors() {
        let mut root = PathNode::root();
        let scope = Route::scope("/", MetadataEntry::with_default_title("Global title")).unwrap();
        let segments = scope.pattern.segments().to_vec();
        root.insert(&segments, Arc::new(scope));
        let about = Route::page(Method::GET, "/about", "about")
            .unwrap()
            .with_metadata(MetadataEntry::with_absolute_title("About"));
        let segments = about.pattern.segments().to_vec();
        root.insert(&segments, Arc::new(about));

        let pattern = RoutePattern::parse("/about").unwrap();
        let mut chain = Vec::new();
        root.metadata_chain(pattern.segments(), &mut chain);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].title_default.as_deref(), Some("Global title"));
        assert_eq!(chain[1].title_absolute.as_deref(), Some("About"));
    }
}
