//! Route pattern parsing and specificity ordering.
//!
//! Patterns are written with the familiar page-route syntax:
//!
//! - `/about` - literal segments only
//! - `/products/{productsId}` - a dynamic segment binding one path segment
//! - `/docs/{...slug}` - a trailing catch-all binding zero or more segments
//!
//! Patterns are parsed once at registration time and are immutable afterward.
//! Invariants (at most one catch-all, and only in last position; non-empty
//! parameter names) are enforced here so the match hot path never has to
//! re-validate them.

use anyhow::{bail, Result};
use std::cmp::Ordering;
use std::fmt;

/// One parsed segment of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Exact, case-sensitive segment text (e.g. `products`).
    Literal(String),
    /// Single-segment parameter (e.g. `{productsId}`); matches any one
    /// non-empty segment and binds it under the given name.
    Dynamic(String),
    /// Trailing parameter (e.g. `{...slug}`); absorbs zero or more remaining
    /// segments in order.
    CatchAll(String),
}

impl Segment {
    /// Specificity rank used for tie-breaking: Literal > Dynamic > CatchAll.
    fn rank(&self) -> u8 {
        match self {
            Segment::Literal(_) => 2,
            Segment::Dynamic(_) => 1,
            Segment::CatchAll(_) => 0,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal(s) => write!(f, "{}", s),
            Segment::Dynamic(name) => write!(f, "{{{}}}", name),
            Segment::CatchAll(name) => write!(f, "{{...{}}}", name),
        }
    }
}

/// An ordered sequence of [`Segment`]s parsed from a pattern string.
///
/// The zero-segment pattern (`/`) is valid and matches only the root path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Parse a pattern string into segments, validating the pattern
    /// invariants.
    ///
    /// # Errors
    ///
    /// Fails when a parameter name is empty, or a catch-all segment appears
    /// anywhere but last.
    pub fn parse(pattern: &str) -> Result<Self> {
        let mut segments = Vec::new();
        for raw in pattern.split('/').filter(|s| !s.is_empty()) {
            if segments
                .last()
                .is_some_and(|s| matches!(s, Segment::CatchAll(_)))
            {
                bail!("invalid route pattern {pattern:?}: catch-all segment must be last");
            }
            segments.push(Self::parse_segment(raw, pattern)?);
        }
        Ok(Self { segments })
    }

    fn parse_segment(raw: &str, pattern: &str) -> Result<Segment> {
        if let Some(inner) = raw.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            if let Some(name) = inner.strip_prefix("...") {
                if name.is_empty() {
                    bail!("invalid route pattern {pattern:?}: catch-all segment has no name");
                }
                return Ok(Segment::CatchAll(name.to_string()));
            }
            if inner.is_empty() {
                bail!("invalid route pattern {pattern:?}: dynamic segment has no name");
            }
            return Ok(Segment::Dynamic(inner.to_string()));
        }
        if raw.contains('{') || raw.contains('}') {
            bail!("invalid route pattern {pattern:?}: malformed segment {raw:?}");
        }
        Ok(Segment::Literal(raw.to_string()))
    }

    /// The parsed segments in order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether the pattern ends in a catch-all segment.
    #[must_use]
    pub fn has_catch_all(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::CatchAll(_)))
    }

    /// Compare two patterns by specificity, left-to-right: a Literal segment
    /// beats a Dynamic one, and a Dynamic segment beats a CatchAll. The
    /// greater pattern is the more specific one and wins a tie-break when
    /// both match the same path.
    #[must_use]
    pub fn cmp_specificity(&self, other: &Self) -> Ordering {
        for (a, b) in self.segments.iter().zip(other.segments.iter()) {
            match a.rank().cmp(&b.rank()) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        // Past the shared prefix, a pattern that continues is more specific,
        // unless it continues with a catch-all: the exact route at a node
        // wins over the catch-all's zero-segment binding.
        match self.segments.len().cmp(&other.segments.len()) {
            Ordering::Equal => Ordering::Equal,
            Ordering::Greater => {
                if matches!(self.segments[other.segments.len()], Segment::CatchAll(_)) {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            }
            Ordering::Less => {
                if matches!(other.segments[self.segments.len()], Segment::CatchAll(_)) {
                    Ordering::Greater
                } else {
                    Ordering::Less
                }
            }
        }
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "/");
        }
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}
