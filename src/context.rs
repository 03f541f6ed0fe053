//! Per-request context: incoming headers, cookies, and query parameters,
//! plus the outgoing header/cookie set a handler may write to.
//!
//! A `RequestContext` is built once from the raw request data, is exclusively
//! owned by that request's handling lifecycle, and is consumed when the
//! response is finalized. Incoming data is an immutable snapshot; nothing a
//! handler does here is observable to any other request.

use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// Maximum inline headers/cookies/query params before heap allocation.
/// Most requests carry well under sixteen of each.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Stack-allocated name/value storage for headers, cookies, and query
/// parameters. Names are `Arc<str>` so repeated keys (content-type, cookie
/// names) clone cheaply.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// An outgoing cookie directive with its response attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    pub value: String,
    /// `Path` attribute.
    pub path: Option<String>,
    /// `Max-Age` attribute, in seconds.
    pub max_age: Option<i64>,
    /// `HttpOnly` flag.
    pub http_only: bool,
    /// `Secure` flag.
    pub secure: bool,
}

impl SetCookie {
    /// A cookie directive with no attributes set.
    #[must_use]
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            path: None,
            max_age: None,
            http_only: false,
            secure: false,
        }
    }

    /// Set the `Path` attribute.
    #[must_use]
    pub fn path(mut self, path: &str) -> Self {
        self.path = Some(path.to_string());
        self
    }

    /// Set the `Max-Age` attribute in seconds.
    #[must_use]
    pub fn max_age(mut self, seconds: i64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    /// Mark the cookie `HttpOnly`.
    #[must_use]
    pub fn http_only(mut self) -> Self {
        self.http_only = true;
        self
    }

    /// Mark the cookie `Secure`.
    #[must_use]
    pub fn secure(mut self) -> Self {
        self.secure = true;
        self
    }
}

impl fmt::Display for SetCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)?;
        if let Some(path) = &self.path {
            write!(f, "; Path={}", path)?;
        }
        if let Some(max_age) = self.max_age {
            write!(f, "; Max-Age={}", max_age)?;
        }
        if self.http_only {
            write!(f, "; HttpOnly")?;
        }
        if self.secure {
            write!(f, "; Secure")?;
        }
        Ok(())
    }
}

/// Parse the `Cookie` request header into name/value pairs.
#[must_use]
pub fn parse_cookies(header_value: &str) -> HeaderVec {
    header_value
        .split(';')
        .filter_map(|pair| {
            let mut parts = pair.trim().splitn(2, '=');
            let name = parts.next()?.trim();
            if name.is_empty() {
                return None;
            }
            let value = parts.next().unwrap_or("").trim().to_string();
            Some((Arc::from(name), value))
        })
        .collect()
}

/// Parse a query string (without the leading `?`) into decoded name/value
/// pairs, preserving order.
#[must_use]
pub fn parse_query(query: &str) -> HeaderVec {
    url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (Arc::from(k.as_ref()), v.to_string()))
        .collect()
}

/// Request-scoped view of the incoming request plus the mutable outgoing
/// header/cookie set.
#[derive(Debug, Default)]
pub struct RequestContext {
    headers: HeaderVec,
    cookies: HeaderVec,
    query: HeaderVec,
    outgoing_headers: HeaderVec,
    outgoing_cookies: Vec<SetCookie>,
}

impl RequestContext {
    /// Build a context from raw header pairs and an optional raw query
    /// string. Header names are stored lowercased; cookies are parsed from
    /// the `cookie` header.
    #[must_use]
    pub fn new<I>(headers: I, raw_query: Option<&str>) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let headers: HeaderVec = headers
            .into_iter()
            .map(|(k, v)| (Arc::from(k.to_ascii_lowercase().as_str()), v))
            .collect();
        let cookies = headers
            .iter()
            .find(|(k, _)| k.as_ref() == "cookie")
            .map(|(_, v)| parse_cookies(v))
            .unwrap_or_default();
        let query = raw_query.map(parse_query).unwrap_or_default();
        Self {
            headers,
            cookies,
            query,
            outgoing_headers: HeaderVec::new(),
            outgoing_cookies: Vec::new(),
        }
    }

    /// Get an incoming header by name (case-insensitive per RFC 7230).
    #[inline]
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Get an incoming cookie by name.
    #[inline]
    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get a query parameter by name.
    ///
    /// Uses "last write wins" semantics: for `?limit=10&limit=20` this
    /// returns `20`.
    #[inline]
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Record an outgoing response header. The last write for a given name
    /// wins; names compare case-insensitively.
    pub fn set_header(&mut self, name: &str, value: String) {
        self.outgoing_headers
            .retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.outgoing_headers.push((Arc::from(name), value));
    }

    /// Record an outgoing cookie directive. The last write for a given
    /// cookie name wins, regardless of any same-named incoming cookie.
    pub fn set_cookie(&mut self, cookie: SetCookie) {
        self.outgoing_cookies.retain(|c| c.name != cookie.name);
        self.outgoing_cookies.push(cookie);
    }

    /// Consume the context, yielding the outgoing header and cookie sets for
    /// response finalization.
    #[must_use]
    pub fn into_outgoing(self) -> (HeaderVec, Vec<SetCookie>) {
        (self.outgoing_headers, self.outgoing_cookies)
    }
}
