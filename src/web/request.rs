use crate::ids::RequestId;
use crate::router::ParamVec;
use http::Method;
use serde_json::Value;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;

use super::Session;

/// Maximum inline headers before heap allocation
pub const MAX_INLINE_HEADERS: usize = 16;

/// Header storage; names are shared `Arc<str>` so cloning a request stays cheap.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// An incoming request as seen by controllers.
///
/// The engine writes route parameters into [`Request::params`] before the action runs, so
/// actions read them with [`Request::param`] regardless of whether they came from the path
/// or were set by the host.
#[derive(Debug, Clone)]
pub struct Request {
    /// Correlation id for every log line emitted while handling this request
    pub request_id: RequestId,
    /// HTTP method (GET, POST, etc.)
    pub method: Method,
    /// Request path without the query string
    pub path: String,
    /// Parameter bag; route parameters are appended here by the engine
    pub params: ParamVec,
    /// Query string parameters
    pub query_params: ParamVec,
    /// HTTP headers
    pub headers: HeaderVec,
    /// Request body parsed as JSON (if present)
    pub body: Option<Value>,
    /// Session attached by the engine when `start_session` is enabled
    pub session: Option<Session>,
}

impl Request {
    /// Build a request from a method and a URI that may carry a query string.
    #[must_use]
    pub fn new(method: Method, uri: &str) -> Self {
        let (path, query_params) = match uri.split_once('?') {
            Some((path, _)) => (path, parse_query_params(uri)),
            None => (uri, ParamVec::new()),
        };
        Self {
            request_id: RequestId::new(),
            method,
            path: path.to_string(),
            params: ParamVec::new(),
            query_params,
            headers: HeaderVec::new(),
            body: None,
            session: None,
        }
    }

    #[must_use]
    pub fn get(uri: &str) -> Self {
        Self::new(Method::GET, uri)
    }

    #[must_use]
    pub fn post(uri: &str) -> Self {
        Self::new(Method::POST, uri)
    }

    /// Add a header. An `x-request-id` header that parses as a ULID replaces the
    /// generated request id.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if name.eq_ignore_ascii_case("x-request-id") {
            self.request_id = RequestId::from_header_or_new(Some(value));
        }
        self.headers.push((Arc::from(name), value.to_string()));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[inline]
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get a parameter by name
    ///
    /// Uses "last write wins" semantics: a later [`Request::set_param`] with the same name
    /// shadows the earlier value.
    #[inline]
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_param(&mut self, name: impl Into<Arc<str>>, value: impl Into<String>) {
        self.params.push((name.into(), value.into()));
    }

    /// Get a query parameter by name (last occurrence wins)
    #[inline]
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get a header by name (case-insensitive per RFC 7230)
    #[inline]
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Collapse the parameter bag into a map. Allocates; prefer [`Request::param`].
    #[must_use]
    pub fn params_map(&self) -> HashMap<String, String> {
        self.params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

/// Parse query string parameters from a URI
///
/// Extracts everything after the `?` character and URL-decodes names and values.
/// Repeated names are kept in order.
#[must_use]
pub fn parse_query_params(uri: &str) -> ParamVec {
    match uri.split_once('?') {
        Some((_, query)) => url::form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (Arc::from(k.as_ref()), v.into_owned()))
            .collect(),
        None => ParamVec::new(),
    }
}
