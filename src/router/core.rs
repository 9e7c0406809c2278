use http::Method;
use regex::Regex;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Maximum number of path/query parameters before heap allocation.
/// Most routes have ≤4 path params (e.g. /users/{id}/posts/{postId}).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage.
///
/// Param names use `Arc<str>` because they come from the route table built at startup;
/// values are per-request data from the URL.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Maps a request to a route pointer.
///
/// Implementations must be shareable across threads because one engine may serve many
/// requests concurrently.
pub trait Router: Send + Sync {
    /// Match `method` and `path` (no query string) against the route table.
    fn match_route(&self, method: &Method, path: &str) -> Result<RouteMatch, RouteNotFound>;
}

/// Result of successfully matching a request path to a route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// `"<controller-path>#<action>"`
    pub route_pointer: Arc<str>,
    /// Parameters extracted from the path, in pattern order
    pub params: ParamVec,
}

impl RouteMatch {
    #[must_use]
    pub fn new(route_pointer: impl Into<Arc<str>>, params: ParamVec) -> Self {
        Self {
            route_pointer: route_pointer.into(),
            params,
        }
    }

    /// Get a path parameter by name
    ///
    /// Uses "last write wins" semantics: if duplicate parameter names exist
    /// at different path depths (e.g., `/org/{id}/team/{team_id}/user/{id}`),
    /// returns the last occurrence.
    #[inline]
    #[must_use]
    pub fn get_param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }
}

/// No route matched the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteNotFound {
    pub method: Method,
    pub path: String,
}

impl RouteNotFound {
    #[must_use]
    pub fn new(method: &Method, path: &str) -> Self {
        Self {
            method: method.clone(),
            path: path.to_string(),
        }
    }
}

impl fmt::Display for RouteNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "No route found for {} {}", self.method, self.path)
    }
}

impl std::error::Error for RouteNotFound {}

#[derive(Debug, Clone)]
struct CompiledRoute {
    method: Method,
    pattern: Arc<str>,
    regex: Regex,
    param_names: Vec<Arc<str>>,
    route_pointer: Arc<str>,
}

/// Ordered route table backed by anchored regexes.
#[derive(Debug, Clone, Default)]
pub struct PatternRouter {
    routes: Vec<CompiledRoute>,
}

impl PatternRouter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route. Earlier registrations take precedence.
    ///
    /// # Errors
    ///
    /// Returns the regex error if the compiled pattern exceeds the regex size limits.
    pub fn add(
        &mut self,
        method: Method,
        pattern: &str,
        route_pointer: &str,
    ) -> Result<&mut Self, regex::Error> {
        let (regex, param_names) = Self::path_to_regex(pattern)?;
        debug!(
            method = %method,
            pattern = %pattern,
            route_pointer = %route_pointer,
            "Route registered"
        );
        self.routes.push(CompiledRoute {
            method,
            pattern: Arc::from(pattern),
            regex,
            param_names,
            route_pointer: Arc::from(route_pointer),
        });
        Ok(self)
    }

    /// Build a router from `(method, pattern, route_pointer)` rows.
    ///
    /// # Errors
    ///
    /// Fails on the first pattern that cannot be compiled.
    pub fn from_table<'a, I>(table: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = (Method, &'a str, &'a str)>,
    {
        let mut router = Self::new();
        for (method, pattern, route_pointer) in table {
            router.add(method, pattern, route_pointer)?;
        }
        info!(routes_count = router.len(), "Routing table loaded");
        Ok(router)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Convert a path pattern to an anchored regex and extract parameter names
    ///
    /// Segments written as `:name` or `{name}` become `([^/]+)` captures; every other
    /// segment is matched literally.
    pub(crate) fn path_to_regex(path: &str) -> Result<(Regex, Vec<Arc<str>>), regex::Error> {
        if path == "/" {
            return Ok((Regex::new(r"^/$")?, Vec::new()));
        }

        let mut pattern = String::with_capacity(path.len() + 5);
        pattern.push('^');
        let mut param_names = Vec::new();

        for segment in path.split('/').filter(|s| !s.is_empty()) {
            let param = segment.strip_prefix(':').or_else(|| {
                segment
                    .strip_prefix('{')
                    .and_then(|s| s.strip_suffix('}'))
            });
            match param {
                Some(name) if !name.is_empty() => {
                    pattern.push_str("/([^/]+)");
                    param_names.push(Arc::from(name));
                }
                _ => {
                    pattern.push('/');
                    pattern.push_str(&regex::escape(segment));
                }
            }
        }

        pattern.push('$');
        Ok((Regex::new(&pattern)?, param_names))
    }
}

impl Router for PatternRouter {
    fn match_route(&self, method: &Method, path: &str) -> Result<RouteMatch, RouteNotFound> {
        for route in self.routes.iter().filter(|r| r.method == *method) {
            let Some(captures) = route.regex.captures(path) else {
                continue;
            };
            let params: ParamVec = route
                .param_names
                .iter()
                .zip(captures.iter().skip(1))
                .filter_map(|(name, value)| {
                    value.map(|v| (Arc::clone(name), v.as_str().to_string()))
                })
                .collect();
            debug!(
                method = %method,
                path = %path,
                route_pattern = %route.pattern,
                route_pointer = %route.route_pointer,
                path_params = ?params,
                "Route matched"
            );
            return Ok(RouteMatch {
                route_pointer: Arc::clone(&route.route_pointer),
                params,
            });
        }

        debug!(method = %method, path = %path, "No route matched");
        Err(RouteNotFound::new(method, path))
    }
}
