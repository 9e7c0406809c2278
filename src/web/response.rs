use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

use super::HeaderVec;

/// Lazily produced response body. The host drains it; the engine never does.
pub type OutputStream = Box<dyn Iterator<Item = String> + Send>;

/// Opaque name of a renderable template, e.g. `"not_found.phtml"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewPointer(String);

impl ViewPointer {
    #[must_use]
    pub fn new(pointer: impl Into<String>) -> Self {
        Self(pointer.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ViewPointer {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ViewPointer {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ViewPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a response carries. Rendering views is the host's job.
pub enum Output {
    Text(String),
    Json(Value),
    View {
        pointer: ViewPointer,
        context: Map<String, Value>,
    },
    Stream(OutputStream),
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Output::Json(value) => f.debug_tuple("Json").field(value).finish(),
            Output::View { pointer, context } => f
                .debug_struct("View")
                .field("pointer", pointer)
                .field("context", context)
                .finish(),
            Output::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// Response produced by a controller action or by the engine's fallback path
#[derive(Debug)]
pub struct Response {
    /// HTTP status code (200, 404, 500, etc.)
    pub status: u16,
    pub headers: HeaderVec,
    pub output: Output,
}

impl Response {
    #[must_use]
    pub fn new(status: u16, output: Output) -> Self {
        let content_type = match &output {
            Output::Text(_) => "text/plain; charset=utf-8",
            Output::Json(_) => "application/json",
            Output::View { .. } | Output::Stream(_) => "text/html; charset=utf-8",
        };
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("content-type"), content_type.to_string()));
        Self {
            status,
            headers,
            output,
        }
    }

    #[must_use]
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self::new(status, Output::Text(body.into()))
    }

    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        Self::new(status, Output::Json(body))
    }

    #[must_use]
    pub fn view(status: u16, pointer: impl Into<ViewPointer>, context: Map<String, Value>) -> Self {
        Self::new(
            status,
            Output::View {
                pointer: pointer.into(),
                context,
            },
        )
    }

    #[must_use]
    pub fn stream(status: u16, chunks: OutputStream) -> Self {
        Self::new(status, Output::Stream(chunks))
    }

    /// View pointer when the output is a view
    #[must_use]
    pub fn view_pointer(&self) -> Option<&ViewPointer> {
        match &self.output {
            Output::View { pointer, .. } => Some(pointer),
            _ => None,
        }
    }

    /// View context when the output is a view
    #[must_use]
    pub fn view_context(&self) -> Option<&Map<String, Value>> {
        match &self.output {
            Output::View { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Body as text for text and JSON outputs. Views and streams have no eager body.
    #[must_use]
    pub fn body_text(&self) -> Option<String> {
        match &self.output {
            Output::Text(text) => Some(text.clone()),
            Output::Json(value) => Some(value.to_string()),
            Output::View { .. } | Output::Stream(_) => None,
        }
    }

    #[must_use]
    pub fn is_stream(&self) -> bool {
        matches!(self.output, Output::Stream(_))
    }

    /// Get a header by name
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or replace a header
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value));
    }
}

#[must_use]
pub fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}
