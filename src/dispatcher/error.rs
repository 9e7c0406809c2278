use serde_json::{json, Value};
use std::error::Error as StdError;
use std::fmt;

use crate::controller::ApplicationError;
use crate::router::RouteNotFound;

/// Every way a request can fail to produce a response through normal dispatch.
///
/// The engine maps [`DispatchError::RouteNotFound`] to 404 and everything else to 500.
#[derive(Debug)]
pub enum DispatchError {
    /// The router found no match
    RouteNotFound(RouteNotFound),
    /// `run` was called before `init`
    NotInitialized,
    /// Malformed route pointer, unknown controller, or a failing controller factory
    Controller { identifier: String, reason: String },
    /// Undeclared action, or an action that returned nothing usable
    Action {
        controller: String,
        action: String,
        reason: String,
    },
    /// The action raised and no error handler recovered
    Application {
        controller: String,
        action: String,
        error: ApplicationError,
    },
    /// A router, factory, action or error handler panicked
    Panicked { message: String },
}

impl DispatchError {
    /// HTTP status the engine answers with
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            DispatchError::RouteNotFound(_) => 404,
            _ => 500,
        }
    }

    /// Stable, machine-readable name of the failure
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::RouteNotFound(_) => "route_not_found",
            DispatchError::NotInitialized => "engine_not_initialized",
            DispatchError::Controller { .. } => "controller_error",
            DispatchError::Action { .. } => "action_error",
            DispatchError::Application { .. } => "application_error",
            DispatchError::Panicked { .. } => "panic",
        }
    }

    /// The message followed by every `caused by:` line of the source chain.
    #[must_use]
    pub fn report(&self) -> String {
        let mut report = self.to_string();
        let mut source = self.source();
        while let Some(cause) = source {
            report.push_str("\ncaused by: ");
            report.push_str(&cause.to_string());
            source = cause.source();
        }
        report
    }

    /// Context handed to fallback views under the `error` key
    #[must_use]
    pub fn to_context(&self) -> Value {
        let mut context = json!({
            "kind": self.kind(),
            "status": self.status(),
            "message": self.to_string(),
        });
        if let DispatchError::Application { error, .. } = self {
            context["class"] = json!(error.class().name());
        }
        context
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::RouteNotFound(not_found) => write!(f, "{not_found}"),
            DispatchError::NotInitialized => write!(
                f,
                "Engine is not initialized: call Engine::init with a router before run"
            ),
            DispatchError::Controller { identifier, reason } => {
                write!(f, "Controller error for '{identifier}': {reason}")
            }
            DispatchError::Action {
                controller,
                action,
                reason,
            } => write!(f, "Action error for '{controller}#{action}': {reason}"),
            DispatchError::Application {
                controller,
                action,
                error,
            } => write!(f, "Unhandled error in '{controller}#{action}': {error}"),
            DispatchError::Panicked { message } => write!(f, "Panic during dispatch: {message}"),
        }
    }
}

/// Sources skip the layer already printed by `Display`.
impl StdError for DispatchError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            DispatchError::Application { error, .. } => error.source(),
            _ => None,
        }
    }
}

impl From<RouteNotFound> for DispatchError {
    fn from(not_found: RouteNotFound) -> Self {
        DispatchError::RouteNotFound(not_found)
    }
}
