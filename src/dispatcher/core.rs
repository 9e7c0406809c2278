use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::DispatchError;
use crate::controller::{ActionOutput, ControllerRegistry};
use crate::web::{Request, Response};

/// Separator between nested controller namespaces
pub const NAMESPACE_SEPARATOR: &str = "::";

/// `"<controller-path>#<action>"`, e.g. `"admin/rabbits#items"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePointer {
    pub controller_path: String,
    pub action: String,
}

impl RoutePointer {
    /// Split a route pointer on its single `#`.
    ///
    /// # Errors
    ///
    /// [`DispatchError::Controller`] unless there is exactly one `#` with text on both sides.
    pub fn parse(pointer: &str) -> Result<Self, DispatchError> {
        let mut parts = pointer.split('#');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(controller), Some(action), None)
                if !controller.trim_matches('/').is_empty() && !action.is_empty() =>
            {
                Ok(Self {
                    controller_path: controller.trim_matches('/').to_string(),
                    action: action.to_string(),
                })
            }
            _ => Err(DispatchError::Controller {
                identifier: pointer.to_string(),
                reason: "malformed route pointer, expected '<controller>#<action>'".to_string(),
            }),
        }
    }

    /// Fully qualified controller identifier under `namespace`.
    ///
    /// `admin/rabbits` under `app::controllers` becomes `app::controllers::admin::rabbits`.
    /// An empty namespace leaves the path unprefixed.
    #[must_use]
    pub fn controller_identifier(&self, namespace: &str) -> String {
        let path = self
            .controller_path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join(NAMESPACE_SEPARATOR);
        let namespace = namespace.trim_end_matches(NAMESPACE_SEPARATOR);
        if namespace.is_empty() {
            path
        } else {
            format!("{namespace}{NAMESPACE_SEPARATOR}{path}")
        }
    }
}

impl FromStr for RoutePointer {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RoutePointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.controller_path, self.action)
    }
}

/// Resolves route pointers to controller actions and runs them.
///
/// Holds only the controller registry; nothing survives from one request to the next.
#[derive(Clone, Default)]
pub struct Dispatcher {
    controllers: Arc<ControllerRegistry>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(controllers: ControllerRegistry) -> Self {
        Self {
            controllers: Arc::new(controllers),
        }
    }

    #[must_use]
    pub fn controllers(&self) -> &ControllerRegistry {
        &self.controllers
    }

    /// Resolve `route_pointer` under `controller_namespace`, build the controller and run
    /// the action, giving declared error handlers a chance to recover application errors.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::Controller`]: malformed pointer, unknown identifier, or the
    ///   factory failed
    /// - [`DispatchError::Action`]: the action is not declared or returned
    ///   [`ActionOutput::Empty`]
    /// - [`DispatchError::Application`]: the action raised and no handler returned a
    ///   response (carries the handler's own error if one raised)
    pub fn execute_route_pointer(
        &self,
        route_pointer: &str,
        req: &mut Request,
        controller_namespace: &str,
    ) -> Result<Response, DispatchError> {
        let request_id = req.request_id;
        let pointer = RoutePointer::parse(route_pointer)?;
        let identifier = pointer.controller_identifier(controller_namespace);
        let action = pointer.action.as_str();

        debug!(
            request_id = %request_id,
            route_pointer = %route_pointer,
            controller = %identifier,
            "Controller lookup"
        );

        let factory = self
            .controllers
            .get(&identifier)
            .ok_or_else(|| DispatchError::Controller {
                identifier: identifier.clone(),
                reason: "no controller registered under this identifier".to_string(),
            })?;

        let mut controller = factory
            .instantiate()
            .map_err(|err| DispatchError::Controller {
                identifier: identifier.clone(),
                reason: format!("controller could not be constructed: {err:#}"),
            })?;

        if !controller.has_action(action) {
            return Err(DispatchError::Action {
                controller: identifier,
                action: action.to_string(),
                reason: "action is not declared on the controller".to_string(),
            });
        }

        info!(
            request_id = %request_id,
            controller = %identifier,
            action = %action,
            "Action execution start"
        );
        let start = Instant::now();

        let outcome = controller
            .invoke(action, req)
            .ok_or_else(|| DispatchError::Action {
                controller: identifier.clone(),
                action: action.to_string(),
                reason: "action is not declared on the controller".to_string(),
            })?;

        let error = match outcome {
            Ok(ActionOutput::Response(response)) => {
                info!(
                    request_id = %request_id,
                    controller = %identifier,
                    action = %action,
                    status = response.status,
                    execution_time_ms = start.elapsed().as_millis() as u64,
                    "Action execution complete"
                );
                return Ok(response);
            }
            Ok(ActionOutput::Stream(chunks)) => {
                info!(
                    request_id = %request_id,
                    controller = %identifier,
                    action = %action,
                    execution_time_ms = start.elapsed().as_millis() as u64,
                    "Action returned a lazy output stream"
                );
                return Ok(Response::stream(200, chunks));
            }
            Ok(ActionOutput::Empty) => {
                return Err(DispatchError::Action {
                    controller: identifier,
                    action: action.to_string(),
                    reason: "action does not return a usable response".to_string(),
                });
            }
            Err(error) => error,
        };

        let handlers = controller.load_error_handlers(action, error.class());
        warn!(
            request_id = %request_id,
            controller = %identifier,
            action = %action,
            error_class = %error.class(),
            error = %error.message(),
            matching_handlers = handlers.len(),
            "Action raised an application error"
        );

        for handler in &handlers {
            match controller.invoke_error_handler(handler, req, &error) {
                Ok(Some(response)) => {
                    info!(
                        request_id = %request_id,
                        controller = %identifier,
                        action = %action,
                        handler = %handler.name,
                        status = response.status,
                        "Error handler recovered"
                    );
                    return Ok(response);
                }
                Ok(None) => {
                    debug!(
                        request_id = %request_id,
                        handler = %handler.name,
                        "Error handler declined"
                    );
                }
                Err(raised) => {
                    warn!(
                        request_id = %request_id,
                        controller = %identifier,
                        action = %action,
                        handler = %handler.name,
                        error = %raised,
                        "Error handler raised"
                    );
                    return Err(DispatchError::Application {
                        controller: identifier,
                        action: action.to_string(),
                        error: raised,
                    });
                }
            }
        }

        Err(DispatchError::Application {
            controller: identifier,
            action: action.to_string(),
            error,
        })
    }
}
