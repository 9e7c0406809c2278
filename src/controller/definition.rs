use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::error::{ApplicationError, ErrorClass};
use super::handlers::{ErrorHandlerRegistry, HandlerRef, HandlerResult};
use crate::web::{OutputStream, Request, Response};

/// What an action hands back.
pub enum ActionOutput {
    Response(Response),
    /// Lazily produced body, served with status 200
    Stream(OutputStream),
    /// The action produced nothing usable; dispatch fails with an action error.
    Empty,
}

impl fmt::Debug for ActionOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionOutput::Response(res) => f.debug_tuple("Response").field(res).finish(),
            ActionOutput::Stream(_) => f.write_str("Stream(..)"),
            ActionOutput::Empty => f.write_str("Empty"),
        }
    }
}

impl From<Response> for ActionOutput {
    fn from(res: Response) -> Self {
        ActionOutput::Response(res)
    }
}

impl From<()> for ActionOutput {
    fn from(_: ()) -> Self {
        ActionOutput::Empty
    }
}

pub type ActionResult = Result<ActionOutput, ApplicationError>;

pub type ActionFn<C> = Arc<dyn Fn(&mut C, &mut Request) -> ActionResult + Send + Sync>;

type FactoryFn<C> = Box<dyn Fn() -> anyhow::Result<C> + Send + Sync>;

/// A live controller instance as the dispatcher sees it.
pub trait Controller {
    fn has_action(&self, action: &str) -> bool;

    /// `None` when the action is not declared.
    fn invoke(&mut self, action: &str, req: &mut Request) -> Option<ActionResult>;

    fn load_error_handlers(&self, action: &str, class: &ErrorClass) -> Vec<HandlerRef>;

    fn invoke_error_handler(
        &mut self,
        handler: &HandlerRef,
        req: &mut Request,
        err: &ApplicationError,
    ) -> HandlerResult;
}

/// Builds a fresh controller for each dispatched request.
pub trait ControllerFactory: Send + Sync {
    /// # Errors
    ///
    /// Whatever prevented the controller from being constructed.
    fn instantiate(&self) -> anyhow::Result<Box<dyn Controller>>;
}

/// Static description of a controller type: how to build it, its actions and its
/// declared error handlers.
///
/// ```rust
/// use warren::controller::{ActionOutput, ApplicationError, ControllerDefinition, NOT_FOUND};
/// use warren::web::Response;
///
/// #[derive(Default)]
/// struct Rabbits;
///
/// let definition = ControllerDefinition::<Rabbits>::with_default()
///     .action("items", |_, _| Ok(Response::text(200, "Flopsy").into()))
///     .action("show", |_, req| match req.param("id") {
///         Some("1") => Ok(Response::text(200, "Mopsy").into()),
///         _ => Err(ApplicationError::not_found("no such rabbit")),
///     })
///     .error_handler("missing", &NOT_FOUND, &["show"], |_, _, err| {
///         Ok(Some(Response::text(404, err.message())))
///     });
///
/// assert!(definition.has_action("show"));
/// ```
pub struct ControllerDefinition<C> {
    factory: FactoryFn<C>,
    actions: HashMap<String, ActionFn<C>>,
    error_handlers: ErrorHandlerRegistry<C>,
}

impl<C: 'static> ControllerDefinition<C> {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> anyhow::Result<C> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            actions: HashMap::new(),
            error_handlers: ErrorHandlerRegistry::default(),
        }
    }

    #[must_use]
    pub fn with_default() -> Self
    where
        C: Default,
    {
        Self::new(|| Ok(C::default()))
    }

    /// Declare an action. Redeclaring a name replaces the previous action.
    #[must_use]
    pub fn action<F>(mut self, name: &str, action: F) -> Self
    where
        F: Fn(&mut C, &mut Request) -> ActionResult + Send + Sync + 'static,
    {
        self.actions.insert(name.to_string(), Arc::new(action));
        self
    }

    /// Declare an error handler for `class` (and its subclasses) raised by any of
    /// `actions`, or by every action when `actions` is empty.
    #[must_use]
    pub fn error_handler<F>(
        mut self,
        name: &str,
        class: &'static ErrorClass,
        actions: &[&str],
        handler: F,
    ) -> Self
    where
        F: Fn(&mut C, &mut Request, &ApplicationError) -> HandlerResult + Send + Sync + 'static,
    {
        self.error_handlers.declare(name, class, actions, handler);
        self
    }

    #[must_use]
    pub fn has_action(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    #[must_use]
    pub fn error_handlers(&self) -> &ErrorHandlerRegistry<C> {
        &self.error_handlers
    }
}

/// A controller instance bound to its definition.
struct BoundController<C> {
    instance: C,
    definition: Arc<ControllerDefinition<C>>,
}

impl<C: 'static> Controller for BoundController<C> {
    fn has_action(&self, action: &str) -> bool {
        self.definition.has_action(action)
    }

    fn invoke(&mut self, action: &str, req: &mut Request) -> Option<ActionResult> {
        let action = Arc::clone(self.definition.actions.get(action)?);
        Some(action(&mut self.instance, req))
    }

    fn load_error_handlers(&self, action: &str, class: &ErrorClass) -> Vec<HandlerRef> {
        self.definition
            .error_handlers
            .load_error_handlers(action, class)
    }

    fn invoke_error_handler(
        &mut self,
        handler: &HandlerRef,
        req: &mut Request,
        err: &ApplicationError,
    ) -> HandlerResult {
        self.definition
            .error_handlers
            .invoke(handler, &mut self.instance, req, err)
    }
}

/// Factory adapter the registry stores for a [`ControllerDefinition`].
pub(crate) struct DefinitionFactory<C>(pub(crate) Arc<ControllerDefinition<C>>);

impl<C: 'static> ControllerFactory for DefinitionFactory<C> {
    fn instantiate(&self) -> anyhow::Result<Box<dyn Controller>> {
        let instance = (self.0.factory)()?;
        Ok(Box::new(BoundController {
            instance,
            definition: Arc::clone(&self.0),
        }))
    }
}
