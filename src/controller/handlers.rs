use std::fmt;
use std::sync::Arc;

use super::error::{ApplicationError, ErrorClass};
use crate::web::{Request, Response};

/// Outcome of an error handler: `Some(response)` recovers, `None` passes to the next
/// matching handler, `Err` replaces the original error.
pub type HandlerResult = Result<Option<Response>, ApplicationError>;

pub type ErrorHandlerFn<C> =
    Arc<dyn Fn(&mut C, &mut Request, &ApplicationError) -> HandlerResult + Send + Sync>;

/// One declared error handler on a controller.
pub struct ErrorHandlerDescriptor<C> {
    pub name: Arc<str>,
    pub class: &'static ErrorClass,
    /// Empty means every action
    pub actions: Vec<Arc<str>>,
    handler: ErrorHandlerFn<C>,
}

impl<C> ErrorHandlerDescriptor<C> {
    #[must_use]
    pub fn applies_to(&self, action: &str, class: &ErrorClass) -> bool {
        let action_allowed =
            self.actions.is_empty() || self.actions.iter().any(|a| a.as_ref() == action);
        action_allowed && class.is_subclass_of(self.class)
    }
}

impl<C> fmt::Debug for ErrorHandlerDescriptor<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorHandlerDescriptor")
            .field("name", &self.name)
            .field("class", &self.class.name())
            .field("actions", &self.actions)
            .finish_non_exhaustive()
    }
}

/// Reference to a handler inside one controller's [`ErrorHandlerRegistry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerRef {
    pub(crate) index: usize,
    pub name: Arc<str>,
}

/// Error handlers declared on a controller, in declaration order.
pub struct ErrorHandlerRegistry<C> {
    handlers: Vec<ErrorHandlerDescriptor<C>>,
}

impl<C> Default for ErrorHandlerRegistry<C> {
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }
}

impl<C> ErrorHandlerRegistry<C> {
    pub fn declare<F>(&mut self, name: &str, class: &'static ErrorClass, actions: &[&str], handler: F)
    where
        F: Fn(&mut C, &mut Request, &ApplicationError) -> HandlerResult + Send + Sync + 'static,
    {
        self.handlers.push(ErrorHandlerDescriptor {
            name: Arc::from(name),
            class,
            actions: actions.iter().map(|a| Arc::from(*a)).collect(),
            handler: Arc::new(handler),
        });
    }

    /// Handlers applying to `action` and `class`, in declaration order.
    #[must_use]
    pub fn load_error_handlers(&self, action: &str, class: &ErrorClass) -> Vec<HandlerRef> {
        self.handlers
            .iter()
            .enumerate()
            .filter(|(_, h)| h.applies_to(action, class))
            .map(|(index, h)| HandlerRef {
                index,
                name: Arc::clone(&h.name),
            })
            .collect()
    }

    /// Run one handler. Returns `Ok(None)` for a reference from another registry.
    pub fn invoke(
        &self,
        handler: &HandlerRef,
        controller: &mut C,
        req: &mut Request,
        err: &ApplicationError,
    ) -> HandlerResult {
        match self.handlers.get(handler.index) {
            Some(descriptor) if descriptor.name == handler.name => {
                (descriptor.handler)(controller, req, err)
            }
            _ => Ok(None),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
