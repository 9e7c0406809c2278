//! # Controllers
//!
//! Controllers are registered up front rather than discovered by name at runtime:
//!
//! - A [`ControllerDefinition`] says how to build a controller, which actions it exposes
//!   and which error handlers it declares.
//! - A [`ControllerRegistry`] maps fully qualified identifiers such as
//!   `app::controllers::admin::rabbits` to definitions (or custom [`ControllerFactory`]s).
//!   The dispatcher turns a route pointer's controller path into that identifier and looks
//!   it up; a miss is a controller error.
//!
//! ## Error handlers
//!
//! When an action returns an [`ApplicationError`], the dispatcher asks the controller for
//! handlers matching the action name and the error's [`ErrorClass`] (or an ancestor of
//! it). They run in declaration order and the first one returning a response ends
//! dispatch. Error classes form a closed hierarchy of `static` declarations rooted at
//! [`EXCEPTION`].

mod definition;
mod error;
mod handlers;
mod registry;

pub use definition::{
    ActionFn, ActionOutput, ActionResult, Controller, ControllerDefinition, ControllerFactory,
};
pub use error::{
    ApplicationError, ErrorClass, EXCEPTION, INVALID_ARGUMENT, LOGIC_ERROR, NOT_FOUND,
    RUNTIME_ERROR,
};
pub use handlers::{
    ErrorHandlerDescriptor, ErrorHandlerFn, ErrorHandlerRegistry, HandlerRef, HandlerResult,
};
pub use registry::ControllerRegistry;
