//! # Dispatcher Module
//!
//! Turns a route pointer into a response.
//!
//! ## Request Flow
//!
//! 1. Split `"admin/rabbits#items"` into controller path and action
//! 2. Map the controller path into the namespace: `app::controllers::admin::rabbits`
//! 3. Look the identifier up in the [`ControllerRegistry`](crate::controller::ControllerRegistry)
//!    and build a fresh controller
//! 4. Check the action is declared, then invoke it with the request
//! 5. On an application error, run the controller's matching error handlers in
//!    declaration order; the first response wins
//!
//! ## Error Handling
//!
//! Every failure comes back as a [`DispatchError`]; the dispatcher never builds fallback
//! responses itself. That is the engine's job.

mod core;
mod error;

pub use core::{Dispatcher, RoutePointer, NAMESPACE_SEPARATOR};
pub use error::DispatchError;
