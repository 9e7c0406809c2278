//! # Router Module
//!
//! The engine treats routing as an external collaborator: anything implementing
//! [`Router`] can map `(method, path)` to a [`RouteMatch`] carrying a route pointer
//! (`"rabbits#items"`) and the parameters extracted from the path.
//!
//! [`PatternRouter`] is the collaborator shipped with the crate. It compiles each path
//! pattern (`/rabbits/:id` or `/rabbits/{id}`) into an anchored regex and tests them in
//! registration order, so the first matching route wins.
//!
//! ## Example
//!
//! ```rust
//! use http::Method;
//! use warren::router::{PatternRouter, Router};
//!
//! let mut router = PatternRouter::new();
//! router.add(Method::GET, "/rabbits/:id", "rabbits#show").unwrap();
//!
//! let m = router.match_route(&Method::GET, "/rabbits/42").unwrap();
//! assert_eq!(m.route_pointer.as_ref(), "rabbits#show");
//! assert_eq!(m.get_param("id"), Some("42"));
//! ```

mod core;
#[cfg(test)]
mod tests;

pub use core::{ParamVec, PatternRouter, RouteMatch, RouteNotFound, Router, MAX_INLINE_PARAMS};
