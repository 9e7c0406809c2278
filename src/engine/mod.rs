//! # Engine
//!
//! The coordinator in front of the router and the dispatcher.
//!
//! ```text
//! Request ──► Router ──► Dispatcher ──► Controller action ──► Response
//!               │             │                 │
//!               │ no match    │ failure         │ application error
//!               ▼             ▼                 ▼
//!           404 fallback   500 fallback   declared error handlers ─► Response | 500
//! ```
//!
//! Fallback responses render the configured view (`not_found_view` /
//! `internal_server_error_view`) with the error in the view context, or the error text as
//! plain text when no view is configured.
//!
//! ## Lifecycle
//!
//! ```rust
//! use http::Method;
//! use warren::config::EngineOptions;
//! use warren::controller::ControllerRegistry;
//! use warren::engine::Engine;
//! use warren::web::Request;
//! use warren::router::PatternRouter;
//!
//! let mut engine = Engine::new(ControllerRegistry::new());
//! let router = PatternRouter::from_table([(Method::GET, "/rabbits", "rabbits#items")]).unwrap();
//! engine.init(router, EngineOptions::default().with_not_found_view("not_found.phtml"));
//!
//! let res = engine.run(Request::get("/missing"));
//! assert_eq!(res.status, 404);
//!
//! engine.reset();
//! assert!(engine.router().is_none());
//! ```

mod core;
mod fallback;
mod reporter;

pub use core::Engine;
pub use reporter::{ErrorReporter, RecordingReporter, TracingReporter};
