//! # warren
//!
//! **warren** is a small controller/action dispatch engine. It takes a request, resolves
//! it through a router to a route pointer such as `"rabbits#items"`, builds the
//! controller, runs the action and hands back a response. It always hands back a
//! response: route misses, unknown controllers, undeclared actions, application errors
//! and panics all become well-formed 404/500 responses instead of escaping to the host.
//!
//! ## Architecture
//!
//! - **[`router`]** - the [`Router`](router::Router) collaborator trait and a small
//!   regex-backed [`PatternRouter`](router::PatternRouter)
//! - **[`web`]** - request/response value objects
//! - **[`controller`]** - controller definitions, the controller registry, error classes
//!   and declared error handlers
//! - **[`dispatcher`]** - route pointer resolution and the error-handler protocol
//! - **[`engine`]** - the coordinator: `init` / `reset` / `run` and fallback responses
//! - **[`config`]** - [`EngineOptions`](config::EngineOptions), YAML and environment loading
//! - **[`logging`]** - `tracing` subscriber setup
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Host
//!     participant Engine
//!     participant Router
//!     participant Dispatcher
//!     participant Controller
//!
//!     Host->>Engine: run(request)
//!     Engine->>Router: match_route(GET, /rabbits/42)
//!     alt No Route Match
//!         Engine-->>Host: 404 (not_found_view or text)
//!     end
//!     Router-->>Engine: rabbits#show, {id: 42}
//!     Engine->>Dispatcher: execute_route_pointer(rabbits#show)
//!     Dispatcher->>Controller: instantiate app::controllers::rabbits
//!     Dispatcher->>Controller: show(request)
//!     alt Application error
//!         Dispatcher->>Controller: matching error handlers, in order
//!     end
//!     Controller-->>Dispatcher: Response
//!     Dispatcher-->>Engine: Response | DispatchError
//!     alt DispatchError
//!         Engine->>Engine: report once, 500 (internal_server_error_view or text)
//!     end
//!     Engine-->>Host: Response
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use http::Method;
//! use warren::config::EngineOptions;
//! use warren::controller::{ControllerDefinition, ControllerRegistry};
//! use warren::engine::Engine;
//! use warren::web::{Request, Response};
//! use warren::router::PatternRouter;
//!
//! #[derive(Default)]
//! struct Rabbits;
//!
//! let controllers = ControllerRegistry::new().with(
//!     "app::controllers::rabbits",
//!     ControllerDefinition::<Rabbits>::with_default().action("show", |_, req| {
//!         let id = req.param("id").unwrap_or_default().to_string();
//!         Ok(Response::text(200, format!("rabbit {id}")).into())
//!     }),
//! );
//!
//! let router = PatternRouter::from_table([(Method::GET, "/rabbits/:id", "rabbits#show")]).unwrap();
//! let mut engine = Engine::new(controllers);
//! engine.init(router, EngineOptions::default());
//!
//! let res = engine.run(Request::get("/rabbits/42"));
//! assert_eq!(res.status, 200);
//! assert_eq!(res.body_text().as_deref(), Some("rabbit 42"));
//! ```

pub mod config;
pub mod controller;
pub mod dispatcher;
pub mod engine;
pub mod web;
pub mod ids;
pub mod logging;
pub mod router;

pub use config::EngineOptions;
pub use controller::{
    ActionOutput, ActionResult, ApplicationError, ControllerDefinition, ControllerRegistry,
    ErrorClass,
};
pub use dispatcher::{DispatchError, Dispatcher, RoutePointer};
pub use engine::{Engine, ErrorReporter};
pub use web::{Output, Request, Response, ViewPointer};
pub use router::{PatternRouter, RouteMatch, RouteNotFound, Router};
