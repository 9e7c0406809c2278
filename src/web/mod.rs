//! # Request and response value objects
//!
//! The engine consumes requests and produces responses as plain data. Nothing in this
//! module touches a socket: a host adapter (hyper, may_minihttp, a CGI shim, a test) builds
//! a [`Request`], hands it to [`Engine::run`](crate::engine::Engine::run) and writes the
//! returned [`Response`] however it likes.
//!
//! - [`Request`] carries the method, path, parameter bag, query, headers, JSON body and an
//!   optional [`Session`].
//! - [`Response`] carries a status code, headers and an [`Output`]: plain text, JSON, a
//!   view pointer with its context, or a lazy [`OutputStream`] the host drains.

mod request;
mod response;
mod session;

pub use request::{parse_query_params, HeaderVec, Request, MAX_INLINE_HEADERS};
pub use response::{status_reason, Output, OutputStream, Response, ViewPointer};
pub use session::Session;
