use serde_json::Map;

use crate::dispatcher::DispatchError;
use crate::web::{Response, ViewPointer};

/// Build the 404/500 response for `error`.
///
/// With a view configured the error goes into the view context under `error`; without
/// one the full error report becomes the plain-text body.
pub(crate) fn fallback_response(
    status: u16,
    view: Option<&ViewPointer>,
    error: &DispatchError,
) -> Response {
    match view {
        Some(pointer) => {
            let mut context = Map::new();
            context.insert("error".to_string(), error.to_context());
            Response::view(status, pointer.clone(), context)
        }
        None => Response::text(status, error.report()),
    }
}
