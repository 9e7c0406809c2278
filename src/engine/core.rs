use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, info, info_span, warn};

use super::fallback::fallback_response;
use super::reporter::{ErrorReporter, TracingReporter};
use crate::config::EngineOptions;
use crate::controller::ControllerRegistry;
use crate::dispatcher::{DispatchError, Dispatcher};
use crate::web::{Request, Response, Session};
use crate::router::Router;

/// Top-level entry point: router, options, controllers and error reporting in one place.
///
/// [`Engine::run`] always returns a response. Configuration changes go through
/// `&mut self`, so they cannot overlap with requests borrowing the engine.
pub struct Engine {
    router: Option<Arc<dyn Router>>,
    options: EngineOptions,
    dispatcher: Dispatcher,
    reporter: Arc<dyn ErrorReporter>,
}

impl Engine {
    /// An engine with no router yet; [`Engine::init`] must be called before serving.
    #[must_use]
    pub fn new(controllers: ControllerRegistry) -> Self {
        Self {
            router: None,
            options: EngineOptions::default(),
            dispatcher: Dispatcher::new(controllers),
            reporter: Arc::new(TracingReporter),
        }
    }

    /// Replace the default [`TracingReporter`]
    #[must_use]
    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn init<R: Router + 'static>(&mut self, router: R, options: EngineOptions) {
        self.init_shared(Arc::new(router), options);
    }

    /// [`Engine::init`] with a router that is shared elsewhere
    pub fn init_shared(&mut self, router: Arc<dyn Router>, options: EngineOptions) {
        info!(
            app_name = %options.app_name,
            controller_namespace = %options.controller_namespace(),
            start_session = options.start_session,
            not_found_view = ?options.not_found_view,
            internal_server_error_view = ?options.internal_server_error_view,
            controllers = self.dispatcher.controllers().len(),
            "Engine initialized"
        );
        self.router = Some(router);
        self.options = options;
    }

    /// Drop the router and restore default options.
    pub fn reset(&mut self) {
        debug!("Engine reset");
        self.router = None;
        self.options = EngineOptions::default();
    }

    #[must_use]
    pub fn router(&self) -> Option<&Arc<dyn Router>> {
        self.router.as_ref()
    }

    #[must_use]
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.router.is_some()
    }

    #[must_use]
    pub fn controllers(&self) -> &ControllerRegistry {
        self.dispatcher.controllers()
    }

    /// Handle one request to completion.
    ///
    /// Route misses become 404 responses. Every other failure, panics included, is
    /// reported once through the [`ErrorReporter`] and becomes a 500 response. A panicking
    /// reporter does not change the response.
    #[must_use]
    pub fn run(&self, mut request: Request) -> Response {
        let span = info_span!(
            "request",
            request_id = %request.request_id,
            method = %request.method,
            path = %request.path
        );
        let _entered = span.enter();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.dispatch(&mut request)));
        let error = match outcome {
            Ok(Ok(response)) => {
                info!(status = response.status, "Request complete");
                return response;
            }
            Ok(Err(error)) => error,
            Err(payload) => DispatchError::Panicked {
                message: panic_message(&*payload),
            },
        };

        if let DispatchError::RouteNotFound(_) = error {
            info!(status = 404, "No route, answering with not-found fallback");
            return fallback_response(404, self.options.not_found_view.as_ref(), &error);
        }

        let report = error.report();
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| self.reporter.error(&report))) {
            warn!(
                panic = %panic_message(&*payload),
                "Error reporter panicked, report dropped"
            );
        }
        warn!(
            status = 500,
            kind = error.kind(),
            "Dispatch failed, answering with internal-server-error fallback"
        );
        fallback_response(
            500,
            self.options.internal_server_error_view.as_ref(),
            &error,
        )
    }

    fn dispatch(&self, request: &mut Request) -> Result<Response, DispatchError> {
        let router = self.router.as_ref().ok_or(DispatchError::NotInitialized)?;
        let route = router.match_route(&request.method, &request.path)?;

        for (name, value) in route.params {
            request.set_param(name, value);
        }

        if self.options.start_session && request.session.is_none() {
            let session = Session::new();
            debug!(session_id = %session.id, "Session started");
            request.session = Some(session);
        }

        let namespace = self.options.controller_namespace();
        self.dispatcher
            .execute_route_pointer(&route.route_pointer, request, &namespace)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
