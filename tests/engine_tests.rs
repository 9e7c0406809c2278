//! End-to-end tests for `Engine::run`
//!
//! Every scenario goes through the real router, registry and dispatcher with a
//! `RecordingReporter` in place of tracing so reports can be counted.

mod common;

use http::Method;
use std::sync::Arc;
use warren::controller::ControllerRegistry;
use warren::engine::{Engine, ErrorReporter, RecordingReporter};
use warren::router::{ParamVec, RouteMatch, RouteNotFound, Router};
use warren::web::{Output, Request, ViewPointer};
use warren::EngineOptions;

use common::{engine, RABBIT_NAMES};

fn views() -> EngineOptions {
    EngineOptions::default()
        .with_not_found_view("not_found.phtml")
        .with_internal_server_error_view("internal_server_error.phtml")
}

fn pointer(res: &warren::Response) -> Option<&str> {
    res.view_pointer().map(ViewPointer::as_str)
}

#[test]
fn test_rabbits_items_lists_every_rabbit() {
    let (engine, reporter) = engine(EngineOptions::default());
    let res = engine.run(Request::get("/rabbits"));

    assert_eq!(res.status, 200);
    let body = res.body_text().unwrap();
    for name in RABBIT_NAMES {
        assert!(body.contains(name), "missing {name} in {body}");
    }
    assert_eq!(reporter.count(), 0);
}

#[test]
fn test_route_parameter_reaches_action() {
    let (engine, _reporter) = engine(EngineOptions::default());
    let res = engine.run(Request::get("/rabbits/42"));

    assert_eq!(res.status, 200);
    match &res.output {
        Output::Json(body) => assert_eq!(body["id"], "42"),
        other => panic!("expected json output, got {other:?}"),
    }
}

#[test]
fn test_unmatched_path_uses_not_found_view() {
    let (engine, reporter) = engine(EngineOptions::default().with_not_found_view("not_found.phtml"));
    let res = engine.run(Request::get("/not-found"));

    assert_eq!(res.status, 404);
    assert_eq!(pointer(&res), Some("not_found.phtml"));
    let context = res.view_context().unwrap();
    assert_eq!(context["error"]["kind"], "route_not_found");
    assert_eq!(context["error"]["message"], "No route found for GET /not-found");
    assert_eq!(reporter.count(), 0, "route misses are never reported");
}

#[test]
fn test_unmatched_path_without_view_is_plain_text() {
    let (engine, _reporter) = engine(EngineOptions::default());
    let res = engine.run(Request::post("/rabbits"));

    assert_eq!(res.status, 404);
    assert_eq!(
        res.body_text().as_deref(),
        Some("No route found for POST /rabbits")
    );
}

#[test]
fn test_missing_controller_uses_error_view() {
    let (engine, reporter) = engine(views());
    let res = engine.run(Request::get("/missing"));

    assert_eq!(res.status, 500);
    assert_eq!(pointer(&res), Some("internal_server_error.phtml"));
    let context = res.view_context().unwrap();
    assert_eq!(context["error"]["kind"], "controller_error");
    assert!(context["error"]["message"]
        .as_str()
        .unwrap()
        .contains("app::controllers::missing"));
    assert_eq!(reporter.count(), 1);
}

#[test]
fn test_missing_action_uses_error_view() {
    let (engine, reporter) = engine(views());
    let res = engine.run(Request::get("/no-action"));

    assert_eq!(res.status, 500);
    assert_eq!(pointer(&res), Some("internal_server_error.phtml"));
    assert_eq!(res.view_context().unwrap()["error"]["kind"], "action_error");
    assert_eq!(reporter.count(), 1);
}

#[test]
fn test_malformed_route_pointer_is_controller_error() {
    let (engine, reporter) = engine(EngineOptions::default());
    let res = engine.run(Request::get("/broken-pointer"));

    assert_eq!(res.status, 500);
    assert!(res.body_text().unwrap().contains("malformed route pointer"));
    assert_eq!(reporter.count(), 1);
}

#[test]
fn test_unhandled_application_error_is_reported_once() {
    let (engine, reporter) = engine(EngineOptions::default());
    let res = engine.run(Request::get("/rabbits/explode"));

    assert_eq!(res.status, 500);
    let body = res.body_text().unwrap();
    assert!(body.contains("RuntimeError: the burrow caved in"), "{body}");

    let messages = reporter.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("app::controllers::rabbits#explode"));
}

#[test]
fn test_error_handler_response_is_returned_verbatim() {
    let (engine, reporter) = engine(views());
    let res = engine.run(Request::get("/rabbits/0"));

    assert_eq!(res.status, 404);
    assert_eq!(res.body_text().as_deref(), Some("recovered: no rabbit 0"));
    assert!(res.view_pointer().is_none());
    assert_eq!(reporter.count(), 0);
}

#[test]
fn test_error_outside_handler_class_is_500() {
    // "abc" fails to parse: InvalidArgument is not a NotFound, so no handler applies
    let (engine, reporter) = engine(EngineOptions::default());
    let res = engine.run(Request::get("/rabbits/abc"));

    assert_eq!(res.status, 500);
    let body = res.body_text().unwrap();
    assert!(body.contains("InvalidArgument: bad id 'abc'"), "{body}");
    assert!(body.contains("caused by: invalid digit"), "{body}");
    assert_eq!(reporter.count(), 1);
}

#[test]
fn test_empty_action_output_is_action_error() {
    let (engine, reporter) = engine(views());
    let res = engine.run(Request::get("/rabbits/silent"));

    assert_eq!(res.status, 500);
    let context = res.view_context().unwrap();
    assert_eq!(context["error"]["kind"], "action_error");
    assert!(context["error"]["message"]
        .as_str()
        .unwrap()
        .contains("does not return a usable response"));
    assert_eq!(reporter.count(), 1);
}

#[test]
fn test_stream_output_is_success() {
    let (engine, reporter) = engine(EngineOptions::default());
    let res = engine.run(Request::get("/rabbits/feed"));

    assert_eq!(res.status, 200);
    let Output::Stream(chunks) = res.output else {
        panic!("expected a stream");
    };
    let fed: Vec<String> = chunks.collect();
    assert_eq!(fed.len(), RABBIT_NAMES.len());
    assert_eq!(fed[0], "Flopsy is fed\n");
    assert_eq!(reporter.count(), 0);
}

#[test]
fn test_panicking_action_becomes_500() {
    let (engine, reporter) = engine(views());
    let res = engine.run(Request::get("/rabbits/panic"));

    assert_eq!(res.status, 500);
    assert_eq!(res.view_context().unwrap()["error"]["kind"], "panic");
    let messages = reporter.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("rabbit hole too deep"));
}

#[test]
fn test_nested_controller_path_resolves_namespace() {
    let (engine, _reporter) = engine(EngineOptions::default());
    let res = engine.run(Request::get("/admin/rabbits"));
    assert_eq!(res.status, 200);
}

#[test]
fn test_custom_namespace_changes_resolution() {
    let (engine, reporter) =
        engine(EngineOptions::default().with_controller_namespace("elsewhere"));
    let res = engine.run(Request::get("/rabbits"));

    assert_eq!(res.status, 500);
    assert!(res.body_text().unwrap().contains("elsewhere::rabbits"));
    assert_eq!(reporter.count(), 1);
}

#[test]
fn test_run_before_init_is_500() {
    let reporter = RecordingReporter::new();
    let engine = Engine::new(ControllerRegistry::new()).with_reporter(Arc::new(reporter.clone()));
    let res = engine.run(Request::get("/rabbits"));

    assert_eq!(res.status, 500);
    assert!(res.body_text().unwrap().contains("not initialized"));
    assert_eq!(reporter.count(), 1);
}

#[test]
fn test_reset_restores_defaults() {
    let (mut engine, _reporter) = engine(views().with_start_session(true).with_app_name("burrow"));
    assert!(engine.router().is_some());
    assert_ne!(engine.options(), &EngineOptions::default());

    engine.reset();
    assert!(engine.router().is_none());
    assert!(!engine.is_initialized());
    assert_eq!(engine.options(), &EngineOptions::default());

    let res = engine.run(Request::get("/rabbits"));
    assert_eq!(res.status, 500);
}

#[test]
fn test_sequential_scenarios_do_not_leak_views() {
    let (mut engine, _reporter) = engine(views());
    assert_eq!(pointer(&engine.run(Request::get("/nope"))), Some("not_found.phtml"));

    engine.reset();
    engine.init(common::router(), EngineOptions::default());
    let res = engine.run(Request::get("/nope"));
    assert_eq!(res.status, 404);
    assert!(res.view_pointer().is_none());
}

#[test]
fn test_session_attached_when_enabled() {
    let controllers = ControllerRegistry::new().with(
        "app::controllers::rabbits",
        warren::ControllerDefinition::<()>::with_default().action("items", |_, req| {
            let has_session = req.session.is_some();
            Ok(warren::Response::text(200, has_session.to_string()).into())
        }),
    );

    let mut engine = Engine::new(controllers);
    engine.init(common::router(), EngineOptions::default().with_start_session(true));
    let res = engine.run(Request::get("/rabbits"));
    assert_eq!(res.body_text().as_deref(), Some("true"));

    engine.init(common::router(), EngineOptions::default());
    let res = engine.run(Request::get("/rabbits"));
    assert_eq!(res.body_text().as_deref(), Some("false"));
}

#[test]
fn test_engine_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Engine>();

    let (engine, reporter) = engine(EngineOptions::default());
    std::thread::scope(|scope| {
        for id in 1..=4 {
            let engine = &engine;
            scope.spawn(move || {
                let res = engine.run(Request::get(&format!("/rabbits/{id}")));
                assert_eq!(res.status, 200);
            });
        }
    });
    assert_eq!(reporter.count(), 0);
}

struct PanickingReporter;

impl ErrorReporter for PanickingReporter {
    fn error(&self, _message: &str) {
        panic!("reporter is down");
    }
}

#[test]
fn test_panicking_reporter_still_yields_500() {
    let mut engine =
        Engine::new(common::controllers()).with_reporter(Arc::new(PanickingReporter));
    engine.init(common::router(), views());

    let res = engine.run(Request::get("/rabbits/explode"));
    assert_eq!(res.status, 500);
    assert_eq!(pointer(&res), Some("internal_server_error.phtml"));

    let res = engine.run(Request::get("/rabbits"));
    assert_eq!(res.status, 200);
}

/// Sends every GET to `rabbits#show` with the last path segment as `id`
struct LastSegmentRouter;

impl Router for LastSegmentRouter {
    fn match_route(&self, method: &Method, path: &str) -> Result<RouteMatch, RouteNotFound> {
        match path.rsplit('/').next() {
            Some(id) if *method == Method::GET && !id.is_empty() => {
                let mut params = ParamVec::new();
                params.push((Arc::from("id"), id.to_string()));
                Ok(RouteMatch::new("rabbits#show", params))
            }
            _ => Err(RouteNotFound::new(method, path)),
        }
    }
}

#[test]
fn test_custom_router_plugs_into_engine() {
    let mut engine = Engine::new(common::controllers());
    assert_eq!(engine.controllers().len(), 2);
    assert!(engine.controllers().contains("app::controllers::admin::rabbits"));

    engine.init(LastSegmentRouter, EngineOptions::default());
    let res = engine.run(Request::get("/burrow/deep/7"));
    assert_eq!(res.status, 200);
    match &res.output {
        Output::Json(body) => assert_eq!(body["id"], "7"),
        other => panic!("expected json output, got {other:?}"),
    }

    assert_eq!(engine.run(Request::post("/burrow/7")).status, 404);
}
