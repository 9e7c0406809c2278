#![allow(dead_code)]

use http::Method;
use std::sync::Arc;
use warren::controller::{
    ActionOutput, ApplicationError, ControllerDefinition, ControllerRegistry, ErrorClass,
    NOT_FOUND, RUNTIME_ERROR,
};
use warren::engine::{Engine, RecordingReporter};
use warren::router::PatternRouter;
use warren::web::{Request, Response};
use warren::{ActionResult, EngineOptions};

pub const RABBIT_NAMES: [&str; 4] = ["Flopsy", "Mopsy", "Cotton-tail", "Peter"];

pub static HUTCH_LOCKED: ErrorClass = ErrorClass::extends("HutchLocked", &RUNTIME_ERROR);

pub struct RabbitsController {
    names: Vec<&'static str>,
}

impl Default for RabbitsController {
    fn default() -> Self {
        Self {
            names: RABBIT_NAMES.to_vec(),
        }
    }
}

impl RabbitsController {
    fn items(&mut self, _req: &mut Request) -> ActionResult {
        Ok(Response::text(200, self.names.join(", ")).into())
    }

    /// Id 0 is the rabbit nobody can find
    fn show(&mut self, req: &mut Request) -> ActionResult {
        let id = req.param("id").unwrap_or_default().to_string();
        let number: u32 = id.parse().map_err(|err| {
            ApplicationError::invalid_argument(format!("bad id '{id}'")).with_source(err)
        })?;
        if number == 0 {
            return Err(ApplicationError::new(&NOT_FOUND, format!("no rabbit {id}")));
        }
        Ok(Response::json(200, serde_json::json!({ "id": id })).into())
    }

    fn feed(&mut self, _req: &mut Request) -> ActionResult {
        let chunks = self
            .names
            .clone()
            .into_iter()
            .map(|name| format!("{name} is fed\n"));
        Ok(ActionOutput::Stream(Box::new(chunks)))
    }
}

pub fn rabbit_definition() -> ControllerDefinition<RabbitsController> {
    ControllerDefinition::with_default()
        .action("items", RabbitsController::items)
        .action("show", RabbitsController::show)
        .action("feed", RabbitsController::feed)
        .action("silent", |_, _| Ok(().into()))
        .action("hutch", |_, _| {
            Err(ApplicationError::new(&HUTCH_LOCKED, "hutch is locked"))
        })
        .action("explode", |_, _| {
            Err(ApplicationError::runtime("the burrow caved in"))
        })
        .action("panic", |_, _| panic!("rabbit hole too deep"))
        .error_handler("missing_rabbit", &NOT_FOUND, &["show"], |_, _, err| {
            Ok(Some(Response::text(
                404,
                format!("recovered: {}", err.message()),
            )))
        })
}

pub fn controllers() -> ControllerRegistry {
    ControllerRegistry::new()
        .with("app::controllers::rabbits", rabbit_definition())
        .with("app::controllers::admin::rabbits", rabbit_definition())
}

pub fn router() -> PatternRouter {
    PatternRouter::from_table([
        (Method::GET, "/rabbits", "rabbits#items"),
        (Method::GET, "/rabbits/feed", "rabbits#feed"),
        (Method::GET, "/rabbits/silent", "rabbits#silent"),
        (Method::GET, "/rabbits/hutch", "rabbits#hutch"),
        (Method::GET, "/rabbits/explode", "rabbits#explode"),
        (Method::GET, "/rabbits/panic", "rabbits#panic"),
        (Method::GET, "/rabbits/:id", "rabbits#show"),
        (Method::GET, "/admin/rabbits", "admin/rabbits#items"),
        (Method::GET, "/missing", "missing#items"),
        (Method::GET, "/no-action", "rabbits#jump"),
        (Method::GET, "/broken-pointer", "rabbits"),
    ])
    .expect("routes compile")
}

/// Engine initialised with the rabbit routes and a recording reporter
pub fn engine(options: EngineOptions) -> (Engine, RecordingReporter) {
    let reporter = RecordingReporter::new();
    let mut engine = Engine::new(controllers()).with_reporter(Arc::new(reporter.clone()));
    engine.init(router(), options);
    (engine, reporter)
}
