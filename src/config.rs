//! # Engine configuration
//!
//! [`EngineOptions`] is set once through [`Engine::init`](crate::engine::Engine::init) and
//! read by every request until [`Engine::reset`](crate::engine::Engine::reset) restores
//! the defaults.
//!
//! Options can be written in code, loaded from YAML, and overlaid with environment
//! variables:
//!
//! ```yaml
//! app_name: burrow
//! start_session: true
//! controller_namespace: burrow::web
//! not_found_view: errors/not_found.phtml
//! internal_server_error_view: errors/internal.phtml
//! ```
//!
//! ## Environment Variables
//!
//! - `WARREN_APP_NAME`
//! - `WARREN_CONTROLLER_NAMESPACE`
//! - `WARREN_START_SESSION` (`true`/`false`/`1`/`0`)
//! - `WARREN_NOT_FOUND_VIEW`
//! - `WARREN_INTERNAL_ERROR_VIEW`
//!
//! An empty variable clears the corresponding optional setting.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::env;
use std::path::Path;

use crate::dispatcher::NAMESPACE_SEPARATOR;
use crate::web::ViewPointer;

/// Engine-wide options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineOptions {
    /// Application name; the default controller namespace is `<app_name>::controllers`
    pub app_name: String,
    /// Attach a session to every request that arrives without one
    pub start_session: bool,
    /// Namespace prefixed to every controller path; overrides the default
    pub controller_namespace: Option<String>,
    /// View rendered for 404 responses instead of plain text
    #[serde(alias = "not_found_view_pointer")]
    pub not_found_view: Option<ViewPointer>,
    /// View rendered for 500 responses instead of plain text
    #[serde(alias = "internal_server_error_view_pointer")]
    pub internal_server_error_view: Option<ViewPointer>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            app_name: "app".to_string(),
            start_session: false,
            controller_namespace: None,
            not_found_view: None,
            internal_server_error_view: None,
        }
    }
}

impl EngineOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }

    #[must_use]
    pub fn with_start_session(mut self, start_session: bool) -> Self {
        self.start_session = start_session;
        self
    }

    #[must_use]
    pub fn with_controller_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.controller_namespace = Some(namespace.into());
        self
    }

    #[must_use]
    pub fn with_not_found_view(mut self, view: impl Into<ViewPointer>) -> Self {
        self.not_found_view = Some(view.into());
        self
    }

    #[must_use]
    pub fn with_internal_server_error_view(mut self, view: impl Into<ViewPointer>) -> Self {
        self.internal_server_error_view = Some(view.into());
        self
    }

    /// Namespace controller paths resolve under
    #[must_use]
    pub fn controller_namespace(&self) -> Cow<'_, str> {
        match &self.controller_namespace {
            Some(namespace) => Cow::Borrowed(namespace.as_str()),
            None => Cow::Owned(format!("{}{NAMESPACE_SEPARATOR}controllers", self.app_name)),
        }
    }

    /// Parse options from YAML. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Invalid YAML or unknown keys.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).context("Failed to parse engine options")
    }

    /// Load options from a YAML file.
    ///
    /// # Errors
    ///
    /// The file cannot be read or does not parse.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read engine options from {}", path.display()))?;
        Self::from_yaml_str(&content).with_context(|| format!("Invalid options file {}", path.display()))
    }

    /// Defaults overlaid with `WARREN_*` environment variables.
    ///
    /// # Errors
    ///
    /// A variable holds an unparseable value.
    pub fn from_env() -> Result<Self> {
        Self::default().apply_env_overrides()
    }

    /// Overlay `WARREN_*` environment variables onto these options.
    ///
    /// # Errors
    ///
    /// A variable holds an unparseable value.
    pub fn apply_env_overrides(self) -> Result<Self> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    pub(crate) fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        fn optional(value: String) -> Option<String> {
            let value = value.trim().to_string();
            (!value.is_empty()).then_some(value)
        }

        if let Some(app_name) = lookup("WARREN_APP_NAME").and_then(optional) {
            self.app_name = app_name;
        }
        if let Some(namespace) = lookup("WARREN_CONTROLLER_NAMESPACE") {
            self.controller_namespace = optional(namespace);
        }
        if let Some(flag) = lookup("WARREN_START_SESSION") {
            self.start_session = match flag.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                other => bail!("WARREN_START_SESSION must be a boolean, got '{other}'"),
            };
        }
        if let Some(view) = lookup("WARREN_NOT_FOUND_VIEW") {
            self.not_found_view = optional(view).map(ViewPointer::from);
        }
        if let Some(view) = lookup("WARREN_INTERNAL_ERROR_VIEW") {
            self.internal_server_error_view = optional(view).map(ViewPointer::from);
        }
        Ok(self)
    }
}
