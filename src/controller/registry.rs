use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use super::definition::{ControllerDefinition, ControllerFactory, DefinitionFactory};

/// Map from fully qualified controller identifier (`app::controllers::rabbits`) to the
/// factory that builds it.
#[derive(Clone, Default)]
pub struct ControllerRegistry {
    factories: HashMap<String, Arc<dyn ControllerFactory>>,
}

impl ControllerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a controller definition under `identifier`.
    ///
    /// **IMPORTANT**: registering an identifier twice replaces the earlier controller.
    pub fn register<C: 'static>(&mut self, identifier: &str, definition: ControllerDefinition<C>) {
        self.register_factory(identifier, Arc::new(DefinitionFactory(Arc::new(definition))));
    }

    /// Builder form of [`ControllerRegistry::register`]
    #[must_use]
    pub fn with<C: 'static>(mut self, identifier: &str, definition: ControllerDefinition<C>) -> Self {
        self.register(identifier, definition);
        self
    }

    /// Register a hand-written factory
    pub fn register_factory(&mut self, identifier: &str, factory: Arc<dyn ControllerFactory>) {
        if self
            .factories
            .insert(identifier.to_string(), factory)
            .is_some()
        {
            warn!(controller = %identifier, "Replaced existing controller registration");
        } else {
            info!(
                controller = %identifier,
                total_controllers = self.factories.len(),
                "Controller registered"
            );
        }
    }

    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<&Arc<dyn ControllerFactory>> {
        self.factories.get(identifier)
    }

    #[must_use]
    pub fn contains(&self, identifier: &str) -> bool {
        self.factories.contains_key(identifier)
    }

    /// Registered identifiers, sorted
    #[must_use]
    pub fn identifiers(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
