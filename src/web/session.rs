use crate::ids::SessionId;
use serde_json::Value;
use std::collections::HashMap;

/// In-memory session data attached to a request.
///
/// Cookie handling and persistence belong to the host; the engine only guarantees a
/// session exists on every request when `start_session` is enabled.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub id: SessionId,
    values: HashMap<String, Value>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.values.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
