//! In-memory preference store

use std::collections::HashMap;

use parking_lot::Mutex;

use pos_core::error::DomainError;
use pos_core::repositories::PreferenceStore;

/// Process-local store; nothing survives a restart.
#[derive(Default)]
pub struct InMemoryPreferenceStore {
    values: Mutex<HashMap<String, String>>,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.lock().is_empty()
    }
}

impl PreferenceStore for InMemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}
