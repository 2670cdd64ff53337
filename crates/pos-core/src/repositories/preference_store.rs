//! Local key/value persistence (port)

use crate::error::DomainError;

/// String key/value storage for client preferences.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, DomainError>;
    fn set(&self, key: &str, value: &str) -> Result<(), DomainError>;
}
