//! Preference storage adapters

pub mod memory;
pub mod json_file;

pub use memory::InMemoryPreferenceStore;
pub use json_file::JsonFilePreferenceStore;
