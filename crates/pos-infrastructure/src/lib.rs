//! # POS Infrastructure
//! 
//! Remote API and local storage implementations (adapters).

pub mod api;
pub mod storage;

pub use api::HttpPosApi;
pub use storage::{InMemoryPreferenceStore, JsonFilePreferenceStore};
