//! # POS Core
//! 
//! Navigation, breadcrumb and role/permission logic for the POS client,
//! plus the ports the infrastructure adapters implement.

pub mod domain;
pub mod services;
pub mod repositories;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use error::DomainError;
