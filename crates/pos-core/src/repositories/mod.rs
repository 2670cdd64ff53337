//! Repository traits (ports)

pub mod permission_api;
pub mod identity_api;
pub mod preference_store;

pub use permission_api::PermissionApi;
pub use identity_api::IdentityApi;
pub use preference_store::PreferenceStore;

#[cfg(test)]
pub use permission_api::MockPermissionApi;
#[cfg(test)]
pub use identity_api::MockIdentityApi;
