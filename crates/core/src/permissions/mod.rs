//! URL permissions: hostnames the tracker may be injected into

pub mod service;

pub use service::PermissionRegistry;
