// src/integrations/mod.rs
//
// External Integrations Module

pub mod catalog_api;
pub mod remote_source;

pub use catalog_api::{CatalogApiClient, CourseDto};
pub use remote_source::RemoteSource;

#[cfg(test)]
pub use remote_source::MockRemoteSource;
