// src/infrastructure/mod.rs
//
// Infrastructure Layer
//
// Contains implementation details that support the domain
// but are not part of the domain itself.

pub mod live_queries;

pub use live_queries::{LiveCourseStore, Subscription};
