// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod catalog_sync;
pub mod course_service;

pub use catalog_sync::CatalogSync;
pub use course_service::CourseService;
