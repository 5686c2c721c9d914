// src/lib.rs
// CourseHub - Local-first course catalog
//
// Architecture:
// - Domain-centric: entities, selection and the three-state result live in `domain`
// - Event-driven: every committed write emits one event; live queries re-read on events
// - Explicit: the composition root builds everything, no globals
// - Local-first: the SQLite store is the source of truth, the remote catalog only resyncs it
// - Application Layer: one published state stream per screen

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod infrastructure;
pub mod repositories;
pub mod services;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod application;
pub mod integrations;

#[cfg(test)]
mod test_support;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{
    clamp_rating, Course, CourseLevel, CourseQuery, DomainError, ResultState, Selection, Status,
};

// ============================================================================
// PUBLIC API - Errors & Config
// ============================================================================

pub use config::{AppConfig, RemoteConfig};
pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Events & Store
// ============================================================================

pub use db::{create_connection_pool, initialize_database, ConnectionPool};
pub use events::{DomainEvent, EventBus, EventLogEntry};
pub use infrastructure::{LiveCourseStore, Subscription};
pub use repositories::{CourseRepository, SqliteCourseRepository};

// ============================================================================
// PUBLIC API - Services & Integrations
// ============================================================================

pub use integrations::{CatalogApiClient, RemoteSource};
pub use services::{CatalogSync, CourseService};

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use application::{AppState, CourseDetailModel, CourseListModel, FavoritesModel, StateStream};
