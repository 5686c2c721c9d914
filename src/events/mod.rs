// src/events/mod.rs
//
// Internal event system - public API

pub mod bus;
pub mod types;

pub use types::{
    CatalogCleared, CatalogReplaced, CourseFavoriteToggled, CourseReviewSaved, CourseUpserted,
    CoursesImported, DomainEvent,
};

pub use bus::{EventBus, EventLogEntry};
