// src/domain/mod.rs
//
// Domain Root - the single source of truth for the domain API.
// All other modules import from `crate::domain::*`

pub mod course;
pub mod query;
pub mod result_state;
pub mod selection;

pub use course::{
    clamp_rating, normalize_comment, validate_course, Course, CourseLevel, MAX_RATING, MIN_RATING,
};
pub use query::CourseQuery;
pub use result_state::{ResultState, Status};
pub use selection::Selection;

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Rating {0} outside of [0, 5]")]
    RatingOutOfRange(f32),

    #[error("Entity not found: {0}")]
    NotFound(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
