use super::entity::{Course, MAX_RATING, MIN_RATING};
use crate::domain::{DomainError, DomainResult};

/// Validates all Course invariants before a row is written
pub fn validate_course(course: &Course) -> DomainResult<()> {
    validate_title(&course.title)?;
    validate_rating(course.user_rating)?;
    Ok(())
}

/// Clamp a user rating into [0, 5].
///
/// Out-of-range input is not an error. NaN becomes 0.
pub fn clamp_rating(rating: f32) -> f32 {
    if rating.is_nan() {
        return MIN_RATING;
    }
    rating.clamp(MIN_RATING, MAX_RATING)
}

/// Normalise an optional review comment. Absent becomes empty.
pub fn normalize_comment(comment: Option<String>) -> String {
    comment.unwrap_or_default()
}

fn validate_title(title: &str) -> DomainResult<()> {
    if title.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Course title cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_rating(rating: f32) -> DomainResult<()> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(DomainError::RatingOutOfRange(rating));
    }
    Ok(())
}

/// Invariants that must hold true for the Course domain:
///
/// 1. Identity (id) is immutable
/// 2. Title cannot be empty
/// 3. Rating is stored within [0, 5]; clamping happens before the write
/// 4. Comment is never absent, only empty
/// 5. Courses are never deleted one by one, only replaced on resync
