pub mod entity;
pub mod invariants;

pub use entity::{Course, CourseLevel, MAX_RATING, MIN_RATING};
pub use invariants::{clamp_rating, normalize_comment, validate_course};
