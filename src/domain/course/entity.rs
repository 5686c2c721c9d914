use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::DomainError;

/// Highest rating a user can give a course
pub const MAX_RATING: f32 = 5.0;

/// Lowest rating a user can give a course
pub const MIN_RATING: f32 = 0.0;

/// A course in the catalog.
///
/// The catalog fields (`title` through `description`) come from the seed
/// data or from the remote catalog. The user fields (`user_comment`,
/// `user_rating`, `is_favorite`) are local only and default on creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Stable identifier, primary key in the local store
    pub id: i64,

    pub title: String,

    /// Platform offering the course
    pub provider: String,

    pub duration_hours: u32,

    pub level: CourseLevel,

    pub image_url: String,

    pub description: String,

    /// Free-text note written by the user
    pub user_comment: String,

    /// Always within [MIN_RATING, MAX_RATING]
    pub user_rating: f32,

    pub is_favorite: bool,
}

/// Difficulty level of a course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CourseLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl Course {
    /// Create a course with catalog fields only.
    /// User fields start empty: no comment, rating 0, not a favorite.
    pub fn new(
        id: i64,
        title: impl Into<String>,
        provider: impl Into<String>,
        duration_hours: u32,
        level: CourseLevel,
        image_url: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            provider: provider.into(),
            duration_hours,
            level,
            image_url: image_url.into(),
            description: description.into(),
            user_comment: String::new(),
            user_rating: MIN_RATING,
            is_favorite: false,
        }
    }

    /// Human-readable duration, e.g. "1 hour", "40 hours"
    pub fn formatted_duration(&self) -> String {
        if self.duration_hours == 1 {
            "1 hour".to_string()
        } else {
            format!("{} hours", self.duration_hours)
        }
    }

    /// Copy the user fields of `other` onto this course.
    /// Used when a resync replaces catalog data for a course the user already annotated.
    pub fn carry_user_fields(&mut self, other: &Course) {
        self.user_comment = other.user_comment.clone();
        self.user_rating = other.user_rating;
        self.is_favorite = other.is_favorite;
    }
}

impl CourseLevel {
    pub const ALL: [CourseLevel; 3] = [
        CourseLevel::Beginner,
        CourseLevel::Intermediate,
        CourseLevel::Advanced,
    ];

    /// Storage and wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseLevel::Beginner => "Beginner",
            CourseLevel::Intermediate => "Intermediate",
            CourseLevel::Advanced => "Advanced",
        }
    }

    /// Label shown next to a course in listings
    pub fn label(&self) -> &'static str {
        match self {
            CourseLevel::Beginner => "Entry level",
            CourseLevel::Intermediate => "Intermediate",
            CourseLevel::Advanced => "Advanced",
        }
    }
}

impl std::fmt::Display for CourseLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CourseLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Beginner" => Ok(CourseLevel::Beginner),
            "Intermediate" => Ok(CourseLevel::Intermediate),
            "Advanced" => Ok(CourseLevel::Advanced),
            other => Err(DomainError::InvariantViolation(format!(
                "Unknown course level: {:?}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Course {
        Course::new(
            7,
            "Material Design in Android Apps",
            "Material.io",
            12,
            CourseLevel::Beginner,
            "https://example.com/7.jpg",
            "Components and theming",
        )
    }

    #[test]
    fn test_new_course_has_default_user_fields() {
        let course = sample();
        assert_eq!(course.user_comment, "");
        assert_eq!(course.user_rating, 0.0);
        assert!(!course.is_favorite);
    }

    #[test]
    fn test_formatted_duration() {
        let mut course = sample();
        assert_eq!(course.formatted_duration(), "12 hours");
        course.duration_hours = 1;
        assert_eq!(course.formatted_duration(), "1 hour");
        course.duration_hours = 0;
        assert_eq!(course.formatted_duration(), "0 hours");
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!("Advanced".parse::<CourseLevel>().unwrap(), CourseLevel::Advanced);
        assert_eq!(" Beginner ".parse::<CourseLevel>().unwrap(), CourseLevel::Beginner);
        assert!("Expert".parse::<CourseLevel>().is_err());
        for level in CourseLevel::ALL {
            assert_eq!(level.as_str().parse::<CourseLevel>().unwrap(), level);
        }
    }

    #[test]
    fn test_carry_user_fields() {
        let mut annotated = sample();
        annotated.user_comment = "great".to_string();
        annotated.user_rating = 4.5;
        annotated.is_favorite = true;

        let mut fresh = sample();
        fresh.title = "Material Design 3".to_string();
        fresh.carry_user_fields(&annotated);

        assert_eq!(fresh.title, "Material Design 3");
        assert_eq!(fresh.user_comment, "great");
        assert_eq!(fresh.user_rating, 4.5);
        assert!(fresh.is_favorite);
    }
}
