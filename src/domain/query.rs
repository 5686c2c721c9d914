use serde::{Deserialize, Serialize};

use super::course::CourseLevel;

/// The list query shapes the local store answers.
/// Every list is ordered by title ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourseQuery {
    All,
    Favorites,
    /// Title contains the text, case-insensitive
    TitleContains(String),
    ByLevel(CourseLevel),
}

impl std::fmt::Display for CourseQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CourseQuery::All => write!(f, "all"),
            CourseQuery::Favorites => write!(f, "favorites"),
            CourseQuery::TitleContains(text) => write!(f, "title contains {:?}", text),
            CourseQuery::ByLevel(level) => write!(f, "level = {}", level),
        }
    }
}
