use serde::{Deserialize, Serialize};

use super::course::CourseLevel;
use super::query::CourseQuery;

/// Active search text and level filter of the listing screen.
///
/// At most one of them is active: setting one clears the other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    search_text: String,
    level_filter: Option<CourseLevel>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the trimmed text and clears the level filter.
    /// Blank text means no search.
    pub fn set_search(&mut self, text: &str) {
        self.search_text = text.trim().to_string();
        self.level_filter = None;
    }

    pub fn set_level_filter(&mut self, level: Option<CourseLevel>) {
        self.level_filter = level;
        self.search_text.clear();
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn level_filter(&self) -> Option<CourseLevel> {
        self.level_filter
    }

    /// Store query that matches this selection
    pub fn query(&self) -> CourseQuery {
        if !self.search_text.is_empty() {
            CourseQuery::TitleContains(self.search_text.clone())
        } else if let Some(level) = self.level_filter {
            CourseQuery::ByLevel(level)
        } else {
            CourseQuery::All
        }
    }
}
