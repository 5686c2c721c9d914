// src/integrations/catalog_api/dto.rs
//
// Wire format of the catalog API

use serde::{Deserialize, Serialize};

use crate::domain::{validate_course, Course, CourseLevel, DomainResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseDto {
    pub id: i64,
    pub title: String,
    pub provider: String,
    /// Hours
    pub duration: u32,
    pub level: String,
    pub image_url: String,
    #[serde(default)]
    pub description: String,
}

impl CourseDto {
    /// Map to a Course with default user fields
    pub fn into_course(self) -> DomainResult<Course> {
        let level: CourseLevel = self.level.parse()?;
        let course = Course::new(
            self.id,
            self.title,
            self.provider,
            self.duration,
            level,
            self.image_url,
            self.description,
        );
        validate_course(&course)?;
        Ok(course)
    }
}
