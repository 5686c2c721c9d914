// src/repositories/course_repository.rs
//
// Course persistence

use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;
use std::sync::Arc;

use crate::db::{ConnectionPool, UNICODE_LOWER};
use crate::domain::{Course, CourseLevel, CourseQuery};
use crate::error::{AppError, AppResult};

pub trait CourseRepository: Send + Sync {
    /// Insert or replace on id collision
    fn upsert(&self, course: &Course) -> AppResult<()>;
    /// Insert or replace many in one transaction
    fn upsert_many(&self, courses: &[Course]) -> AppResult<()>;
    fn get_by_id(&self, id: i64) -> AppResult<Option<Course>>;
    fn list_all(&self) -> AppResult<Vec<Course>>;
    fn list_favorites(&self) -> AppResult<Vec<Course>>;
    /// Case-insensitive substring match on title
    fn search_by_title(&self, text: &str) -> AppResult<Vec<Course>>;
    fn list_by_level(&self, level: CourseLevel) -> AppResult<Vec<Course>>;
    fn update_favorite(&self, id: i64, is_favorite: bool) -> AppResult<()>;
    /// Writes comment and rating together
    fn update_review(&self, id: i64, comment: &str, rating: f32) -> AppResult<()>;
    fn delete_all(&self) -> AppResult<usize>;
    /// Delete everything and insert `courses`, keeping user fields of surviving ids
    fn replace_all(&self, courses: &[Course]) -> AppResult<()>;
    fn count(&self) -> AppResult<usize>;

    fn list(&self, query: &CourseQuery) -> AppResult<Vec<Course>> {
        match query {
            CourseQuery::All => self.list_all(),
            CourseQuery::Favorites => self.list_favorites(),
            CourseQuery::TitleContains(text) => self.search_by_title(text),
            CourseQuery::ByLevel(level) => self.list_by_level(*level),
        }
    }
}

const COURSE_COLUMNS: &str = "id, title, provider, duration_hours, level, image_url, description,
     user_comment, user_rating, is_favorite";

pub struct SqliteCourseRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteCourseRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Map database row to Course - returns rusqlite::Error for query_map compatibility
    fn row_to_course(row: &Row) -> Result<Course, rusqlite::Error> {
        let level_str: String = row.get("level")?;
        let level = level_str.parse::<CourseLevel>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?;

        let duration: i64 = row.get("duration_hours")?;
        let rating: f64 = row.get("user_rating")?;

        Ok(Course {
            id: row.get("id")?,
            title: row.get("title")?,
            provider: row.get("provider")?,
            duration_hours: duration.max(0) as u32,
            level,
            image_url: row.get("image_url")?,
            description: row.get("description")?,
            user_comment: row.get("user_comment")?,
            user_rating: rating as f32,
            is_favorite: row.get("is_favorite")?,
        })
    }

    fn query_courses(&self, sql: &str, params: &[&dyn rusqlite::ToSql]) -> AppResult<Vec<Course>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(sql)?;

        let courses = stmt
            .query_map(params, Self::row_to_course)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(courses)
    }

    fn insert(conn: &Connection, course: &Course) -> AppResult<()> {
        conn.execute(
            "INSERT OR REPLACE INTO courses (
                id, title, provider, duration_hours, level, image_url, description,
                user_comment, user_rating, is_favorite
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                course.id,
                course.title,
                course.provider,
                course.duration_hours as i64,
                course.level.as_str(),
                course.image_url,
                course.description,
                course.user_comment,
                course.user_rating as f64,
                course.is_favorite,
            ],
        )?;
        Ok(())
    }
}

/// Escape LIKE wildcards so user text matches literally
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

impl CourseRepository for SqliteCourseRepository {
    fn upsert(&self, course: &Course) -> AppResult<()> {
        let conn = self.pool.get()?;
        Self::insert(&conn, course)
    }

    fn upsert_many(&self, courses: &[Course]) -> AppResult<()> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;
        for course in courses {
            Self::insert(&tx, course)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn get_by_id(&self, id: i64) -> AppResult<Option<Course>> {
        let conn = self.pool.get()?;
        let sql = format!("SELECT {} FROM courses WHERE id = ?1", COURSE_COLUMNS);

        let course = conn
            .query_row(&sql, params![id], Self::row_to_course)
            .optional()?;

        Ok(course)
    }

    fn list_all(&self) -> AppResult<Vec<Course>> {
        let sql = format!("SELECT {} FROM courses ORDER BY title ASC", COURSE_COLUMNS);
        self.query_courses(&sql, &[])
    }

    fn list_favorites(&self) -> AppResult<Vec<Course>> {
        let sql = format!(
            "SELECT {} FROM courses WHERE is_favorite = 1 ORDER BY title ASC",
            COURSE_COLUMNS
        );
        self.query_courses(&sql, &[])
    }

    fn search_by_title(&self, text: &str) -> AppResult<Vec<Course>> {
        // Both sides go through the same Unicode lowercase mapping;
        // LIKE then only has to match exact bytes
        let pattern = format!("%{}%", escape_like(&text.to_lowercase()));
        let sql = format!(
            "SELECT {} FROM courses
             WHERE {}(title) LIKE ?1 ESCAPE '\\'
             ORDER BY title ASC",
            COURSE_COLUMNS, UNICODE_LOWER
        );
        self.query_courses(&sql, params![pattern])
    }

    fn list_by_level(&self, level: CourseLevel) -> AppResult<Vec<Course>> {
        let sql = format!(
            "SELECT {} FROM courses WHERE level = ?1 ORDER BY title ASC",
            COURSE_COLUMNS
        );
        self.query_courses(&sql, params![level.as_str()])
    }

    fn update_favorite(&self, id: i64, is_favorite: bool) -> AppResult<()> {
        let conn = self.pool.get()?;
        let rows_affected = conn.execute(
            "UPDATE courses SET is_favorite = ?1 WHERE id = ?2",
            params![is_favorite, id],
        )?;

        if rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    fn update_review(&self, id: i64, comment: &str, rating: f32) -> AppResult<()> {
        let conn = self.pool.get()?;
        let rows_affected = conn.execute(
            "UPDATE courses SET user_comment = ?1, user_rating = ?2 WHERE id = ?3",
            params![comment, rating as f64, id],
        )?;

        if rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    fn delete_all(&self) -> AppResult<usize> {
        let conn = self.pool.get()?;
        let deleted = conn.execute("DELETE FROM courses", [])?;
        Ok(deleted)
    }

    fn replace_all(&self, courses: &[Course]) -> AppResult<()> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        let existing: HashMap<i64, Course> = {
            let sql = format!("SELECT {} FROM courses", COURSE_COLUMNS);
            let mut stmt = tx.prepare(&sql)?;
            let rows = stmt
                .query_map([], Self::row_to_course)?
                .collect::<Result<Vec<_>, _>>()?;
            rows.into_iter().map(|c| (c.id, c)).collect()
        };

        tx.execute("DELETE FROM courses", [])?;

        for course in courses {
            match existing.get(&course.id) {
                Some(previous) => {
                    let mut merged = course.clone();
                    merged.carry_user_fields(previous);
                    Self::insert(&tx, &merged)?;
                }
                None => Self::insert(&tx, course)?,
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn count(&self) -> AppResult<usize> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM courses", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sample_catalog;
    use crate::test_support::temp_pool;

    fn seeded() -> (tempfile::TempDir, SqliteCourseRepository) {
        let (dir, pool) = temp_pool();
        let repo = SqliteCourseRepository::new(pool);
        repo.upsert_many(&sample_catalog()).unwrap();
        (dir, repo)
    }

    fn titles(courses: &[Course]) -> Vec<&str> {
        courses.iter().map(|c| c.title.as_str()).collect()
    }

    #[test]
    fn test_list_all_sorted_by_title() {
        let (_dir, repo) = seeded();
        let all = repo.list_all().unwrap();
        assert_eq!(all.len(), 10);

        let mut sorted = titles(&all);
        sorted.sort();
        assert_eq!(titles(&all), sorted);
    }

    #[test]
    fn test_list_by_level() {
        let (_dir, repo) = seeded();
        let advanced = repo.list_by_level(CourseLevel::Advanced).unwrap();
        assert_eq!(
            titles(&advanced),
            vec!["MVVM and Clean Architecture", "Unit Testing and UI Testing in Android"]
        );
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let (_dir, repo) = seeded();
        let found = repo.search_by_title("KOTLIN").unwrap();
        assert_eq!(titles(&found), vec!["Kotlin for Android Developers"]);

        let found = repo.search_by_title("android").unwrap();
        assert_eq!(found.len(), 6);
    }

    #[test]
    fn test_search_folds_non_ascii_case() {
        let (_dir, repo) = seeded();
        repo.upsert(&Course::new(
            11,
            "Élan in Kotlin",
            "Udemy",
            6,
            CourseLevel::Beginner,
            "",
            "",
        ))
        .unwrap();
        repo.upsert(&Course::new(
            12,
            "Основы Android",
            "Stepik",
            8,
            CourseLevel::Beginner,
            "",
            "",
        ))
        .unwrap();

        for text in ["Élan", "élan", "ÉLAN", "in kotlin"] {
            let found = repo.search_by_title(text).unwrap();
            assert_eq!(titles(&found), vec!["Élan in Kotlin"], "search {:?}", text);
        }
        for text in ["Основы", "основы", "ОСНОВЫ"] {
            let found = repo.search_by_title(text).unwrap();
            assert_eq!(titles(&found), vec!["Основы Android"], "search {:?}", text);
        }
    }

    #[test]
    fn test_search_treats_wildcards_literally() {
        let (_dir, repo) = seeded();
        assert!(repo.search_by_title("%").unwrap().is_empty());
        assert!(repo.search_by_title("_").unwrap().is_empty());
    }

    #[test]
    fn test_update_favorite_and_list_favorites() {
        let (_dir, repo) = seeded();
        assert!(repo.list_favorites().unwrap().is_empty());

        repo.update_favorite(3, true).unwrap();
        let favorites = repo.list_favorites().unwrap();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].id, 3);
        assert!(repo.get_by_id(3).unwrap().unwrap().is_favorite);
    }

    #[test]
    fn test_update_review_writes_both_fields() {
        let (_dir, repo) = seeded();
        repo.update_review(5, "solid intro", 4.5).unwrap();

        let course = repo.get_by_id(5).unwrap().unwrap();
        assert_eq!(course.user_comment, "solid intro");
        assert_eq!(course.user_rating, 4.5);
    }

    #[test]
    fn test_updates_on_missing_id_are_not_found() {
        let (_dir, repo) = seeded();
        assert!(matches!(repo.update_favorite(99, true), Err(AppError::NotFound)));
        assert!(matches!(repo.update_review(99, "", 1.0), Err(AppError::NotFound)));
    }

    #[test]
    fn test_upsert_replaces_on_id_collision() {
        let (_dir, repo) = seeded();
        let mut course = repo.get_by_id(1).unwrap().unwrap();
        course.title = "Android From Scratch".to_string();
        repo.upsert(&course).unwrap();

        assert_eq!(repo.count().unwrap(), 10);
        assert_eq!(repo.get_by_id(1).unwrap().unwrap().title, "Android From Scratch");
    }

    #[test]
    fn test_get_by_id_missing() {
        let (_dir, repo) = seeded();
        assert!(repo.get_by_id(404).unwrap().is_none());
    }

    #[test]
    fn test_delete_all() {
        let (_dir, repo) = seeded();
        assert_eq!(repo.delete_all().unwrap(), 10);
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_replace_all_keeps_user_fields_of_surviving_ids() {
        let (_dir, repo) = seeded();
        repo.update_favorite(2, true).unwrap();
        repo.update_review(2, "loved it", 5.0).unwrap();

        let mut incoming: Vec<Course> = sample_catalog().into_iter().take(3).collect();
        incoming[1].title = "Kotlin, Second Edition".to_string();
        repo.replace_all(&incoming).unwrap();

        assert_eq!(repo.count().unwrap(), 3);
        let kotlin = repo.get_by_id(2).unwrap().unwrap();
        assert_eq!(kotlin.title, "Kotlin, Second Edition");
        assert!(kotlin.is_favorite);
        assert_eq!(kotlin.user_comment, "loved it");
        assert!(repo.get_by_id(10).unwrap().is_none());
    }

    #[test]
    fn test_list_dispatches_query() {
        let (_dir, repo) = seeded();
        assert_eq!(repo.list(&CourseQuery::All).unwrap().len(), 10);
        assert_eq!(repo.list(&CourseQuery::ByLevel(CourseLevel::Beginner)).unwrap().len(), 4);
        assert_eq!(
            repo.list(&CourseQuery::TitleContains("room".to_string())).unwrap().len(),
            1
        );
        assert!(repo.list(&CourseQuery::Favorites).unwrap().is_empty());
    }
}
