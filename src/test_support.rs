// src/test_support.rs
//
// Shared fixtures for unit tests.

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use crate::application::StateStream;
use crate::db::{
    create_connection_pool, initialize_database, populate_sample_catalog, ConnectionPool,
};
use crate::domain::{Course, CourseLevel, ResultState};
use crate::error::{AppError, AppResult};
use crate::events::EventBus;
use crate::infrastructure::LiveCourseStore;
use crate::repositories::{CourseRepository, SqliteCourseRepository};

/// Pool over a fresh on-disk database with the schema applied.
/// Keep the `TempDir` alive for as long as the pool is used.
pub fn temp_pool() -> (TempDir, Arc<ConnectionPool>) {
    let dir = tempfile::tempdir().unwrap();
    let pool = create_connection_pool(&dir.path().join("coursehub.db")).unwrap();
    initialize_database(&pool.get().unwrap()).unwrap();
    (dir, Arc::new(pool))
}

/// Store, bus and live queries over the 10 sample courses
pub struct TestCatalog {
    pub _dir: TempDir,
    pub pool: Arc<ConnectionPool>,
    pub bus: Arc<EventBus>,
    pub repo: Arc<dyn CourseRepository>,
    pub live: Arc<LiveCourseStore>,
}

impl TestCatalog {
    pub fn empty() -> Self {
        let (dir, pool) = temp_pool();
        let bus = Arc::new(EventBus::new());
        let repo: Arc<dyn CourseRepository> =
            Arc::new(SqliteCourseRepository::new(Arc::clone(&pool)));
        let live = Arc::new(LiveCourseStore::new(Arc::clone(&repo), &bus));
        Self {
            _dir: dir,
            pool,
            bus,
            repo,
            live,
        }
    }

    pub fn seeded() -> Self {
        let catalog = Self::empty();
        populate_sample_catalog(catalog.repo.as_ref()).unwrap();
        catalog
    }
}

/// Repository whose every call fails
pub struct FailingRepository;

fn broken<T>() -> AppResult<T> {
    Err(AppError::Other("store unavailable".to_string()))
}

impl CourseRepository for FailingRepository {
    fn upsert(&self, _course: &Course) -> AppResult<()> {
        broken()
    }
    fn upsert_many(&self, _courses: &[Course]) -> AppResult<()> {
        broken()
    }
    fn get_by_id(&self, _id: i64) -> AppResult<Option<Course>> {
        broken()
    }
    fn list_all(&self) -> AppResult<Vec<Course>> {
        broken()
    }
    fn list_favorites(&self) -> AppResult<Vec<Course>> {
        broken()
    }
    fn search_by_title(&self, _text: &str) -> AppResult<Vec<Course>> {
        broken()
    }
    fn list_by_level(&self, _level: CourseLevel) -> AppResult<Vec<Course>> {
        broken()
    }
    fn update_favorite(&self, _id: i64, _is_favorite: bool) -> AppResult<()> {
        broken()
    }
    fn update_review(&self, _id: i64, _comment: &str, _rating: f32) -> AppResult<()> {
        broken()
    }
    fn delete_all(&self) -> AppResult<usize> {
        broken()
    }
    fn replace_all(&self, _courses: &[Course]) -> AppResult<()> {
        broken()
    }
    fn count(&self) -> AppResult<usize> {
        broken()
    }
}

/// Read states until one matches, failing the test after 5 seconds
pub async fn next_matching<T, F>(stream: &mut StateStream<T>, predicate: F) -> ResultState<T>
where
    T: Clone + Send + 'static,
    F: Fn(&ResultState<T>) -> bool,
{
    let wait = async {
        loop {
            match stream.next().await {
                Some(state) if predicate(&state) => return state,
                Some(_) => continue,
                None => panic!("state stream closed"),
            }
        }
    };
    tokio::time::timeout(Duration::from_secs(5), wait)
        .await
        .expect("expected state was never published")
}
