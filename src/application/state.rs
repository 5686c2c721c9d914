// src/application/state.rs
//
// Composition root.
//
// All shared components are built once here and handed to screen models
// explicitly; nothing is reachable through globals.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::{
    create_connection_pool, get_database_stats, initialize_database, populate_sample_catalog,
    ConnectionPool, DatabaseStats,
};
use crate::error::AppResult;
use crate::events::EventBus;
use crate::infrastructure::LiveCourseStore;
use crate::integrations::{CatalogApiClient, RemoteSource};
use crate::repositories::{CourseRepository, SqliteCourseRepository};
use crate::services::{CatalogSync, CourseService};

use super::course_detail::CourseDetailModel;
use super::course_list::CourseListModel;
use super::favorites::FavoritesModel;

/// Application state shared by every screen.
/// All fields are Arc-wrapped for sharing across tasks.
pub struct AppState {
    pub config: AppConfig,
    pub pool: Arc<ConnectionPool>,
    pub event_bus: Arc<EventBus>,
    pub course_repo: Arc<dyn CourseRepository>,
    pub live_store: Arc<LiveCourseStore>,
    pub course_service: Arc<CourseService>,
    pub catalog_sync: Arc<CatalogSync>,
}

impl AppState {
    /// Open the store, wire services and seed if configured.
    /// Must be called from within a tokio runtime.
    pub fn build(config: &AppConfig) -> AppResult<Self> {
        // 1. INFRASTRUCTURE
        let db_path = config.resolve_database_path()?;
        let pool = Arc::new(create_connection_pool(&db_path)?);
        {
            let conn = pool.get()?;
            initialize_database(&conn)?;
        }
        let event_bus = Arc::new(EventBus::new());

        // 2. REPOSITORIES
        let course_repo: Arc<dyn CourseRepository> =
            Arc::new(SqliteCourseRepository::new(Arc::clone(&pool)));

        if config.seed_on_empty {
            populate_sample_catalog(course_repo.as_ref())?;
        }

        // 3. LIVE QUERIES (registers its handlers on the bus)
        let live_store = Arc::new(LiveCourseStore::new(Arc::clone(&course_repo), &event_bus));

        // 4. SERVICES
        let course_service = Arc::new(CourseService::new(
            Arc::clone(&course_repo),
            Arc::clone(&event_bus),
        ));

        let remote: Option<Arc<dyn RemoteSource>> = match &config.remote.base_url {
            Some(url) => {
                let client = CatalogApiClient::new(url.clone(), config.remote.timeout())?;
                log::info!("Remote catalog enabled at {}", client.base_url());
                let client: Arc<dyn RemoteSource> = Arc::new(client);
                Some(client)
            }
            None => {
                log::info!("No remote catalog configured, running offline");
                None
            }
        };
        let catalog_sync = Arc::new(CatalogSync::new(
            remote,
            Arc::clone(&course_service),
            config.remote.timeout(),
        ));

        log::info!("Course store ready at {}", db_path.display());

        Ok(Self {
            config: config.clone(),
            pool,
            event_bus,
            course_repo,
            live_store,
            course_service,
            catalog_sync,
        })
    }

    pub fn course_list(&self) -> CourseListModel {
        CourseListModel::new(
            Arc::clone(&self.live_store),
            Arc::clone(&self.course_service),
            Arc::clone(&self.catalog_sync),
            self.config.state_buffer,
        )
    }

    pub fn favorites(&self) -> FavoritesModel {
        FavoritesModel::new(
            &self.live_store,
            Arc::clone(&self.course_service),
            self.config.state_buffer,
        )
    }

    pub fn course_detail(&self) -> CourseDetailModel {
        CourseDetailModel::new(
            Arc::clone(&self.live_store),
            Arc::clone(&self.course_service),
            self.config.state_buffer,
        )
    }

    pub fn database_stats(&self) -> AppResult<DatabaseStats> {
        let conn = self.pool.get()?;
        get_database_stats(&conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::next_matching;

    fn config_in(dir: &tempfile::TempDir) -> AppConfig {
        AppConfig {
            database_path: Some(dir.path().join("nested").join("coursehub.db")),
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn test_build_seeds_once() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);

        let state = AppState::build(&config).unwrap();
        assert_eq!(state.course_repo.count().unwrap(), 10);
        assert!(!state.catalog_sync.is_enabled());
        drop(state);

        let state = AppState::build(&config).unwrap();
        let stats = state.database_stats().unwrap();
        assert_eq!(stats.course_count, 10);
        assert_eq!(stats.favorite_count, 0);
    }

    #[tokio::test]
    async fn test_seed_can_be_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            seed_on_empty: false,
            ..config_in(&dir)
        };

        let state = AppState::build(&config).unwrap();
        assert_eq!(state.course_repo.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_screens_share_one_store() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::build(&config_in(&dir)).unwrap();

        let list = state.course_list();
        let favorites = state.favorites();
        let mut list_states = list.observe();
        let mut favorite_states = favorites.observe();

        let all = next_matching(&mut list_states, |s| {
            s.is_success() && s.data().map(Vec::len) == Some(10)
        })
        .await;
        let course = all.data().unwrap()[0].clone();
        list.toggle_favorite(&course);

        let favs =
            next_matching(&mut favorite_states, |s| s.data().map(Vec::len) == Some(1)).await;
        assert_eq!(favs.data().unwrap()[0].id, course.id);
    }

    #[tokio::test]
    async fn test_remote_enabled_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(&dir);
        config.remote.base_url = Some("http://127.0.0.1:9/api".to_string());

        let state = AppState::build(&config).unwrap();
        assert!(state.catalog_sync.is_enabled());
    }
}
