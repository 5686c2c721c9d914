// src/application/favorites.rs
//
// Favorites screen model: one fixed live query, no selection.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::domain::{Course, CourseQuery, ResultState};
use crate::infrastructure::{LiveCourseStore, Subscription};
use crate::services::CourseService;

use super::state_stream::{StatePublisher, StateStream};

pub const FAVORITES_FAILED: &str = "failed to load favorites";

pub struct FavoritesModel {
    publisher: Arc<StatePublisher<Vec<Course>>>,
    writer: Arc<CourseService>,
    task: JoinHandle<()>,
}

impl FavoritesModel {
    /// Must be called from within a tokio runtime
    pub fn new(live: &LiveCourseStore, writer: Arc<CourseService>, buffer: usize) -> Self {
        let publisher = Arc::new(StatePublisher::new(ResultState::loading(None), buffer));
        let subscription = live.subscribe(CourseQuery::Favorites);
        let task = tokio::spawn(deliver(subscription, Arc::clone(&publisher)));

        Self {
            publisher,
            writer,
            task,
        }
    }

    pub fn remove_from_favorites(&self, course: &Course) {
        self.writer.set_favorite(course.id, false);
    }

    pub fn observe(&self) -> StateStream<Vec<Course>> {
        self.publisher.subscribe()
    }

    pub fn current(&self) -> ResultState<Vec<Course>> {
        self.publisher.current()
    }
}

impl Drop for FavoritesModel {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn deliver(
    mut subscription: Subscription<Vec<Course>>,
    publisher: Arc<StatePublisher<Vec<Course>>>,
) {
    while let Some(rows) = subscription.next().await {
        let state = match rows {
            Some(rows) => ResultState::success(rows),
            None => ResultState::error(FAVORITES_FAILED, None),
        };
        publisher.publish(state);
    }
}
