// src/application/course_detail.rs
//
// Detail screen model.
//
// RULES:
// - Follows one course id at a time; `load` releases the previous course's query first
// - Writes target the loaded id and reach the screen through the live query

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::{Course, ResultState};
use crate::infrastructure::{LiveCourseStore, Subscription};
use crate::services::CourseService;

use super::state_stream::{StatePublisher, StateStream};

pub const COURSE_NOT_FOUND: &str = "course not found";
pub const COURSE_FAILED: &str = "failed to load course";

pub struct CourseDetailModel {
    loads: mpsc::UnboundedSender<i64>,
    publisher: Arc<StatePublisher<Course>>,
    course_id: Mutex<Option<i64>>,
    writer: Arc<CourseService>,
    task: JoinHandle<()>,
}

impl CourseDetailModel {
    /// Must be called from within a tokio runtime
    pub fn new(live: Arc<LiveCourseStore>, writer: Arc<CourseService>, buffer: usize) -> Self {
        let publisher = Arc::new(StatePublisher::new(ResultState::loading(None), buffer));
        let (loads, load_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_delivery(live, Arc::clone(&publisher), load_rx));

        Self {
            loads,
            publisher,
            course_id: Mutex::new(None),
            writer,
            task,
        }
    }

    fn course_id_mut(&self) -> MutexGuard<'_, Option<i64>> {
        self.course_id.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn load(&self, course_id: i64) {
        *self.course_id_mut() = Some(course_id);
        if self.loads.send(course_id).is_err() {
            log::warn!("Course detail delivery task is gone, ignoring load of {}", course_id);
        }
    }

    pub fn course_id(&self) -> Option<i64> {
        *self.course_id_mut()
    }

    pub fn set_favorite(&self, is_favorite: bool) {
        match self.course_id() {
            Some(id) => self.writer.set_favorite(id, is_favorite),
            None => log::warn!("set_favorite called before any course was loaded"),
        }
    }

    /// Flip the favorite flag of the course as currently shown
    pub fn toggle_favorite(&self) {
        match self.publisher.current_data() {
            Some(course) if Some(course.id) == self.course_id() => {
                self.writer.toggle_favorite(&course)
            }
            _ => log::warn!("toggle_favorite called with no course on screen"),
        }
    }

    /// Absent comment is stored as empty; rating is clamped to [0, 5]
    pub fn save_review(&self, comment: Option<String>, rating: f32) {
        match self.course_id() {
            Some(id) => self.writer.save_review(id, comment, rating),
            None => log::warn!("save_review called before any course was loaded"),
        }
    }

    pub fn observe(&self) -> StateStream<Course> {
        self.publisher.subscribe()
    }

    pub fn current(&self) -> ResultState<Course> {
        self.publisher.current()
    }
}

impl Drop for CourseDetailModel {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_delivery(
    live: Arc<LiveCourseStore>,
    publisher: Arc<StatePublisher<Course>>,
    mut loads: mpsc::UnboundedReceiver<i64>,
) {
    let mut active: Option<Subscription<Option<Course>>> = None;

    loop {
        tokio::select! {
            biased;

            course_id = loads.recv() => match course_id {
                Some(course_id) => {
                    if let Some(previous) = active.take() {
                        previous.unsubscribe();
                    }
                    publisher.publish(ResultState::loading(None));
                    active = Some(live.subscribe_course(course_id));
                }
                None => break,
            },

            emission = next_emission(&mut active) => match emission {
                Some(Some(Some(course))) => publisher.publish(ResultState::success(course)),
                Some(Some(None)) => publisher.publish(ResultState::error(COURSE_NOT_FOUND, None)),
                Some(None) => publisher.publish(ResultState::error(COURSE_FAILED, None)),
                None => active = None,
            },
        }
    }
}

async fn next_emission(
    active: &mut Option<Subscription<Option<Course>>>,
) -> Option<Option<Option<Course>>> {
    match active {
        Some(subscription) => subscription.next().await,
        None => std::future::pending().await,
    }
}
