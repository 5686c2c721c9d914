// src/application/course_list.rs
//
// Listing screen model.
//
// RULES:
// - Exactly one live query is active at a time; the old one is released BEFORE the new one starts
// - Every published state comes from the single delivery task, never from callers
// - Loading and error signals are folded in for the model's whole lifetime, independent of switches
// - Writes never touch the published state; the active query re-emits instead

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::domain::{Course, CourseLevel, CourseQuery, ResultState, Selection};
use crate::infrastructure::{LiveCourseStore, Subscription};
use crate::services::{CatalogSync, CourseService};

use super::state_stream::{StatePublisher, StateStream};

/// Message published when the store yields no rows at all
pub const LOADING_FAILED: &str = "loading failed";

pub struct CourseListModel {
    switches: mpsc::UnboundedSender<CourseQuery>,
    publisher: Arc<StatePublisher<Vec<Course>>>,
    selection: Mutex<Selection>,
    writer: Arc<CourseService>,
    sync: Arc<CatalogSync>,
    task: JoinHandle<()>,
}

impl CourseListModel {
    /// Start the delivery task and load the full catalog.
    /// Must be called from within a tokio runtime.
    pub fn new(
        live: Arc<LiveCourseStore>,
        writer: Arc<CourseService>,
        sync: Arc<CatalogSync>,
        buffer: usize,
    ) -> Self {
        let publisher = Arc::new(StatePublisher::new(ResultState::loading(None), buffer));
        let (switches, switch_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(run_delivery(
            live,
            Arc::clone(&publisher),
            switch_rx,
            sync.loading(),
            sync.errors(),
        ));

        let model = Self {
            switches,
            publisher,
            selection: Mutex::new(Selection::new()),
            writer,
            sync,
            task,
        };
        model.load_all();
        model
    }

    fn selection_mut(&self) -> MutexGuard<'_, Selection> {
        self.selection.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Show every course and refresh from the remote catalog in the background
    pub fn load_all(&self) {
        self.selection_mut().set_level_filter(None);
        self.switch_to(CourseQuery::All);
        self.sync.refresh_in_background();
    }

    /// Title search; blank text behaves as `load_all`
    pub fn search(&self, text: &str) {
        let query = {
            let mut selection = self.selection_mut();
            selection.set_search(text);
            selection.query()
        };

        match query {
            CourseQuery::All => self.load_all(),
            query => self.switch_to(query),
        }
    }

    /// Level filter; `None` behaves as `load_all`
    pub fn filter_by_level(&self, level: Option<CourseLevel>) {
        self.selection_mut().set_level_filter(level);

        match level {
            Some(level) => self.switch_to(CourseQuery::ByLevel(level)),
            None => self.load_all(),
        }
    }

    pub fn toggle_favorite(&self, course: &Course) {
        self.writer.toggle_favorite(course);
    }

    pub fn save_review(&self, course_id: i64, comment: Option<String>, rating: f32) {
        self.writer.save_review(course_id, comment, rating);
    }

    pub fn observe(&self) -> StateStream<Vec<Course>> {
        self.publisher.subscribe()
    }

    pub fn current(&self) -> ResultState<Vec<Course>> {
        self.publisher.current()
    }

    pub fn selection(&self) -> Selection {
        self.selection_mut().clone()
    }

    /// Stop delivering and release the active query
    pub async fn shutdown(mut self) {
        self.task.abort();
        let _ = (&mut self.task).await;
    }

    fn switch_to(&self, query: CourseQuery) {
        if self.switches.send(query).is_err() {
            log::warn!("Course list delivery task is gone, ignoring query switch");
        }
    }
}

impl Drop for CourseListModel {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_delivery(
    live: Arc<LiveCourseStore>,
    publisher: Arc<StatePublisher<Vec<Course>>>,
    mut switches: mpsc::UnboundedReceiver<CourseQuery>,
    mut loading: watch::Receiver<bool>,
    mut errors: watch::Receiver<String>,
) {
    let mut active: Option<Subscription<Vec<Course>>> = None;
    let mut loading_open = true;
    let mut errors_open = true;

    loop {
        tokio::select! {
            biased;

            query = switches.recv() => match query {
                Some(query) => switch_source(&live, &publisher, &mut active, query),
                None => break,
            },

            changed = loading.changed(), if loading_open => {
                if changed.is_err() {
                    loading_open = false;
                    continue;
                }
                if *loading.borrow_and_update() {
                    publisher.publish(ResultState::loading(publisher.current_data()));
                }
            }

            changed = errors.changed(), if errors_open => {
                if changed.is_err() {
                    errors_open = false;
                    continue;
                }
                let message = errors.borrow_and_update().clone();
                if !message.is_empty() {
                    publisher.publish(ResultState::error(message, publisher.current_data()));
                }
            }

            emission = next_emission(&mut active) => match emission {
                Some(rows) => publisher.publish(fold_rows(rows)),
                None => {
                    log::warn!("Active course query closed unexpectedly");
                    active = None;
                }
            },
        }
    }
}

fn switch_source(
    live: &LiveCourseStore,
    publisher: &StatePublisher<Vec<Course>>,
    active: &mut Option<Subscription<Vec<Course>>>,
    query: CourseQuery,
) {
    if let Some(previous) = active.take() {
        previous.unsubscribe();
    }

    publisher.publish(ResultState::loading(None));
    log::debug!("Course list switching to {}", query);
    *active = Some(live.subscribe(query));
}

async fn next_emission(
    active: &mut Option<Subscription<Vec<Course>>>,
) -> Option<Option<Vec<Course>>> {
    match active {
        Some(subscription) => subscription.next().await,
        None => std::future::pending().await,
    }
}

/// Rows (possibly empty) are a success; an absent emission is an error
fn fold_rows(rows: Option<Vec<Course>>) -> ResultState<Vec<Course>> {
    match rows {
        Some(rows) => ResultState::success(rows),
        None => ResultState::error(LOADING_FAILED, None),
    }
}
