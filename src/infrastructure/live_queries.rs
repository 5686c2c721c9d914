// src/infrastructure/live_queries.rs
//
// Live (auto-updating) queries over the course table.
//
// RULES:
// - A subscription emits its current rows immediately, then again after every table change
// - Reads never run on the caller's task; they go to the blocking pool
// - Dropping a subscription stops its task at once
// - A failed read is delivered as an absent emission (`None`), never as a panic

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::domain::{Course, CourseQuery};
use crate::error::AppResult;
use crate::events::{
    CatalogCleared, CatalogReplaced, CourseFavoriteToggled, CourseReviewSaved, CourseUpserted,
    CoursesImported, DomainEvent, EventBus,
};
use crate::repositories::CourseRepository;

/// Emissions buffered per subscription before the reader applies backpressure
const SUBSCRIPTION_BUFFER: usize = 16;

type Fetch<T> = Arc<dyn Fn(&dyn CourseRepository) -> AppResult<T> + Send + Sync>;

/// Source of live queries.
///
/// Listens once to every catalog write event on the bus and bumps a table
/// version; each subscription re-reads when the version moves.
pub struct LiveCourseStore {
    repo: Arc<dyn CourseRepository>,
    version_tx: Arc<watch::Sender<u64>>,
    next_id: AtomicU64,
    active: Arc<AtomicUsize>,
}

impl LiveCourseStore {
    pub fn new(repo: Arc<dyn CourseRepository>, event_bus: &EventBus) -> Self {
        let (version_tx, _) = watch::channel(0u64);
        let version_tx = Arc::new(version_tx);

        register_invalidation::<CourseUpserted>(event_bus, &version_tx);
        register_invalidation::<CoursesImported>(event_bus, &version_tx);
        register_invalidation::<CourseFavoriteToggled>(event_bus, &version_tx);
        register_invalidation::<CourseReviewSaved>(event_bus, &version_tx);
        register_invalidation::<CatalogCleared>(event_bus, &version_tx);
        register_invalidation::<CatalogReplaced>(event_bus, &version_tx);

        Self {
            repo,
            version_tx,
            next_id: AtomicU64::new(1),
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of table changes seen so far
    pub fn table_version(&self) -> u64 {
        *self.version_tx.borrow()
    }

    /// Subscriptions currently alive
    pub fn active_subscriptions(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Live list query. Must be called from within a tokio runtime.
    pub fn subscribe(&self, query: CourseQuery) -> Subscription<Vec<Course>> {
        let label = query.to_string();
        self.subscribe_with(label, move |repo| repo.list(&query))
    }

    /// Live single-course query; emits `Some(None)` while the course does not exist
    pub fn subscribe_course(&self, id: i64) -> Subscription<Option<Course>> {
        self.subscribe_with(format!("course {}", id), move |repo| repo.get_by_id(id))
    }

    /// Live query over an arbitrary read
    pub fn subscribe_with<T, F>(&self, label: String, fetch: F) -> Subscription<T>
    where
        T: Send + 'static,
        F: Fn(&dyn CourseRepository) -> AppResult<T> + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let fetch: Fetch<T> = Arc::new(fetch);
        let (tx, rx) = mpsc::channel(SUBSCRIPTION_BUFFER);
        let version_rx = self.version_tx.subscribe();

        let handle = tokio::spawn(run_query(
            id,
            label.clone(),
            Arc::clone(&self.repo),
            fetch,
            version_rx,
            tx,
        ));

        self.active.fetch_add(1, Ordering::SeqCst);
        log::debug!("Live query #{} subscribed ({})", id, label);

        Subscription {
            id,
            label,
            rx,
            handle,
            active: Arc::clone(&self.active),
        }
    }
}

fn register_invalidation<E>(event_bus: &EventBus, version_tx: &Arc<watch::Sender<u64>>)
where
    E: DomainEvent + 'static,
{
    let version_tx = Arc::clone(version_tx);
    event_bus.subscribe::<E, _>(move |event| {
        version_tx.send_modify(|version| *version = version.wrapping_add(1));
        log::trace!("Course table invalidated by {}", event.event_type());
    });
}

async fn run_query<T>(
    id: u64,
    label: String,
    repo: Arc<dyn CourseRepository>,
    fetch: Fetch<T>,
    mut version_rx: watch::Receiver<u64>,
    tx: mpsc::Sender<Option<T>>,
) where
    T: Send + 'static,
{
    loop {
        // Mark the current version seen before reading, so a write that
        // lands during the read still triggers another pass.
        version_rx.borrow_and_update();

        let repo = Arc::clone(&repo);
        let fetch = Arc::clone(&fetch);
        let rows = match tokio::task::spawn_blocking(move || fetch(repo.as_ref())).await {
            Ok(Ok(rows)) => Some(rows),
            Ok(Err(e)) => {
                log::error!("Live query #{} ({}) read failed: {}", id, label, e);
                None
            }
            Err(e) => {
                log::error!("Live query #{} ({}) read task failed: {}", id, label, e);
                None
            }
        };

        if tx.send(rows).await.is_err() {
            break;
        }

        if version_rx.changed().await.is_err() {
            break;
        }
    }
}

/// Handle of one live query.
///
/// Yields `Some(rows)` after each successful read and `None` when a read failed.
pub struct Subscription<T> {
    id: u64,
    label: String,
    rx: mpsc::Receiver<Option<T>>,
    handle: JoinHandle<()>,
    active: Arc<AtomicUsize>,
}

impl<T> Subscription<T> {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Next emission. Returns `None` only once the subscription is closed.
    pub async fn next(&mut self) -> Option<Option<T>> {
        self.rx.recv().await
    }

    /// Stop deliveries and release the query
    pub fn unsubscribe(self) {}
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.handle.abort();
        self.rx.close();
        self.active.fetch_sub(1, Ordering::SeqCst);
        log::debug!("Live query #{} unsubscribed ({})", self.id, self.label);
    }
}
