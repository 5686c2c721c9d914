// src/services/catalog_sync.rs
//
// Remote catalog refresh.
//
// RULES:
// - Owns the loading flag and the last error message; screens only read them
// - Loading is always cleared once a refresh ends, whatever the outcome
// - Fetched courses go through the write worker like any other write
// - A failed refresh leaves the local catalog untouched

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::application::error_handling::user_message;
use crate::error::{AppError, AppResult};
use crate::integrations::RemoteSource;
use crate::services::CourseService;

pub struct CatalogSync {
    remote: Option<Arc<dyn RemoteSource>>,
    writer: Arc<CourseService>,
    timeout: Duration,
    loading_tx: watch::Sender<bool>,
    error_tx: watch::Sender<String>,
    in_flight: AtomicBool,
}

impl CatalogSync {
    /// `remote = None` keeps refresh inert
    pub fn new(
        remote: Option<Arc<dyn RemoteSource>>,
        writer: Arc<CourseService>,
        timeout: Duration,
    ) -> Self {
        let (loading_tx, _) = watch::channel(false);
        let (error_tx, _) = watch::channel(String::new());
        Self {
            remote,
            writer,
            timeout,
            loading_tx,
            error_tx,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Loading flag; `true` while a fetch is in flight
    pub fn loading(&self) -> watch::Receiver<bool> {
        self.loading_tx.subscribe()
    }

    /// Last refresh error, empty when the last refresh succeeded
    pub fn errors(&self) -> watch::Receiver<String> {
        self.error_tx.subscribe()
    }

    pub fn is_enabled(&self) -> bool {
        self.remote.is_some()
    }

    /// Fetch the whole remote catalog and queue it as a resync.
    ///
    /// Returns the number of courses queued. A refresh requested while another
    /// is in flight is skipped and returns `Ok(0)`.
    pub async fn refresh(&self) -> AppResult<usize> {
        let Some(remote) = self.remote.as_ref() else {
            self.loading_tx.send_replace(false);
            return Ok(0);
        };

        if self.in_flight.swap(true, Ordering::SeqCst) {
            log::debug!("Catalog refresh already running, skipping");
            return Ok(0);
        }

        let in_flight = InFlight::start(self);
        let fetched = match tokio::time::timeout(self.timeout, remote.fetch_all()).await {
            Ok(result) => result,
            Err(_) => Err(AppError::Remote("no response from catalog server".to_string())),
        };
        drop(in_flight);

        match fetched {
            Ok(courses) => {
                let count = courses.len();
                self.writer.replace_catalog(courses);
                self.error_tx.send_replace(String::new());
                log::info!("Catalog refresh fetched {} courses", count);
                Ok(count)
            }
            Err(e) => {
                let message = user_message(e);
                log::warn!("Catalog refresh failed: {}", message);
                self.error_tx.send_replace(message.clone());
                Err(AppError::Remote(message))
            }
        }
    }

    /// Run `refresh` on a background task; the outcome is only logged,
    /// screens see it through `loading()` and `errors()`
    pub fn refresh_in_background(self: &Arc<Self>) -> JoinHandle<()> {
        let sync = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = sync.refresh().await {
                log::debug!("Background refresh ended with error: {}", e);
            }
        })
    }
}

/// Marks a refresh as running; clears loading and the in-flight flag when
/// dropped, including when the refresh future itself is dropped mid-fetch
struct InFlight<'a> {
    sync: &'a CatalogSync,
}

impl<'a> InFlight<'a> {
    fn start(sync: &'a CatalogSync) -> Self {
        sync.loading_tx.send_replace(true);
        Self { sync }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.sync.loading_tx.send_replace(false);
        self.sync.in_flight.store(false, Ordering::SeqCst);
    }
}
