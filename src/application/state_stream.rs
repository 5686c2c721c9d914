// src/application/state_stream.rs
//
// Published screen state with replay-last semantics.
//
// RULES:
// - A new observer first receives the value held right now, then every later value in order
// - Snapshot and subscribe happen under the same lock as publish, so nothing is missed or repeated
// - An observer that falls more than the buffer behind skips ahead to newer values

use std::sync::{Mutex, MutexGuard};

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::domain::ResultState;

struct Published<T> {
    current: ResultState<T>,
    tx: broadcast::Sender<ResultState<T>>,
}

/// Owner side of a published `ResultState` stream
pub struct StatePublisher<T> {
    inner: Mutex<Published<T>>,
}

impl<T> StatePublisher<T>
where
    T: Clone + Send + 'static,
{
    pub fn new(initial: ResultState<T>, buffer: usize) -> Self {
        let (tx, _) = broadcast::channel(buffer.max(1));
        Self {
            inner: Mutex::new(Published {
                current: initial,
                tx,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Published<T>> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            log::warn!("State publisher lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Replace the held value and deliver it to every observer
    pub fn publish(&self, state: ResultState<T>) {
        let mut published = self.lock();
        published.current = state.clone();
        // No observers is fine; the value is still held for the next one
        let _ = published.tx.send(state);
    }

    pub fn current(&self) -> ResultState<T> {
        self.lock().current.clone()
    }

    /// Data of the held value, whatever its status
    pub fn current_data(&self) -> Option<T> {
        self.lock().current.data().cloned()
    }

    pub fn subscribe(&self) -> StateStream<T> {
        let published = self.lock();
        StateStream {
            pending: Some(published.current.clone()),
            rx: published.tx.subscribe(),
        }
    }

    pub fn observer_count(&self) -> usize {
        self.lock().tx.receiver_count()
    }
}

/// Observer side; see [`StatePublisher::subscribe`]
pub struct StateStream<T> {
    pending: Option<ResultState<T>>,
    rx: broadcast::Receiver<ResultState<T>>,
}

impl<T> StateStream<T>
where
    T: Clone + Send + 'static,
{
    /// Next state; `None` once the publisher is gone.
    ///
    /// States arrive in publish order, but not necessarily all of them: an
    /// observer more than the publisher's buffer behind skips the oldest
    /// unread states and resumes at the oldest one still buffered.
    pub async fn next(&mut self) -> Option<ResultState<T>> {
        if let Some(state) = self.pending.take() {
            return Some(state);
        }

        loop {
            match self.rx.recv().await {
                Ok(state) => return Some(state),
                Err(RecvError::Lagged(skipped)) => {
                    log::warn!("State observer lagged, skipped {} states", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
