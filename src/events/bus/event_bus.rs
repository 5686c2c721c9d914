// src/events/bus/event_bus.rs
//
// Synchronous event bus.
//
// - Handlers run on the emitting thread, in subscription order
// - Every emission is logged
// - A panicking handler does not stop the others

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::events::types::DomainEvent;

/// Type-erased handler, downcast to the concrete event inside
type EventHandler = Box<dyn Fn(&dyn Any) + Send + Sync>;

/// Central coordination point for domain events.
///
/// Cloning shares the same handler table and log.
#[derive(Clone, Default)]
pub struct EventBus {
    handlers: Arc<RwLock<HashMap<TypeId, Vec<EventHandler>>>>,
    event_log: Arc<RwLock<Vec<EventLogEntry>>>,
}

/// A logged event for debugging
#[derive(Debug, Clone)]
pub struct EventLogEntry {
    pub event_type: String,
    pub event_id: String,
    pub occurred_at: String,
    pub handler_count: usize,
}

/// Upper bound of retained log entries; oldest are dropped first
const EVENT_LOG_CAPACITY: usize = 1024;

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a specific event type.
    ///
    /// ```ignore
    /// bus.subscribe::<CourseFavoriteToggled, _>(|event| {
    ///     log::info!("course {} favorite={}", event.course_id, event.is_favorite);
    /// });
    /// ```
    pub fn subscribe<E, F>(&self, handler: F)
    where
        E: DomainEvent + 'static,
        F: Fn(&E) + Send + Sync + 'static,
    {
        let wrapped: EventHandler = Box::new(move |event_any: &dyn Any| {
            if let Some(event) = event_any.downcast_ref::<E>() {
                handler(event);
            } else {
                log::error!(
                    "Failed to downcast event in handler for {}",
                    std::any::type_name::<E>()
                );
            }
        });

        write(&self.handlers)
            .entry(TypeId::of::<E>())
            .or_default()
            .push(wrapped);
    }

    /// Emit an event to every handler of its type
    pub fn emit<E>(&self, event: E)
    where
        E: DomainEvent + 'static,
    {
        let handlers = read(&self.handlers);
        let event_handlers = handlers.get(&TypeId::of::<E>());
        let handler_count = event_handlers.map(Vec::len).unwrap_or(0);

        let entry = EventLogEntry {
            event_type: event.event_type().to_string(),
            event_id: event.event_id().to_string(),
            occurred_at: event.occurred_at().to_rfc3339(),
            handler_count,
        };

        log::debug!(
            "[EVENT] {} (id: {}) | {} handlers",
            entry.event_type,
            entry.event_id,
            entry.handler_count
        );

        {
            let mut log = write(&self.event_log);
            if log.len() >= EVENT_LOG_CAPACITY {
                log.remove(0);
            }
            log.push(entry);
        }

        let Some(event_handlers) = event_handlers else {
            return;
        };

        for (idx, handler) in event_handlers.iter().enumerate() {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                handler(&event as &dyn Any);
            }));

            if result.is_err() {
                log::error!("Handler {} for {} panicked", idx, event.event_type());
            }
        }
    }

    pub fn get_event_log(&self) -> Vec<EventLogEntry> {
        read(&self.event_log).clone()
    }

    pub fn clear_event_log(&self) {
        write(&self.event_log).clear();
    }

    pub fn subscriber_count<E>(&self) -> usize
    where
        E: 'static,
    {
        read(&self.handlers)
            .get(&TypeId::of::<E>())
            .map(Vec::len)
            .unwrap_or(0)
    }
}
