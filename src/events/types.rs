// src/events/types.rs
//
// Domain events of the catalog.
// Each event is an immutable fact about a write that already committed.
//
// RULES:
// - Events are facts, not commands
// - Events carry only the data needed to react
// - Every store write emits exactly one event

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Trait that all domain events must implement
pub trait DomainEvent: std::fmt::Debug + Clone {
    /// Unique identifier for this event instance
    fn event_id(&self) -> Uuid;

    /// When this event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;
}

macro_rules! impl_domain_event {
    ($ty:ident) => {
        impl DomainEvent for $ty {
            fn event_id(&self) -> Uuid {
                self.event_id
            }
            fn occurred_at(&self) -> DateTime<Utc> {
                self.occurred_at
            }
            fn event_type(&self) -> &'static str {
                stringify!($ty)
            }
        }
    };
}

/// A single course was inserted or replaced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseUpserted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub course_id: i64,
}

impl CourseUpserted {
    pub fn new(course_id: i64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            course_id,
        }
    }
}

impl_domain_event!(CourseUpserted);

/// A batch of courses was inserted or replaced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoursesImported {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub count: usize,
}

impl CoursesImported {
    pub fn new(count: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            count,
        }
    }
}

impl_domain_event!(CoursesImported);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseFavoriteToggled {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub course_id: i64,
    pub is_favorite: bool,
}

impl CourseFavoriteToggled {
    pub fn new(course_id: i64, is_favorite: bool) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            course_id,
            is_favorite,
        }
    }
}

impl_domain_event!(CourseFavoriteToggled);

/// Comment and rating were saved together
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseReviewSaved {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub course_id: i64,
    pub rating: f32,
}

impl CourseReviewSaved {
    pub fn new(course_id: i64, rating: f32) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            course_id,
            rating,
        }
    }
}

impl_domain_event!(CourseReviewSaved);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogCleared {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub deleted: usize,
}

impl CatalogCleared {
    pub fn new(deleted: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            deleted,
        }
    }
}

impl_domain_event!(CatalogCleared);

/// Full resync from the remote catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogReplaced {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub count: usize,
}

impl CatalogReplaced {
    pub fn new(count: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            count,
        }
    }
}

impl_domain_event!(CatalogReplaced);
