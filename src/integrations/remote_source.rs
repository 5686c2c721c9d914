// src/integrations/remote_source.rs
//
// Contract of the remote course catalog.

use async_trait::async_trait;

use crate::domain::Course;
use crate::error::AppResult;

/// Remote catalog the local store is synced from.
///
/// Returned courses carry catalog fields only; user fields are defaults.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteSource: Send + Sync {
    async fn fetch_all(&self) -> AppResult<Vec<Course>>;

    async fn fetch_by_id(&self, id: i64) -> AppResult<Course>;
}
