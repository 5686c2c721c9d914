// src/integrations/catalog_api/client.rs
//
// HTTP client of the course catalog API.
//
// RULES:
// - This is INFRASTRUCTURE, not DOMAIN
// - Never writes to the local store; returns courses for the sync service
// - Every request is bounded by the configured timeout

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use std::time::Duration;

use super::dto::CourseDto;
use crate::domain::Course;
use crate::error::{AppError, AppResult};
use crate::integrations::remote_source::RemoteSource;

pub struct CatalogApiClient {
    base_url: String,
    http_client: Client,
}

impl CatalogApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json<T>(&self, path: &str) -> AppResult<T>
    where
        T: for<'de> serde::Deserialize<'de>,
    {
        let response = self
            .http_client
            .get(self.url(path))
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => return Err(AppError::NotFound),
            status => {
                return Err(AppError::Remote(format!(
                    "server error: {}",
                    status.as_u16()
                )))
            }
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Remote(format!("malformed catalog response: {}", e)))
    }
}

#[async_trait]
impl RemoteSource for CatalogApiClient {
    async fn fetch_all(&self) -> AppResult<Vec<Course>> {
        let dtos: Vec<CourseDto> = self.get_json("courses").await?;
        let total = dtos.len();

        let courses: Vec<Course> = dtos
            .into_iter()
            .filter_map(|dto| {
                let id = dto.id;
                match dto.into_course() {
                    Ok(course) => Some(course),
                    Err(e) => {
                        log::warn!("Skipping remote course {}: {}", id, e);
                        None
                    }
                }
            })
            .collect();

        log::info!("Fetched {}/{} courses from {}", courses.len(), total, self.base_url);
        Ok(courses)
    }

    async fn fetch_by_id(&self, id: i64) -> AppResult<Course> {
        let dto: CourseDto = self.get_json(&format!("courses/{}", id)).await?;
        Ok(dto.into_course()?)
    }
}
