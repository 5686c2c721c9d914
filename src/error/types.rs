// src/error/types.rs
use crate::domain::DomainError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Resource not found")]
    NotFound,

    /// Remote catalog failure (network, timeout, non-2xx status)
    #[error("Remote catalog error: {0}")]
    Remote(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<r2d2::Error> for AppError {
    fn from(err: r2d2::Error) -> Self {
        AppError::Pool(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Remote("no response from catalog server".to_string())
        } else if let Some(status) = err.status() {
            AppError::Remote(format!("server error: {}", status.as_u16()))
        } else {
            AppError::Remote(format!("network error: {}", err))
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Other(format!("Background task failed: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(AppError::NotFound.to_string(), "Resource not found");
        assert_eq!(
            AppError::Remote("server error: 503".to_string()).to_string(),
            "Remote catalog error: server error: 503"
        );
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&AppError::Pool("exhausted".to_string())).unwrap();
        assert_eq!(json, "\"Pool error: exhausted\"");
    }

    #[test]
    fn test_domain_error_converts() {
        let err: AppError = DomainError::InvariantViolation("bad".to_string()).into();
        assert!(matches!(err, AppError::Domain(_)));
    }
}
