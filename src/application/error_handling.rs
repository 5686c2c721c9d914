// src/application/error_handling.rs
//
// Error mapping for screens
//
// ARCHITECTURE:
// - Maps internal errors → user-friendly responses
// - Provides a consistent error format for screen state
// - Never exposes internal implementation details
// - Logs errors for debugging

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Standard error response for screens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error_type: ErrorType,
    pub message: String,
    pub details: Option<String>,
}

/// Error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Resource not found
    NotFound,

    /// Domain invariant violation
    DomainError,

    /// Database/persistence error
    Database,

    /// Remote catalog error
    ExternalService,

    /// File system error
    FileSystem,

    /// Other/unknown error
    Internal,
}

impl ErrorResponse {
    pub fn from_app_error(error: AppError) -> Self {
        match error {
            AppError::NotFound => Self::not_found("Resource"),

            AppError::Domain(domain_error) => Self {
                error_type: ErrorType::DomainError,
                message: "Domain validation failed".to_string(),
                details: Some(domain_error.to_string()),
            },

            AppError::Database(db_error) => {
                log::error!("Database error: {:?}", db_error);
                Self {
                    error_type: ErrorType::Database,
                    message: "Database operation failed".to_string(),
                    details: Some("Check logs for details".to_string()),
                }
            }

            AppError::Pool(pool_error) => {
                log::error!("Connection pool error: {}", pool_error);
                Self {
                    error_type: ErrorType::Database,
                    message: "Database connection failed".to_string(),
                    details: None,
                }
            }

            AppError::Serialization(serde_error) => {
                log::error!("Serialization error: {:?}", serde_error);
                Self {
                    error_type: ErrorType::Internal,
                    message: "Data serialization failed".to_string(),
                    details: None,
                }
            }

            AppError::Io(io_error) => {
                log::error!("IO error: {:?}", io_error);
                Self {
                    error_type: ErrorType::FileSystem,
                    message: "File system operation failed".to_string(),
                    details: Some(io_error.to_string()),
                }
            }

            // Remote messages are already phrased for the user
            AppError::Remote(message) => {
                log::warn!("Remote catalog error: {}", message);
                Self {
                    error_type: ErrorType::ExternalService,
                    message,
                    details: None,
                }
            }

            AppError::Other(message) => {
                log::error!("Other error: {}", message);
                Self {
                    error_type: ErrorType::Internal,
                    message,
                    details: None,
                }
            }
        }
    }

    pub fn not_found(resource: &str) -> Self {
        Self {
            error_type: ErrorType::NotFound,
            message: format!("{} not found", resource),
            details: None,
        }
    }
}

/// One-line message suitable for an Error state
pub fn user_message(error: AppError) -> String {
    ErrorResponse::from_app_error(error).message
}
