// src/application/error_handling.rs
//
// Error mapping for commands
//
// ARCHITECTURE:
// - Maps internal errors to transport-friendly responses
// - Provides a consistent error format for callers
// - Never exposes storage internals
// - Logs errors that callers cannot act on

use log::error;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Standard error response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error_type: ErrorType,
    pub message: String,
    pub details: Option<String>,
}

/// Error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Resource not found (404)
    NotFound,

    /// Invalid input (400)
    Validation,

    /// Lost a concurrent create; the caller may re-resolve (409)
    Conflict,

    /// Domain invariant violation (422)
    DomainError,

    /// Database/persistence error (500)
    Database,

    /// Other/unknown error (500)
    Internal,
}

impl ErrorResponse {
    fn new(error_type: ErrorType, message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            success: false,
            error_type,
            message: message.into(),
            details,
        }
    }

    /// Create error response from AppError
    pub fn from_app_error(error: AppError) -> Self {
        match error {
            AppError::NotFound => Self::new(ErrorType::NotFound, "Resource not found", None),

            AppError::InvalidInput(message) => Self::new(ErrorType::Validation, message, None),

            AppError::DuplicateKey(id) => Self::new(
                ErrorType::Conflict,
                format!("Batch {} was created concurrently", id),
                Some(id),
            ),

            AppError::Domain(domain_error) => Self::new(
                ErrorType::DomainError,
                "Domain validation failed",
                Some(domain_error.to_string()),
            ),

            AppError::Database(db_error) => {
                error!("Database error: {:?}", db_error);
                Self::new(
                    ErrorType::Database,
                    "Database operation failed",
                    Some("Check logs for details".to_string()),
                )
            }

            AppError::Pool(pool_error) => {
                error!("Connection pool error: {}", pool_error);
                Self::new(ErrorType::Database, "Database connection failed", None)
            }

            AppError::Serialization(serde_error) => {
                error!("Serialization error: {:?}", serde_error);
                Self::new(ErrorType::Internal, "Data serialization failed", None)
            }

            AppError::Io(io_error) => {
                error!("IO error: {:?}", io_error);
                Self::new(
                    ErrorType::Internal,
                    "File system operation failed",
                    Some(io_error.to_string()),
                )
            }

            AppError::Config(message) => {
                error!("Configuration error: {}", message);
                Self::new(ErrorType::Internal, "Invalid configuration", Some(message))
            }

            AppError::Other(message) => {
                error!("Other error: {}", message);
                Self::new(ErrorType::Internal, message, None)
            }
        }
    }

    /// Create validation error
    pub fn validation(message: String) -> Self {
        Self::new(ErrorType::Validation, message, None)
    }

    /// Create not found error
    pub fn not_found(resource: &str) -> Self {
        Self::new(ErrorType::NotFound, format!("{} not found", resource), None)
    }
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self::from_app_error(error)
    }
}
