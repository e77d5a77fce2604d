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
    Domain(DomainError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Caller-supplied data could not be interpreted (bad date, bad id)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Insert lost a race against another writer for the same batch id
    #[error("Batch '{0}' already exists")]
    DuplicateKey(String),

    #[error("Resource not found")]
    NotFound,

    #[error("Other error: {0}")]
    Other(String),
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidInput(message) => AppError::InvalidInput(message),
            other => AppError::Domain(other),
        }
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<chrono::ParseError> for AppError {
    fn from(err: chrono::ParseError) -> Self {
        AppError::InvalidInput(format!("Date parse error: {}", err))
    }
}

impl From<r2d2::Error> for AppError {
    fn from(err: r2d2::Error) -> Self {
        AppError::Pool(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_chrono_parse_error_is_invalid_input() {
        let err: AppError = NaiveDate::parse_from_str("not-a-date", "%Y-%m-%d")
            .unwrap_err()
            .into();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_domain_input_errors_become_invalid_input() {
        let err: AppError = DomainError::InvalidInput("bad id".to_string()).into();
        assert!(matches!(err, AppError::InvalidInput(ref m) if m == "bad id"));

        let err: AppError = DomainError::InvariantViolation("blank".to_string()).into();
        assert!(matches!(err, AppError::Domain(_)));
    }

    #[test]
    fn test_serializes_as_message() {
        let json = serde_json::to_string(&AppError::DuplicateKey("4".to_string())).unwrap();
        assert_eq!(json, "\"Batch '4' already exists\"");
    }
}
