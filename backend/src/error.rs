//! Service error handling
//!
//! Every service and repository returns [`ServiceError`]. Validation
//! failures keep their field-level detail so the host UI can show the
//! alert title and message.

use bmigo_shared::ValidationError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Error type returned by backend services
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

/// Error body handed to the UI host
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ServiceError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Validation(err) => err.code(),
            ServiceError::NotFound(_) => "NOT_FOUND",
            ServiceError::Database(_) => "DATABASE_ERROR",
            ServiceError::Export(_) => "EXPORT_ERROR",
            ServiceError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert into the shape shown to users, logging internal failures
    pub fn to_detail(&self) -> ErrorDetail {
        let (title, message, field) = match self {
            ServiceError::Validation(err) => (
                err.title().to_string(),
                err.to_string(),
                Some(err.field().to_string()),
            ),
            ServiceError::NotFound(msg) => ("Not Found".to_string(), msg.clone(), None),
            ServiceError::Export(msg) => ("Export Failed".to_string(), msg.clone(), None),
            ServiceError::Database(err) => {
                error!("Database error: {:?}", err);
                (
                    "Storage Error".to_string(),
                    "A storage error occurred".to_string(),
                    None,
                )
            }
            ServiceError::Internal(err) => {
                error!("Internal error: {:?}", err);
                (
                    "Error".to_string(),
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        ErrorDetail {
            code: self.code().to_string(),
            title,
            message,
            field,
        }
    }
}

/// Result type alias for services
pub type ServiceResult<T> = Result<T, ServiceError>;
