//! Application error types

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// The backend could not be reached at all (DNS, refused connection)
    #[error("Não foi possível conectar ao backend. Verifique se o servidor está rodando em {base_url}")]
    Unreachable {
        base_url: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// The backend answered with a non-success status
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    /// Error recorded by a cached query, shared with every reader of the entry
    #[error(transparent)]
    Shared(Arc<AppError>),
}

impl AppError {
    /// Build the error used when the backend is unreachable
    pub fn unreachable(base_url: impl Into<String>, source: Option<reqwest::Error>) -> Self {
        AppError::Unreachable {
            base_url: base_url.into(),
            source,
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unreachable { .. } => "UNREACHABLE",
            AppError::Api { .. } => "API_ERROR",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
            AppError::Http(_) => "HTTP_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
            AppError::Shared(inner) => inner.code(),
        }
    }

    /// HTTP status carried by the error, if the backend answered
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Api { status, .. } => Some(*status),
            AppError::Http(err) => err.status().map(|s| s.as_u16()),
            AppError::Shared(inner) => inner.status(),
            _ => None,
        }
    }

    /// True when the server was reachable but rejected the request
    pub fn is_api_error(&self) -> bool {
        match self {
            AppError::Shared(inner) => inner.is_api_error(),
            other => matches!(other, AppError::Api { .. }),
        }
    }

    pub fn is_unreachable(&self) -> bool {
        match self {
            AppError::Shared(inner) => inner.is_unreachable(),
            other => matches!(other, AppError::Unreachable { .. }),
        }
    }
}

/// Serializable error response for the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        ErrorResponse {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        ErrorResponse::from(self).serialize(serializer)
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_displays_detail_verbatim() {
        let err = AppError::Api {
            status: 503,
            message: "DB unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "DB unavailable");
        assert_eq!(err.status(), Some(503));
        assert!(err.is_api_error());
    }

    #[test]
    fn test_unreachable_names_base_url() {
        let err = AppError::unreachable("http://localhost:8000", None);
        assert!(err.to_string().contains("http://localhost:8000"));
        assert!(err.is_unreachable());
        assert_eq!(err.code(), "UNREACHABLE");
    }

    #[test]
    fn test_error_response_serialization() {
        let err = AppError::Validation("bad range".to_string());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["message"], "Validation error: bad range");
    }

    #[test]
    fn test_shared_error_is_transparent() {
        let err = AppError::Shared(Arc::new(AppError::Api {
            status: 503,
            message: "DB unavailable".to_string(),
        }));
        assert_eq!(err.to_string(), "DB unavailable");
        assert_eq!(err.code(), "API_ERROR");
        assert_eq!(err.status(), Some(503));
        assert!(err.is_api_error());
        assert!(!err.is_unreachable());
    }
}
