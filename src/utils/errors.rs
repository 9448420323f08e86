//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::services::trip_status::InvalidTransition;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("JWT error: {0}")]
    Jwt(String),

    #[error("Hash error: {0}")]
    Hash(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error para la API
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl AppError {
    /// Código HTTP, etiqueta y código estable de cada variante
    fn classify(&self) -> (StatusCode, &'static str, &'static str) {
        match self {
            AppError::Database(e) if is_unique_violation(e) => {
                (StatusCode::CONFLICT, "Conflict", "DUPLICATE_KEY")
            }
            AppError::Database(sqlx::Error::RowNotFound) => {
                (StatusCode::NOT_FOUND, "Not Found", "NOT_FOUND")
            }
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Database Error", "DB_ERROR"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "Validation Error", "VALIDATION_ERROR"),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "Unauthorized", "UNAUTHORIZED"),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "Forbidden", "FORBIDDEN"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "Not Found", "NOT_FOUND"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "Conflict", "CONFLICT"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "Bad Request", "BAD_REQUEST"),
            AppError::InvalidTransition(_) => (
                StatusCode::BAD_REQUEST,
                "Invalid Status Transition",
                "INVALID_STATUS_TRANSITION",
            ),
            AppError::RateLimitExceeded => {
                (StatusCode::TOO_MANY_REQUESTS, "Rate Limit Exceeded", "RATE_LIMIT_EXCEEDED")
            }
            AppError::Jwt(_) => (StatusCode::UNAUTHORIZED, "JWT Error", "JWT_ERROR"),
            AppError::Hash(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Hash Error", "HASH_ERROR"),
            AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", "INTERNAL_ERROR")
            }
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.classify().0
    }

    fn to_error_response(&self) -> ErrorResponse {
        let (_, label, code) = self.classify();

        let (message, details) = match self {
            AppError::Database(e) if is_unique_violation(e) => (
                "A record with the same unique value already exists".to_string(),
                None,
            ),
            AppError::Database(sqlx::Error::RowNotFound) => ("Resource not found".to_string(), None),
            AppError::Database(_) => (
                "An error occurred while accessing the database".to_string(),
                None,
            ),
            AppError::Validation(e) => ("The provided data is invalid".to_string(), Some(json!(e))),
            AppError::InvalidTransition(t) => (
                t.to_string(),
                Some(json!({
                    "current_status": t.current,
                    "requested_status": t.requested,
                })),
            ),
            AppError::RateLimitExceeded => {
                ("Too many requests. Please try again later".to_string(), None)
            }
            AppError::Hash(_) => (
                "An error occurred while processing credentials".to_string(),
                None,
            ),
            AppError::Internal(_) => ("An unexpected error occurred".to_string(), None),
            AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::BadRequest(msg)
            | AppError::Jwt(msg) => (msg.clone(), None),
        };

        ErrorResponse {
            error: label.to_string(),
            message,
            details,
            code: Some(code.to_string()),
        }
    }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .and_then(|db| db.code())
        .map(|code| code == "23505")
        .unwrap_or(false)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("❌ {}", self);
        } else {
            warn!("⚠️ {}", self);
        }

        (status, Json(self.to_error_response())).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de validación de un único campo
pub fn validation_error(field: &'static str, message: &'static str) -> AppError {
    use validator::ValidationError;

    let mut error = ValidationError::new("custom");
    error.message = Some(message.into());

    let mut errors = validator::ValidationErrors::new();
    errors.add(field, error);

    AppError::Validation(errors)
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str) -> AppError {
    AppError::NotFound(format!("{} not found", resource))
}

/// Función helper para crear errores de conflicto
pub fn conflict_error(resource: &str, field: &str, value: &str) -> AppError {
    AppError::Conflict(format!("{} with {} '{}' already exists", resource, field, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::trip::TripStatus;

    #[test]
    fn test_invalid_transition_maps_to_bad_request() {
        let err = AppError::from(InvalidTransition {
            current: TripStatus::Completed,
            requested: TripStatus::Upcoming,
        });
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let body = err.to_error_response();
        assert_eq!(body.code.as_deref(), Some("INVALID_STATUS_TRANSITION"));
        assert_eq!(body.message, "Invalid status transition from Completed to Upcoming");
        let details = body.details.unwrap();
        assert_eq!(details["current_status"], "Completed");
        assert_eq!(details["requested_status"], "Upcoming");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::Unauthorized("x".into()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Jwt("x".into()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::RateLimitExceeded.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            AppError::Database(sqlx::Error::RowNotFound).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Database(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_details_are_not_leaked() {
        let body = AppError::Internal("secret stack".into()).to_error_response();
        assert_eq!(body.message, "An unexpected error occurred");
        assert!(body.details.is_none());
    }

    #[test]
    fn test_validation_error_helper() {
        let body = validation_error("email", "Email is required").to_error_response();
        assert_eq!(body.code.as_deref(), Some("VALIDATION_ERROR"));
        assert!(body.details.unwrap()["email"].is_array());
    }
}
