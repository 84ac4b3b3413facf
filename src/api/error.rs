use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Integrity Rejected: {0}")]
    IntegrityRejected(String),

    #[error("Storage Failure: {0}")]
    StorageFailure(String),

    #[error("Validation Failed: {0}")]
    Validation(String),

    #[error("Too Many Requests")]
    TooManyRequests { retry_after_secs: u64 },

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl AppError {
    /// Classifies a failed write. Constraint violations become
    /// `IntegrityRejected`, anything else becomes `StorageFailure`.
    pub fn from_write(context: &str, err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg))
            | Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
                AppError::IntegrityRejected(format!("{}: {}", context, msg))
            }
            _ => AppError::StorageFailure(format!("{}: {}", context, err)),
        }
    }

    /// Re-labels a missing referenced row as a rejected write.
    pub fn into_rejected(self, context: &str) -> Self {
        match self {
            AppError::NotFound(msg) => AppError::IntegrityRejected(format!("{}: {}", context, msg)),
            other => other,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut retry_after = None;

        let (status, message) = match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::IntegrityRejected(msg) => {
                tracing::warn!("Write rejected: {}", msg);
                (StatusCode::BAD_REQUEST, msg)
            }
            AppError::StorageFailure(msg) => {
                tracing::warn!("Storage failure: {}", msg);
                (StatusCode::BAD_REQUEST, msg)
            }
            AppError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::TooManyRequests { retry_after_secs } => {
                retry_after = Some(retry_after_secs);
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    "Too Many Requests".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message
        }));

        let mut response = (status, body).into_response();
        if let Some(secs) = retry_after {
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::NotFound("Post not found".into()), StatusCode::NOT_FOUND),
            (
                AppError::IntegrityRejected("Post creation failed".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::StorageFailure("Tag deletion failed".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::Validation("name: length".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::Database(DbErr::Custom("boom".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_too_many_requests_sets_retry_after() {
        let response = AppError::TooManyRequests {
            retry_after_secs: 7,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "7");
    }

    #[test]
    fn test_into_rejected_only_relabels_not_found() {
        let err = AppError::NotFound("Author not found".into()).into_rejected("Post creation failed");
        assert!(
            matches!(err, AppError::IntegrityRejected(ref m) if m == "Post creation failed: Author not found")
        );

        let err = AppError::Validation("bad".into()).into_rejected("Post creation failed");
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_from_write_without_constraint_is_storage_failure() {
        let err = AppError::from_write("Tag update failed", DbErr::Custom("disk full".into()));
        assert!(matches!(err, AppError::StorageFailure(ref m) if m.starts_with("Tag update failed")));
    }
}
