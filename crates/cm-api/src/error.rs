use std::{borrow::Cow, future::Future};

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use cm_common::db::{CvStorageError, JobStorageError};
use cm_common::parser::ParserError;

tokio::task_local! {
    static REQUEST_ID: String;
}

fn sanitize_message(message: &str) -> String {
    const MAX_CHARS: usize = 240;

    let mut cleaned = message
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .replace(['\n', '\r'], " ");

    cleaned = cleaned
        .split_whitespace()
        .map(|token| {
            if token.contains("://") {
                "[redacted-url]".to_string()
            } else if token.starts_with('/') || token.contains('\\') {
                "[redacted-path]".to_string()
            } else {
                token.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    // Truncate by characters, not bytes; byte truncation panics mid-way
    // through a multibyte character.
    if cleaned.chars().count() > MAX_CHARS {
        cleaned = cleaned.chars().take(MAX_CHARS).collect();
        cleaned.push('…');
    }

    if cleaned.trim().is_empty() {
        "unexpected error".to_string()
    } else {
        cleaned
    }
}

pub async fn with_request_id<Fut, T>(request_id: Option<String>, fut: Fut) -> T
where
    Fut: Future<Output = T>,
{
    if let Some(request_id) = request_id {
        REQUEST_ID.scope(request_id, fut).await
    } else {
        fut.await
    }
}

pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(|value| value.clone()).ok()
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("database error: {0}")]
    Database(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unprocessable document: {0}")]
    Unprocessable(String),
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("internal server error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    code: &'static str,
    message: String,
    request_id: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let code = self.code();
        let request_id = current_request_id();

        error!(
            code,
            status = %status,
            request_id = request_id.as_deref().unwrap_or(""),
            error = %self,
            "api_error"
        );

        let body = Json(ErrorResponse {
            code,
            message: self.public_message().into_owned(),
            request_id,
        });

        (status, body).into_response()
    }
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::Unprocessable(_) => "unprocessable_document",
            ApiError::ServiceUnavailable(_) => "service_unavailable",
            ApiError::Database(_) => "database_error",
            ApiError::Internal(_) => "internal_error",
        }
    }

    fn public_message(&self) -> Cow<'static, str> {
        match self {
            ApiError::BadRequest(msg) => Cow::Owned(sanitize_message(msg)),
            ApiError::Unauthorized(_) => Cow::Borrowed("unauthorized"),
            ApiError::Forbidden(_) => Cow::Borrowed("forbidden"),
            ApiError::NotFound(msg) => Cow::Owned(sanitize_message(msg)),
            ApiError::Unprocessable(msg) => Cow::Owned(sanitize_message(msg)),
            ApiError::ServiceUnavailable(_) => Cow::Borrowed("service unavailable"),
            ApiError::Database(_) | ApiError::Internal(_) => Cow::Borrowed("internal server error"),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CvStorageError> for ApiError {
    fn from(value: CvStorageError) -> Self {
        match value {
            CvStorageError::NotFound(msg) => ApiError::NotFound(msg),
            other => ApiError::Database(other.to_string()),
        }
    }
}

impl From<JobStorageError> for ApiError {
    fn from(value: JobStorageError) -> Self {
        match value {
            JobStorageError::NotFound(msg) => ApiError::NotFound(msg),
            JobStorageError::Ownership(msg) => ApiError::Forbidden(msg),
            other => ApiError::Database(other.to_string()),
        }
    }
}

impl From<ParserError> for ApiError {
    fn from(value: ParserError) -> Self {
        match value {
            ParserError::UnsupportedFormat(ext) => {
                ApiError::BadRequest(format!("unsupported file format: {ext}"))
            }
            ParserError::ExtractionFailed(msg) => ApiError::Unprocessable(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;
    use serde_json::Value;

    use super::*;

    #[tokio::test]
    async fn includes_request_id_in_response_body_when_present() {
        let err = ApiError::Internal("boom".into());
        let response = with_request_id(Some("req-123".into()), async { err.into_response() }).await;

        let (parts, body) = response.into_parts();
        assert_eq!(parts.status, StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = body.collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["request_id"], "req-123");
        assert_eq!(json["code"], "internal_error");
        assert_eq!(json["message"], "internal server error");
    }

    #[test]
    fn not_found_redacts_paths_in_public_message() {
        let err = ApiError::NotFound("missing /var/uploads/cv-1.pdf".into());
        assert_eq!(err.public_message(), "missing [redacted-path]");
    }

    #[tokio::test]
    async fn long_multibyte_messages_truncate_on_char_boundaries() {
        // A client-supplied extension lands verbatim in the public message;
        // 300 two-byte characters used to hit a byte-index truncation panic
        // while the response body was being rendered.
        let err: ApiError = ParserError::UnsupportedFormat("é".repeat(300)).into();

        let message = err.public_message().into_owned();
        assert!(message.ends_with('…'));
        assert_eq!(message.chars().count(), 241);

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn storage_errors_map_to_expected_statuses() {
        let not_found: ApiError = CvStorageError::NotFound("no CV".into()).into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let forbidden: ApiError = JobStorageError::Ownership("not yours".into()).into();
        assert_eq!(forbidden.status_code(), StatusCode::FORBIDDEN);

        let unsupported: ApiError = ParserError::UnsupportedFormat("odt".into()).into();
        assert_eq!(unsupported.status_code(), StatusCode::BAD_REQUEST);

        let corrupt: ApiError = ParserError::ExtractionFailed("bad pdf".into()).into();
        assert_eq!(corrupt.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
