//! HTTP error response conversion
//!
//! This module provides HTTP-specific error response conversion for AppError.
//!
//! **Preferred handler pattern:** Return `Result<impl IntoResponse, HttpAppError>`. Use
//! `AppError` (or types that implement `Into<AppError>`) for errors and `?` so they
//! become `HttpAppError` and render consistently (status, body, logging).

use axum::{
    extract::rejection::JsonRejection,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use tubely_core::{AppError, ErrorMetadata, LogLevel};
use tubely_processing::{ProcessingError, ValidationError};
use tubely_storage::StorageError;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rules: IntoResponse and AppError are both foreign to this crate)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

macro_rules! into_http_error {
    ($($source:ty),+ $(,)?) => {
        $(
            impl From<$source> for HttpAppError {
                fn from(err: $source) -> Self {
                    HttpAppError(AppError::from(err))
                }
            }
        )+
    };
}

into_http_error!(AppError, anyhow::Error, StorageError, ProcessingError, ValidationError);

/// Convert JSON body deserialization failures into a 400 with our ErrorResponse format.
impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

/// JSON body extractor that returns our ErrorResponse format (400 + JSON) on deserialization failure.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        Ok(ValidatedJson(inner))
    }
}

impl ErrorResponse {
    fn new(err: &AppError, expose_details: bool) -> Self {
        let (details, error_type) = if expose_details {
            (
                Some(err.detailed_message()),
                Some(err.error_type().to_string()),
            )
        } else {
            (None, None)
        };

        ErrorResponse {
            error: err.client_message(),
            details,
            error_type,
            code: err.error_code().to_string(),
            recoverable: err.is_recoverable(),
            suggested_action: err.suggested_action().map(String::from),
        }
    }
}

fn is_production() -> bool {
    ["ENVIRONMENT", "APP_ENV"]
        .iter()
        .find_map(|key| std::env::var(key).ok())
        .is_some_and(|env| matches!(env.to_ascii_lowercase().as_str(), "production" | "prod"))
}

impl HttpAppError {
    fn log(&self) {
        let err = &self.0;
        let code = err.error_code();
        match err.log_level() {
            LogLevel::Debug => tracing::debug!(error = %err, code, "Request failed"),
            LogLevel::Warn => tracing::warn!(error = %err, code, "Request failed"),
            LogLevel::Error => tracing::error!(
                error = %err,
                code,
                details = %err.detailed_message(),
                "Request failed"
            ),
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        self.log();

        let status = StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let expose_details = !self.0.is_sensitive() && !is_production();

        (status, Json(ErrorResponse::new(&self.0, expose_details))).into_response()
    }
}
