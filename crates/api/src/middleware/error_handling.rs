//! # Error Handling Middleware
//!
//! This module provides a standardized way to handle errors in the Shinebook
//! API. It maps domain-specific errors to appropriate HTTP status codes and
//! JSON error responses, ensuring a consistent error handling experience
//! across the entire API.
//!
//! The implementation is based on Axum's error handling mechanisms and
//! integrates with Shinebook's custom error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use shinebook_core::errors::BookingError;
use tower::BoxError;

/// Application error wrapper that provides HTTP status code mapping
///
/// `AppError` wraps domain-specific `BookingError` instances and implements
/// `IntoResponse` to convert them into HTTP responses with appropriate
/// status codes and JSON payloads.
///
/// # Example
///
/// ```
/// use axum::Json;
/// use shinebook_api::middleware::error_handling::AppError;
/// use shinebook_core::errors::BookingError;
/// use uuid::Uuid;
///
/// struct BookingView {}
///
/// async fn lookup(_id: Uuid) -> Option<BookingView> {
///     None
/// }
///
/// async fn handler(id: Uuid) -> Result<Json<BookingView>, AppError> {
///     let booking = lookup(id)
///         .await
///         .ok_or_else(|| BookingError::NotFound(format!("Booking {} not found", id)))?;
///
///     Ok(Json(booking))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub BookingError);

/// Converts application errors to HTTP responses
///
/// Maps each error type to the appropriate HTTP status code and formats the
/// error message into a JSON response body. State and conflict violations
/// both answer 409 so clients can distinguish a retryable slot race from a
/// malformed request.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map error types to HTTP status codes
        let status = match &self.0 {
            BookingError::NotFound(_) => StatusCode::NOT_FOUND,
            BookingError::Validation(_) => StatusCode::BAD_REQUEST,
            BookingError::InvalidState(_) => StatusCode::CONFLICT,
            BookingError::SlotConflict(_) => StatusCode::CONFLICT,
            BookingError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BookingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Get the error message and format as JSON
        let message = self.0.to_string();
        let body = Json(json!({ "error": message }));

        // Combine status code and JSON body into a response
        (status, body).into_response()
    }
}

/// Automatic conversion from BookingError to AppError
///
/// This implementation allows using `?` operator with functions that return
/// `Result<T, BookingError>` in handler functions that return
/// `Result<T, AppError>`.
impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError(err)
    }
}

/// Automatic conversion from eyre::Report to AppError
///
/// This implementation allows using `?` operator with functions that return
/// `Result<T, eyre::Report>` in handler functions that return
/// `Result<T, AppError>`. It wraps the eyre error in a
/// `BookingError::Database` variant.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(BookingError::Database(err))
    }
}

/// Maps a BookingError to an HTTP response
///
/// # Example
///
/// ```ignore
/// use axum::response::IntoResponse;
/// use shinebook_api::middleware::error_handling::map_error;
/// use shinebook_core::errors::BookingError;
///
/// async fn legacy_handler() -> impl IntoResponse {
///     map_error(BookingError::NotFound("Booking not found".to_string()))
/// }
/// ```
pub fn map_error(err: BookingError) -> Response {
    AppError(err).into_response()
}

/// Converts errors escaping the middleware stack into responses
///
/// The timeout layer is the only fallible layer in the stack: an elapsed
/// timer answers `408 Request Timeout`, anything else answers 500.
pub async fn handle_timeout_error(err: BoxError) -> Response {
    if err.is::<tower::timeout::error::Elapsed>() {
        (
            StatusCode::REQUEST_TIMEOUT,
            Json(json!({ "error": "Request timed out" })),
        )
            .into_response()
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Unhandled internal error: {}", err) })),
        )
            .into_response()
    }
}
