//! Error handler for converting AppError to HTTP responses.
//!
//! `AppError` implements `IntoResponse` here and nowhere else, so status
//! code mapping lives in one place. [`error_response_middleware`] stamps the
//! request ID onto error bodies and gives plain-text framework errors (404
//! for unknown routes, 405, ...) the same JSON shape.

use axum::{
    Json,
    extract::Request,
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::RequestId;
use crate::api::dto::ErrorResponse;
use crate::error::AppError;

/// Non-standard status used when the caller's request was cancelled.
pub const CLIENT_CLOSED_REQUEST: u16 = 499;

impl IntoResponse for AppError {
    /// Converts an AppError into an HTTP response.
    ///
    /// # Status Code Mapping
    /// - NotFound → 404 NOT_FOUND
    /// - Validation → 400 BAD_REQUEST, field errors in `details.errors`
    /// - BadRequest → 400 BAD_REQUEST
    /// - Cancelled → 499 (client closed request)
    /// - PersistenceFailure → 500 INTERNAL_SERVER_ERROR
    /// - Configuration → 500 INTERNAL_SERVER_ERROR
    /// - Internal → 500 INTERNAL_SERVER_ERROR
    ///
    /// The body is also attached as a response extension so the error
    /// middleware can add the request ID.
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);
        if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        }

        let body = error_to_body(&self);
        let mut response = (status, Json(body.clone())).into_response();
        response.extensions_mut().insert(body);
        response
    }
}

/// Maps an AppError variant to its corresponding HTTP status code.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Validation { .. } => StatusCode::BAD_REQUEST,
        AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::Cancelled => {
            StatusCode::from_u16(CLIENT_CLOSED_REQUEST).unwrap_or(StatusCode::BAD_REQUEST)
        }
        AppError::PersistenceFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Maps an AppError variant to its error code string.
pub fn error_to_code(error: &AppError) -> &'static str {
    match error {
        AppError::NotFound { .. } => "NOT_FOUND",
        AppError::Validation { .. } => "VALIDATION_ERROR",
        AppError::BadRequest { .. } => "BAD_REQUEST",
        AppError::Cancelled => "REQUEST_CANCELLED",
        AppError::PersistenceFailure { .. } => "PERSISTENCE_FAILURE",
        AppError::Configuration { .. } => "CONFIGURATION_ERROR",
        AppError::Internal { .. } => "INTERNAL_ERROR",
    }
}

fn error_to_body(error: &AppError) -> ErrorResponse {
    let code = error_to_code(error);
    match error {
        AppError::NotFound { message } | AppError::BadRequest { message } => {
            ErrorResponse::new(code, message)
        }
        AppError::Validation { errors } => ErrorResponse::validation_error(errors),
        AppError::Cancelled => ErrorResponse::new(code, "The request was cancelled"),
        AppError::PersistenceFailure { operation } => ErrorResponse::new(
            code,
            &format!("Store operation failed: {}", operation),
        ),
        // Sources stay in the logs
        AppError::Configuration { .. } => ErrorResponse::new(code, "Configuration error"),
        AppError::Internal { .. } => ErrorResponse::new(code, "An internal error occurred"),
    }
}

/// Adds the request ID to error bodies and converts non-JSON error responses
/// into [`ErrorResponse`].
///
/// Must run inside [`request_id_middleware`](super::request_id_middleware).
pub async fn error_response_middleware(request: Request, next: Next) -> Response {
    let request_id = request.extensions().get::<RequestId>().cloned();
    let response = next.run(request).await;
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let body = match response.extensions().get::<ErrorResponse>() {
        Some(body) => body.clone(),
        None if is_json(response.headers()) => return response,
        None => fallback_body(status),
    };
    let body = match &request_id {
        Some(RequestId(id)) => body.with_request_id(id),
        None => body,
    };

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.remove(header::CONTENT_TYPE);

    let mut rebuilt = (status, Json(body)).into_response();
    rebuilt.headers_mut().extend(parts.headers);
    rebuilt
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"))
}

fn fallback_body(status: StatusCode) -> ErrorResponse {
    let (code, message) = match status {
        StatusCode::NOT_FOUND => ("NOT_FOUND", "The requested resource was not found"),
        StatusCode::METHOD_NOT_ALLOWED => {
            ("METHOD_NOT_ALLOWED", "HTTP method not allowed for this endpoint")
        }
        StatusCode::UNSUPPORTED_MEDIA_TYPE => ("UNSUPPORTED_MEDIA_TYPE", "Unsupported media type"),
        StatusCode::PAYLOAD_TOO_LARGE => ("PAYLOAD_TOO_LARGE", "Request payload too large"),
        s if s.is_server_error() => ("INTERNAL_ERROR", "An internal error occurred"),
        _ => ("BAD_REQUEST", "Bad request"),
    };
    ErrorResponse::new(code, message)
}
