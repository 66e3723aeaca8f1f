//! Indented JSON responses

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// JSON response body rendered with two-space indentation.
///
/// Behaves like [`axum::Json`] for responses, with an optional status code.
#[derive(Debug, Clone)]
pub struct IndentedJson<T> {
    status: StatusCode,
    value: T,
}

impl<T> IndentedJson<T> {
    /// Respond with `200 OK`
    pub fn ok(value: T) -> Self {
        Self::with_status(StatusCode::OK, value)
    }

    /// Respond with `201 Created`
    pub fn created(value: T) -> Self {
        Self::with_status(StatusCode::CREATED, value)
    }

    pub fn with_status(status: StatusCode, value: T) -> Self {
        Self { status, value }
    }
}

impl<T: Serialize> IntoResponse for IndentedJson<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec_pretty(&self.value) {
            Ok(body) => (
                self.status,
                [(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json; charset=utf-8"),
                )],
                body,
            )
                .into_response(),
            Err(err) => {
                tracing::error!(error = %err, "failed to serialize response body");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
