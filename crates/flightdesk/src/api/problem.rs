//! RFC 9457 Problem Details error bodies.
//!
//! See: <https://www.rfc-editor.org/rfc/rfc9457.html>

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::Error;

/// Problem type URI for rejected flight records and malformed requests.
pub const PROBLEM_INVALID_REQUEST: &str = "/problems/invalid-request";

/// Problem type URI for flights that do not exist.
pub const PROBLEM_NOT_FOUND: &str = "/problems/not-found";

/// Problem type URI for internal server errors.
pub const PROBLEM_INTERNAL_ERROR: &str = "/problems/internal-error";

/// Problem Details response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// URI reference identifying the problem type (relative).
    #[serde(rename = "type")]
    pub type_uri: String,

    /// Short, human-readable summary of the problem.
    pub title: String,

    /// HTTP status code for this problem.
    pub status: u16,

    /// Human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ProblemDetails {
    /// Create a new `ProblemDetails` with required fields.
    pub fn new(type_uri: impl Into<String>, title: impl Into<String>, status: StatusCode) -> Self {
        Self {
            type_uri: type_uri.into(),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
        }
    }

    /// Add a detailed explanation of this specific problem occurrence.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// The HTTP status this problem is sent with.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<&Error> for ProblemDetails {
    fn from(err: &Error) -> Self {
        match err {
            Error::Validation { message } => Self::new(
                PROBLEM_INVALID_REQUEST,
                "Bad Request",
                StatusCode::BAD_REQUEST,
            )
            .with_detail(message.clone()),
            Error::NotFound { message } => {
                Self::new(PROBLEM_NOT_FOUND, "Not Found", StatusCode::NOT_FOUND)
                    .with_detail(message.clone())
            }
            other => Self::new(
                PROBLEM_INTERNAL_ERROR,
                "Internal Server Error",
                StatusCode::INTERNAL_SERVER_ERROR,
            )
            .with_detail(other.to_string()),
        }
    }
}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut response = (status, Json(&self)).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/problem+json"),
        );
        response
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let problem = ProblemDetails::from(&self);
        if problem.status_code().is_server_error() {
            error!(error = %self, "request failed");
        }
        problem.into_response()
    }
}
