//! API error-handling module

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::mail::MailRequestError;

/// An error response
#[derive(Debug, Deserialize, Serialize)]
pub struct ErrorResponse {
    /// The error message
    pub error: String,

    /// Details of the underlying failure, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// An error raised in the API
#[derive(Debug)]
pub struct ApiError {
    /// The status code
    pub status: StatusCode,

    /// The error message
    pub message: String,

    /// Details of the underlying failure
    pub details: Option<String>,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            message: message.to_string(),
            details: None,
        }
    }

    /// Create a new bad request error
    pub fn new_400(message: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Create a new method not allowed error
    pub fn new_405() -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    }

    /// Create new internal server error
    pub fn new_500(message: &str) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Attach details of the underlying failure
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{}: {}", self.message, details),
            None => write!(f, "{}", self.message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
                details: self.details,
            }),
        )
            .into_response()
    }
}

impl From<MailRequestError> for ApiError {
    fn from(err: MailRequestError) -> Self {
        match err {
            MailRequestError::MalformedPayload(message) => {
                ApiError::new_400(&format!("Error processing JSON request: {message}"))
            }
            MailRequestError::MissingFields => {
                ApiError::new_400("Missing required fields in JSON")
            }
            MailRequestError::InvalidAddress => ApiError::new_400("Invalid email address format"),
        }
    }
}
