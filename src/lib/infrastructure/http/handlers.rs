//! API handler modules

use std::any::Any;

use axum::{
    body::Body,
    http::{Response, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::error;

use super::errors::ErrorResponse;

pub mod send_mail;

/// Catch panics and return a 500 error, carrying the panic message as details
pub fn panic_handler(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        Some(s.clone())
    } else {
        err.downcast_ref::<&str>().map(|s| s.to_string())
    };

    error!(panic = ?details, "handler panicked");

    let error = ErrorResponse {
        error: "Internal server error".to_string(),
        details,
    };

    (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
}
