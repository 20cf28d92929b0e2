//! Send mail handler

use axum::{
    extract::{Request, State},
    http::{header::CONTENT_TYPE, HeaderMap, Method, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::{
    domain::mail::{join_addresses, DispatchOutcome, MailRequest, MailService},
    infrastructure::http::{body::accumulate, errors::ApiError, state::AppState},
};

/// Send mail response body
#[derive(Debug, Serialize, Deserialize)]
pub struct SendMailResponse {
    /// Confirmation message
    pub message: String,

    /// The transport's response
    pub response: String,
}

/// Validate a JSON email description and relay it through the mail transport
pub async fn handler<M: MailService>(
    State(state): State<AppState<M>>,
    request: Request,
) -> Result<(StatusCode, Json<SendMailResponse>), ApiError> {
    info!(method = %request.method(), uri = %request.uri(), "request received");

    if request.method() != Method::POST || !is_json(request.headers()) {
        error!(method = %request.method(), "method not allowed");
        return Err(ApiError::new_405());
    }

    let body = accumulate(request.into_body().into_data_stream())
        .await
        .map_err(|e| {
            error!(error = %e, "request error");
            ApiError::new_500("Request error").with_details(e.to_string())
        })?;

    let json = MailRequest::parse_json(&body).map_err(|e| {
        error!(error = %e, "malformed JSON body");
        ApiError::from(e)
    })?;

    info!(json = %json, "JSON parsed");

    let mail = MailRequest::from_value(json).map_err(|e| {
        error!(error = %e, "invalid mail request");
        ApiError::from(e)
    })?;

    info!(
        to = %join_addresses(mail.to()),
        subject = mail.subject(),
        attachments = mail.attachments().len(),
        "mail request validated"
    );

    match state.mail.send_mail(mail).await {
        DispatchOutcome::Sent(response) => Ok((
            StatusCode::OK,
            Json(SendMailResponse {
                message: "Email sent successfully".to_string(),
                response,
            }),
        )),
        DispatchOutcome::Failed(details) => {
            Err(ApiError::new_500("Error sending email").with_details(details))
        }
    }
}

/// Whether the request declares a JSON body, ignoring media type parameters
fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|media_type| media_type.trim().eq_ignore_ascii_case("application/json"))
}
