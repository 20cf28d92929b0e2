//! Mail errors

use thiserror::Error;

/// Errors raised while turning a request body into a [`MailRequest`](super::MailRequest)
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MailRequestError {
    /// The body is not valid JSON, or a field has the wrong type
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// `to`, `subject`, or both of `text` and `html` are missing
    #[error("missing required fields")]
    MissingFields,

    /// One of the recipient addresses is not a valid email address
    #[error("invalid email address")]
    InvalidAddress,
}

impl From<serde_json::Error> for MailRequestError {
    fn from(err: serde_json::Error) -> Self {
        MailRequestError::MalformedPayload(err.to_string())
    }
}

/// Mailer errors
#[derive(Debug, Error)]
pub enum MailerError {
    /// An address was rejected when building the message
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// An attachment could not be read
    #[error("could not read attachment {path}: {source}")]
    Attachment {
        /// The attachment's source path
        path: String,

        /// The underlying I/O error
        source: std::io::Error,
    },

    /// The message could not be built
    #[error("could not build message: {0}")]
    Build(String),

    /// The transport failed to deliver the message
    #[error("{0}")]
    Send(String),
}
