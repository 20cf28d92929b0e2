//! Email Address

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use EmailAddressError::*;

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^@\s]+@[^@\s.]+(?:\.[^@\s.]+)+$").unwrap();
}

/// Returns `true` if `raw` has the shape `local@domain.tld`.
///
/// The local part must be non-empty and contain no whitespace or `@`. The domain must be made of
/// at least two non-empty, dot-separated labels containing no whitespace or `@`.
pub fn is_valid_email_address(raw: &str) -> bool {
    EMAIL_REGEX.is_match(raw)
}

/// An error that can occur when creating an email address
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmailAddressError {
    /// The email address is empty
    #[error("email is empty")]
    EmptyEmailAddress,

    /// The email address is invalid
    #[error("email is invalid")]
    InvalidEmailAddress,
}

/// A syntactically valid email address
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new email address
    pub fn new(raw: &str) -> Result<Self, EmailAddressError> {
        if raw.is_empty() {
            return Err(EmptyEmailAddress);
        }

        if !is_valid_email_address(raw) {
            return Err(InvalidEmailAddress);
        }

        Ok(Self(raw.to_string()))
    }

    /// Returns the address as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(email: EmailAddress) -> Self {
        email.0
    }
}

/// Joins addresses into a single comma-separated list, as used in `To`, `Cc` and `Bcc` headers.
pub fn join_addresses(addresses: &[EmailAddress]) -> String {
    addresses
        .iter()
        .map(EmailAddress::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
