//! Mail send requests

use std::path::PathBuf;

use serde::Deserialize;
use serde_json::Value;

use super::{
    attachments::Attachment, email_address::EmailAddress, errors::MailRequestError,
    message::OutgoingMail,
};

/// The raw JSON body, before any validation
#[derive(Debug, Deserialize)]
struct SendMailBody {
    to: Option<Vec<String>>,
    cc: Option<Vec<String>>,
    bcc: Option<Vec<String>>,
    subject: Option<String>,
    text: Option<String>,
    html: Option<String>,
    attachments: Option<Vec<String>>,
}

/// A validated request to send one email.
///
/// Only [`MailRequest::from_json`] creates one, so every value holds at least one valid `to`
/// address, valid `cc`/`bcc` addresses, a subject and at least one body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MailRequest {
    to: Vec<EmailAddress>,
    cc: Vec<EmailAddress>,
    bcc: Vec<EmailAddress>,
    subject: String,
    text: Option<String>,
    html: Option<String>,
    attachments: Vec<PathBuf>,
}

impl MailRequest {
    /// Parses and validates a JSON request body.
    ///
    /// # Errors
    /// - [`MailRequestError::MalformedPayload`] if the body is not JSON, is `null`, or a field has
    ///   the wrong type.
    /// - [`MailRequestError::MissingFields`] if `to` or `subject` is missing, or if neither `text`
    ///   nor `html` is present. Empty strings and an empty `to` list count as missing.
    /// - [`MailRequestError::InvalidAddress`] if any `to` address, or any non-empty `cc`/`bcc`
    ///   address, is not a valid email address.
    pub fn from_json(body: &[u8]) -> Result<Self, MailRequestError> {
        Self::from_value(Self::parse_json(body)?)
    }

    /// Parses a request body as JSON, without validating its content
    pub fn parse_json(body: &[u8]) -> Result<Value, MailRequestError> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Validates an already parsed JSON body; see [`MailRequest::from_json`]
    pub fn from_value(value: Value) -> Result<Self, MailRequestError> {
        if value.is_null() {
            return Err(MailRequestError::MalformedPayload(
                "expected a JSON object, found null".to_string(),
            ));
        }

        if !value.is_object() {
            return Err(MailRequestError::MissingFields);
        }

        let body: SendMailBody = serde_json::from_value(value)?;

        let to = body.to.filter(|to| !to.is_empty());
        let subject = non_empty(body.subject);
        let text = non_empty(body.text);
        let html = non_empty(body.html);

        let (Some(to), Some(subject)) = (to, subject) else {
            return Err(MailRequestError::MissingFields);
        };

        if text.is_none() && html.is_none() {
            return Err(MailRequestError::MissingFields);
        }

        Ok(Self {
            to: parse_addresses(to)?,
            cc: parse_addresses(drop_empty(body.cc))?,
            bcc: parse_addresses(drop_empty(body.bcc))?,
            subject,
            text,
            html,
            attachments: body
                .attachments
                .unwrap_or_default()
                .into_iter()
                .map(PathBuf::from)
                .collect(),
        })
    }

    /// The primary recipients
    pub fn to(&self) -> &[EmailAddress] {
        &self.to
    }

    /// The carbon-copy recipients, possibly empty
    pub fn cc(&self) -> &[EmailAddress] {
        &self.cc
    }

    /// The blind carbon-copy recipients, possibly empty
    pub fn bcc(&self) -> &[EmailAddress] {
        &self.bcc
    }

    /// The subject line
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// The plain text body
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// The HTML body
    pub fn html(&self) -> Option<&str> {
        self.html.as_deref()
    }

    /// The requested attachment paths, unresolved
    pub fn attachments(&self) -> &[PathBuf] {
        &self.attachments
    }

    /// Consumes the request, producing the message to send with the resolved `attachments`
    pub fn into_outgoing(self, attachments: Vec<Attachment>) -> OutgoingMail {
        OutgoingMail {
            to: self.to,
            cc: self.cc,
            bcc: self.bcc,
            subject: self.subject,
            text: self.text,
            html: self.html,
            attachments,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

fn drop_empty(addresses: Option<Vec<String>>) -> Vec<String> {
    addresses
        .unwrap_or_default()
        .into_iter()
        .filter(|address| !address.is_empty())
        .collect()
}

fn parse_addresses(raw: Vec<String>) -> Result<Vec<EmailAddress>, MailRequestError> {
    raw.iter()
        .map(|address| EmailAddress::new(address).map_err(|_| MailRequestError::InvalidAddress))
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    fn parse(value: Value) -> Result<MailRequest, MailRequestError> {
        MailRequest::from_json(value.to_string().as_bytes())
    }

    #[test]
    fn test_minimal_request() -> TestResult {
        let request =
            MailRequest::from_json(br#"{"to":["x@example.com"],"subject":"S","text":"T"}"#)?;

        assert_eq!(request.to(), &[EmailAddress::new("x@example.com")?]);
        assert_eq!(request.subject(), "S");
        assert_eq!(request.text(), Some("T"));
        assert_eq!(request.html(), None);
        assert!(request.cc().is_empty());
        assert!(request.bcc().is_empty());
        assert!(request.attachments().is_empty());

        Ok(())
    }

    #[test]
    fn test_full_request() -> TestResult {
        let request = parse(json!({
            "to": ["a@example.com", "b@example.com"],
            "cc": ["c@example.com"],
            "bcc": ["d@example.com"],
            "subject": "Report",
            "html": "<p>Hi</p>",
            "attachments": ["/tmp/report.pdf", "notes.txt"],
        }))?;

        assert_eq!(request.to().len(), 2);
        assert_eq!(request.cc(), &[EmailAddress::new("c@example.com")?]);
        assert_eq!(request.bcc(), &[EmailAddress::new("d@example.com")?]);
        assert_eq!(request.text(), None);
        assert_eq!(request.html(), Some("<p>Hi</p>"));
        assert_eq!(
            request.attachments(),
            &[PathBuf::from("/tmp/report.pdf"), PathBuf::from("notes.txt")]
        );

        Ok(())
    }

    #[test]
    fn test_missing_body_is_missing_fields() {
        let result = parse(json!({"to": ["x@example.com"], "subject": "S"}));

        assert_eq!(result, Err(MailRequestError::MissingFields));
    }

    #[test]
    fn test_missing_to_or_subject_is_missing_fields() {
        let cases = [
            json!({"subject": "S", "text": "T"}),
            json!({"to": [], "subject": "S", "text": "T"}),
            json!({"to": null, "subject": "S", "text": "T"}),
            json!({"to": ["x@example.com"], "text": "T"}),
            json!({"to": ["x@example.com"], "subject": "", "text": "T"}),
            json!({"to": ["x@example.com"], "subject": "S", "text": "", "html": ""}),
        ];

        for case in cases {
            assert_eq!(
                parse(case.clone()),
                Err(MailRequestError::MissingFields),
                "{case}"
            );
        }
    }

    #[test]
    fn test_non_object_json_is_missing_fields() {
        assert_eq!(parse(json!([])), Err(MailRequestError::MissingFields));
        assert_eq!(parse(json!("text")), Err(MailRequestError::MissingFields));
    }

    #[test]
    fn test_null_body_is_malformed() {
        let result = MailRequest::from_json(b"null");

        assert!(matches!(result, Err(MailRequestError::MalformedPayload(_))));
    }

    #[test]
    fn test_parse_then_validate() -> TestResult {
        let value = MailRequest::parse_json(br#"{"to":["nope"],"subject":"S","text":"T"}"#)?;

        assert_eq!(value["subject"], "S");
        assert_eq!(
            MailRequest::from_value(value),
            Err(MailRequestError::InvalidAddress)
        );

        Ok(())
    }

    #[test]
    fn test_missing_fields_checked_before_addresses() {
        let result = parse(json!({"to": ["not-an-email"], "subject": "S"}));

        assert_eq!(result, Err(MailRequestError::MissingFields));
    }

    #[test]
    fn test_invalid_to_address() {
        let result = parse(json!({"to": ["not-an-email"], "subject": "S", "text": "T"}));

        assert_eq!(result, Err(MailRequestError::InvalidAddress));
    }

    #[test]
    fn test_empty_to_entry_is_invalid() {
        let result = parse(json!({"to": ["x@example.com", ""], "subject": "S", "text": "T"}));

        assert_eq!(result, Err(MailRequestError::InvalidAddress));
    }

    #[test]
    fn test_empty_cc_and_bcc_entries_are_dropped() -> TestResult {
        let request = parse(json!({
            "to": ["x@example.com"],
            "cc": ["", "y@example.com"],
            "bcc": [""],
            "subject": "S",
            "text": "T",
        }))?;

        assert_eq!(request.cc(), &[EmailAddress::new("y@example.com")?]);
        assert!(request.bcc().is_empty());

        Ok(())
    }

    #[test]
    fn test_invalid_cc_or_bcc_address() {
        let cc = parse(json!({
            "to": ["x@example.com"],
            "cc": ["", "nope"],
            "subject": "S",
            "text": "T",
        }));
        let bcc = parse(json!({
            "to": ["x@example.com"],
            "bcc": ["a@b"],
            "subject": "S",
            "text": "T",
        }));

        assert_eq!(cc, Err(MailRequestError::InvalidAddress));
        assert_eq!(bcc, Err(MailRequestError::InvalidAddress));
    }

    #[test]
    fn test_malformed_json() {
        let result = MailRequest::from_json(b"{\"to\": [");

        assert!(matches!(result, Err(MailRequestError::MalformedPayload(_))));
    }

    #[test]
    fn test_empty_body_is_malformed() {
        let result = MailRequest::from_json(b"");

        assert!(matches!(result, Err(MailRequestError::MalformedPayload(_))));
    }

    #[test]
    fn test_wrong_field_type_is_malformed() {
        let result = parse(json!({"to": "x@example.com", "subject": "S", "text": "T"}));

        assert!(matches!(result, Err(MailRequestError::MalformedPayload(_))));
    }
}
