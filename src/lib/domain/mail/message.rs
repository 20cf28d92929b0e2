//! Outgoing email message

use super::{attachments::Attachment, email_address::EmailAddress};

/// A message ready to be handed to a [`Mailer`](super::Mailer).
///
/// The sender is not part of the message; the transport fills it in from its configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutgoingMail {
    /// The primary recipients
    pub to: Vec<EmailAddress>,

    /// The carbon-copy recipients
    pub cc: Vec<EmailAddress>,

    /// The blind carbon-copy recipients
    pub bcc: Vec<EmailAddress>,

    /// The subject of the email
    pub subject: String,

    /// The plain text body of the email
    pub text: Option<String>,

    /// The HTML body of the email
    pub html: Option<String>,

    /// Files attached to the email
    pub attachments: Vec<Attachment>,
}
