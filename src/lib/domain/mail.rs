//! Mail module: validation, attachment resolution and dispatch of send requests.

mod attachments;
mod email_address;
mod errors;
mod mailer;
mod message;
mod request;
mod service;

pub use attachments::{resolve_attachments, Attachment};
pub use email_address::{is_valid_email_address, join_addresses, EmailAddress, EmailAddressError};
pub use errors::{MailRequestError, MailerError};
pub use mailer::Mailer;
pub use message::OutgoingMail;
pub use request::MailRequest;
pub use service::{DispatchOutcome, MailService, MailServiceImpl};
