//! SMTP email service implementation

use std::{fmt, time::Duration};

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Parser;
use lettre::{
    message::{
        header::{Bcc, Cc, ContentType, To},
        Attachment as MimeAttachment, Mailbox, Mailboxes, MultiPart, SinglePart,
    },
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
        response::Response,
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tokio::fs;

use crate::domain::mail::{join_addresses, EmailAddress, Mailer, MailerError, OutgoingMail};

/// Port on which SMTP servers expect TLS from the first byte
const IMPLICIT_TLS_PORT: u16 = 465;

/// SMTP configuration
#[derive(Clone, Parser)]
pub struct SMTPConfig {
    /// The SMTP host
    #[clap(long = "smtp-host", env = "MAIL_HOST")]
    pub host: String,

    /// The SMTP port. Port 465 uses implicit TLS, any other port STARTTLS when offered.
    #[clap(long = "smtp-port", env = "MAIL_PORT")]
    pub port: u16,

    /// The SMTP username, also used as the sender address
    #[clap(long = "smtp-user", env = "MAIL_USER")]
    pub username: String,

    /// The SMTP password
    #[clap(long = "smtp-password", env = "MAIL_PASS", hide_env_values = true)]
    pub password: String,

    /// Overrides the sender address
    #[clap(long = "smtp-sender", env = "MAIL_FROM")]
    pub sender: Option<String>,

    /// Verify the TLS certificate
    #[clap(long = "smtp-verify-tls", env = "MAIL_VERIFY_TLS", default_value = "false")]
    pub verify_tls: bool,

    /// Connection, greeting and socket timeout, in seconds
    #[clap(long = "smtp-timeout-secs", env = "MAIL_TIMEOUT_SECS", default_value = "30")]
    pub timeout_secs: u64,
}

impl SMTPConfig {
    /// The address every email is sent from
    pub fn sender(&self) -> &str {
        self.sender.as_deref().unwrap_or(&self.username)
    }
}

impl fmt::Debug for SMTPConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SMTPConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"********")
            .field("sender", &self.sender)
            .field("verify_tls", &self.verify_tls)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// SMTP mailer
///
/// Holds a single transport built at startup; clones share its connection pool.
#[derive(Clone)]
pub struct SMTPMailer {
    sender: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SMTPMailer {
    /// Create a new SMTP mailer
    pub fn new(config: &SMTPConfig) -> Result<Self> {
        let sender = config
            .sender()
            .parse()
            .with_context(|| format!("invalid sender address \"{}\"", config.sender()))?;

        let tls_parameters = TlsParameters::builder(config.host.clone())
            .dangerous_accept_invalid_certs(!config.verify_tls)
            .build()
            .context("failed to build TLS parameters")?;

        let tls = if config.port == IMPLICIT_TLS_PORT {
            Tls::Wrapper(tls_parameters)
        } else {
            Tls::Opportunistic(tls_parameters)
        };

        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .tls(tls)
            .timeout(Some(Duration::from_secs(config.timeout_secs)))
            .build();

        Ok(Self { sender, transport })
    }

    /// Builds the MIME message, reading attachment contents from disk
    async fn build_message(&self, mail: &OutgoingMail) -> Result<Message, MailerError> {
        let mut builder = Message::builder()
            .from(self.sender.clone())
            .mailbox(To::from(mailboxes(&mail.to)?))
            .subject(mail.subject.clone());

        if !mail.cc.is_empty() {
            builder = builder.mailbox(Cc::from(mailboxes(&mail.cc)?));
        }

        if !mail.bcc.is_empty() {
            builder = builder.mailbox(Bcc::from(mailboxes(&mail.bcc)?));
        }

        let body = match (&mail.text, &mail.html) {
            (Some(text), Some(html)) => {
                Body::Multi(MultiPart::alternative_plain_html(text.clone(), html.clone()))
            }
            (Some(text), None) => Body::Single(SinglePart::plain(text.clone())),
            (None, Some(html)) => Body::Single(SinglePart::html(html.clone())),
            (None, None) => Body::Single(SinglePart::plain(String::new())),
        };

        let message = if mail.attachments.is_empty() {
            match body {
                Body::Single(part) => builder.singlepart(part),
                Body::Multi(part) => builder.multipart(part),
            }
        } else {
            let content_type = ContentType::parse("application/octet-stream")
                .map_err(|e| MailerError::Build(e.to_string()))?;

            let mut mixed = match body {
                Body::Single(part) => MultiPart::mixed().singlepart(part),
                Body::Multi(part) => MultiPart::mixed().multipart(part),
            };

            for attachment in &mail.attachments {
                let content = fs::read(attachment.path()).await.map_err(|source| {
                    MailerError::Attachment {
                        path: attachment.path().display().to_string(),
                        source,
                    }
                })?;

                mixed = mixed.singlepart(
                    MimeAttachment::new(attachment.filename().to_string())
                        .body(content, content_type.clone()),
                );
            }

            builder.multipart(mixed)
        };

        message.map_err(|e| MailerError::Build(e.to_string()))
    }
}

impl fmt::Debug for SMTPMailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SMTPMailer")
            .field("sender", &self.sender)
            .field("transport", &"AsyncSmtpTransport")
            .finish()
    }
}

#[async_trait]
impl Mailer for SMTPMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<String, MailerError> {
        let message = self.build_message(mail).await?;

        match self.transport.send(message).await {
            Ok(response) => Ok(format_response(&response)),
            Err(e) => Err(MailerError::Send(e.to_string())),
        }
    }
}

enum Body {
    Single(SinglePart),
    Multi(MultiPart),
}

fn mailboxes(addresses: &[EmailAddress]) -> Result<Mailboxes, MailerError> {
    let joined = join_addresses(addresses);

    joined
        .parse()
        .map_err(|_| MailerError::InvalidAddress(joined))
}

/// Renders an SMTP reply as its code followed by its text, e.g. `250 2.0.0 OK`
fn format_response(response: &Response) -> String {
    let message = response.message().collect::<Vec<_>>().join(" ");

    format!("{} {}", response.code(), message)
}
