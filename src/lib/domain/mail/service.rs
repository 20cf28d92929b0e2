//! Mail dispatch service

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

#[cfg(test)]
use mockall::mock;

use super::{
    attachments::resolve_attachments, email_address::join_addresses, mailer::Mailer,
    request::MailRequest,
};

/// The result of one send attempt
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The transport accepted the message and replied with this response
    Sent(String),

    /// The message could not be sent, for this reason
    Failed(String),
}

/// Mail service
#[async_trait]
pub trait MailService: Clone + Send + Sync + 'static {
    /// Resolves the request's attachments and sends it through the transport, once.
    ///
    /// # Arguments
    /// * `request` - The validated [`MailRequest`] to send.
    ///
    /// # Returns
    /// The [`DispatchOutcome`] of the single transport call.
    async fn send_mail(&self, request: MailRequest) -> DispatchOutcome;
}

#[cfg(test)]
mock! {
    pub MailService {}

    impl Clone for MailService {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl MailService for MailService {
        async fn send_mail(&self, request: MailRequest) -> DispatchOutcome;
    }
}

/// Mail service implementation
#[derive(Debug, Clone)]
pub struct MailServiceImpl<M>
where
    M: Mailer,
{
    mailer: Arc<M>,
}

impl<M> MailServiceImpl<M>
where
    M: Mailer,
{
    /// Creates a new mail service sending through `mailer`
    pub fn new(mailer: Arc<M>) -> Self {
        Self { mailer }
    }
}

#[async_trait]
impl<M> MailService for MailServiceImpl<M>
where
    M: Mailer,
{
    async fn send_mail(&self, request: MailRequest) -> DispatchOutcome {
        let attachments = resolve_attachments(request.attachments()).await;
        let mail = request.into_outgoing(attachments);
        let to = join_addresses(&mail.to);

        info!(
            to = %to,
            cc = %join_addresses(&mail.cc),
            bcc = %join_addresses(&mail.bcc),
            subject = %mail.subject,
            attachments = mail.attachments.len(),
            "sending email"
        );

        match self.mailer.send(&mail).await {
            Ok(response) => {
                info!(to = %to, response = %response, "email sent");
                DispatchOutcome::Sent(response)
            }
            Err(err) => {
                error!(to = %to, error = %err, "failed to send email");
                DispatchOutcome::Failed(err.to_string())
            }
        }
    }
}
