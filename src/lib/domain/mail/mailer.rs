//! Mail transport port

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

use super::{errors::MailerError, message::OutgoingMail};

/// A transport able to deliver an [`OutgoingMail`]
#[async_trait]
pub trait Mailer: Clone + Send + Sync + 'static {
    /// Sends an email.
    ///
    /// # Arguments
    /// * `mail` - The [`OutgoingMail`] to deliver.
    ///
    /// # Returns
    /// - [`Ok`] with the transport's response if the message was accepted.
    /// - [`Err`] containing a [`MailerError`] if it could not be built or delivered.
    async fn send(&self, mail: &OutgoingMail) -> Result<String, MailerError>;
}

#[cfg(test)]
mock! {
    pub Mailer {}

    impl Clone for Mailer {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl Mailer for Mailer {
        async fn send(&self, mail: &OutgoingMail) -> Result<String, MailerError>;
    }
}
