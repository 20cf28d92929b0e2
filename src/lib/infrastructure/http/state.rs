//! Application state module

use std::{fmt, sync::Arc};

use crate::domain::mail::MailService;

/// Global application state, shared read-only by every request
#[derive(Clone)]
pub struct AppState<M: MailService> {
    /// Mail service
    pub mail: Arc<M>,
}

impl<M> AppState<M>
where
    M: MailService,
{
    /// Create a new application state
    pub fn new(mail: M) -> Self {
        Self {
            mail: Arc::new(mail),
        }
    }
}

impl<M> fmt::Debug for AppState<M>
where
    M: MailService,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("mail", &"MailService")
            .finish()
    }
}

#[cfg(test)]
use crate::domain::mail::tests::MockMailService;

/// Application state backed by a mock mail service
#[cfg(test)]
pub fn test_state(mail: Option<MockMailService>) -> AppState<MockMailService> {
    AppState::new(mail.unwrap_or_else(MockMailService::new))
}
