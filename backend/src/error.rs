//! Error types for event handling.
//!
//! Nothing here reaches the chat user directly: the dispatcher's error
//! boundary logs the error and answers with a generic text.

use crate::registry::{RegistryError, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Event carries no acting user")]
    MissingUser,

    #[error("Could not resolve user record for {0}")]
    UserUnavailable(String),

    #[error("Handler panicked: {0}")]
    Panic(String),
}

impl BotError {
    /// The error followed by its chain of sources, joined with ": ".
    pub fn chain(&self) -> String {
        let mut text = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            text.push_str(": ");
            text.push_str(&cause.to_string());
            source = cause.source();
        }
        text
    }
}

pub type Result<T> = std::result::Result<T, BotError>;

/// Failures while wiring the application from its configuration.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("registry.spreadsheet_id is required for the sheets backend")]
    MissingSpreadsheetId,

    #[error("Failed to open user registry: {0}")]
    Store(#[from] StoreError),
}
