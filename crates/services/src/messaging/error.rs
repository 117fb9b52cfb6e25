use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum MessagingError {
    /// The caller may not act on this message. Never says why.
    #[error("Unauthorized")]
    Unauthorized,
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: &'static str,
    },
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Messaging is disabled")]
    Disabled,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl MessagingError {
    pub fn validation(field: &'static str, message: &'static str) -> Self {
        Self::Validation { field, message }
    }
}

pub type MessagingResult<T> = Result<T, MessagingError>;
