//! Errors surfaced to the visitor.
//!
//! Every variant is terminal for the action that produced it. The `Display`
//! text is the inline message shown next to the form.

use crate::storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum VitrineError {
    /// The local store refused a read or a write
    #[error("{message}")]
    StorageUnavailable {
        message: &'static str,
        #[source]
        source: StorageError,
    },

    #[error("Identifiants invalides")]
    InvalidCredentials,

    #[error("Un compte existe déjà avec cet email.")]
    DuplicateEmail,

    #[error("{0}")]
    InvalidInput(String),

    #[error("Compte introuvable: {0}")]
    AccountNotFound(String),

    #[error("Veuillez vous connecter.")]
    NotLoggedIn,
}

impl VitrineError {
    pub fn storage(message: &'static str) -> impl FnOnce(StorageError) -> VitrineError {
        move |source| VitrineError::StorageUnavailable { message, source }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        VitrineError::InvalidInput(message.into())
    }
}

pub type Result<T> = std::result::Result<T, VitrineError>;
