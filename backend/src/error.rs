//! Error types raised at the collaborator and validation seams.
//!
//! Services return `anyhow::Result`; these enums stay reachable through
//! `downcast_ref` so callers can branch on them, and [`user_message`] turns
//! any of them into the string shown in an alert.

use thiserror::Error;

/// Failures reported by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("The email address is badly formatted.")]
    InvalidEmail,
    #[error("The password must be at least {min} characters long.")]
    WeakPassword { min: usize },
    #[error("The email address is already in use by another account.")]
    EmailAlreadyInUse,
    #[error("The email or password is incorrect.")]
    WrongCredentials,
    #[error("No user is signed in.")]
    NotSignedIn,
    #[error("Authentication service unavailable: {0}")]
    Unavailable(String),
}

/// Failures reported by the document store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Invalid document path: {0}")]
    InvalidPath(String),
    #[error("Field '{field}' of {path} is not a number")]
    NotNumeric { path: String, field: String },
    #[error("Field '{field}' of {path} cannot go below {floor} (current {current})")]
    BelowFloor {
        path: String,
        field: String,
        floor: i64,
        current: i64,
    },
    #[error("Document store unavailable: {0}")]
    Unavailable(String),
}

/// Rejections of a balance registration or update
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BalanceError {
    #[error("Please enter a valid amount: {0}")]
    InvalidAmount(String),
    #[error("The amount must not be zero.")]
    ZeroAmount,
    #[error("The balance cannot go below zero (current {current}, change {change}).")]
    WouldGoNegative { current: i64, change: i64 },
}

/// Rejections of a contact form submission
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactError {
    #[error("Please fill in all fields.")]
    MissingFields,
}

/// Problems with a loaded configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Message suitable for displaying to the user.
///
/// Known domain errors render their own text; anything else is prefixed so
/// the user can tell it was unexpected.
pub fn user_message(error: &anyhow::Error) -> String {
    if let Some(e) = error.downcast_ref::<AuthError>() {
        return e.to_string();
    }
    if let Some(e) = error.downcast_ref::<BalanceError>() {
        return e.to_string();
    }
    if let Some(e) = error.downcast_ref::<ContactError>() {
        return e.to_string();
    }
    if let Some(e) = error.downcast_ref::<StoreError>() {
        return format!("Failed to save or load data: {}", e);
    }
    format!("Something went wrong: {}", error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_for_domain_errors() {
        let err = anyhow::Error::from(BalanceError::ZeroAmount);
        assert_eq!(user_message(&err), "The amount must not be zero.");

        let err = anyhow::Error::from(AuthError::NotSignedIn);
        assert_eq!(user_message(&err), "No user is signed in.");
    }

    #[test]
    fn test_user_message_for_store_and_unknown_errors() {
        let err = anyhow::Error::from(StoreError::Unavailable("offline".to_string()));
        assert_eq!(
            user_message(&err),
            "Failed to save or load data: Document store unavailable: offline"
        );

        let err = anyhow::anyhow!("boom");
        assert_eq!(user_message(&err), "Something went wrong: boom");
    }

    #[test]
    fn test_user_message_survives_context() {
        use anyhow::Context;
        let err: anyhow::Result<()> = Err(BalanceError::WouldGoNegative { current: 100, change: -200 })
            .context("applying update");
        let err = err.unwrap_err();
        assert!(user_message(&err).starts_with("The balance cannot go below zero"));
    }
}
