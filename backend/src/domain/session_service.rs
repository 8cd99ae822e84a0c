//! Session management: sign in, sign up, sign out and account deletion.

use crate::error::AuthError;
use crate::storage::IdentityProvider;
use anyhow::Result;
use mnu_shared::User;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct SessionService {
    identity: Arc<dyn IdentityProvider>,
}

impl SessionService {
    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        Self { identity }
    }

    pub fn current_user(&self) -> Option<User> {
        self.identity.current_user()
    }

    /// The signed-in user, or `AuthError::NotSignedIn`
    pub fn require_user(&self) -> Result<User> {
        self.identity
            .current_user()
            .ok_or_else(|| AuthError::NotSignedIn.into())
    }

    /// Email shown on the profile page
    pub fn display_email(&self) -> Option<String> {
        self.current_user()
            .map(|user| user.email.unwrap_or_else(|| "No Email".to_string()))
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User> {
        match self.identity.sign_in(email, password).await {
            Ok(user) => {
                info!("Signed in user {}", user.id);
                Ok(user)
            }
            Err(e) => {
                warn!("Sign in failed: {}", e);
                Err(e.into())
            }
        }
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<User> {
        match self.identity.sign_up(email, password).await {
            Ok(user) => {
                info!("Registered user {}", user.id);
                Ok(user)
            }
            Err(e) => {
                warn!("Sign up failed: {}", e);
                Err(e.into())
            }
        }
    }

    pub async fn sign_out(&self) -> Result<()> {
        self.identity.sign_out().await?;
        info!("Signed out");
        Ok(())
    }

    /// Delete the signed-in account. Stored documents are left in place.
    pub async fn delete_account(&self) -> Result<()> {
        let user = self.require_user()?;
        self.identity.delete_current_user().await?;
        info!("Deleted account {}", user.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryIdentityProvider;

    fn service() -> SessionService {
        SessionService::new(Arc::new(InMemoryIdentityProvider::new()))
    }

    #[tokio::test]
    async fn test_sign_up_then_display_email() {
        let service = service();
        assert_eq!(service.display_email(), None);

        service.sign_up("mizui@example.com", "password").await.unwrap();
        assert_eq!(service.display_email(), Some("mizui@example.com".to_string()));
    }

    #[tokio::test]
    async fn test_sign_in_failure_carries_message() {
        let service = service();
        let err = service.sign_in("nobody@example.com", "password").await.unwrap_err();
        assert_eq!(err.downcast_ref::<AuthError>(), Some(&AuthError::WrongCredentials));
        assert_eq!(err.to_string(), "The email or password is incorrect.");
    }

    #[tokio::test]
    async fn test_sign_out_and_delete() {
        let service = service();
        service.sign_up("a@example.com", "password").await.unwrap();
        service.sign_out().await.unwrap();
        assert!(service.current_user().is_none());

        let err = service.delete_account().await.unwrap_err();
        assert_eq!(err.downcast_ref::<AuthError>(), Some(&AuthError::NotSignedIn));

        service.sign_in("a@example.com", "password").await.unwrap();
        service.delete_account().await.unwrap();
        assert!(service.current_user().is_none());
        assert!(service.sign_in("a@example.com", "password").await.is_err());
    }
}
