use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{RegisterRequest, User};
use crate::repository::UserRepository;

/// Account lifecycle logic on top of a [`UserRepository`]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
        }
    }
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn hash_password(&self, password: &str) -> UserResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserError::PasswordHash(e.to_string()))
    }

    pub fn verify_password(&self, password: &str, hash: &str) -> UserResult<bool> {
        let parsed = PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    /// Create an unverified account with a hashed password
    pub async fn register(&self, input: RegisterRequest) -> UserResult<User> {
        let password_hash = self.hash_password(&input.password)?;
        let user = self
            .repository
            .create(User::new(input.email, password_hash))
            .await?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Check email and password for login.
    ///
    /// Unknown email and wrong password both collapse to
    /// `InvalidCredentials`; an unverified account is reported separately
    /// so the client can prompt for verification.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> UserResult<User> {
        let user = self
            .repository
            .get_by_email(email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !self.verify_password(password, &user.password_hash)? {
            return Err(UserError::InvalidCredentials);
        }

        if !user.verified {
            return Err(UserError::EmailNotVerified);
        }

        Ok(user)
    }

    pub async fn get_user(&self, id: Uuid) -> UserResult<User> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    pub async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        self.repository.get_by_email(email).await
    }

    /// Mark the account's email as verified. Idempotent.
    pub async fn mark_verified(&self, id: Uuid) -> UserResult<User> {
        let mut user = self.get_user(id).await?;

        if user.verified {
            return Ok(user);
        }

        user.verified = true;
        let user = self.repository.update(user).await?;
        info!(user_id = %user.id, "Email verified");
        Ok(user)
    }

    /// Replace the account's password with a fresh hash
    pub async fn reset_password(&self, id: Uuid, new_password: &str) -> UserResult<User> {
        let mut user = self.get_user(id).await?;
        user.password_hash = self.hash_password(new_password)?;
        let user = self.repository.update(user).await?;

        info!(user_id = %user.id, "Password reset");
        Ok(user)
    }

    pub async fn set_avatar_url(&self, id: Uuid, url: String) -> UserResult<User> {
        let mut user = self.get_user(id).await?;
        user.avatar_url = Some(url);
        self.repository.update(user).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryUserRepository;

    fn service() -> UserService<InMemoryUserRepository> {
        UserService::new(Arc::new(InMemoryUserRepository::new()))
    }

    fn register_request(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let svc = service();
        let user = svc
            .register(register_request("a@example.com", "hunter2"))
            .await
            .unwrap();

        assert_ne!(user.password_hash, "hunter2");
        assert!(svc.verify_password("hunter2", &user.password_hash).unwrap());
        assert!(!user.verified);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let svc = service();
        svc.register(register_request("a@example.com", "pw"))
            .await
            .unwrap();

        let err = svc
            .register(register_request("a@example.com", "pw2"))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::DuplicateEmail(_)));
    }

    #[tokio::test]
    async fn test_login_requires_verified_email() {
        let svc = service();
        let user = svc
            .register(register_request("a@example.com", "pw"))
            .await
            .unwrap();

        let err = svc
            .verify_credentials("a@example.com", "pw")
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::EmailNotVerified));

        svc.mark_verified(user.id).await.unwrap();
        let verified = svc.verify_credentials("a@example.com", "pw").await.unwrap();
        assert_eq!(verified.id, user.id);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_look_alike() {
        let svc = service();
        let user = svc
            .register(register_request("a@example.com", "pw"))
            .await
            .unwrap();
        svc.mark_verified(user.id).await.unwrap();

        let wrong_password = svc
            .verify_credentials("a@example.com", "nope")
            .await
            .unwrap_err();
        let unknown_email = svc
            .verify_credentials("missing@example.com", "pw")
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, UserError::InvalidCredentials));
        assert!(matches!(unknown_email, UserError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_mark_verified_is_idempotent() {
        let svc = service();
        let user = svc
            .register(register_request("a@example.com", "pw"))
            .await
            .unwrap();

        let first = svc.mark_verified(user.id).await.unwrap();
        let second = svc.mark_verified(user.id).await.unwrap();
        assert!(first.verified);
        assert!(second.verified);
    }

    #[tokio::test]
    async fn test_reset_password_invalidates_old_one() {
        let svc = service();
        let user = svc
            .register(register_request("a@example.com", "old-pw"))
            .await
            .unwrap();
        svc.mark_verified(user.id).await.unwrap();

        svc.reset_password(user.id, "new-pw").await.unwrap();

        assert!(
            svc.verify_credentials("a@example.com", "old-pw")
                .await
                .is_err()
        );
        assert!(
            svc.verify_credentials("a@example.com", "new-pw")
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_set_avatar_url() {
        let svc = service();
        let user = svc
            .register(register_request("a@example.com", "pw"))
            .await
            .unwrap();

        let updated = svc
            .set_avatar_url(user.id, "/avatars/x.png".to_string())
            .await
            .unwrap();
        assert_eq!(updated.avatar_url.as_deref(), Some("/avatars/x.png"));
    }
}
