//! Purpose-tagged JWT issuing and validation.
//!
//! Every token carries a `purpose` claim alongside the standard `sub`,
//! `iat`, and `exp`. Validation always checks the purpose, so a refresh
//! token can never pass as an access token and an email-verification
//! token can never reset a password. Any failure (bad signature, expiry,
//! wrong purpose, malformed input) collapses to [`UserError::InvalidToken`]
//! so responses do not leak why verification failed.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{UserError, UserResult};

/// Access token lifetime: 15 minutes
pub const ACCESS_TOKEN_TTL: i64 = 900;
/// Refresh token lifetime: 7 days
pub const REFRESH_TOKEN_TTL: i64 = 604_800;
/// Email verification token lifetime: 24 hours
pub const VERIFY_EMAIL_TOKEN_TTL: i64 = 86_400;
/// Password reset token lifetime: 1 hour
pub const RESET_PASSWORD_TOKEN_TTL: i64 = 3_600;

/// What a token is allowed to be used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    Access,
    Refresh,
    VerifyEmail,
    ResetPassword,
}

impl TokenPurpose {
    pub fn ttl_seconds(&self) -> i64 {
        match self {
            TokenPurpose::Access => ACCESS_TOKEN_TTL,
            TokenPurpose::Refresh => REFRESH_TOKEN_TTL,
            TokenPurpose::VerifyEmail => VERIFY_EMAIL_TOKEN_TTL,
            TokenPurpose::ResetPassword => RESET_PASSWORD_TOKEN_TTL,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    purpose: TokenPurpose,
    iat: i64,
    exp: i64,
}

/// Issues and validates the signed tokens used by the auth flows
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue a token for the given user with the purpose's standard TTL
    pub fn issue(&self, user_id: Uuid, purpose: TokenPurpose) -> UserResult<String> {
        self.issue_with_ttl(user_id, purpose, purpose.ttl_seconds())
    }

    fn issue_with_ttl(
        &self,
        user_id: Uuid,
        purpose: TokenPurpose,
        ttl_seconds: i64,
    ) -> UserResult<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            purpose,
            iat: now,
            exp: now + ttl_seconds,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| UserError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Validate a token and return the user id it was issued for.
    ///
    /// The token must be well-formed, signed with our key, unexpired, and
    /// carry exactly the expected purpose.
    pub fn validate(&self, token: &str, expected: TokenPurpose) -> UserResult<Uuid> {
        // No expiry leeway: a token is invalid the moment `exp` passes
        let mut validation = Validation::default();
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|_| UserError::InvalidToken)?;

        if data.claims.purpose != expected {
            return Err(UserError::InvalidToken);
        }

        Ok(data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret")
    }

    #[test]
    fn test_roundtrip_all_purposes() {
        let svc = service();
        let user_id = Uuid::now_v7();

        for purpose in [
            TokenPurpose::Access,
            TokenPurpose::Refresh,
            TokenPurpose::VerifyEmail,
            TokenPurpose::ResetPassword,
        ] {
            let token = svc.issue(user_id, purpose).unwrap();
            assert_eq!(svc.validate(&token, purpose).unwrap(), user_id);
        }
    }

    #[test]
    fn test_wrong_purpose_is_rejected() {
        let svc = service();
        let token = svc.issue(Uuid::now_v7(), TokenPurpose::Refresh).unwrap();

        let err = svc.validate(&token, TokenPurpose::Access).unwrap_err();
        assert!(matches!(err, UserError::InvalidToken));
    }

    #[test]
    fn test_reset_token_cannot_verify_email() {
        let svc = service();
        let token = svc
            .issue(Uuid::now_v7(), TokenPurpose::ResetPassword)
            .unwrap();

        assert!(svc.validate(&token, TokenPurpose::VerifyEmail).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let svc = service();
        let token = svc
            .issue_with_ttl(Uuid::now_v7(), TokenPurpose::Access, -120)
            .unwrap();

        let err = svc.validate(&token, TokenPurpose::Access).unwrap_err();
        assert!(matches!(err, UserError::InvalidToken));
    }

    #[test]
    fn test_recently_expired_token_is_rejected() {
        let svc = service();
        // Expired seconds ago, well inside the default 60s decoder leeway
        let token = svc
            .issue_with_ttl(Uuid::now_v7(), TokenPurpose::Access, -5)
            .unwrap();

        let err = svc.validate(&token, TokenPurpose::Access).unwrap_err();
        assert!(matches!(err, UserError::InvalidToken));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let svc = service();
        assert!(svc.validate("not-a-token", TokenPurpose::Access).is_err());
        assert!(svc.validate("", TokenPurpose::Access).is_err());
    }

    #[test]
    fn test_foreign_secret_is_rejected() {
        let token = TokenService::new("other-secret")
            .issue(Uuid::now_v7(), TokenPurpose::Access)
            .unwrap();

        assert!(service().validate(&token, TokenPurpose::Access).is_err());
    }
}
