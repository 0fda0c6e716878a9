use crate::{env_required, ConfigError, FromEnv};

/// Signing configuration for issued tokens
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
}

impl JwtConfig {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }
}

impl FromEnv for JwtConfig {
    /// Requires JWT_SECRET to be set (no default, even in development)
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            secret: env_required("JWT_SECRET")?,
        })
    }
}
