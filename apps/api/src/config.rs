//! Configuration for the Contacts API

use core_config::database::DatabaseConfig;
use core_config::jwt::JwtConfig;
use core_config::redis::RedisConfig;
use core_config::server::ServerConfig;
use core_config::{FromEnv, env_or_default};

pub use core_config::Environment;

/// Application configuration, assembled once at startup
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    /// Base URL for links embedded in verification and reset emails
    pub frontend_url: String,
    /// Directory avatar files are written to
    pub avatar_dir: String,
    /// Public URL prefix the stored avatars are served from
    pub avatar_base_url: String,
    /// Replenish interval in seconds for the contact-creation rate gate
    pub rate_limit_per_second: u64,
    /// Burst size for the contact-creation rate gate
    pub rate_limit_burst: u32,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;
        let database = DatabaseConfig::from_env()?;
        let redis = RedisConfig::from_env()?;
        let jwt = JwtConfig::from_env()?;

        let frontend_url = env_or_default("FRONTEND_URL", "http://localhost:3000");
        let avatar_dir = env_or_default("AVATAR_DIR", "./static/avatars");
        let avatar_base_url = env_or_default("AVATAR_BASE_URL", "/static/avatars");

        let rate_limit_per_second = env_or_default("RATE_LIMIT_PER_SECOND", "2")
            .parse()
            .unwrap_or(2);
        let rate_limit_burst = env_or_default("RATE_LIMIT_BURST", "5").parse().unwrap_or(5);

        Ok(Self {
            environment,
            server,
            database,
            redis,
            jwt,
            frontend_url,
            avatar_dir,
            avatar_base_url,
            rate_limit_per_second,
            rate_limit_burst,
        })
    }
}
