use std::str::FromStr;

use anyhow::{anyhow, Context};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
}

/// Argon2 cost parameters applied when a password is hashed.
#[derive(Debug, Clone, Deserialize)]
pub struct HashConfig {
    pub work_factor: u32,
    pub memory_kib: u32,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            work_factor: argon2::Params::DEFAULT_T_COST,
            memory_kib: argon2::Params::DEFAULT_M_COST,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub hashing: HashConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Unset optional keys take their
    /// default; a set but unparsable value is an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let required = |key: &str| lookup(key).ok_or_else(|| anyhow!("{key} must be set"));

        let database_url = required("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: required("JWT_SECRET")?,
        };

        let hash_defaults = HashConfig::default();
        let hashing = HashConfig {
            work_factor: parse_or(&lookup, "PASSWORD_WORK_FACTOR", hash_defaults.work_factor)?,
            memory_kib: parse_or(&lookup, "PASSWORD_MEMORY_KIB", hash_defaults.memory_kib)?,
        };

        let server_defaults = ServerConfig::default();
        let server = ServerConfig {
            host: lookup("APP_HOST").unwrap_or(server_defaults.host),
            port: parse_or(&lookup, "APP_PORT", server_defaults.port)?,
        };

        Ok(Self {
            database_url,
            jwt,
            hashing,
            server,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value {raw:?}")),
    }
}
