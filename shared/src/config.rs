use anyhow::{Context, Result};
use std::env;

pub struct AppConfig {
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub auth: AuthConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        let database = DatabaseConfig {
            host: env::var("DATABASE_HOST")?,
            port: env::var("DATABASE_PORT")?
                .parse()
                .context("DATABASE_PORT must be a port number")?,
            username: env::var("DATABASE_USERNAME")?,
            password: env::var("DATABASE_PASSWORD")?,
            database: env::var("DATABASE_NAME")?,
        };
        let redis = RedisConfig {
            host: env::var("REDIS_HOST")?,
            port: env::var("REDIS_PORT")?
                .parse()
                .context("REDIS_PORT must be a port number")?,
        };
        let auth = AuthConfig {
            ttl: env::var("AUTH_TOKEN_TTL")?
                .parse()
                .context("AUTH_TOKEN_TTL must be a number of seconds")?,
        };
        let server = ServerConfig::from_port(env::var("SERVER_PORT").ok().as_deref())?;
        Ok(Self {
            database,
            redis,
            auth,
            server,
        })
    }
}

pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

pub struct RedisConfig {
    pub host: String,
    pub port: u16,
}

pub struct AuthConfig {
    /// Lifetime of an access token in seconds.
    pub ttl: u64,
}

pub struct ServerConfig {
    pub port: u16,
}

impl ServerConfig {
    pub const DEFAULT_PORT: u16 = 8080;

    fn from_port(port: Option<&str>) -> Result<Self> {
        let port = match port {
            None => Self::DEFAULT_PORT,
            Some(p) => p.parse().context("SERVER_PORT must be a port number")?,
        };
        Ok(Self { port })
    }
}

/// Initial accounts inserted by the `seed` binary.
pub struct SeedConfig {
    pub admin_email: String,
    pub admin_password: String,
    pub staff_email: String,
    pub staff_password: String,
}

impl SeedConfig {
    pub fn new() -> Self {
        let var_or = |key: &str, default: &str| env::var(key).unwrap_or_else(|_| default.into());
        Self {
            admin_email: var_or("SEED_ADMIN_EMAIL", "admin@example.com"),
            admin_password: var_or("SEED_ADMIN_PASSWORD", "admin123"),
            staff_email: var_or("SEED_STAFF_EMAIL", "staff@example.com"),
            staff_password: var_or("SEED_STAFF_PASSWORD", "staff123"),
        }
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_port_defaults_when_unset() {
        let cfg = ServerConfig::from_port(None).unwrap();
        assert_eq!(cfg.port, ServerConfig::DEFAULT_PORT);
    }

    #[test]
    fn server_port_rejects_garbage() {
        assert!(ServerConfig::from_port(Some("eighty")).is_err());
        assert_eq!(ServerConfig::from_port(Some("5001")).unwrap().port, 5001);
    }
}
