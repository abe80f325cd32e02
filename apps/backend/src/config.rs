//! Server configuration read from the environment.

use anyhow::{bail, Context};

/// Runtime configuration for the backend.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    /// Total attempts for one review submission before reporting a conflict.
    pub review_max_attempts: u32,
}

impl Config {
    /// Load from process environment (after `.env`, if present).
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("PORT must be a port number, got {raw:?}"))?,
            None => 3000,
        };

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("DATABASE_MAX_CONNECTIONS must be an integer, got {raw:?}"))?,
            None => 10,
        };

        let review_max_attempts = match lookup("REVIEW_MAX_ATTEMPTS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("REVIEW_MAX_ATTEMPTS must be an integer, got {raw:?}"))?,
            None => 3,
        };
        if review_max_attempts == 0 {
            bail!("REVIEW_MAX_ATTEMPTS must be at least 1");
        }

        Ok(Self {
            database_url,
            host,
            port,
            max_connections,
            review_max_attempts,
        })
    }

    /// Address the HTTP listener binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
