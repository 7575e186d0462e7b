use std::env;

use anyhow::{anyhow, Context};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    /// Token lifetime in minutes.
    pub jwt_maxage: i64,
    pub port: u16,
}

impl Config {
    /// Reads the process environment, after loading `.env` if one exists.
    pub fn init() -> anyhow::Result<Config> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| anyhow!("{key} must be set and non-empty"))
        };

        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET")?;

        let jwt_maxage = match lookup("JWT_MAXAGE") {
            Some(value) => value.parse().context("JWT_MAXAGE must be a number of minutes")?,
            None => 60,
        };
        let port = match lookup("PORT") {
            Some(value) => value.parse().context("PORT must be a valid port number")?,
            None => 8080,
        };
        let database_max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(value) => value
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?,
            None => 10,
        };

        Ok(Config {
            database_url,
            database_max_connections,
            jwt_secret,
            jwt_maxage,
            port,
        })
    }
}
