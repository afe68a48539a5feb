//! Server configuration from environment variables.
//!
//! | Variable | Meaning | Fallback |
//! |----------|---------|----------|
//! | `PORT` | Listen port | 3003 for the bloglist, 3001 for the phonebook |
//! | `DATABASE_URL` (or `MONGODB_URI`) | PostgreSQL connection string | none: in-memory stores |
//! | `SECRET` | Key used to sign login tokens | none: a random per-process key |
//!
//! A `.env` file in the working directory is read first via `dotenvy`.

use std::{env, fmt::Display, str::FromStr};

use thiserror::Error;
use tracing::{info, warn};

pub const BLOGLIST_PORT: u16 = 3003;
pub const PHONEBOOK_PORT: u16 = 3001;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub database_url: Option<String>,
    pub secret: Option<String>,
}

impl Config {
    /// Load from the process environment (after reading `.env`).
    pub fn load(default_port: u16) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(default_port, |key| env::var(key).ok())
    }

    /// Load through an arbitrary key lookup.
    pub fn from_lookup<F>(default_port: u16, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = try_load(var("PORT"), "PORT", default_port)?;
        let database_url = var("DATABASE_URL").or_else(|| var("MONGODB_URI"));
        let secret = var("SECRET");

        Ok(Self {
            port,
            database_url,
            secret,
        })
    }
}

fn try_load<T>(raw: Option<String>, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Some(raw) = raw else {
        info!("{key} not set, using default: {default}");
        return Ok(default);
    };

    raw.trim().parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid {
            key: key.to_string(),
            value: raw.clone(),
            reason: e.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(BLOGLIST_PORT, lookup(&[])).unwrap();
        assert_eq!(config.port, 3003);
        assert!(config.database_url.is_none());
        assert!(config.secret.is_none());
    }

    #[test]
    fn test_values_from_environment() {
        let config = Config::from_lookup(
            PHONEBOOK_PORT,
            lookup(&[
                ("PORT", "8080"),
                ("MONGODB_URI", "postgres://localhost/blogs"),
                ("SECRET", "s3cr3t"),
            ]),
        )
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/blogs")
        );
        assert_eq!(config.secret.as_deref(), Some("s3cr3t"));
    }

    #[test]
    fn test_empty_values_count_as_unset() {
        let config =
            Config::from_lookup(PHONEBOOK_PORT, lookup(&[("PORT", ""), ("SECRET", " ")])).unwrap();
        assert_eq!(config.port, 3001);
        assert!(config.secret.is_none());
    }

    #[test]
    fn test_invalid_port() {
        let err = Config::from_lookup(BLOGLIST_PORT, lookup(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "PORT"));
    }
}
