//! Runtime configuration read from the environment
//!
//! A `.env` file in the working directory is honored. Every setting has a
//! default, so startup never fails on configuration alone.

use std::env;

use tracing::warn;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_DATABASE: &str = "linkly.db";
pub const DEFAULT_LOG_FILTER: &str = "linkly=debug,tower_http=debug";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `HOST`
    pub host: String,

    /// `PORT`
    pub port: u16,

    /// `DATABASE_URL`, path of the redb file
    pub database_path: String,

    /// `AUTHORIZATION`; `None` when unset or empty
    pub auth_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_path: DEFAULT_DATABASE.to_string(),
            auth_token: None,
        }
    }
}

impl Config {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(value = %raw, "invalid PORT, using {}", DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => defaults.port,
        };

        Self {
            host: lookup("HOST")
                .filter(|host| !host.trim().is_empty())
                .unwrap_or(defaults.host),
            port,
            database_path: lookup("DATABASE_URL")
                .filter(|path| !path.trim().is_empty())
                .unwrap_or(defaults.database_path),
            auth_token: lookup("AUTHORIZATION").filter(|token| !token.is_empty()),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
