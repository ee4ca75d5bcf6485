//! Server configuration loaded from the environment.
//!
//! Every setting has a default suitable for local development; only
//! deployment-specific values (such as `DATABASE_URL`) need to be set
//! explicitly. Absence of `DATABASE_URL` selects the in-memory message
//! repository.

use std::env;
use std::num::ParseIntError;

use thiserror::Error;

/// Error returned when a configuration value cannot be read.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable held a value that is not valid UTF-8.
    #[error("environment variable {name} is not valid UTF-8")]
    NotUnicode {
        /// The offending variable name.
        name: &'static str,
    },

    /// A numeric setting failed to parse.
    #[error("environment variable {name} is not a valid number: {source}")]
    InvalidNumber {
        /// The offending variable name.
        name: &'static str,
        /// The underlying parse failure.
        source: ParseIntError,
    },
}

/// Runtime configuration for the server binary.
#[derive(Debug, Clone)]
pub struct Config {
    /// Interface the HTTP server binds to.
    pub host: String,
    /// Port the HTTP server binds to.
    pub port: u16,
    /// `PostgreSQL` connection string; `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// Directory holding stored image blobs.
    pub media_dir: String,
    /// Maximum accepted image upload size in bytes.
    pub max_image_bytes: usize,
    /// Maximum accepted text length in characters.
    pub max_text_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: 8080,
            database_url: None,
            media_dir: "./media".to_owned(),
            max_image_bytes: 5 * 1024 * 1024,
            max_text_length: 10_000,
        }
    }
}

impl Config {
    /// Loads configuration from the environment, falling back to defaults
    /// for unset variables.
    ///
    /// Recognised variables: `HOST`, `PORT`, `DATABASE_URL`, `MEDIA_DIR`,
    /// `MAX_IMAGE_BYTES`, and `MAX_TEXT_LENGTH`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            host: string_var("HOST")?.unwrap_or(defaults.host),
            port: numeric_var("PORT")?.unwrap_or(defaults.port),
            database_url: string_var("DATABASE_URL")?,
            media_dir: string_var("MEDIA_DIR")?.unwrap_or(defaults.media_dir),
            max_image_bytes: numeric_var("MAX_IMAGE_BYTES")?.unwrap_or(defaults.max_image_bytes),
            max_text_length: numeric_var("MAX_TEXT_LENGTH")?.unwrap_or(defaults.max_text_length),
        })
    }

    /// Returns the socket address string the server binds to.
    #[must_use]
    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

fn string_var(name: &'static str) -> Result<Option<String>, ConfigError> {
    match env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode { name }),
    }
}

fn numeric_var<T: std::str::FromStr<Err = ParseIntError>>(
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    string_var(name)?
        .map(|raw| {
            raw.parse()
                .map_err(|source| ConfigError::InvalidNumber { name, source })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_select_in_memory_store() {
        let config = Config::default();
        assert!(config.database_url.is_none());
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_text_length, 10_000);
    }

    #[test]
    fn bind_address_pairs_host_and_port() {
        let config = Config {
            host: "127.0.0.1".to_owned(),
            port: 9000,
            ..Config::default()
        };
        assert_eq!(config.bind_address(), ("127.0.0.1".to_owned(), 9000));
    }
}
