//! Environment-driven application configuration.
//!
//! The configuration is an explicit value constructed once at startup and
//! passed down; there is no module-level mutable strategy state. Debug
//! builds tolerate missing secrets with generated ephemeral ones plus a
//! warning; release builds fail closed.

use std::net::SocketAddr;

use actix_web::cookie::Key;
use tracing::warn;
use url::Url;

use crate::domain::{DEFAULT_SESSION_TTL_SECONDS, DEFAULT_TOKEN_TTL_SECONDS};

const BIND_ADDR_ENV: &str = "BIND_ADDR";
const TOKEN_SECRET_ENV: &str = "TOKEN_SECRET";
const TOKEN_TTL_ENV: &str = "TOKEN_TTL_SECONDS";
const SESSION_KEY_ENV: &str = "SESSION_KEY";
const SESSION_TTL_ENV: &str = "SESSION_TTL_SECONDS";
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const PROVIDER_URL_ENV: &str = "OAUTH_PROFILE_URL";
const SEED_ENV: &str = "SEED_EXAMPLE_DATA";

const TOKEN_SECRET_MIN_LEN: usize = 32;
const SESSION_KEY_MIN_LEN: usize = 64;
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no";

/// Errors raised while validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A secret is required in release builds.
    #[error("missing required environment variable: {name}")]
    MissingSecret {
        /// The absent variable.
        name: &'static str,
    },
    /// A variable is present but holds an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidValue {
        /// The offending variable.
        name: &'static str,
        /// The raw value found.
        value: String,
        /// A description of what would have been accepted.
        expected: &'static str,
    },
}

/// Application settings assembled at process start.
pub struct AppConfig {
    /// Socket the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// Signing/encryption key for the session cookie.
    pub cookie_key: Key,
    /// Whether the session cookie is marked `Secure`.
    pub cookie_secure: bool,
    /// Shared secret signing bearer tokens.
    pub token_secret: Vec<u8>,
    /// Fixed bearer-token lifetime.
    pub token_ttl_seconds: u64,
    /// Server-side session lifetime.
    pub session_ttl_seconds: u64,
    /// Profile endpoint of the OAuth identity provider, when configured.
    pub provider_profile_url: Option<Url>,
    /// Whether to seed example data into the in-memory store at startup.
    pub seed_example_data: bool,
}

pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

fn read_bool(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(name) {
        Ok(value) => parse_bool(&value).ok_or(ConfigError::InvalidValue {
            name,
            value,
            expected: BOOL_EXPECTED,
        }),
        Err(_) => Ok(default),
    }
}

fn read_u64(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
            name,
            value,
            expected: "a non-negative integer",
        }),
        Err(_) => Ok(default),
    }
}

fn ephemeral_secret(name: &'static str) -> Result<Vec<u8>, ConfigError> {
    if cfg!(debug_assertions) {
        warn!(variable = name, "using ephemeral signing secret (dev only)");
        let secret: [u8; 32] = rand::random();
        Ok(secret.to_vec())
    } else {
        Err(ConfigError::MissingSecret { name })
    }
}

impl AppConfig {
    /// Assemble the configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = match std::env::var(BIND_ADDR_ENV) {
            Ok(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                name: BIND_ADDR_ENV,
                value,
                expected: "a socket address such as 0.0.0.0:8080",
            })?,
            Err(_) => SocketAddr::from(([0, 0, 0, 0], 8080)),
        };

        let token_secret = match std::env::var(TOKEN_SECRET_ENV) {
            Ok(value) if value.len() >= TOKEN_SECRET_MIN_LEN => value.into_bytes(),
            Ok(value) => {
                return Err(ConfigError::InvalidValue {
                    name: TOKEN_SECRET_ENV,
                    value,
                    expected: "at least 32 bytes of secret material",
                });
            }
            Err(_) => ephemeral_secret(TOKEN_SECRET_ENV)?,
        };

        let cookie_key = match std::env::var(SESSION_KEY_ENV) {
            Ok(value) if value.len() >= SESSION_KEY_MIN_LEN => Key::derive_from(value.as_bytes()),
            Ok(value) => {
                return Err(ConfigError::InvalidValue {
                    name: SESSION_KEY_ENV,
                    value,
                    expected: "at least 64 bytes of key material",
                });
            }
            Err(_) => {
                if cfg!(debug_assertions) {
                    warn!(variable = SESSION_KEY_ENV, "using ephemeral cookie key (dev only)");
                    Key::generate()
                } else {
                    return Err(ConfigError::MissingSecret {
                        name: SESSION_KEY_ENV,
                    });
                }
            }
        };

        let provider_profile_url = match std::env::var(PROVIDER_URL_ENV) {
            Ok(value) => Some(Url::parse(&value).map_err(|_| ConfigError::InvalidValue {
                name: PROVIDER_URL_ENV,
                value,
                expected: "an absolute URL",
            })?),
            Err(_) => None,
        };

        Ok(Self {
            bind_addr,
            cookie_key,
            cookie_secure: read_bool(COOKIE_SECURE_ENV, true)?,
            token_secret,
            token_ttl_seconds: read_u64(TOKEN_TTL_ENV, DEFAULT_TOKEN_TTL_SECONDS)?,
            session_ttl_seconds: read_u64(SESSION_TTL_ENV, DEFAULT_SESSION_TTL_SECONDS)?,
            provider_profile_url,
            seed_example_data: read_bool(SEED_ENV, false)?,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", Some(true))]
    #[case("TRUE", Some(true))]
    #[case("yes", Some(true))]
    #[case("0", Some(false))]
    #[case("no", Some(false))]
    #[case(" false ", Some(false))]
    #[case("maybe", None)]
    #[case("", None)]
    fn boolean_toggles_parse_strictly(#[case] value: &str, #[case] expected: Option<bool>) {
        assert_eq!(parse_bool(value), expected);
    }
}
