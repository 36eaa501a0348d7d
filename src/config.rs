//! Client configuration.
//!
//! Values are passed in explicitly by the embedding application or read once
//! from the environment with [`ClientConfig::from_env`]:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `PLAYGROUND_API_URL` | required |
//! | `PLAYGROUND_TOKEN` | required |
//! | `PLAYGROUND_CLIENT_ID` | required |
//! | `PLAYGROUND_POLL_INTERVAL_MS` | 2000 |
//! | `PLAYGROUND_POLL_MAX_ATTEMPTS` | 60 |

use crate::error::ConfigError;
use crate::jobs::PollerConfig;
use std::str::FromStr;
use std::time::Duration;

pub const ENV_API_URL: &str = "PLAYGROUND_API_URL";
pub const ENV_TOKEN: &str = "PLAYGROUND_TOKEN";
pub const ENV_CLIENT_ID: &str = "PLAYGROUND_CLIENT_ID";
pub const ENV_POLL_INTERVAL_MS: &str = "PLAYGROUND_POLL_INTERVAL_MS";
pub const ENV_POLL_MAX_ATTEMPTS: &str = "PLAYGROUND_POLL_MAX_ATTEMPTS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without a trailing slash.
    pub api_url: String,
    pub token: String,
    pub client_id: String,
    pub poll: PollerConfig,
}

impl ClientConfig {
    pub fn new(
        api_url: impl Into<String>,
        token: impl Into<String>,
        client_id: impl Into<String>,
    ) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            client_id: client_id.into(),
            poll: PollerConfig::default(),
        }
    }

    pub fn with_poll(mut self, poll: PollerConfig) -> Self {
        self.poll = poll;
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingEnv(name))
        };
        let defaults = PollerConfig::default();
        let interval_ms =
            parse_or(&lookup, ENV_POLL_INTERVAL_MS, defaults.interval.as_millis() as u64)?;
        let max_attempts = parse_or(&lookup, ENV_POLL_MAX_ATTEMPTS, defaults.max_attempts)?;
        if max_attempts == 0 {
            return Err(ConfigError::InvalidEnv {
                name: ENV_POLL_MAX_ATTEMPTS,
                value: max_attempts.to_string(),
            });
        }
        let poll = PollerConfig {
            interval: Duration::from_millis(interval_ms),
            max_attempts,
        };

        Ok(Self::new(
            required(ENV_API_URL)?,
            required(ENV_TOKEN)?,
            required(ENV_CLIENT_ID)?,
        )
        .with_poll(poll))
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(value) => value
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidEnv { name, value }),
        None => Ok(default),
    }
}
