//! Configuration handling for the bot.
//!
//! Everything except the bot token has a default. A missing token is the one
//! condition that stops the process at startup.

use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::aggregator::MIN_DETAIL_DELAY;
use crate::fetcher::FetchSettings;
use crate::pipeline::PipelineSettings;

/// Environment variable names.
pub const ENV_BOT_TOKEN: &str = "BOT_TOKEN";
pub const ENV_SEARCH_KEYWORD: &str = "SEARCH_KEYWORD";
pub const ENV_SEARCH_LIMIT: &str = "SEARCH_LIMIT";
pub const ENV_FETCH_TIMEOUT_SECS: &str = "FETCH_TIMEOUT_SECS";
pub const ENV_CONNECT_TIMEOUT_SECS: &str = "CONNECT_TIMEOUT_SECS";
pub const ENV_DETAIL_DELAY_MS: &str = "DETAIL_DELAY_MS";
pub const ENV_DELIVERY_DELAY_MS: &str = "DELIVERY_DELAY_MS";
pub const ENV_POLL_TIMEOUT_SECS: &str = "POLL_TIMEOUT_SECS";

const DEFAULT_SEARCH_KEYWORD: &str = "motion designer";
const DEFAULT_SEARCH_LIMIT: usize = 5;
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_DETAIL_DELAY_MS: u64 = 1000;
const DEFAULT_DELIVERY_DELAY_MS: u64 = 1000;
const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required environment variable '{0}' is not set")]
    Missing(&'static str),

    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Bot runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    bot_token: String,
    search_keyword: String,
    search_limit: usize,
    fetch_timeout: Duration,
    connect_timeout: Duration,
    detail_delay: Duration,
    delivery_delay: Duration,
    poll_timeout: Duration,
}

impl Config {
    /// Config with every optional setting at its default.
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            search_keyword: DEFAULT_SEARCH_KEYWORD.to_string(),
            search_limit: DEFAULT_SEARCH_LIMIT,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            detail_delay: Duration::from_millis(DEFAULT_DETAIL_DELAY_MS),
            delivery_delay: Duration::from_millis(DEFAULT_DELIVERY_DELAY_MS),
            poll_timeout: Duration::from_secs(DEFAULT_POLL_TIMEOUT_SECS),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let bot_token = env::var(ENV_BOT_TOKEN)
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::Missing(ENV_BOT_TOKEN))?;

        let search_keyword = env::var(ENV_SEARCH_KEYWORD)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .unwrap_or_else(|| DEFAULT_SEARCH_KEYWORD.to_string());

        let search_limit = parse_var(ENV_SEARCH_LIMIT, DEFAULT_SEARCH_LIMIT)?;
        if search_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: ENV_SEARCH_LIMIT,
                reason: "must be at least 1".to_string(),
            });
        }

        let fetch_timeout = secs_var(ENV_FETCH_TIMEOUT_SECS, DEFAULT_FETCH_TIMEOUT_SECS)?;
        let connect_timeout = secs_var(ENV_CONNECT_TIMEOUT_SECS, DEFAULT_CONNECT_TIMEOUT_SECS)?;
        let poll_timeout = Duration::from_secs(parse_var(
            ENV_POLL_TIMEOUT_SECS,
            DEFAULT_POLL_TIMEOUT_SECS,
        )?);
        let detail_delay = Duration::from_millis(parse_var(
            ENV_DETAIL_DELAY_MS,
            DEFAULT_DETAIL_DELAY_MS,
        )?)
        .max(MIN_DETAIL_DELAY);
        let delivery_delay = Duration::from_millis(parse_var(
            ENV_DELIVERY_DELAY_MS,
            DEFAULT_DELIVERY_DELAY_MS,
        )?);

        Ok(Self {
            bot_token,
            search_keyword,
            search_limit,
            fetch_timeout,
            connect_timeout,
            detail_delay,
            delivery_delay,
            poll_timeout,
        })
    }

    /// Telegram bot token.
    pub fn bot_token(&self) -> &str {
        &self.bot_token
    }
    pub fn search_keyword(&self) -> &str {
        &self.search_keyword
    }
    pub fn search_limit(&self) -> usize {
        self.search_limit
    }
    /// Pause between two detail-page requests to the same provider.
    pub fn detail_delay(&self) -> Duration {
        self.detail_delay
    }
    /// Long-poll timeout for `getUpdates`.
    pub fn poll_timeout(&self) -> Duration {
        self.poll_timeout
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: self.connect_timeout,
            request_timeout: self.fetch_timeout,
            ..FetchSettings::default()
        }
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            keyword: self.search_keyword.clone(),
            limit: self.search_limit,
            delivery_delay: self.delivery_delay,
        }
    }
}

fn parse_var<T>(field: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(field) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                field,
                reason: e.to_string(),
            }),
        Err(_) => Ok(default),
    }
}

/// Timeouts of zero would fail every request instantly.
fn secs_var(field: &'static str, default: u64) -> Result<Duration, ConfigError> {
    match parse_var(field, default)? {
        0 => Err(ConfigError::InvalidValue {
            field,
            reason: "must be at least 1 second".to_string(),
        }),
        secs => Ok(Duration::from_secs(secs)),
    }
}
