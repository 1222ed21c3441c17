// Credentials and endpoints, injected from the environment (.env is loaded by the binaries)
use crate::error::{Result, ToolError};
use std::fmt;
use std::time::Duration;

pub const DROPBOX_TOKEN_VAR: &str = "DROPBOX_ACCESS_TOKEN";
pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_BOT_TOKEN";
pub const TELEGRAM_CHAT_VAR: &str = "TELEGRAM_CHAT_ID";
pub const DROPBOX_API_VAR: &str = "DROPBOX_API_URL";
pub const DROPBOX_CONTENT_VAR: &str = "DROPBOX_CONTENT_URL";
pub const TELEGRAM_API_VAR: &str = "TELEGRAM_API_URL";
pub const HTTP_TIMEOUT_VAR: &str = "SPAY_HTTP_TIMEOUT_SECS";

const DEFAULT_DROPBOX_API: &str = "https://api.dropboxapi.com";
const DEFAULT_DROPBOX_CONTENT: &str = "https://content.dropboxapi.com";
const DEFAULT_TELEGRAM_API: &str = "https://api.telegram.org";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 300;

#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    dropbox_token: Option<String>,
    telegram_token: Option<String>,
    telegram_chat_id: Option<i64>,
    pub dropbox_api_url: String,
    pub dropbox_content_url: String,
    pub telegram_api_url: String,
    pub http_timeout: Duration,
}

/// Chat credentials, only present when both the token and chat id are set.
#[derive(Clone, PartialEq, Eq)]
pub struct TelegramCredentials<'a> {
    pub bot_token: &'a str,
    pub chat_id: i64,
}

impl Config {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Empty values count as unset. Credentials are only checked for presence
    /// when an operation needs them, so a build without chat settings can
    /// still upload.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let telegram_chat_id = match get(TELEGRAM_CHAT_VAR) {
            Some(raw) => Some(raw.parse::<i64>().map_err(|e| {
                ToolError::Config(format!(
                    "{} must be an integer chat id, got '{}': {}",
                    TELEGRAM_CHAT_VAR, raw, e
                ))
            })?),
            None => None,
        };

        let http_timeout = match get(HTTP_TIMEOUT_VAR) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ToolError::Config(format!(
                        "{} must be a positive number of seconds, got '{}'",
                        HTTP_TIMEOUT_VAR, raw
                    )));
                }
            },
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        let url = |key: &str, default: &str| {
            get(key)
                .unwrap_or_else(|| default.to_string())
                .trim_end_matches('/')
                .to_string()
        };

        let config = Config {
            dropbox_token: get(DROPBOX_TOKEN_VAR),
            telegram_token: get(TELEGRAM_TOKEN_VAR),
            telegram_chat_id,
            dropbox_api_url: url(DROPBOX_API_VAR, DEFAULT_DROPBOX_API),
            dropbox_content_url: url(DROPBOX_CONTENT_VAR, DEFAULT_DROPBOX_CONTENT),
            telegram_api_url: url(TELEGRAM_API_VAR, DEFAULT_TELEGRAM_API),
            http_timeout,
        };

        tracing::debug!(config = ?config, "configuration loaded");
        Ok(config)
    }

    pub fn dropbox_token(&self) -> Result<&str> {
        self.dropbox_token.as_deref().ok_or_else(|| {
            ToolError::Config(format!(
                "{} is not set; export it or add it to .env",
                DROPBOX_TOKEN_VAR
            ))
        })
    }

    pub fn telegram(&self) -> Result<TelegramCredentials<'_>> {
        let bot_token = self.telegram_token.as_deref().ok_or_else(|| {
            ToolError::Config(format!("{} is not set", TELEGRAM_TOKEN_VAR))
        })?;
        let chat_id = self
            .telegram_chat_id
            .ok_or_else(|| ToolError::Config(format!("{} is not set", TELEGRAM_CHAT_VAR)))?;
        Ok(TelegramCredentials { bot_token, chat_id })
    }
}

// Tokens never reach logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &Option<String>| if value.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("Config")
            .field("dropbox_token", &redact(&self.dropbox_token))
            .field("telegram_token", &redact(&self.telegram_token))
            .field("telegram_chat_id", &self.telegram_chat_id)
            .field("dropbox_api_url", &self.dropbox_api_url)
            .field("dropbox_content_url", &self.dropbox_content_url)
            .field("telegram_api_url", &self.telegram_api_url)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}
