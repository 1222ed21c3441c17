// Telegram Bot API notifier
use crate::config::Config;
use crate::error::{Result, ToolError};
use crate::services::notify::Notifier;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

pub struct TelegramNotifier {
    client: Client,
    api_url: String,
    bot_token: String,
    chat_id: i64,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
}

#[derive(Deserialize)]
struct BotResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramNotifier {
    pub fn from_config(config: &Config) -> Result<Self> {
        let credentials = config.telegram()?;
        let client = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| ToolError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(TelegramNotifier {
            client,
            api_url: config.telegram_api_url.clone(),
            bot_token: credentials.bot_token.to_string(),
            chat_id: credentials.chat_id,
        })
    }
}

impl Notifier for TelegramNotifier {
    fn send(&self, text: &str) -> Result<()> {
        // The bot token is part of the URL, so it is never logged and is stripped from errors
        let url = format!("{}/bot{}/sendMessage", self.api_url, self.bot_token);
        tracing::debug!(chat_id = self.chat_id, chars = text.chars().count(), "sending chat message");

        let response = self
            .client
            .post(&url)
            .json(&SendMessage {
                chat_id: self.chat_id,
                text,
            })
            .send()
            .map_err(|e| ToolError::transfer("notify", e.without_url().to_string()))?;

        let status = response.status();
        let body = response.text().map_err(|e| {
            ToolError::transfer("notify", format!("failed to read response: {}", e.without_url()))
        })?;
        tracing::debug!(status = status.as_u16(), "telegram response");

        check_response(status.as_u16(), &body)
    }
}

fn check_response(status: u16, body: &str) -> Result<()> {
    match serde_json::from_str::<BotResponse>(body) {
        Ok(BotResponse { ok: true, .. }) => Ok(()),
        Ok(BotResponse { description, .. }) => Err(ToolError::transfer(
            "notify",
            format!(
                "HTTP {}: {}",
                status,
                description.unwrap_or_else(|| "request rejected".to_string())
            ),
        )),
        Err(_) => Err(ToolError::transfer(
            "notify",
            format!("HTTP {}: unexpected response: {}", status, body.trim()),
        )),
    }
}
