use crate::config::TelegramConfig;
use crate::error::NotificationError;
use anyhow::Context;
use reqwest::Client;
use std::time::Duration;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Push-message transport over the Telegram Bot API.
#[derive(Debug, Clone)]
pub struct TelegramClient {
    client: Client,
    base_url: String,
    token: String,
    chat_id: String,
}

impl TelegramClient {
    pub fn new(config: TelegramConfig) -> anyhow::Result<Self> {
        Self::with_base_url(TELEGRAM_API_BASE.to_string(), config)
    }

    /// Point the transport at an alternate API base (used by tests).
    pub fn with_base_url(base_url: String, config: TelegramConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url,
            token: config.token,
            chat_id: config.chat_id,
        })
    }

    /// Send `text` to the configured chat. Returns whether Telegram accepted
    /// the message; the transport itself failing is a `NotificationError`.
    pub async fn send_message(&self, text: &str) -> Result<bool, NotificationError> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, self.token);

        let response = self
            .client
            .post(&url)
            .form(&[("chat_id", self.chat_id.as_str()), ("text", text)])
            .send()
            .await
            .map_err(|source| NotificationError { source })?;

        Ok(response.status().is_success())
    }
}
