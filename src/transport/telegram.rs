//! Minimal Telegram Bot API client: long-poll for updates, send messages.

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::pipeline::{Destination, MessageFormat, Notifier, NotifyError, OutboundMessage};

pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Headroom on top of the long-poll timeout before the HTTP call gives up.
const POLL_GRACE: Duration = Duration::from_secs(10);
const SEND_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum TelegramError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("api error {code:?}: {description}")]
    Api {
        code: Option<i64>,
        description: String,
    },
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    error_code: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

impl Update {
    /// Chat and text of a plain text message, if this update carries one.
    pub fn text_message(&self) -> Option<(Destination, &str)> {
        let message = self.message.as_ref()?;
        let text = message.text.as_deref()?;
        Some((Destination(message.chat.id), text))
    }
}

#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    endpoint: String,
}

impl TelegramClient {
    /// `api_base` is [`TELEGRAM_API_BASE`] outside of tests.
    pub fn new(token: &str, api_base: &str) -> Result<Self, TelegramError> {
        let client = ClientBuilder::new()
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/bot{}", api_base.trim_end_matches('/'), token),
        })
    }

    #[instrument(skip(self))]
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout: Duration,
    ) -> Result<Vec<Update>, TelegramError> {
        let mut body = json!({
            "timeout": timeout.as_secs(),
            "allowed_updates": ["message"],
        });
        if let Some(offset) = offset {
            body["offset"] = json!(offset);
        }

        let updates: Vec<Update> = self.call("getUpdates", &body, timeout + POLL_GRACE).await?;
        debug!(count = updates.len(), "updates received");
        Ok(updates)
    }

    #[instrument(skip(self, text))]
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        parse_mode: Option<&str>,
    ) -> Result<(), TelegramError> {
        let mut body = json!({
            "chat_id": chat_id,
            "text": text,
        });
        if let Some(mode) = parse_mode {
            body["parse_mode"] = json!(mode);
        }

        let _: Value = self.call("sendMessage", &body, SEND_TIMEOUT).await?;
        Ok(())
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: &Value,
        timeout: Duration,
    ) -> Result<T, TelegramError> {
        // The API answers errors with a JSON envelope and a 4xx status, so the
        // status code is not checked before decoding.
        let response: ApiResponse<T> = self
            .client
            .post(format!("{}/{}", self.endpoint, method))
            .timeout(timeout)
            .json(body)
            .send()
            .await?
            .json()
            .await?;

        match response {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse {
                description,
                error_code,
                ..
            } => Err(TelegramError::Api {
                code: error_code,
                description: description.unwrap_or_else(|| "missing result".to_string()),
            }),
        }
    }
}

#[async_trait]
impl Notifier for TelegramClient {
    async fn notify(
        &self,
        destination: Destination,
        message: OutboundMessage,
    ) -> Result<(), NotifyError> {
        let parse_mode = match message.format {
            MessageFormat::Plain => None,
            MessageFormat::Markdown => Some("Markdown"),
        };

        self.send_message(destination.0, &message.text, parse_mode)
            .await
            .map_err(|e| match e {
                TelegramError::Api { .. } => NotifyError::Rejected(e.to_string()),
                TelegramError::Http(_) => NotifyError::Transport(e.to_string()),
            })
    }
}
