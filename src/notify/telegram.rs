use std::time::Duration;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::config::TELEGRAM;
use crate::notify::Notifier;

#[derive(Debug, Serialize)]
pub struct SendMessagePayload<'a> {
    pub chat_id: &'a str,
    pub text: &'a str,
}

#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Sends plain-text messages through the Telegram Bot API.
pub struct TelegramNotifier {
    client: reqwest::Client,
    base_url: String,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(token: impl Into<String>, chat_id: impl Into<String>) -> Result<Self> {
        Self::with_base_url(TELEGRAM.api_base_url, token, chat_id)
    }

    /// Create a notifier against a custom API host
    pub fn with_base_url(
        base_url: &str,
        token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(TELEGRAM.timeout_secs))
            .build()
            .context("building Telegram HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            chat_id: chat_id.into(),
        })
    }

    // Never logged: the token is part of the path
    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.base_url, self.token)
    }

    pub fn payload<'a>(&'a self, text: &'a str) -> SendMessagePayload<'a> {
        SendMessagePayload {
            chat_id: &self.chat_id,
            text,
        }
    }
}

/// A sendMessage call succeeded only on a 2xx status with `"ok": true` in the body.
fn check_response(status: StatusCode, body: &str) -> Result<()> {
    if !status.is_success() {
        bail!("Telegram API returned {}: {}", status, body);
    }
    let parsed: TelegramResponse = serde_json::from_str(body)
        .with_context(|| format!("unexpected Telegram response: {}", body))?;
    if !parsed.ok {
        bail!(
            "Telegram API error: {}",
            parsed.description.as_deref().unwrap_or(body)
        );
    }
    Ok(())
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        let resp = self
            .client
            .post(self.send_message_url())
            .json(&self.payload(text))
            .send()
            .await
            .context("Telegram sendMessage request failed")?;

        let status = resp.status();
        let body = resp.text().await.context("reading Telegram response")?;
        check_response(status, &body)
    }

    fn signature(&self) -> &'static str {
        "Telegram"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shape() {
        let notifier = TelegramNotifier::new("123:abc", "-1001").unwrap();
        let json = serde_json::to_value(notifier.payload("hello")).unwrap();
        assert_eq!(json, serde_json::json!({"chat_id": "-1001", "text": "hello"}));
    }

    #[test]
    fn test_send_message_url() {
        let notifier = TelegramNotifier::with_base_url("http://localhost:8081/", "123:abc", "1").unwrap();
        assert_eq!(notifier.send_message_url(), "http://localhost:8081/bot123:abc/sendMessage");
    }

    #[test]
    fn test_accepted_response() {
        assert!(check_response(StatusCode::OK, r#"{"ok":true,"result":{}}"#).is_ok());
    }

    #[test]
    fn test_http_error_carries_body() {
        let body = r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#;
        let err = check_response(StatusCode::BAD_REQUEST, body).unwrap_err();
        let text = format!("{:#}", err);
        assert!(text.contains("400"), "{}", text);
        assert!(text.contains("chat not found"), "{}", text);
    }

    #[test]
    fn test_ok_false_is_an_error() {
        let err = check_response(StatusCode::OK, r#"{"ok":false,"description":"bot was blocked"}"#).unwrap_err();
        assert!(format!("{:#}", err).contains("bot was blocked"));

        // No description: the raw body is reported instead
        let err = check_response(StatusCode::OK, r#"{"ok":false}"#).unwrap_err();
        assert!(format!("{:#}", err).contains(r#"{"ok":false}"#));
    }

    #[test]
    fn test_non_json_body_is_an_error() {
        let err = check_response(StatusCode::OK, "<html>gateway</html>").unwrap_err();
        assert!(format!("{:#}", err).contains("<html>gateway</html>"));
    }
}
