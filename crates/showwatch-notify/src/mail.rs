//! Mail delivery through the Gmail REST API.

use std::path::PathBuf;

use async_trait::async_trait;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine as _;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::channel::{DeliveryReceipt, NotificationChannel};
use crate::credentials::read_bearer_token;
use crate::error::DeliveryError;

const SEND_PATH: &str = "/gmail/v1/users/me/messages/send";

/// Line length for base64 bodies, per RFC 2045.
const MIME_LINE_LEN: usize = 76;

#[derive(Debug, Serialize)]
struct SendRequest {
    raw: String,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Sends reports as plain-text email from the authenticated account.
///
/// The OAuth access token is read from `token_path` on each send. Obtaining
/// and refreshing that token happens outside this process.
pub struct MailChannel {
    client: Client,
    send_url: Url,
    recipient: String,
    token_path: PathBuf,
}

impl MailChannel {
    /// # Errors
    ///
    /// Returns [`DeliveryError::InvalidDestination`] if `api_base_url` is not
    /// a URL or `recipient` is not a single plausible address.
    pub fn new(
        client: Client,
        api_base_url: &str,
        recipient: &str,
        token_path: PathBuf,
    ) -> Result<Self, DeliveryError> {
        let send_url = Url::parse(api_base_url)
            .and_then(|base| base.join(SEND_PATH))
            .map_err(|e| DeliveryError::InvalidDestination {
                destination: api_base_url.to_owned(),
                reason: e.to_string(),
            })?;

        let recipient = recipient.trim();
        if !recipient.contains('@') || recipient.contains(['\r', '\n', ',']) {
            return Err(DeliveryError::InvalidDestination {
                destination: recipient.to_owned(),
                reason: "expected a single email address".to_string(),
            });
        }

        Ok(Self {
            client,
            send_url,
            recipient: recipient.to_owned(),
            token_path,
        })
    }

    async fn deliver(&self, subject: &str, body: &str) -> Result<Option<String>, DeliveryError> {
        let token = read_bearer_token(&self.token_path)?;
        let raw = URL_SAFE.encode(build_message(&self.recipient, subject, body));

        let response = self
            .client
            .post(self.send_url.clone())
            .bearer_auth(token)
            .json(&SendRequest { raw })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorResponse>(&text)
                .map_or_else(|_| text.trim().to_string(), |e| e.error.message);
            return Err(DeliveryError::Rejected {
                service: "mail",
                status: status.as_u16(),
                message,
            });
        }

        let id = response.json::<SendResponse>().await.ok().and_then(|r| r.id);
        Ok(id)
    }
}

#[async_trait]
impl NotificationChannel for MailChannel {
    fn kind(&self) -> &'static str {
        "mail"
    }

    async fn send(&self, subject: &str, body: &str) -> DeliveryReceipt {
        let result = self.deliver(subject, body).await;
        match &result {
            Ok(id) => tracing::info!(message_id = ?id, "mail notification sent"),
            Err(e) => tracing::error!(error = %e, "mail send failed"),
        }
        result.into()
    }
}

/// Builds an RFC 822 message with a UTF-8 subject and base64 plain-text body.
fn build_message(to: &str, subject: &str, body: &str) -> String {
    let encoded_body = STANDARD.encode(body.as_bytes());
    let wrapped: Vec<&str> = encoded_body
        .as_bytes()
        .chunks(MIME_LINE_LEN)
        // base64 output is ASCII, so every chunk is valid UTF-8.
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or_default())
        .collect();

    format!(
        "To: {to}\r\n\
         Subject: =?UTF-8?B?{subject}?=\r\n\
         MIME-Version: 1.0\r\n\
         Content-Type: text/plain; charset=\"utf-8\"\r\n\
         Content-Transfer-Encoding: base64\r\n\
         \r\n\
         {body}\r\n",
        subject = STANDARD.encode(subject.as_bytes()),
        body = wrapped.join("\r\n"),
    )
}
