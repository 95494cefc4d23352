//! Pub/sub topic publisher speaking the ntfy JSON publish protocol.

use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::channel::{DeliveryReceipt, NotificationChannel};
use crate::credentials::read_bearer_token;
use crate::error::DeliveryError;

#[derive(Debug, Serialize)]
struct PublishRequest<'a> {
    topic: &'a str,
    title: &'a str,
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct PublishResponse {
    id: Option<String>,
}

/// Publishes reports to a topic.
///
/// The destination is the full topic URL (`https://ntfy.sh/barby-scanner`).
/// Its last path segment is the topic name; the rest is the server the JSON
/// message is posted to. When a credentials file is configured its token is
/// sent as a bearer token.
pub struct TopicChannel {
    client: Client,
    publish_url: Url,
    topic: String,
    token_path: Option<PathBuf>,
}

impl TopicChannel {
    /// # Errors
    ///
    /// Returns [`DeliveryError::InvalidDestination`] if `destination` is not an
    /// http(s) URL ending in a topic name.
    pub fn new(
        client: Client,
        destination: &str,
        token_path: Option<PathBuf>,
    ) -> Result<Self, DeliveryError> {
        let (publish_url, topic) = split_topic_url(destination)?;
        Ok(Self {
            client,
            publish_url,
            topic,
            token_path,
        })
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    async fn publish(&self, subject: &str, body: &str) -> Result<Option<String>, DeliveryError> {
        let mut request = self.client.post(self.publish_url.clone()).json(&PublishRequest {
            topic: &self.topic,
            title: subject,
            message: body,
        });
        if let Some(path) = &self.token_path {
            request = request.bearer_auth(read_bearer_token(path)?);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Rejected {
                service: "topic",
                status: status.as_u16(),
                message: message.trim().to_string(),
            });
        }

        // The server accepted the message; a body without an id is not a failure.
        let id = response
            .json::<PublishResponse>()
            .await
            .ok()
            .and_then(|r| r.id);
        Ok(id)
    }
}

#[async_trait]
impl NotificationChannel for TopicChannel {
    fn kind(&self) -> &'static str {
        "topic"
    }

    async fn send(&self, subject: &str, body: &str) -> DeliveryReceipt {
        let result = self.publish(subject, body).await;
        match &result {
            Ok(id) => tracing::info!(topic = %self.topic, message_id = ?id, "topic notification published"),
            Err(e) => tracing::error!(topic = %self.topic, error = %e, "topic publish failed"),
        }
        result.into()
    }
}

/// Splits `https://host/prefix/topic` into (`https://host/prefix/`, `topic`).
fn split_topic_url(destination: &str) -> Result<(Url, String), DeliveryError> {
    let invalid = |reason: &str| DeliveryError::InvalidDestination {
        destination: destination.to_owned(),
        reason: reason.to_owned(),
    };

    let url = Url::parse(destination.trim_end_matches('/')).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("topic URL must use http or https"));
    }

    let topic = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| invalid("topic URL must end with a topic name"))?
        .to_string();

    let publish_url = url.join("./").map_err(|e| invalid(&e.to_string()))?;
    Ok((publish_url, topic))
}
