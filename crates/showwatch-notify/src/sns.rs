//! AWS SNS topic publishing.
//!
//! The destination is a topic ARN (`arn:aws:sns:<region>:<account>:<name>`).
//! Requests go to the region named in the ARN. Credentials come from the
//! standard AWS provider chain (environment, profile, instance role).

use async_trait::async_trait;
use aws_sdk_sns::config::Region;
use aws_sdk_sns::error::{DisplayErrorContext, ProvideErrorMetadata};
use tokio::sync::OnceCell;

use crate::channel::{DeliveryReceipt, NotificationChannel};
use crate::error::DeliveryError;

pub struct SnsChannel {
    topic_arn: String,
    region: String,
    client: OnceCell<aws_sdk_sns::Client>,
}

impl SnsChannel {
    /// Channel whose SDK client is built from the default AWS config on
    /// first send.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::InvalidDestination`] if `topic_arn` is not an
    /// SNS topic ARN.
    pub fn new(topic_arn: &str) -> Result<Self, DeliveryError> {
        let region = topic_region(topic_arn)?;
        Ok(Self {
            topic_arn: topic_arn.to_string(),
            region,
            client: OnceCell::new(),
        })
    }

    /// Channel using a pre-built SDK client.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::InvalidDestination`] if `topic_arn` is not an
    /// SNS topic ARN.
    pub fn with_client(client: aws_sdk_sns::Client, topic_arn: &str) -> Result<Self, DeliveryError> {
        let channel = Self::new(topic_arn)?;
        // A fresh cell cannot already be set.
        let _ = channel.client.set(client);
        Ok(channel)
    }

    #[must_use]
    pub fn topic_arn(&self) -> &str {
        &self.topic_arn
    }

    async fn client(&self) -> &aws_sdk_sns::Client {
        self.client
            .get_or_init(|| async {
                let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
                    .region(Region::new(self.region.clone()))
                    .load()
                    .await;
                aws_sdk_sns::Client::new(&config)
            })
            .await
    }

    async fn publish(&self, subject: &str, body: &str) -> Result<Option<String>, DeliveryError> {
        let response = self
            .client()
            .await
            .publish()
            .topic_arn(&self.topic_arn)
            .subject(subject)
            .message(body)
            .send()
            .await
            .map_err(|e| match e.code() {
                Some(code) => DeliveryError::Sns(format!(
                    "{code}: {}",
                    e.message().unwrap_or_default()
                )),
                None => DeliveryError::Sns(DisplayErrorContext(&e).to_string()),
            })?;

        Ok(response.message_id().map(str::to_string))
    }
}

#[async_trait]
impl NotificationChannel for SnsChannel {
    fn kind(&self) -> &'static str {
        "sns"
    }

    async fn send(&self, subject: &str, body: &str) -> DeliveryReceipt {
        let result = self.publish(subject, body).await;
        match &result {
            Ok(id) => tracing::info!(topic_arn = %self.topic_arn, message_id = ?id, "published to sns"),
            Err(e) => tracing::warn!(topic_arn = %self.topic_arn, error = %e, "sns publish failed"),
        }
        result.into()
    }
}

/// Region segment of an SNS topic ARN.
fn topic_region(topic_arn: &str) -> Result<String, DeliveryError> {
    let invalid = |reason: &str| DeliveryError::InvalidDestination {
        destination: topic_arn.to_string(),
        reason: reason.to_string(),
    };

    let parts: Vec<&str> = topic_arn.split(':').collect();
    match parts.as_slice() {
        ["arn", _partition, "sns", region, account, name]
            if !region.is_empty() && !account.is_empty() && !name.is_empty() =>
        {
            Ok((*region).to_string())
        }
        ["arn", _, "sns", ..] => Err(invalid("expected arn:<partition>:sns:<region>:<account>:<topic>")),
        _ => Err(invalid("not an SNS topic ARN")),
    }
}
