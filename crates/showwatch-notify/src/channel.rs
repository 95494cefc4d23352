use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use showwatch_core::{ChannelKind, ChannelSettings};

use crate::error::DeliveryError;
use crate::mail::MailChannel;
use crate::sns::SnsChannel;
use crate::topic::TopicChannel;

/// Outcome of a single delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryReceipt {
    pub ok: bool,
    pub id: Option<String>,
    pub error: Option<String>,
}

impl DeliveryReceipt {
    #[must_use]
    pub fn delivered(id: Option<String>) -> Self {
        Self {
            ok: true,
            id,
            error: None,
        }
    }

    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            error: Some(error.into()),
        }
    }
}

impl From<Result<Option<String>, DeliveryError>> for DeliveryReceipt {
    fn from(result: Result<Option<String>, DeliveryError>) -> Self {
        match result {
            Ok(id) => Self::delivered(id),
            Err(e) => Self::failed(e.to_string()),
        }
    }
}

/// Something that can deliver a rendered report.
///
/// Implementations must not panic or return early with an error: every
/// failure is reported through [`DeliveryReceipt::error`].
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Short label for logs, e.g. `"topic"`.
    fn kind(&self) -> &'static str;

    async fn send(&self, subject: &str, body: &str) -> DeliveryReceipt;
}

/// Builds the channel described by `settings`.
///
/// # Errors
///
/// Returns [`DeliveryError`] if the HTTP client cannot be built or the
/// destination is malformed for the chosen channel kind.
pub fn build_channel(
    settings: &ChannelSettings,
    timeout_secs: u64,
    user_agent: &str,
) -> Result<Arc<dyn NotificationChannel>, DeliveryError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .build()?;

    let channel: Arc<dyn NotificationChannel> = match settings.kind {
        ChannelKind::Topic => Arc::new(TopicChannel::new(
            client,
            &settings.destination,
            settings.credentials_ref.clone(),
        )?),
        ChannelKind::Sns => Arc::new(SnsChannel::new(&settings.destination)?),
        ChannelKind::Mail => {
            let token_path = settings.credentials_ref.clone().ok_or_else(|| {
                DeliveryError::Credentials {
                    path: "<unset>".to_string(),
                    reason: "mail channel requires a token file".to_string(),
                }
            })?;
            Arc::new(MailChannel::new(
                client,
                &settings.mail_api_url,
                &settings.destination,
                token_path,
            )?)
        }
    };

    Ok(channel)
}
