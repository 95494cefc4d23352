use thiserror::Error;

/// Failure while delivering a report. Never returned from
/// [`crate::NotificationChannel::send`]; rendered into the receipt instead.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} rejected the request with status {status}: {message}")]
    Rejected {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[error("sns publish failed: {0}")]
    Sns(String),

    #[error("failed to read credentials {path}: {reason}")]
    Credentials { path: String, reason: String },

    #[error("invalid destination \"{destination}\": {reason}")]
    InvalidDestination { destination: String, reason: String },
}
