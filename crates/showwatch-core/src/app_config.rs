use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Which medium a report is delivered through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    /// Publish to an ntfy-style pub/sub topic over HTTP.
    Topic,
    /// Publish to an AWS SNS topic, addressed by ARN.
    Sns,
    /// Send an email through an authenticated mail API.
    Mail,
}

impl std::fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelKind::Topic => write!(f, "topic"),
            ChannelKind::Sns => write!(f, "sns"),
            ChannelKind::Mail => write!(f, "mail"),
        }
    }
}

/// Notification channel configuration.
///
/// `destination` is the topic URL for [`ChannelKind::Topic`], the topic ARN
/// for [`ChannelKind::Sns`] and the recipient address for
/// [`ChannelKind::Mail`]. `credentials_ref` points at a token file. It is
/// optional for topics, ignored for SNS (which uses the AWS provider chain)
/// and required for mail.
#[derive(Clone, PartialEq, Eq)]
pub struct ChannelSettings {
    pub kind: ChannelKind,
    pub destination: String,
    pub credentials_ref: Option<PathBuf>,
    /// Base URL of the mail API. Ignored for topics.
    pub mail_api_url: String,
}

impl std::fmt::Debug for ChannelSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelSettings")
            .field("kind", &self.kind)
            .field("destination", &self.destination)
            .field(
                "credentials_ref",
                &self.credentials_ref.as_ref().map(|_| "[redacted]"),
            )
            .field("mail_api_url", &self.mail_api_url)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub artists_path: PathBuf,
    pub venue_url: String,
    pub listing_path: String,
    pub event_url_template: String,
    pub fetch_timeout_secs: u64,
    pub user_agent: String,
    pub channel: ChannelSettings,
    pub report_subject: String,
    pub schedule: String,
    pub seen_path: Option<PathBuf>,
}
