//! Notification delivery for match reports.
//!
//! Every channel implements [`NotificationChannel`], whose `send` never fails
//! toward the caller: transport and API errors come back inside the
//! [`DeliveryReceipt`].

pub mod channel;
pub mod credentials;
pub mod error;
pub mod mail;
pub mod sns;
pub mod topic;

pub use channel::{build_channel, DeliveryReceipt, NotificationChannel};
pub use error::DeliveryError;
pub use mail::MailChannel;
pub use sns::SnsChannel;
pub use topic::TopicChannel;
