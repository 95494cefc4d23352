//! Wiring a [`Pipeline`] from an [`AppConfig`].

use std::sync::Arc;

use showwatch_core::{load_artists, AppConfig, ConfigError, ReportFormatter};
use showwatch_notify::{build_channel, DeliveryError};
use showwatch_scraper::{FetchError, VenueClient};
use thiserror::Error;

use crate::pipeline::Pipeline;
use crate::seen::JsonFileStore;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("venue client setup failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("notification channel setup failed: {0}")]
    Delivery(#[from] DeliveryError),
}

/// Builds the production pipeline: venue client, alias table from
/// `artists_path`, configured channel, and a seen-store when `seen_path` is set.
///
/// # Errors
///
/// Returns [`SetupError`] if the alias file is missing or invalid, or if the
/// venue client or channel cannot be constructed.
pub fn from_app_config(config: &AppConfig) -> Result<Pipeline, SetupError> {
    let aliases = load_artists(&config.artists_path)?;
    tracing::info!(
        artists = aliases.len(),
        path = %config.artists_path.display(),
        "loaded alias table"
    );

    let source = VenueClient::new(
        config.fetch_timeout_secs,
        &config.user_agent,
        &config.venue_url,
        &config.listing_path,
    )?;
    let channel = build_channel(
        &config.channel,
        config.fetch_timeout_secs,
        &config.user_agent,
    )?;
    let formatter = ReportFormatter::new(
        config.report_subject.clone(),
        config.event_url_template.clone(),
    );

    let mut pipeline = Pipeline::new(Arc::new(source), channel, aliases, formatter);
    if let Some(path) = &config.seen_path {
        tracing::info!(path = %path.display(), "seen-store enabled");
        pipeline = pipeline.with_seen_store(Arc::new(JsonFileStore::new(path.clone())));
    }

    Ok(pipeline)
}
