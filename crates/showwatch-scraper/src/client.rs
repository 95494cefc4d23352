use std::time::Duration;

use reqwest::{header, Client, Url};
use showwatch_core::ShowRecord;

use crate::error::FetchError;
use crate::types::ListingResponse;

/// HTTP client for a venue's public show listing.
///
/// The listing endpoint expects the session cookies the venue's home page
/// sets, so every fetch first loads the home page through a cookie-keeping
/// client and then calls the listing endpoint on the same origin.
///
/// There is no retry: a failed fetch is reported to the caller, and the next
/// scheduled run tries again.
pub struct VenueClient {
    client: Client,
    venue_url: Url,
    listing_url: Url,
}

impl VenueClient {
    /// Creates a `VenueClient` with the given timeout and `User-Agent`.
    ///
    /// `listing_path` is resolved against the origin of `venue_url`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidVenueUrl`] if `venue_url` is not an
    /// absolute http(s) URL, or [`FetchError::Http`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        venue_url: &str,
        listing_path: &str,
    ) -> Result<Self, FetchError> {
        let (venue_url, listing_url) = Self::resolve_urls(venue_url, listing_path)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .cookie_store(true)
            .build()?;
        Ok(Self {
            client,
            venue_url,
            listing_url,
        })
    }

    #[must_use]
    pub fn listing_url(&self) -> &str {
        self.listing_url.as_str()
    }

    /// Fetches the current show listing.
    ///
    /// A non-2xx response from the home page is logged and ignored; the
    /// listing call decides whether the fetch succeeded.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Http`]: network, TLS or timeout failure on either request.
    /// - [`FetchError::UnexpectedStatus`]: the listing returned a non-2xx status.
    /// - [`FetchError::Deserialize`]: the listing body is not JSON of the
    ///   expected shape.
    pub async fn fetch_shows(&self) -> Result<Vec<ShowRecord>, FetchError> {
        let home = self.client.get(self.venue_url.clone()).send().await?;
        if !home.status().is_success() {
            tracing::warn!(
                url = %self.venue_url,
                status = home.status().as_u16(),
                "venue home page returned non-success status; continuing to listing"
            );
        }

        let response = self
            .client
            .get(self.listing_url.clone())
            .header(header::ACCEPT, "application/json")
            .header(header::REFERER, self.venue_url.as_str())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.listing_url.to_string(),
            });
        }

        let body = response.text().await?;
        let parsed = serde_json::from_str::<ListingResponse>(&body).map_err(|e| {
            FetchError::Deserialize {
                context: format!("show listing from {}", self.listing_url),
                source: e,
            }
        })?;

        let shows = parsed.into_shows();
        tracing::debug!(count = shows.len(), "fetched show listing");
        Ok(shows)
    }

    /// Parses the venue URL and joins the listing path onto its origin.
    fn resolve_urls(venue_url: &str, listing_path: &str) -> Result<(Url, Url), FetchError> {
        let invalid = |reason: String| FetchError::InvalidVenueUrl {
            url: venue_url.to_owned(),
            reason,
        };

        let venue = Url::parse(venue_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(venue.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", venue.scheme())));
        }

        let origin = Url::parse(&venue.origin().ascii_serialization())
            .map_err(|e| invalid(e.to_string()))?;
        let listing = origin
            .join(listing_path)
            .map_err(|e| invalid(format!("cannot join listing path '{listing_path}': {e}")))?;

        Ok((venue, listing))
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
