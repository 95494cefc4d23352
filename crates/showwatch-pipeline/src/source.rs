use async_trait::async_trait;
use showwatch_core::ShowRecord;
use showwatch_scraper::{FetchError, VenueClient};

/// Supplies the current show listing for one run.
#[async_trait]
pub trait ShowSource: Send + Sync {
    async fn fetch_shows(&self) -> Result<Vec<ShowRecord>, FetchError>;
}

#[async_trait]
impl ShowSource for VenueClient {
    async fn fetch_shows(&self) -> Result<Vec<ShowRecord>, FetchError> {
        VenueClient::fetch_shows(self).await
    }
}
