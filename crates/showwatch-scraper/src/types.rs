//! Response types for the venue's show listing endpoint.
//!
//! The listing nests records under `returnShow.show`. Either level may be
//! absent when the venue has nothing scheduled; both default to empty.

use serde::Deserialize;
use showwatch_core::ShowRecord;

/// Top-level response from the listing endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListingResponse {
    #[serde(rename = "returnShow", default)]
    pub return_show: ReturnShow,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReturnShow {
    #[serde(default)]
    pub show: Vec<ShowRecord>,
}

impl ListingResponse {
    #[must_use]
    pub fn into_shows(self) -> Vec<ShowRecord> {
        self.return_show.show
    }
}
