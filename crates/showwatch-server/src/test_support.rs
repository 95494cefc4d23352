//! Stub source and channel for route and scheduler tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use showwatch_core::{AliasTable, ArtistAlias, ReportFormatter, ShowRecord};
use showwatch_notify::{DeliveryReceipt, NotificationChannel};
use showwatch_pipeline::{Pipeline, ShowSource};
use showwatch_scraper::FetchError;

use crate::state::AppState;

struct FixedSource;

#[async_trait]
impl ShowSource for FixedSource {
    async fn fetch_shows(&self) -> Result<Vec<ShowRecord>, FetchError> {
        let show: ShowRecord = serde_json::from_value(json!({
            "showId": 7,
            "showName": "Shazamat live",
            "showDate": "2024-06-01",
            "showTime": "22:00",
            "showPrice": 95
        }))
        .expect("show record");
        Ok(vec![show])
    }
}

#[derive(Default)]
pub struct CountingChannel {
    pub sends: AtomicUsize,
}

#[async_trait]
impl NotificationChannel for CountingChannel {
    fn kind(&self) -> &'static str {
        "counting"
    }

    async fn send(&self, _subject: &str, _body: &str) -> DeliveryReceipt {
        self.sends.fetch_add(1, Ordering::SeqCst);
        DeliveryReceipt::delivered(Some("m-1".to_string()))
    }
}

pub fn test_state(channel: Arc<CountingChannel>) -> AppState {
    let aliases = AliasTable::new(vec![ArtistAlias {
        canonical_name: "Shazamat".to_string(),
        surface_forms: vec!["Shazamat".to_string()],
    }])
    .expect("alias table");
    let formatter = ReportFormatter::new("subject", "https://barby.co.il/event/{id}");
    AppState::new(Pipeline::new(
        Arc::new(FixedSource),
        channel,
        aliases,
        formatter,
    ))
}
