use std::collections::BTreeSet;
use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;
use showwatch_core::{ArtistAlias, ShowRecord};
use showwatch_notify::DeliveryReceipt;
use showwatch_scraper::FetchError;

use super::*;
use crate::outcome::RunStatus;
use crate::seen::{JsonFileStore, SeenStoreError};

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

/// Source returning a fixed listing, or an error when `shows` is `None`.
struct StubSource {
    shows: Option<Vec<ShowRecord>>,
}

#[async_trait]
impl ShowSource for StubSource {
    async fn fetch_shows(&self) -> Result<Vec<ShowRecord>, FetchError> {
        self.shows.clone().ok_or(FetchError::UnexpectedStatus {
            status: 503,
            url: "https://venue.test/api/shows/find".to_string(),
        })
    }
}

/// Channel that records every send and answers with a fixed receipt.
struct SpyChannel {
    receipt: DeliveryReceipt,
    sent: Mutex<Vec<(String, String)>>,
}

impl SpyChannel {
    fn answering(receipt: DeliveryReceipt) -> Arc<Self> {
        Arc::new(Self {
            receipt,
            sent: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationChannel for SpyChannel {
    fn kind(&self) -> &'static str {
        "spy"
    }

    async fn send(&self, subject: &str, body: &str) -> DeliveryReceipt {
        self.sent
            .lock()
            .unwrap()
            .push((subject.to_string(), body.to_string()));
        self.receipt.clone()
    }
}

/// Store whose reads always fail.
struct BrokenStore;

impl NotifiedStore for BrokenStore {
    fn load(&self) -> Result<BTreeSet<String>, SeenStoreError> {
        Err(SeenStoreError::Io {
            path: "/broken".to_string(),
            source: std::io::Error::other("disk on fire"),
        })
    }

    fn record(&self, _keys: &[String]) -> Result<(), SeenStoreError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn tuna_table() -> AliasTable {
    AliasTable::new(vec![ArtistAlias {
        canonical_name: "Tuna".to_string(),
        surface_forms: vec!["tuna".to_string(), "Tuna".to_string()],
    }])
    .unwrap()
}

fn formatter() -> ReportFormatter {
    ReportFormatter::new("🎵 subject", "https://barby.co.il/event/{id}")
}

fn tuna_show() -> ShowRecord {
    ShowRecord {
        id: Some("1".to_string()),
        display_name: Some("Tuna Live Night".to_string()),
        date: Some("2024-05-01".to_string()),
        time: Some("21:00".to_string()),
        price: Some(Decimal::from(80)),
    }
}

fn jazz_show() -> ShowRecord {
    ShowRecord {
        display_name: Some("Jazz Night".to_string()),
        ..ShowRecord::default()
    }
}

fn pipeline(shows: Option<Vec<ShowRecord>>, channel: Arc<SpyChannel>) -> Pipeline {
    Pipeline::new(
        Arc::new(StubSource { shows }),
        channel,
        tuna_table(),
        formatter(),
    )
}

// ---------------------------------------------------------------------------
// End-to-end scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn single_match_delivered_is_success() {
    let channel = SpyChannel::answering(DeliveryReceipt::delivered(Some("abc".to_string())));
    let outcome = pipeline(Some(vec![tuna_show()]), Arc::clone(&channel))
        .run()
        .await;

    assert_eq!(outcome.status, RunStatus::Success);
    assert_eq!(outcome.match_count, 1);
    assert_eq!(outcome.delivery_id.as_deref(), Some("abc"));
    assert!(outcome.error_detail.is_none());

    let calls = channel.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "🎵 subject");
    assert!(calls[0].1.contains("🎤 Tuna: Tuna Live Night"));
    assert!(calls[0].1.contains("🔗 https://barby.co.il/event/1"));
}

#[tokio::test]
async fn lowercase_only_alias_does_not_match_capitalised_title() {
    let aliases = AliasTable::new(vec![ArtistAlias {
        canonical_name: "Tuna".to_string(),
        surface_forms: vec!["tuna".to_string()],
    }])
    .unwrap();
    let channel = SpyChannel::answering(DeliveryReceipt::delivered(Some("abc".to_string())));
    let outcome = Pipeline::new(
        Arc::new(StubSource {
            shows: Some(vec![tuna_show()]),
        }),
        Arc::clone(&channel) as Arc<dyn NotificationChannel>,
        aliases,
        formatter(),
    )
    .run()
    .await;

    assert_eq!(outcome.status, RunStatus::NoMatches);
    assert!(channel.calls().is_empty());
}

#[tokio::test]
async fn no_matches_never_invokes_channel() {
    let channel = SpyChannel::answering(DeliveryReceipt::delivered(None));
    let outcome = pipeline(Some(vec![jazz_show()]), Arc::clone(&channel))
        .run()
        .await;

    assert_eq!(outcome.status, RunStatus::NoMatches);
    assert_eq!(outcome.match_count, 0);
    assert!(channel.calls().is_empty());
}

#[tokio::test]
async fn empty_listing_is_no_matches() {
    let channel = SpyChannel::answering(DeliveryReceipt::delivered(None));
    let outcome = pipeline(Some(vec![]), Arc::clone(&channel)).run().await;

    assert_eq!(outcome.status, RunStatus::NoMatches);
    assert!(channel.calls().is_empty());
}

#[tokio::test]
async fn fetch_error_is_failure_without_send() {
    let channel = SpyChannel::answering(DeliveryReceipt::delivered(None));
    let outcome = pipeline(None, Arc::clone(&channel)).run().await;

    assert_eq!(outcome.status, RunStatus::Failure);
    assert_eq!(outcome.match_count, 0);
    let detail = outcome.error_detail.expect("error detail");
    assert!(detail.contains("503"), "{detail}");
    assert!(channel.calls().is_empty());
}

#[tokio::test]
async fn delivery_failure_keeps_match_count() {
    let channel = SpyChannel::answering(DeliveryReceipt::failed("quota exceeded"));
    let outcome = pipeline(Some(vec![tuna_show()]), Arc::clone(&channel))
        .run()
        .await;

    assert_eq!(outcome.status, RunStatus::Failure);
    assert_eq!(outcome.match_count, 1);
    assert_eq!(outcome.error_detail.as_deref(), Some("quota exceeded"));
    assert_eq!(channel.calls().len(), 1);
}

#[tokio::test]
async fn incomplete_matched_show_is_format_failure() {
    let mut show = tuna_show();
    show.price = None;
    let channel = SpyChannel::answering(DeliveryReceipt::delivered(None));
    let outcome = pipeline(Some(vec![show]), Arc::clone(&channel)).run().await;

    assert_eq!(outcome.status, RunStatus::Failure);
    assert_eq!(outcome.match_count, 1);
    assert!(outcome.error_detail.unwrap().contains("'price'"));
    assert!(channel.calls().is_empty());
}

#[tokio::test]
async fn incomplete_unmatched_show_is_ignored() {
    let channel = SpyChannel::answering(DeliveryReceipt::delivered(None));
    let outcome = pipeline(Some(vec![tuna_show(), jazz_show()]), Arc::clone(&channel))
        .run()
        .await;

    assert_eq!(outcome.status, RunStatus::Success);
    assert_eq!(outcome.match_count, 1);
}

#[tokio::test]
async fn repeated_runs_renotify_without_store() {
    let channel = SpyChannel::answering(DeliveryReceipt::delivered(None));
    let p = pipeline(Some(vec![tuna_show()]), Arc::clone(&channel));

    assert_eq!(p.run().await.status, RunStatus::Success);
    assert_eq!(p.run().await.status, RunStatus::Success);
    assert_eq!(channel.calls().len(), 2);
}

#[tokio::test]
async fn each_run_gets_a_fresh_id() {
    let channel = SpyChannel::answering(DeliveryReceipt::delivered(None));
    let p = pipeline(Some(vec![]), channel);
    assert_ne!(p.run().await.run_id, p.run().await.run_id);
}

// ---------------------------------------------------------------------------
// Seen-store
// ---------------------------------------------------------------------------

#[tokio::test]
async fn seen_store_suppresses_repeat_notification() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonFileStore::new(dir.path().join("seen.json")));
    let channel = SpyChannel::answering(DeliveryReceipt::delivered(None));
    let p = pipeline(Some(vec![tuna_show()]), Arc::clone(&channel)).with_seen_store(store);

    assert_eq!(p.run().await.status, RunStatus::Success);
    let second = p.run().await;
    assert_eq!(second.status, RunStatus::NoMatches);
    assert_eq!(channel.calls().len(), 1);
}

#[tokio::test]
async fn seen_store_only_reports_new_matches() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonFileStore::new(dir.path().join("seen.json")));
    store.record(&["Tuna\t1".to_string()]).unwrap();

    let mut second_show = tuna_show();
    second_show.id = Some("2".to_string());
    second_show.display_name = Some("tuna unplugged".to_string());

    let channel = SpyChannel::answering(DeliveryReceipt::delivered(None));
    let outcome = pipeline(Some(vec![tuna_show(), second_show]), Arc::clone(&channel))
        .with_seen_store(store)
        .run()
        .await;

    assert_eq!(outcome.status, RunStatus::Success);
    assert_eq!(outcome.match_count, 1);
    let body = &channel.calls()[0].1;
    assert!(body.contains("tuna unplugged"));
    assert!(!body.contains("Tuna Live Night"));
}

#[tokio::test]
async fn failed_delivery_is_not_recorded() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonFileStore::new(dir.path().join("seen.json")));
    let channel = SpyChannel::answering(DeliveryReceipt::failed("quota exceeded"));
    let p = pipeline(Some(vec![tuna_show()]), channel).with_seen_store(Arc::clone(&store) as _);

    assert_eq!(p.run().await.status, RunStatus::Failure);
    assert!(store.load().unwrap().is_empty());
}

#[tokio::test]
async fn unreadable_seen_store_is_failure() {
    let channel = SpyChannel::answering(DeliveryReceipt::delivered(None));
    let outcome = pipeline(Some(vec![tuna_show()]), Arc::clone(&channel))
        .with_seen_store(Arc::new(BrokenStore))
        .run()
        .await;

    assert_eq!(outcome.status, RunStatus::Failure);
    assert_eq!(outcome.match_count, 1);
    assert!(outcome.error_detail.unwrap().contains("disk on fire"));
    assert!(channel.calls().is_empty());
}
