//! Tests for the URL state service.
//!
//! Time is paused so the quiet period can be stepped through exactly.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{broadcast, Mutex};
use tokio::time::sleep;

use acrfd::services::{
    HistoryNavigator, NavigationEnd, NavigationTarget, NavigationTrigger, Navigator, UrlService,
};
use acrfd::Result;

const QUIET: Duration = Duration::from_millis(100);

/// Records every navigation it is asked to perform.
struct RecordingNavigator {
    targets: Mutex<Vec<NavigationTarget>>,
    events: broadcast::Sender<NavigationEnd>,
}

impl RecordingNavigator {
    fn new() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            targets: Mutex::new(Vec::new()),
            events,
        }
    }

    async fn targets(&self) -> Vec<NavigationTarget> {
        self.targets.lock().await.clone()
    }
}

#[async_trait]
impl Navigator for RecordingNavigator {
    async fn navigate(&self, target: NavigationTarget) -> Result<()> {
        let mut targets = self.targets.lock().await;
        targets.push(target);
        let _ = self.events.send(NavigationEnd {
            id: targets.len() as u64,
            url: "/applications".into(),
            trigger: NavigationTrigger::Programmatic,
        });
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<NavigationEnd> {
        self.events.subscribe()
    }
}

fn recording_service() -> (UrlService, Arc<RecordingNavigator>) {
    let navigator = Arc::new(RecordingNavigator::new());
    let service = UrlService::new(navigator.clone(), QUIET);
    (service, navigator)
}

fn history_service() -> (UrlService, Arc<HistoryNavigator>) {
    let navigator = Arc::new(HistoryNavigator::new("http://localhost:4200/applications").unwrap());
    let service = UrlService::new(navigator.clone(), QUIET);
    (service, navigator)
}

// ============================================================================
// query / save / set_fragment
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_query_missing_key_is_none() {
    let (service, _) = recording_service();
    assert_eq!(service.query("status").await, None);
}

#[tokio::test(start_paused = true)]
async fn test_save_sets_and_removes() {
    let (service, _) = recording_service();

    service.save("status", Some("OFFERED")).await;
    assert_eq!(service.query("status").await.as_deref(), Some("OFFERED"));

    service.save("status", Some("")).await;
    assert_eq!(service.query("status").await, None);

    service.save("region", Some("Skeena")).await;
    service.save("region", None).await;
    assert!(service.params().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_unchanged_value_does_not_navigate() {
    let (service, navigator) = recording_service();

    service.save("status", Some("OFFERED")).await;
    sleep(QUIET * 2).await;
    assert_eq!(navigator.targets().await.len(), 1);

    service.save("status", Some("OFFERED")).await;
    service.save("missing", None).await;
    service.set_fragment(None).await;
    sleep(QUIET * 2).await;
    assert_eq!(navigator.targets().await.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_set_fragment() {
    let (service, navigator) = recording_service();

    service.set_fragment(Some("map")).await;
    assert_eq!(service.fragment().await.as_deref(), Some("map"));
    sleep(QUIET * 2).await;

    let targets = navigator.targets().await;
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].fragment.as_deref(), Some("map"));
}

// ============================================================================
// Debounce
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_burst_collapses_into_one_navigation() {
    let (service, navigator) = recording_service();

    service.save("status", Some("OFFERED")).await;
    service.save("region", Some("Skeena")).await;
    service.save("purpose", Some("AQUACULTURE")).await;
    service.set_fragment(Some("list")).await;

    sleep(QUIET + Duration::from_millis(50)).await;

    let targets = navigator.targets().await;
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].query.len(), 3);
    assert_eq!(targets[0].query.get("purpose").map(String::as_str), Some("AQUACULTURE"));
    assert_eq!(targets[0].fragment.as_deref(), Some("list"));
}

#[tokio::test(start_paused = true)]
async fn test_each_write_restarts_quiet_period() {
    let (service, navigator) = recording_service();

    service.save("a", Some("1")).await;
    sleep(Duration::from_millis(60)).await;
    service.save("b", Some("2")).await;
    sleep(Duration::from_millis(60)).await;

    // 120ms since the first write, 60ms since the last
    assert!(navigator.targets().await.is_empty());

    sleep(Duration::from_millis(60)).await;
    let targets = navigator.targets().await;
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].query.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_separate_bursts_navigate_separately() {
    let (service, navigator) = recording_service();

    service.save("a", Some("1")).await;
    sleep(QUIET * 2).await;
    service.save("a", Some("2")).await;
    sleep(QUIET * 2).await;

    let targets = navigator.targets().await;
    assert_eq!(targets.len(), 2);
    assert_eq!(targets[1].query.get("a").map(String::as_str), Some("2"));
}

#[tokio::test(start_paused = true)]
async fn test_drop_flushes_pending_burst_and_stops() {
    let (service, navigator) = recording_service();

    service.save("status", Some("OFFERED")).await;
    service.set_fragment(Some("map")).await;
    drop(service);
    sleep(Duration::from_millis(1)).await;

    // Flushed without waiting out the quiet period
    let targets = navigator.targets().await;
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].query.get("status").map(String::as_str), Some("OFFERED"));
    assert_eq!(targets[0].fragment.as_deref(), Some("map"));

    // Background tasks have ended and released the navigator
    assert_eq!(Arc::strong_count(&navigator), 1);
    sleep(QUIET * 2).await;
    assert_eq!(navigator.targets().await.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_drop_without_pending_writes_does_not_navigate() {
    let (service, navigator) = recording_service();

    drop(service);
    sleep(QUIET * 2).await;

    assert!(navigator.targets().await.is_empty());
    assert_eq!(Arc::strong_count(&navigator), 1);
}

// ============================================================================
// Navigation events
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_nav_end_delivered_once_per_subscriber() {
    let (service, _) = recording_service();
    let mut first = service.on_nav_end();
    let mut second = service.on_nav_end();

    service.save("a", Some("1")).await;
    sleep(QUIET * 2).await;

    assert_eq!(first.recv().await.unwrap().id, 1);
    assert_eq!(second.recv().await.unwrap().id, 1);
    assert!(first.try_recv().is_err());
    assert!(second.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_history_navigator_builds_shareable_url() {
    let (service, navigator) = history_service();

    service.save("status", Some("OFFERED")).await;
    service.save("q", Some("north shore")).await;
    service.set_fragment(Some("map")).await;
    sleep(QUIET * 2).await;

    assert_eq!(
        navigator.current_url().await.as_deref(),
        Some("http://localhost:4200/applications?q=north+shore&status=OFFERED#map")
    );
    // Our own navigation does not disturb local state
    assert_eq!(service.query("q").await.as_deref(), Some("north shore"));
}

#[tokio::test(start_paused = true)]
async fn test_opened_link_restores_state() {
    let (service, navigator) = history_service();
    service.save("stale", Some("yes")).await;

    navigator
        .open("/applications?status=ACCEPTED&region=Cariboo#details")
        .await
        .unwrap();
    sleep(Duration::from_millis(10)).await;

    assert_eq!(service.query("status").await.as_deref(), Some("ACCEPTED"));
    assert_eq!(service.query("region").await.as_deref(), Some("Cariboo"));
    assert_eq!(service.query("stale").await, None);
    assert_eq!(service.fragment().await.as_deref(), Some("details"));
}

#[tokio::test(start_paused = true)]
async fn test_back_restores_previous_state() {
    let (service, navigator) = history_service();

    service.save("page", Some("1")).await;
    sleep(QUIET * 2).await;
    service.save("page", Some("2")).await;
    sleep(QUIET * 2).await;
    assert_eq!(navigator.history().await.len(), 2);

    navigator.back().await.unwrap();
    sleep(Duration::from_millis(10)).await;

    assert_eq!(service.query("page").await.as_deref(), Some("1"));
}

#[tokio::test(start_paused = true)]
async fn test_sync_from_url_directly() {
    let (service, _) = recording_service();
    service.save("old", Some("x")).await;

    service
        .sync_from_url("http://localhost/applications?cl_file=0001234")
        .await
        .unwrap();

    assert_eq!(service.query("old").await, None);
    assert_eq!(service.query("cl_file").await.as_deref(), Some("0001234"));
    assert_eq!(service.fragment().await, None);
}
