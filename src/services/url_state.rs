//! URL state service.
//!
//! Keeps a page's filter parameters and fragment mirrored in its URL so the
//! browser history and shared links restore the same view. Writes are
//! coalesced: a navigation happens once no write has arrived for the quiet
//! period, carrying whatever state is current at that point.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, RwLock};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::Result;
use crate::services::navigator::{
    parse_location, target_from_url, NavigationEnd, NavigationTarget, NavigationTrigger, Navigator,
};

#[derive(Debug, Default)]
struct UrlState {
    params: BTreeMap<String, String>,
    fragment: Option<String>,
}

/// Service mirroring page parameters into the URL.
#[derive(Clone)]
pub struct UrlService {
    inner: Arc<UrlServiceInner>,
}

struct UrlServiceInner {
    state: Arc<RwLock<UrlState>>,
    navigator: Arc<dyn Navigator>,
    schedule: mpsc::UnboundedSender<()>,
    listener: JoinHandle<()>,
}

impl Drop for UrlServiceInner {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

impl UrlService {
    /// Create the service and start its background tasks.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(navigator: Arc<dyn Navigator>, quiet_period: Duration) -> Self {
        let state = Arc::new(RwLock::new(UrlState::default()));
        let (schedule, requests) = mpsc::unbounded_channel();

        // Subscribe before spawning so no event between now and the first
        // poll is missed
        let events = navigator.subscribe();
        let listener = tokio::spawn(follow_navigation(events, state.clone()));

        tokio::spawn(debounce_navigation(
            requests,
            state.clone(),
            navigator.clone(),
            quiet_period,
        ));

        Self {
            inner: Arc::new(UrlServiceInner {
                state,
                navigator,
                schedule,
                listener,
            }),
        }
    }

    /// Subscribe to completed navigations.
    pub fn on_nav_end(&self) -> broadcast::Receiver<NavigationEnd> {
        self.inner.navigator.subscribe()
    }

    /// Value of a parameter, or `None` if it is not set.
    pub async fn query(&self, key: &str) -> Option<String> {
        let state = self.inner.state.read().await;
        state.params.get(key).cloned()
    }

    /// All parameters currently set.
    pub async fn params(&self) -> BTreeMap<String, String> {
        self.inner.state.read().await.params.clone()
    }

    /// Set a parameter; an empty or missing value removes it.
    pub async fn save(&self, key: &str, value: Option<&str>) {
        let value = value.filter(|v| !v.is_empty());

        {
            let mut state = self.inner.state.write().await;
            if state.params.get(key).map(String::as_str) == value {
                return;
            }
            match value {
                Some(value) => {
                    state.params.insert(key.to_string(), value.to_string());
                }
                None => {
                    state.params.remove(key);
                }
            }
        }

        self.schedule_navigation();
    }

    /// Current fragment.
    pub async fn fragment(&self) -> Option<String> {
        self.inner.state.read().await.fragment.clone()
    }

    /// Set the fragment; an empty or missing fragment clears it.
    pub async fn set_fragment(&self, fragment: Option<&str>) {
        let fragment = fragment.filter(|f| !f.is_empty());

        {
            let mut state = self.inner.state.write().await;
            if state.fragment.as_deref() == fragment {
                return;
            }
            state.fragment = fragment.map(String::from);
        }

        self.schedule_navigation();
    }

    /// Replace parameters and fragment with those of a location.
    pub async fn sync_from_url(&self, location: &str) -> Result<()> {
        sync_state(&self.inner.state, location).await
    }

    fn schedule_navigation(&self) {
        if self.inner.schedule.send(()).is_err() {
            warn!("Navigation task has stopped; URL update dropped");
        }
    }
}

async fn sync_state(state: &RwLock<UrlState>, location: &str) -> Result<()> {
    let url = parse_location(location)?;
    let target = target_from_url(&url);

    let mut state = state.write().await;
    state.params = target.query;
    state.fragment = target.fragment;
    Ok(())
}

/// Run one navigation per burst of schedule requests.
///
/// Ends when every sender is gone, flushing a pending burst first.
async fn debounce_navigation(
    mut requests: mpsc::UnboundedReceiver<()>,
    state: Arc<RwLock<UrlState>>,
    navigator: Arc<dyn Navigator>,
    quiet_period: Duration,
) {
    while requests.recv().await.is_some() {
        let mut coalesced = 1usize;
        loop {
            match timeout(quiet_period, requests.recv()).await {
                Ok(Some(())) => coalesced += 1,
                Ok(None) | Err(_) => break,
            }
        }

        let target = {
            let state = state.read().await;
            NavigationTarget {
                query: state.params.clone(),
                fragment: state.fragment.clone(),
            }
        };

        debug!(coalesced, params = target.query.len(), "Navigating");
        if let Err(e) = navigator.navigate(target).await {
            warn!("Navigation failed: {}", e);
        }
    }
}

/// Pick up locations we did not produce ourselves (history, opened links).
async fn follow_navigation(
    mut events: broadcast::Receiver<NavigationEnd>,
    state: Arc<RwLock<UrlState>>,
) {
    loop {
        match events.recv().await {
            Ok(event) => {
                if event.trigger == NavigationTrigger::Programmatic {
                    continue;
                }
                if let Err(e) = sync_state(&state, &event.url).await {
                    warn!(url = %event.url, "Ignoring unparseable location: {}", e);
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "Navigation events lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
