//! Navigation primitives.
//!
//! A [`Navigator`] applies query parameters and a fragment to the current
//! location and announces every completed navigation on a broadcast channel.
//! [`HistoryNavigator`] is an in-memory implementation with a history stack,
//! standing in for a browser when the service runs outside one.

use std::collections::{BTreeMap, VecDeque};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, Mutex};
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};

/// Channel capacity for navigation events.
const CHANNEL_CAPACITY: usize = 64;

/// Most history entries kept; the oldest are dropped beyond this.
pub const HISTORY_LIMIT: usize = 100;

/// Base used to resolve relative locations such as `/applications?x=1`.
const RELATIVE_BASE: &str = "http://localhost/";

/// Where a navigation should land.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationTarget {
    pub query: BTreeMap<String, String>,
    pub fragment: Option<String>,
}

/// What caused a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationTrigger {
    /// Requested through [`Navigator::navigate`]
    Programmatic,
    /// Back/forward through the history stack
    History,
    /// A location opened from outside, e.g. a pasted or bookmarked link
    External,
}

/// Emitted once a navigation has completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationEnd {
    /// Monotonic navigation id
    pub id: u64,
    pub url: String,
    pub trigger: NavigationTrigger,
}

#[async_trait]
pub trait Navigator: Send + Sync {
    /// Replace the current query and fragment.
    async fn navigate(&self, target: NavigationTarget) -> Result<()>;

    /// Subscribe to navigation-end events.
    fn subscribe(&self) -> broadcast::Receiver<NavigationEnd>;
}

/// Parse an absolute or root-relative location.
pub fn parse_location(location: &str) -> Result<Url> {
    match Url::parse(location) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Ok(Url::parse(RELATIVE_BASE)?.join(location)?)
        }
        Err(e) => Err(e.into()),
    }
}

/// Query parameters and fragment of a location.
///
/// Repeated keys keep their last value; empty values and an empty fragment
/// count as absent.
pub fn target_from_url(url: &Url) -> NavigationTarget {
    let query = url
        .query_pairs()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    let fragment = url.fragment().filter(|f| !f.is_empty()).map(String::from);
    NavigationTarget { query, fragment }
}

/// Apply a target to a base URL, replacing its query and fragment.
pub fn build_url(base: &Url, target: &NavigationTarget) -> Url {
    let mut url = base.clone();
    url.set_query(None);
    if !target.query.is_empty() {
        url.query_pairs_mut().extend_pairs(target.query.iter());
    }
    url.set_fragment(target.fragment.as_deref().filter(|f| !f.is_empty()));
    url
}

/// In-memory navigator with a browser-like history stack of at most
/// [`HISTORY_LIMIT`] entries.
pub struct HistoryNavigator {
    base: Url,
    state: Mutex<HistoryState>,
    events: broadcast::Sender<NavigationEnd>,
}

struct HistoryState {
    entries: VecDeque<Url>,
    next_id: u64,
}

impl HistoryNavigator {
    /// Create a navigator whose locations are built on `base`.
    pub fn new(base: &str) -> Result<Self> {
        let base = parse_location(base)?;
        let (events, _) = broadcast::channel(CHANNEL_CAPACITY);
        Ok(Self {
            base,
            state: Mutex::new(HistoryState {
                entries: VecDeque::new(),
                next_id: 1,
            }),
            events,
        })
    }

    /// The current location, if any navigation has happened.
    pub async fn current_url(&self) -> Option<String> {
        let state = self.state.lock().await;
        state.entries.back().map(|u| u.to_string())
    }

    /// Every location in the history stack, oldest first.
    pub async fn history(&self) -> Vec<String> {
        let state = self.state.lock().await;
        state.entries.iter().map(|u| u.to_string()).collect()
    }

    /// Open a location from outside (a bookmark or a pasted link).
    pub async fn open(&self, location: &str) -> Result<()> {
        let url = match Url::parse(location) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => self.base.join(location)?,
            Err(e) => return Err(e.into()),
        };
        self.push(url, NavigationTrigger::External).await;
        Ok(())
    }

    /// Step back one entry. Fails when there is nothing to go back to.
    pub async fn back(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.entries.len() < 2 {
            return Err(Error::Navigation("No previous history entry".to_string()));
        }
        state.entries.pop_back();
        let url = state
            .entries
            .back()
            .cloned()
            .ok_or_else(|| Error::Navigation("History is empty".to_string()))?;
        let id = state.next_id;
        state.next_id += 1;
        drop(state);

        self.emit(id, &url, NavigationTrigger::History);
        Ok(())
    }

    async fn push(&self, url: Url, trigger: NavigationTrigger) {
        let mut state = self.state.lock().await;
        state.entries.push_back(url.clone());
        if state.entries.len() > HISTORY_LIMIT {
            state.entries.pop_front();
        }
        let id = state.next_id;
        state.next_id += 1;
        drop(state);

        self.emit(id, &url, trigger);
    }

    fn emit(&self, id: u64, url: &Url, trigger: NavigationTrigger) {
        debug!(id, url = %url, ?trigger, "Navigation end");
        // No subscribers is fine
        let _ = self.events.send(NavigationEnd {
            id,
            url: url.to_string(),
            trigger,
        });
    }
}

#[async_trait]
impl Navigator for HistoryNavigator {
    async fn navigate(&self, target: NavigationTarget) -> Result<()> {
        let url = build_url(&self.base, &target);
        self.push(url, NavigationTrigger::Programmatic).await;
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<NavigationEnd> {
        self.events.subscribe()
    }
}
