//! Decision lookups with a single-slot memo.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use acrfd_models::Decision;

use crate::error::Result;
use crate::services::sources::DecisionSource;

/// Service for the decision on an application.
///
/// Remembers the last decision found, keyed by its application id.
#[derive(Clone)]
pub struct DecisionService {
    inner: Arc<DecisionServiceInner>,
}

struct DecisionServiceInner {
    source: Arc<dyn DecisionSource>,
    cached: RwLock<Option<(String, Decision)>>,
}

impl DecisionService {
    pub fn new(source: Arc<dyn DecisionSource>) -> Self {
        Self {
            inner: Arc::new(DecisionServiceInner {
                source,
                cached: RwLock::new(None),
            }),
        }
    }

    /// Get the decision on an application, if one was made.
    pub async fn get_by_application_id(
        &self,
        application_id: &str,
        force_reload: bool,
    ) -> Result<Option<Decision>> {
        if !force_reload {
            let cached = self.inner.cached.read().await;
            if let Some((cached_id, decision)) = cached.as_ref() {
                if cached_id == application_id {
                    debug!(application_id, "Decision served from cache");
                    return Ok(Some(decision.clone()));
                }
            }
        }

        let decision = self.inner.source.fetch_decision(application_id).await?;

        let decision = decision.map(|mut d| {
            d.unescape_text_fields();
            d
        });

        if let Some(decision) = decision.as_ref() {
            *self.inner.cached.write().await =
                Some((application_id.to_string(), decision.clone()));
        }

        Ok(decision)
    }

    pub async fn clear_cache(&self) {
        *self.inner.cached.write().await = None;
    }
}
