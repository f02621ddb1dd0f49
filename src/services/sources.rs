//! Data source traits.
//!
//! Each trait is one thin REST resource the application service pulls from.
//! `ApiService` implements all of them; tests substitute in-memory fakes.

use std::sync::Arc;

use async_trait::async_trait;

use acrfd_models::{Application, CommentPeriod, Decision, Document, Feature};

use crate::error::Result;
use crate::services::ApiService;

#[async_trait]
pub trait ApplicationSource: Send + Sync {
    /// All applications, unpopulated.
    async fn fetch_applications(&self) -> Result<Vec<Application>>;

    /// One application, or `None` if the API returned no record.
    async fn fetch_application(&self, id: &str) -> Result<Option<Application>>;
}

#[async_trait]
pub trait CommentPeriodSource: Send + Sync {
    /// Comment periods of an application, newest first.
    async fn fetch_comment_periods(&self, application_id: &str) -> Result<Vec<CommentPeriod>>;
}

#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch_documents(&self, application_id: &str) -> Result<Vec<Document>>;
}

#[async_trait]
pub trait DecisionSource: Send + Sync {
    async fn fetch_decision(&self, application_id: &str) -> Result<Option<Decision>>;
}

#[async_trait]
pub trait FeatureSource: Send + Sync {
    /// Tenure features keyed by disposition transaction id.
    async fn fetch_features(&self, dtid: i64) -> Result<Vec<Feature>>;
}

/// The set of sources an [`ApplicationService`](super::ApplicationService)
/// aggregates over.
#[derive(Clone)]
pub struct ApplicationSources {
    pub applications: Arc<dyn ApplicationSource>,
    pub comment_periods: Arc<dyn CommentPeriodSource>,
    pub documents: Arc<dyn DocumentSource>,
    pub decisions: Arc<dyn DecisionSource>,
    pub features: Arc<dyn FeatureSource>,
}

impl ApplicationSources {
    /// Use the REST API for every source.
    pub fn from_api(api: Arc<ApiService>) -> Self {
        Self {
            applications: api.clone(),
            comment_periods: api.clone(),
            documents: api.clone(),
            decisions: api.clone(),
            features: api,
        }
    }
}
