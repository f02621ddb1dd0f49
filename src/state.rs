//! Application state for ACRFD.
//!
//! Contains the shared services built from configuration.

use std::sync::Arc;

use crate::config::Config;
use crate::services::{
    ApiService, ApplicationService, ApplicationSources, HistoryNavigator, UrlService,
};
use crate::Result;

/// State shared by everything that needs the API.
#[derive(Clone)]
pub struct AppState {
    /// Public API client.
    pub api: Arc<ApiService>,
    /// Application aggregation service.
    pub applications: ApplicationService,
    config: Config,
}

impl AppState {
    /// Create a new application state, initializing all services.
    pub fn new(config: &Config) -> Result<Self> {
        let api = Arc::new(ApiService::new(&config.api)?);
        let applications = ApplicationService::new(ApplicationSources::from_api(api.clone()));

        Ok(Self {
            api,
            applications,
            config: config.clone(),
        })
    }

    /// Create a URL service on an in-memory history rooted at the public URL.
    ///
    /// Must be called from within a tokio runtime.
    pub fn url_service(&self) -> Result<(UrlService, Arc<HistoryNavigator>)> {
        let navigator = Arc::new(HistoryNavigator::new(&self.config.url.public_url)?);
        let service = UrlService::new(navigator.clone(), self.config.url.debounce());
        Ok((service, navigator))
    }
}
