//! Public API client.
//!
//! Thin REST access to the ACRFD backend for:
//! - Applications (list and single record)
//! - Comment periods, documents and decisions by application
//! - Tenure features by disposition transaction id
//! - Organizations

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use acrfd_models::{
    Application, CommentPeriod, Decision, Document, Feature, FeatureResponse, Organization,
};

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::services::sources::{
    ApplicationSource, CommentPeriodSource, DecisionSource, DocumentSource, FeatureSource,
};

const API_PREFIX: &str = "/api/public";

/// Service for public API operations.
#[derive(Clone)]
pub struct ApiService {
    client: Client,
    base_url: String,
}

/// Shared pass-through error handler.
///
/// Logs the failure and hands the error back unchanged so it can be used
/// directly in `map_err`.
pub fn handle_error(err: Error) -> Error {
    error!(code = err.error_code(), "API call failed: {}", err);
    err
}

impl ApiService {
    /// Create a new API service.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        url::Url::parse(&config.base_url)
            .map_err(|e| Error::Config(format!("Invalid API URL '{}': {}", config.base_url, e)))?;

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL of the backend (without the API prefix).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    /// GET a resource and return its raw body.
    ///
    /// When `single` is set, a 404 means the resource does not exist rather
    /// than an API failure.
    async fn get_body(&self, path: &str, query: &[(&str, &str)], single: bool) -> Result<String> {
        let url = self.endpoint(path);
        debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            if single && status == StatusCode::NOT_FOUND {
                return Err(Error::NotFound(path.to_string()));
            }
            let text = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        Ok(response.text().await?)
    }

    /// GET a JSON array. An empty body is an empty list.
    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        single: bool,
    ) -> Result<Vec<T>> {
        let text = self.get_body(path, query, single).await?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// Get all applications.
    pub async fn get_applications(&self) -> Result<Vec<Application>> {
        self.get_list("/application", &[], false).await
    }

    /// Get one application. The API answers with an array of zero or one.
    pub async fn get_application(&self, id: &str) -> Result<Option<Application>> {
        let path = format!("/application/{}", urlencoding::encode(id));
        let applications: Vec<Application> = self.get_list(&path, &[], true).await?;
        Ok(applications.into_iter().next())
    }

    /// Get the comment periods of an application, newest first.
    pub async fn get_comment_periods_by_application_id(
        &self,
        application_id: &str,
    ) -> Result<Vec<CommentPeriod>> {
        self.get_list("/commentperiod", &[("application", application_id)], false)
            .await
    }

    /// Get the documents attached to an application.
    pub async fn get_documents_by_application_id(
        &self,
        application_id: &str,
    ) -> Result<Vec<Document>> {
        self.get_list("/document", &[("application", application_id)], false)
            .await
    }

    /// Get the decision on an application, if one was made.
    pub async fn get_decision_by_application_id(
        &self,
        application_id: &str,
    ) -> Result<Option<Decision>> {
        let decisions: Vec<Decision> = self
            .get_list("/decision", &[("application", application_id)], false)
            .await?;
        Ok(decisions.into_iter().next())
    }

    /// Get the tenure features for a disposition transaction id.
    pub async fn get_features_by_dtid(&self, dtid: i64) -> Result<Vec<Feature>> {
        let path = format!("/search/ttlsapi/dtid/{}", dtid);
        let text = self.get_body(&path, &[], false).await?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let features: FeatureResponse = serde_json::from_str(&text)?;
        Ok(features.into_features())
    }

    /// Get one organization.
    pub async fn get_organization(&self, id: &str) -> Result<Option<Organization>> {
        let path = format!("/organization/{}", urlencoding::encode(id));
        let organizations: Vec<Organization> = self.get_list(&path, &[], true).await?;
        Ok(organizations.into_iter().next())
    }
}

#[async_trait]
impl ApplicationSource for ApiService {
    async fn fetch_applications(&self) -> Result<Vec<Application>> {
        self.get_applications().await
    }

    async fn fetch_application(&self, id: &str) -> Result<Option<Application>> {
        self.get_application(id).await
    }
}

#[async_trait]
impl CommentPeriodSource for ApiService {
    async fn fetch_comment_periods(&self, application_id: &str) -> Result<Vec<CommentPeriod>> {
        self.get_comment_periods_by_application_id(application_id)
            .await
    }
}

#[async_trait]
impl DocumentSource for ApiService {
    async fn fetch_documents(&self, application_id: &str) -> Result<Vec<Document>> {
        self.get_documents_by_application_id(application_id).await
    }
}

#[async_trait]
impl DecisionSource for ApiService {
    async fn fetch_decision(&self, application_id: &str) -> Result<Option<Decision>> {
        self.get_decision_by_application_id(application_id).await
    }
}

#[async_trait]
impl FeatureSource for ApiService {
    async fn fetch_features(&self, dtid: i64) -> Result<Vec<Feature>> {
        self.get_features_by_dtid(dtid).await
    }
}
