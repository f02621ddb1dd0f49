//! Application aggregation service.
//!
//! Fetches application records and populates them from the related
//! resources:
//! - Current comment period (list and single fetch)
//! - Documents, decision and tenure features (single fetch only)
//!
//! The most recently fetched application is memoized by id.

use std::sync::Arc;

use futures::future::try_join_all;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use acrfd_models::{total_area_hectares, Application};

use crate::error::{Error, Result};
use crate::services::api::handle_error;
use crate::services::sources::{
    ApplicationSource, ApplicationSources, DocumentSource, FeatureSource,
};
use crate::services::{CommentPeriodService, DecisionService};

const UNKNOWN_STATUS: &str = "Unknown Application Status";

/// Status codes that mean a decision has been made on the application.
const DECISION_STATUSES: &[&str] = &[
    "ALLOWED",
    "CANCELLED",
    "DISALLOWED",
    "OFFER ACCEPTED",
    "OFFER NOT ACCEPTED",
    "OFFERED",
    "DISPOSITION IN GOOD STANDING",
];

/// Service for fetching populated applications.
#[derive(Clone)]
pub struct ApplicationService {
    inner: Arc<ApplicationServiceInner>,
}

struct ApplicationServiceInner {
    applications: Arc<dyn ApplicationSource>,
    documents: Arc<dyn DocumentSource>,
    features: Arc<dyn FeatureSource>,
    comment_periods: CommentPeriodService,
    decisions: DecisionService,
    /// Last application returned by `get_by_id`
    cached: RwLock<Option<Application>>,
}

impl ApplicationService {
    /// Create a new application service.
    pub fn new(sources: ApplicationSources) -> Self {
        Self {
            inner: Arc::new(ApplicationServiceInner {
                applications: sources.applications,
                documents: sources.documents,
                features: sources.features,
                comment_periods: CommentPeriodService::new(sources.comment_periods),
                decisions: DecisionService::new(sources.decisions),
                cached: RwLock::new(None),
            }),
        }
    }

    /// Number of applications.
    #[instrument(skip(self))]
    pub async fn get_count(&self) -> Result<usize> {
        let applications = self.get_all_internal().await?;
        Ok(applications.len())
    }

    /// All applications, each with its current comment period attached.
    #[instrument(skip(self))]
    pub async fn get_all(&self) -> Result<Vec<Application>> {
        let mut applications = self.get_all_internal().await?;
        if applications.is_empty() {
            return Ok(applications);
        }

        for application in applications.iter_mut() {
            application.unescape_text_fields();
        }

        let comment_periods = &self.inner.comment_periods;
        let applications = try_join_all(applications.into_iter().map(|mut application| {
            async move {
                application.current_period = comment_periods
                    .get_current_by_application_id(&application.id)
                    .await?;
                Ok::<_, Error>(application)
            }
        }))
        .await
        .map_err(handle_error)?;

        info!(count = applications.len(), "Fetched applications");
        Ok(applications)
    }

    async fn get_all_internal(&self) -> Result<Vec<Application>> {
        self.inner
            .applications
            .fetch_applications()
            .await
            .map_err(handle_error)
    }

    /// A fully populated application.
    ///
    /// Returns the memoized record when it has the same id, unless
    /// `force_reload` is set. `Ok(None)` means the API has no such record.
    /// Any failing sub-fetch fails the whole call and leaves the memo as is.
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: &str, force_reload: bool) -> Result<Option<Application>> {
        if !force_reload {
            let cached = self.inner.cached.read().await;
            if let Some(application) = cached.as_ref().filter(|a| a.id == id) {
                debug!("Application served from cache");
                return Ok(Some(application.clone()));
            }
        }

        let application = self
            .inner
            .applications
            .fetch_application(id)
            .await
            .map_err(handle_error)?;

        let Some(mut application) = application else {
            debug!("No application returned");
            return Ok(None);
        };

        application.unescape_text_fields();

        let app_id = application.id.clone();
        let tantalis_id = application.tantalis_id;

        let documents = self.inner.documents.fetch_documents(&app_id);
        let current_period = self
            .inner
            .comment_periods
            .get_current_by_application_id(&app_id);
        let decision = self
            .inner
            .decisions
            .get_by_application_id(&app_id, force_reload);
        let features = async {
            match tantalis_id {
                Some(dtid) => self.inner.features.fetch_features(dtid).await,
                None => Ok(Vec::new()),
            }
        };

        let (documents, current_period, decision, features) =
            futures::try_join!(documents, current_period, decision, features)
                .map_err(handle_error)?;

        application.documents = documents;
        application.current_period = current_period;
        application.decision = decision;
        application.area_hectares = Some(total_area_hectares(&features));
        application.features = features;

        *self.inner.cached.write().await = Some(application.clone());
        info!(
            documents = application.documents.len(),
            features = application.features.len(),
            "Fetched application"
        );

        Ok(Some(application))
    }

    /// Forget the memoized application and decision.
    pub async fn clear_cache(&self) {
        *self.inner.cached.write().await = None;
        self.inner.decisions.clear_cache().await;
    }

    /// Display string for an application's status code.
    pub fn get_status(application: Option<&Application>) -> String {
        status_label(application.and_then(|a| a.status.as_deref()))
    }

    /// Whether a status code means a decision has been made.
    pub fn is_decision(status: &str) -> bool {
        let status = status.to_uppercase();
        DECISION_STATUSES.contains(&status.as_str())
    }
}

/// Display string for a status code.
pub fn status_label(status: Option<&str>) -> String {
    let Some(status) = status.filter(|s| !s.is_empty()) else {
        return UNKNOWN_STATUS.to_string();
    };

    let label = match status.to_uppercase().as_str() {
        "ABANDONED" => "Application Abandoned",
        "ACCEPTED" => "Application Under Review",
        "ALLOWED" => "Decision: Allowed",
        "CANCELLED" => "Application Cancelled",
        "DISALLOWED" => "Decision: Not Approved",
        "DISPOSITION IN GOOD STANDING" => "Tenure: Disposition in Good Standing",
        "OFFER ACCEPTED" => "Decision: Offer Accepted",
        "OFFER NOT ACCEPTED" => "Decision: Offer Not Accepted",
        "OFFERED" => "Decision: Offered",
        "SUSPENDED" => "Tenure: Suspended",
        _ => return title_case(status),
    };
    label.to_string()
}

/// Title-case the words of a code: "UNDER REVIEW" and "underReview" both
/// become "Under Review".
pub fn title_case(text: &str) -> String {
    split_words(text)
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Split on separators, case changes ("offerAccepted", "XMLFile") and
/// letter/digit boundaries ("PHASE2"). Apostrophes are dropped first and
/// ordinals such as "1ST" stay whole.
fn split_words(text: &str) -> Vec<String> {
    let chars: Vec<char> = text
        .chars()
        .filter(|c| !matches!(*c, '\'' | '\u{2019}'))
        .collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if !current.is_empty() && starts_word(&chars, i) {
            words.push(std::mem::take(&mut current));
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Whether `chars[i]` begins a new word. `chars[i - 1]` must be alphanumeric.
fn starts_word(chars: &[char], i: usize) -> bool {
    let (prev, c) = (chars[i - 1], chars[i]);

    if prev.is_alphabetic() && c.is_numeric() {
        return true;
    }
    if prev.is_numeric() && c.is_alphabetic() {
        return !is_ordinal_suffix(chars, i);
    }
    if c.is_uppercase() {
        let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
        return prev.is_lowercase() || (prev.is_uppercase() && next_is_lower);
    }
    false
}

/// Whether the letters at `i` finish an ordinal like "1st", "22ND" or "4th".
fn is_ordinal_suffix(chars: &[char], i: usize) -> bool {
    let expected = match chars[i - 1] {
        '1' => "st",
        '2' => "nd",
        '3' => "rd",
        _ => "th",
    };
    let suffix: String = chars
        .iter()
        .skip(i)
        .take(2)
        .flat_map(|c| c.to_lowercase())
        .collect();
    if suffix != expected {
        return false;
    }
    match chars.get(i + 2) {
        None => true,
        Some(next) => !next.is_alphabetic() || (next.is_uppercase() && chars[i + 1].is_lowercase()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ABANDONED", "Application Abandoned")]
    #[case("accepted", "Application Under Review")]
    #[case("Allowed", "Decision: Allowed")]
    #[case("CANCELLED", "Application Cancelled")]
    #[case("DISALLOWED", "Decision: Not Approved")]
    #[case("DISPOSITION IN GOOD STANDING", "Tenure: Disposition in Good Standing")]
    #[case("OFFER ACCEPTED", "Decision: Offer Accepted")]
    #[case("OFFER NOT ACCEPTED", "Decision: Offer Not Accepted")]
    #[case("OFFERED", "Decision: Offered")]
    #[case("SUSPENDED", "Tenure: Suspended")]
    fn test_known_status_labels(#[case] code: &str, #[case] expected: &str) {
        assert_eq!(status_label(Some(code)), expected);
    }

    #[rstest]
    #[case("UNDER REVIEW", "Under Review")]
    #[case("pendingReview", "Pending Review")]
    #[case("first_nations-consultation", "First Nations Consultation")]
    #[case("XMLFile", "Xml File")]
    #[case("PHASE2", "Phase 2")]
    #[case("2ND REFERRAL", "2nd Referral")]
    #[case("1ST NATIONS REVIEW", "1st Nations Review")]
    #[case("REVIEW 4TH ROUND", "Review 4th Round")]
    #[case("OWNER'S REVIEW", "Owners Review")]
    #[case("OWNER\u{2019}S REVIEW", "Owners Review")]
    fn test_unknown_status_title_cased(#[case] code: &str, #[case] expected: &str) {
        assert_eq!(status_label(Some(code)), expected);
    }

    #[test]
    fn test_missing_status() {
        assert_eq!(ApplicationService::get_status(None), UNKNOWN_STATUS);

        let app = Application::new("a1");
        assert_eq!(ApplicationService::get_status(Some(&app)), UNKNOWN_STATUS);
    }

    #[test]
    fn test_is_decision() {
        assert!(ApplicationService::is_decision("allowed"));
        assert!(ApplicationService::is_decision("Offer Not Accepted"));
        assert!(ApplicationService::is_decision("DISPOSITION IN GOOD STANDING"));
        assert!(!ApplicationService::is_decision("ACCEPTED"));
        assert!(!ApplicationService::is_decision("SUSPENDED"));
        assert!(!ApplicationService::is_decision(""));
    }

    #[test]
    fn test_split_words() {
        assert_eq!(split_words("  a--b  "), vec!["a", "b"]);
        assert!(split_words("").is_empty());
        assert_eq!(split_words("area51b"), vec!["area", "51", "b"]);
        assert_eq!(split_words("1stReview"), vec!["1st", "Review"]);
        assert_eq!(split_words("21ST"), vec!["21ST"]);
        assert_eq!(split_words("3TH"), vec!["3", "TH"]);
    }
}
