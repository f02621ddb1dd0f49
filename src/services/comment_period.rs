//! Comment period lookups.

use std::sync::Arc;

use acrfd_models::CommentPeriod;

use crate::error::Result;
use crate::services::sources::CommentPeriodSource;

/// Service for comment periods of an application.
#[derive(Clone)]
pub struct CommentPeriodService {
    source: Arc<dyn CommentPeriodSource>,
}

impl CommentPeriodService {
    pub fn new(source: Arc<dyn CommentPeriodSource>) -> Self {
        Self { source }
    }

    /// All comment periods of an application, as ordered by the API.
    pub async fn get_all_by_application_id(
        &self,
        application_id: &str,
    ) -> Result<Vec<CommentPeriod>> {
        self.source.fetch_comment_periods(application_id).await
    }

    /// The current comment period of an application, if it has any.
    pub async fn get_current_by_application_id(
        &self,
        application_id: &str,
    ) -> Result<Option<CommentPeriod>> {
        let periods = self.get_all_by_application_id(application_id).await?;
        Ok(current(periods))
    }
}

/// Pick the current period: the API lists newest first, so it is the head.
pub fn current(periods: Vec<CommentPeriod>) -> Option<CommentPeriod> {
    periods.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_is_first() {
        let periods = vec![
            CommentPeriod {
                id: "newest".into(),
                ..Default::default()
            },
            CommentPeriod {
                id: "older".into(),
                ..Default::default()
            },
        ];
        assert_eq!(current(periods).map(|p| p.id), Some("newest".to_string()));
    }

    #[test]
    fn test_current_of_empty() {
        assert!(current(Vec::new()).is_none());
    }
}
