//! Comment period model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A window during which public comments on an application are accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPeriod {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_application", default, skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal: Option<bool>,
}

/// Where a comment period stands relative to a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentPeriodStatus {
    NotStarted,
    Open,
    Closed,
    Unknown,
}

impl CommentPeriodStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentPeriodStatus::NotStarted => "Not Started",
            CommentPeriodStatus::Open => "Commenting Open",
            CommentPeriodStatus::Closed => "Commenting Closed",
            CommentPeriodStatus::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for CommentPeriodStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl CommentPeriod {
    /// Status at `now`. Both bounds are inclusive.
    pub fn status_at(&self, now: DateTime<Utc>) -> CommentPeriodStatus {
        match (self.start_date, self.end_date) {
            (Some(start), _) if now < start => CommentPeriodStatus::NotStarted,
            (Some(_), Some(end)) if now > end => CommentPeriodStatus::Closed,
            (Some(_), Some(_)) => CommentPeriodStatus::Open,
            _ => CommentPeriodStatus::Unknown,
        }
    }

    /// Whole days left to comment, rounded up. `None` unless open at `now`.
    pub fn days_remaining_at(&self, now: DateTime<Utc>) -> Option<i64> {
        if self.status_at(now) != CommentPeriodStatus::Open {
            return None;
        }
        let end = self.end_date?;
        let seconds = (end - now).num_seconds();
        Some((seconds + 86_399) / 86_400)
    }
}
