//! Application model: a Crown land tenure application tracked by the tool.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{unescape_field, CommentPeriod, Decision, Document, Feature};

/// An application record.
///
/// The base fields come straight from `/application`; `documents`,
/// `current_period`, `decision` and `features` are attached afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_hectares: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_unit: Option<String>,
    /// `[longitude, latitude]`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub centroid: Vec<f64>,
    #[serde(rename = "cl_file", default, skip_serializing_if = "Option::is_none")]
    pub cl_file: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subpurpose: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    /// Disposition transaction id; keys the tenure's geospatial features.
    #[serde(rename = "tantalisID", default, skip_serializing_if = "Option::is_none")]
    pub tantalis_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenure_stage: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub application_type: Option<String>,

    // Populated by the application service
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documents: Vec<Document>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_period: Option<CommentPeriod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<Decision>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<Feature>,
}

impl Application {
    /// Create an application with only an id set.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Turn JSON-escaped newlines in the free-text fields into real ones.
    pub fn unescape_text_fields(&mut self) {
        unescape_field(&mut self.description);
        unescape_field(&mut self.legal_description);
    }

    /// Display name, falling back to the CL file number and then the id.
    pub fn display_name(&self) -> String {
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }
        match self.cl_file {
            Some(cl_file) => format!("{:07}", cl_file),
            None => self.id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_api_record() {
        let json = r#"{
            "_id": "5a1b2c",
            "agency": "Crown Land Allocation",
            "cl_file": 1234,
            "description": "First line\\nSecond line",
            "legalDescription": "Lot 1\\nDistrict Lot 2",
            "status": "ACCEPTED",
            "tantalisID": 927364,
            "type": "LEASE",
            "centroid": [-123.1, 49.2],
            "publishDate": "2018-03-01T00:00:00Z"
        }"#;

        let app: Application = serde_json::from_str(json).unwrap();
        assert_eq!(app.id, "5a1b2c");
        assert_eq!(app.cl_file, Some(1234));
        assert_eq!(app.tantalis_id, Some(927364));
        assert_eq!(app.application_type.as_deref(), Some("LEASE"));
        assert_eq!(app.centroid, vec![-123.1, 49.2]);
        assert!(app.documents.is_empty());
        assert!(app.current_period.is_none());
    }

    #[test]
    fn test_unescape_text_fields() {
        let mut app = Application::new("a1");
        app.description = Some("First line\\nSecond line".into());
        app.legal_description = Some("Lot 1\\nDistrict Lot 2".into());

        app.unescape_text_fields();

        assert_eq!(app.description.as_deref(), Some("First line\nSecond line"));
        assert_eq!(app.legal_description.as_deref(), Some("Lot 1\nDistrict Lot 2"));
    }

    #[test]
    fn test_display_name_fallbacks() {
        let mut app = Application::new("abc");
        assert_eq!(app.display_name(), "abc");

        app.cl_file = Some(1234);
        assert_eq!(app.display_name(), "0001234");

        app.name = Some("Marina Lease".into());
        assert_eq!(app.display_name(), "Marina Lease");
    }

    #[test]
    fn test_serialize_skips_unpopulated() {
        let app = Application::new("a1");
        let value = serde_json::to_value(&app).unwrap();
        assert_eq!(value, serde_json::json!({ "_id": "a1" }));
    }
}
