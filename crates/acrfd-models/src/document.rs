//! Document model.

use serde::{Deserialize, Serialize};

/// A file attached to an application or a decision.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_application", default, skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
    #[serde(rename = "_decision", default, skip_serializing_if = "Option::is_none")]
    pub decision_id: Option<String>,
    #[serde(rename = "documentFileName", default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(rename = "displayName", default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(rename = "internalURL", default, skip_serializing_if = "Option::is_none")]
    pub internal_url: Option<String>,
    #[serde(rename = "internalMime", default, skip_serializing_if = "Option::is_none")]
    pub internal_mime: Option<String>,
}

impl Document {
    /// Public download link for this document under the given API base URL.
    pub fn download_url(&self, api_base: &str) -> String {
        format!(
            "{}/api/public/document/{}/download",
            api_base.trim_end_matches('/'),
            self.id
        )
    }

    /// Name to show in listings.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.file_name.as_deref())
            .unwrap_or(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_url_trims_slash() {
        let doc = Document {
            id: "d1".into(),
            ..Default::default()
        };
        assert_eq!(
            doc.download_url("https://api.example.org/"),
            "https://api.example.org/api/public/document/d1/download"
        );
    }

    #[test]
    fn test_label_prefers_display_name() {
        let mut doc = Document {
            id: "d1".into(),
            file_name: Some("map.pdf".into()),
            ..Default::default()
        };
        assert_eq!(doc.label(), "map.pdf");
        doc.display_name = Some("Site Map".into());
        assert_eq!(doc.label(), "Site Map");
    }
}
