//! Decision model.

use serde::{Deserialize, Serialize};

use crate::{unescape_field, Document};

/// The decision issued on an application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_application", default, skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documents: Vec<Document>,
}

impl Decision {
    pub fn unescape_text_fields(&mut self) {
        unescape_field(&mut self.description);
    }
}
