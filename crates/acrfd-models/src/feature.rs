//! Geospatial feature model (GeoJSON `Feature` as served by the tenure search).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One tenure shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub feature_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// Raw GeoJSON geometry; not interpreted here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<FeatureProperties>,
}

/// Tenure attributes attached to a feature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct FeatureProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenure_area_in_hectares: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disposition_transaction_sid: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intrid_sid: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenure_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenure_stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenure_purpose: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of the tenure search: either a collection or a bare list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FeatureResponse {
    List(Vec<Feature>),
    Collection { features: Vec<Feature> },
}

impl FeatureResponse {
    pub fn into_features(self) -> Vec<Feature> {
        match self {
            FeatureResponse::List(features) => features,
            FeatureResponse::Collection { features } => features,
        }
    }
}

/// Total tenure area in hectares across features that carry properties.
pub fn total_area_hectares(features: &[Feature]) -> f64 {
    features
        .iter()
        .filter_map(|f| f.properties.as_ref())
        .map(|p| p.tenure_area_in_hectares.unwrap_or(0.0))
        .sum()
}
