use crate::core::{PluginMetadata, Severity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One issue discovered by a plugin. Immutable once built; the builder
/// methods are meant to be chained at construction time only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub title: String,

    /// URL at which the issue was observed.
    pub url: String,

    pub severity: Severity,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub recommendation: String,

    /// Name of the plugin that produced this finding. A soft reference used
    /// for grouping and filtering, not an ownership link.
    pub plugin_name: String,

    pub plugin_category: String,

    #[serde(default)]
    pub payload: String,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub request: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub response: Option<String>,

    #[serde(skip_serializing_if = "HashMap::is_empty", default)]
    pub evidence: HashMap<String, serde_json::Value>,

    pub timestamp: DateTime<Utc>,

    /// Confidence in [0.0, 1.0]; clamped on every write.
    pub confidence: f64,
}

impl Finding {
    pub fn new(
        plugin: &PluginMetadata,
        title: impl Into<String>,
        url: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            severity,
            description: String::new(),
            recommendation: String::new(),
            plugin_name: plugin.name.clone(),
            plugin_category: plugin.category.clone(),
            payload: String::new(),
            request: None,
            response: None,
            evidence: HashMap::new(),
            timestamp: Utc::now(),
            confidence: 1.0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = recommendation.into();
        self
    }

    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = payload.into();
        self
    }

    pub fn with_request(mut self, request: impl Into<String>) -> Self {
        self.request = Some(request.into());
        self
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.response = Some(response.into());
        self
    }

    pub fn with_evidence(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.evidence.insert(key.into(), value.into());
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }
}
