use crate::core::{Finding, Plugin, PluginMetadata, RiskLevel, Severity};
use crate::transport::Transport;
use anyhow::Result;
use async_trait::async_trait;

const BANNER_HEADERS: [&str; 3] = ["server", "x-powered-by", "x-aspnet-version"];

/// Reports software and version disclosure in response headers.
pub struct ServerBannerPlugin {
    metadata: PluginMetadata,
}

impl ServerBannerPlugin {
    pub fn new() -> Self {
        Self {
            metadata: PluginMetadata {
                name: "server_banner".to_string(),
                description: "Reports server software disclosed in response headers".to_string(),
                category: "information_disclosure".to_string(),
                risk_level: RiskLevel::Low,
                version: "1.0.0".to_string(),
                author: "Harpoon".to_string(),
                references: Vec::new(),
                tags: vec!["banner".to_string(), "passive".to_string()],
            },
        }
    }
}

impl Default for ServerBannerPlugin {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Plugin for ServerBannerPlugin {
    fn metadata(&self) -> &PluginMetadata {
        &self.metadata
    }

    async fn run(&self, target: &str, transport: &Transport) -> Result<Vec<Finding>> {
        let response = transport.get(target).await?;
        let mut findings = Vec::new();

        for header in BANNER_HEADERS {
            let Some(value) = response.header(header) else {
                continue;
            };
            // A bare product name discloses little; versions are the issue.
            let confidence = if value.chars().any(|c| c.is_ascii_digit()) {
                0.9
            } else {
                0.5
            };
            findings.push(
                Finding::new(
                    &self.metadata,
                    format!("Server banner disclosed via {header}"),
                    &response.url,
                    Severity::Info,
                )
                .with_description(format!(
                    "The {header} header announces {value:?}, which helps an attacker \
                     fingerprint the stack."
                ))
                .with_recommendation("Strip or genericize version-revealing headers.")
                .with_evidence(header, value)
                .with_confidence(confidence),
            );
        }

        Ok(findings)
    }
}
