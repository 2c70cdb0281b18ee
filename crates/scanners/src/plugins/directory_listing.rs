use crate::core::{Finding, Plugin, PluginMetadata, RiskLevel, Severity};
use crate::transport::{self, Transport};
use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

const PROBE_PATHS: [&str; 5] = ["/", "/uploads/", "/files/", "/backup/", "/static/"];

const INDEX_MARKERS: [&str; 3] = [
    "Index of /",
    "<title>Index of",
    "Directory listing for",
];

/// Probes common directories for enabled auto-indexing.
pub struct DirectoryListingPlugin {
    metadata: PluginMetadata,
}

impl DirectoryListingPlugin {
    pub fn new() -> Self {
        Self {
            metadata: PluginMetadata {
                name: "directory_listing".to_string(),
                description: "Detects directory index pages exposed by the web server".to_string(),
                category: "misconfiguration".to_string(),
                risk_level: RiskLevel::Medium,
                version: "1.0.0".to_string(),
                author: "Harpoon".to_string(),
                references: Vec::new(),
                tags: vec!["listing".to_string()],
            },
        }
    }
}

impl Default for DirectoryListingPlugin {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Plugin for DirectoryListingPlugin {
    fn metadata(&self) -> &PluginMetadata {
        &self.metadata
    }

    async fn run(&self, target: &str, transport: &Transport) -> Result<Vec<Finding>> {
        let base = transport::base_url(target)?;
        let mut findings = Vec::new();

        for path in PROBE_PATHS {
            let url = transport::join_url(&base, path)?;
            let response = match transport.get(&url).await {
                Ok(response) => response,
                Err(err) => {
                    // One unreachable path is not a plugin failure.
                    debug!(url, "directory probe failed: {err}");
                    continue;
                }
            };
            if response.status != 200 {
                continue;
            }
            let Some(marker) = INDEX_MARKERS
                .iter()
                .find(|marker| response.body.contains(*marker))
            else {
                continue;
            };
            findings.push(
                Finding::new(
                    &self.metadata,
                    format!("Directory listing enabled at {path}"),
                    &response.url,
                    Severity::Medium,
                )
                .with_description(format!(
                    "The server returns an automatic directory index for {path}, exposing \
                     file names that were never meant to be browsable."
                ))
                .with_recommendation("Disable auto-indexing or add an index document.")
                .with_payload(path)
                .with_evidence("marker", *marker),
            );
        }

        Ok(findings)
    }
}
