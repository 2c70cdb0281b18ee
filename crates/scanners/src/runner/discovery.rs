//! External plugin discovery.
//!
//! Built-in plugins are statically linked; everything else is described by a
//! TOML manifest dropped into a configured plugin directory. A manifest names
//! an executable that is spawned per scan with `{target}` substituted into
//! its arguments and must print a JSON array of findings on stdout. There is
//! no runtime introspection: a plugin either has a manifest or it does not
//! exist.
//!
//! A manifest that fails to parse is logged and skipped by the registry;
//! one bad candidate never aborts discovery of the rest.

use crate::core::{Finding, Plugin, PluginMetadata, RiskLevel, Severity};
use crate::transport::Transport;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("failed to read manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid manifest {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// On-disk description of one external plugin.
#[derive(Debug, Clone, Deserialize)]
pub struct PluginManifest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub risk_level: RiskLevel,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub references: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,

    /// Executable to spawn. Resolved through PATH unless absolute.
    pub command: String,
    /// Arguments; every occurrence of `{target}` is replaced with the scan
    /// target before spawning.
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_category() -> String {
    "external".to_string()
}

fn default_version() -> String {
    "0.1.0".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

pub fn load_manifest(path: &Path) -> Result<PluginManifest, DiscoveryError> {
    let content = std::fs::read_to_string(path).map_err(|source| DiscoveryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| DiscoveryError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// A plugin backed by an external command speaking the JSON findings
/// protocol on stdout.
pub struct ExternalPlugin {
    metadata: PluginMetadata,
    command: String,
    args: Vec<String>,
    timeout: Duration,
}

impl ExternalPlugin {
    pub fn from_manifest(manifest: PluginManifest) -> Self {
        let timeout = Duration::from_secs(manifest.timeout_secs);
        Self {
            metadata: PluginMetadata {
                name: manifest.name,
                description: manifest.description,
                category: manifest.category,
                risk_level: manifest.risk_level,
                version: manifest.version,
                author: manifest.author,
                references: manifest.references,
                tags: manifest.tags,
            },
            command: manifest.command,
            args: manifest.args,
            timeout,
        }
    }
}

#[async_trait]
impl Plugin for ExternalPlugin {
    fn metadata(&self) -> &PluginMetadata {
        &self.metadata
    }

    async fn run(&self, target: &str, _transport: &Transport) -> Result<Vec<Finding>> {
        let args: Vec<String> = self
            .args
            .iter()
            .map(|arg| arg.replace("{target}", target))
            .collect();

        debug!(
            plugin = %self.metadata.name,
            command = %self.command,
            "spawning external plugin"
        );

        let output = tokio::time::timeout(
            self.timeout,
            Command::new(&self.command).args(&args).output(),
        )
        .await
        .map_err(|_| {
            anyhow::anyhow!(
                "external plugin {} timed out after {}s",
                self.metadata.name,
                self.timeout.as_secs()
            )
        })?
        .with_context(|| format!("failed to launch {}", self.command))?;

        if !output.status.success() {
            bail!(
                "external plugin {} exited with {}",
                self.metadata.name,
                output.status
            );
        }

        let reports: Vec<ExternalFinding> = serde_json::from_slice(&output.stdout)
            .with_context(|| {
                format!(
                    "external plugin {} produced malformed findings JSON",
                    self.metadata.name
                )
            })?;

        Ok(reports
            .into_iter()
            .map(|report| report.into_finding(&self.metadata))
            .collect())
    }
}

/// Wire format an external command must emit: a JSON array of these objects.
#[derive(Debug, Deserialize)]
struct ExternalFinding {
    title: String,
    url: String,
    severity: Severity,
    #[serde(default)]
    description: String,
    #[serde(default)]
    recommendation: String,
    #[serde(default)]
    payload: String,
    #[serde(default)]
    request: Option<String>,
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    evidence: HashMap<String, serde_json::Value>,
    #[serde(default)]
    confidence: Option<f64>,
}

impl ExternalFinding {
    fn into_finding(self, metadata: &PluginMetadata) -> Finding {
        let mut finding = Finding::new(metadata, self.title, self.url, self.severity)
            .with_description(self.description)
            .with_recommendation(self.recommendation)
            .with_payload(self.payload);
        if let Some(request) = self.request {
            finding = finding.with_request(request);
        }
        if let Some(response) = self.response {
            finding = finding.with_response(response);
        }
        for (key, value) in self.evidence {
            finding = finding.with_evidence(key, value);
        }
        if let Some(confidence) = self.confidence {
            finding = finding.with_confidence(confidence);
        }
        finding
    }
}
