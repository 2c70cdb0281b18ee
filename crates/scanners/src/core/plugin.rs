//! Plugin trait and metadata descriptor.
//!
//! Every detection module - built-in or externally discovered - implements
//! `Plugin`. Metadata is a plain value attached to the implementation, not
//! behavior: the registry indexes plugins by `metadata().name`, and filtering
//! by category or risk level reads the same descriptor.
//!
//! Plugins hold no mutable state. A plugin instance is constructed once when
//! the registry loads and is shared across scans behind an `Arc`, so `run`
//! takes `&self` and every per-scan input (target, transport) arrives as an
//! argument.

use crate::core::{Finding, RiskLevel};
use crate::transport::Transport;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Identity and dispatch metadata for one detection module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginMetadata {
    /// Unique name, used as the registry key.
    pub name: String,
    pub description: String,
    pub category: String,
    pub risk_level: RiskLevel,
    pub version: String,
    pub author: String,
    #[serde(default)]
    pub references: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[async_trait]
pub trait Plugin: Send + Sync {
    fn metadata(&self) -> &PluginMetadata;

    /// Run the detection logic against `target`, issuing all HTTP requests
    /// through the shared transport. Errors returned here are contained at
    /// the engine's task boundary and never abort sibling plugins.
    async fn run(&self, target: &str, transport: &Transport) -> Result<Vec<Finding>>;
}
