//! Harpoon - Web Vulnerability Scanning Engine
//!
//! This crate provides a trait-based plugin system for scanning web
//! applications: a shared rate-limited HTTP transport, a plugin registry with
//! manifest-driven external plugin discovery, and a scan engine that runs
//! every active plugin concurrently against a target and aggregates the
//! findings into a single result.

pub mod config;
pub mod core;
pub mod plugins;
pub mod report;
pub mod runner;
pub mod transport;

pub use crate::config::{Config, LoggingConfig, PluginConfig, ReportConfig, TransportConfig};
pub use crate::core::{
    Finding, Plugin, PluginMetadata, RiskLevel, ScanError, ScanInfo, ScanResult, Severity,
    SeverityCount,
};
pub use crate::report::{ReportFormat, ReportGenerator};
pub use crate::runner::{
    ExternalPlugin, LogProgress, PluginManifest, PluginRegistry, ProgressObserver, ScanEngine,
};
pub use crate::transport::{
    HttpResponse, Method, RequestBody, RequestOptions, Transport, TransportError,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_registry() {
        let registry = PluginRegistry::new(PluginConfig::default());
        assert!(registry.list_all().is_empty());
    }
}
