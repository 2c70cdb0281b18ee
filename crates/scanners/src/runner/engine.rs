//! Scan orchestration.
//!
//! One `scan` call drives a whole run: validate the target, resolve the
//! active plugin set, launch one task per plugin against the shared
//! transport, and merge findings as tasks finish. Failure isolation is
//! structural - each plugin runs in its own spawned task, and both returned
//! errors and panics are absorbed at that boundary, so a broken plugin can
//! only ever lose its own findings.
//!
//! There is no mid-scan cancellation: once launched, every plugin task runs
//! to a terminal state before the result is returned. Callers that need a
//! deadline wrap the whole `scan` future in a timeout; the transport's own
//! request timeout bounds any single stuck HTTP call.

use crate::config::Config;
use crate::core::{ScanError, ScanResult};
use crate::runner::{LogProgress, PluginRegistry, ProgressObserver};
use crate::transport::Transport;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, info, warn};
use url::Url;

pub struct ScanEngine {
    registry: PluginRegistry,
    transport: Arc<Transport>,
    observer: Arc<dyn ProgressObserver>,
}

impl ScanEngine {
    /// Build an engine from configuration: loads built-in plugins, discovers
    /// external ones, and constructs the shared transport.
    pub fn new(config: &Config) -> Result<Self, ScanError> {
        let transport = Arc::new(Transport::new(config.transport.clone())?);
        let mut registry = PluginRegistry::new(config.plugins.clone());
        registry.load();
        Ok(Self {
            registry,
            transport,
            observer: Arc::new(LogProgress),
        })
    }

    /// Assemble an engine from pre-built parts.
    pub fn from_parts(registry: PluginRegistry, transport: Arc<Transport>) -> Self {
        Self {
            registry,
            transport,
            observer: Arc::new(LogProgress),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    pub fn transport(&self) -> &Arc<Transport> {
        &self.transport
    }

    /// Run one scan. `requested` restricts the run to the named plugins;
    /// otherwise the configured active set runs. An empty active set is a
    /// successful, empty result.
    pub async fn scan(
        &self,
        target: &str,
        requested: Option<&[String]>,
    ) -> Result<ScanResult, ScanError> {
        let parsed =
            Url::parse(target).map_err(|_| ScanError::InvalidTarget(target.to_string()))?;
        if !parsed.has_host() {
            return Err(ScanError::InvalidTarget(target.to_string()));
        }

        info!(url = target, "starting scan");

        let active = self.registry.active_plugins(requested);
        let plugins_used: Vec<String> = active
            .iter()
            .map(|plugin| plugin.metadata().name.clone())
            .collect();
        let mut result = ScanResult::new(target, plugins_used);

        if active.is_empty() {
            warn!(url = target, "no active plugins for scan");
            return Ok(result);
        }

        self.observer.scan_started(target, active.len());

        let mut tasks = JoinSet::new();
        for plugin in active {
            let name = plugin.metadata().name.clone();
            let transport = Arc::clone(&self.transport);
            let target_owned = target.to_string();
            self.observer.plugin_started(&name);

            // The inner spawn is the isolation boundary: a panic in plugin
            // code surfaces as a JoinError here instead of unwinding into
            // the orchestration.
            let worker =
                tokio::spawn(async move { plugin.run(&target_owned, &transport).await });
            tasks.spawn(async move {
                let outcome = match worker.await {
                    Ok(outcome) => outcome,
                    Err(err) => Err(anyhow::anyhow!("plugin task panicked: {err}")),
                };
                (name, outcome)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            let Ok((name, outcome)) = joined else {
                continue;
            };
            match outcome {
                Ok(findings) => {
                    self.observer.plugin_completed(&name, findings.len());
                    info!(plugin = %name, findings = findings.len(), "plugin finished");
                    result.extend_findings(findings);
                }
                Err(err) => {
                    self.observer.plugin_failed(&name, &format!("{err:#}"));
                    error!(plugin = %name, "plugin failed: {err:#}");
                }
            }
        }

        self.observer
            .scan_completed(target, result.total_findings());
        Ok(result)
    }
}
