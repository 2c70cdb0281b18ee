use tracing::{error, info};

/// Receives per-plugin status transitions while a scan runs. Implementations
/// must tolerate being called from multiple tasks at once.
pub trait ProgressObserver: Send + Sync {
    fn scan_started(&self, _target: &str, _plugin_count: usize) {}

    fn plugin_started(&self, _plugin: &str) {}

    fn plugin_completed(&self, _plugin: &str, _findings: usize) {}

    fn plugin_failed(&self, _plugin: &str, _error: &str) {}

    fn scan_completed(&self, _target: &str, _total_findings: usize) {}
}

/// Default observer: forwards every transition to the log.
pub struct LogProgress;

impl ProgressObserver for LogProgress {
    fn scan_started(&self, target: &str, plugin_count: usize) {
        info!(url = target, plugins = plugin_count, "scan started");
    }

    fn plugin_started(&self, plugin: &str) {
        info!(plugin, "plugin running");
    }

    fn plugin_completed(&self, plugin: &str, findings: usize) {
        info!(plugin, findings, "plugin completed");
    }

    fn plugin_failed(&self, plugin: &str, error: &str) {
        error!(plugin, "plugin failed: {error}");
    }

    fn scan_completed(&self, target: &str, total_findings: usize) {
        info!(url = target, findings = total_findings, "scan completed");
    }
}
