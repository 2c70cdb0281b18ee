use crate::core::{Finding, Severity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata describing one scan run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanInfo {
    pub scanner_version: String,
    pub target_url: String,
    /// Plugins actually invoked in this run, not merely requested.
    pub plugins_used: Vec<String>,
}

/// Outcome of one scan: the findings in task-completion order plus the run
/// metadata. Mutable while the engine appends, read-only once returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub target: String,
    pub timestamp: DateTime<Utc>,
    pub findings: Vec<Finding>,
    pub scan_info: ScanInfo,
}

impl ScanResult {
    pub fn new(target: &str, plugins_used: Vec<String>) -> Self {
        Self {
            target: target.to_string(),
            timestamp: Utc::now(),
            findings: Vec::new(),
            scan_info: ScanInfo {
                scanner_version: crate::VERSION.to_string(),
                target_url: target.to_string(),
                plugins_used,
            },
        }
    }

    pub fn add_finding(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn extend_findings(&mut self, findings: Vec<Finding>) {
        self.findings.extend(findings);
    }

    pub fn total_findings(&self) -> usize {
        self.findings.len()
    }

    pub fn count_by_severity(&self) -> SeverityCount {
        let mut count = SeverityCount::default();
        for finding in &self.findings {
            match finding.severity {
                Severity::Critical => count.critical += 1,
                Severity::High => count.high += 1,
                Severity::Medium => count.medium += 1,
                Severity::Low => count.low += 1,
                Severity::Info => count.info += 1,
            }
        }
        count
    }

    pub fn findings_by_severity(&self, severity: &str) -> Vec<&Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity.as_str().eq_ignore_ascii_case(severity))
            .collect()
    }

    pub fn findings_by_plugin(&self, plugin_name: &str) -> Vec<&Finding> {
        self.findings
            .iter()
            .filter(|f| f.plugin_name == plugin_name)
            .collect()
    }

    pub fn findings_by_category(&self, category: &str) -> Vec<&Finding> {
        self.findings
            .iter()
            .filter(|f| f.plugin_category == category)
            .collect()
    }

    /// Stable in-place sort: most severe first, ties broken by title.
    pub fn sort_by_severity(&mut self) {
        self.findings.sort_by(|a, b| {
            a.severity
                .rank()
                .cmp(&b.severity.rank())
                .then_with(|| a.title.cmp(&b.title))
        });
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCount {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub info: usize,
}

impl SeverityCount {
    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low + self.info
    }
}
