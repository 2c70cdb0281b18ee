//! Report rendering for completed scans.

use crate::config::ReportConfig;
use crate::core::ScanResult;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Json,
    Html,
    Txt,
    Xml,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Html => "html",
            Self::Txt => "txt",
            Self::Xml => "xml",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown report format {0:?} (expected json, html, txt or xml)")]
pub struct UnknownReportFormat(String);

impl FromStr for ReportFormat {
    type Err = UnknownReportFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "html" => Ok(Self::Html),
            "txt" | "text" => Ok(Self::Txt),
            "xml" => Ok(Self::Xml),
            _ => Err(UnknownReportFormat(s.to_string())),
        }
    }
}

pub struct ReportGenerator {
    config: ReportConfig,
}

impl ReportGenerator {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    pub fn generate(&self, result: &ScanResult, format: ReportFormat) -> Result<String> {
        let scrubbed;
        let result = if self.config.include_request_response {
            result
        } else {
            scrubbed = self.scrub(result);
            &scrubbed
        };
        match format {
            ReportFormat::Json => self.render_json(result),
            ReportFormat::Html => Ok(self.render_html(result)),
            ReportFormat::Txt => Ok(self.render_txt(result)),
            ReportFormat::Xml => Ok(self.render_xml(result)),
        }
    }

    pub fn write(&self, result: &ScanResult, path: &Path, format: ReportFormat) -> Result<()> {
        let rendered = self.generate(result, format)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }
        std::fs::write(path, rendered)
            .with_context(|| format!("failed to write report to {}", path.display()))
    }

    /// Raw request/response captures stay out of reports unless explicitly
    /// enabled.
    fn scrub(&self, result: &ScanResult) -> ScanResult {
        let mut scrubbed = result.clone();
        for finding in &mut scrubbed.findings {
            finding.request = None;
            finding.response = None;
        }
        scrubbed
    }

    fn render_json(&self, result: &ScanResult) -> Result<String> {
        serde_json::to_string_pretty(result).context("failed to serialize scan result")
    }

    fn render_txt(&self, result: &ScanResult) -> String {
        let count = result.count_by_severity();
        let mut out = String::new();
        out.push_str(&format!("Scan report for {}\n", result.target));
        out.push_str(&format!(
            "Generated: {}\n",
            result.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        out.push_str(&format!(
            "Plugins: {}\n",
            result.scan_info.plugins_used.join(", ")
        ));
        out.push_str(&format!(
            "Findings: {} (critical: {}, high: {}, medium: {}, low: {}, info: {})\n\n",
            count.total(),
            count.critical,
            count.high,
            count.medium,
            count.low,
            count.info
        ));
        for (index, finding) in result.findings.iter().enumerate() {
            out.push_str(&format!(
                "{}. [{}] {}\n",
                index + 1,
                finding.severity,
                finding.title
            ));
            out.push_str(&format!("   URL: {}\n", finding.url));
            out.push_str(&format!(
                "   Plugin: {} ({})\n",
                finding.plugin_name, finding.plugin_category
            ));
            if !finding.description.is_empty() {
                out.push_str(&format!("   Description: {}\n", finding.description));
            }
            if !finding.recommendation.is_empty() {
                out.push_str(&format!("   Recommendation: {}\n", finding.recommendation));
            }
            if !finding.payload.is_empty() {
                out.push_str(&format!("   Payload: {}\n", finding.payload));
            }
            out.push('\n');
        }
        out
    }

    fn render_html(&self, result: &ScanResult) -> String {
        let count = result.count_by_severity();
        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        out.push_str(&format!(
            "<title>Scan report - {}</title>\n",
            html_escape(&result.target)
        ));
        out.push_str(
            "<style>body{font-family:sans-serif;margin:2em}table{border-collapse:collapse}\
             td,th{border:1px solid #ccc;padding:4px 10px}.finding{margin:1em 0;padding:1em;\
             border-left:4px solid #888}.CRITICAL{border-color:#b00}.HIGH{border-color:#d60}\
             .MEDIUM{border-color:#cc0}.LOW{border-color:#06c}.INFO{border-color:#090}</style>\n",
        );
        out.push_str("</head>\n<body>\n");
        out.push_str(&format!(
            "<h1>Scan report for {}</h1>\n",
            html_escape(&result.target)
        ));
        out.push_str(&format!(
            "<p>Generated {} by harpoon {}</p>\n",
            result.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            html_escape(&result.scan_info.scanner_version)
        ));
        out.push_str("<table>\n<tr><th>Severity</th><th>Count</th></tr>\n");
        for (label, value) in [
            ("CRITICAL", count.critical),
            ("HIGH", count.high),
            ("MEDIUM", count.medium),
            ("LOW", count.low),
            ("INFO", count.info),
        ] {
            out.push_str(&format!("<tr><td>{label}</td><td>{value}</td></tr>\n"));
        }
        out.push_str("</table>\n");
        for finding in &result.findings {
            out.push_str(&format!(
                "<div class=\"finding {}\">\n<h2>[{}] {}</h2>\n",
                finding.severity,
                finding.severity,
                html_escape(&finding.title)
            ));
            out.push_str(&format!(
                "<p><b>URL:</b> {}<br><b>Plugin:</b> {} ({})</p>\n",
                html_escape(&finding.url),
                html_escape(&finding.plugin_name),
                html_escape(&finding.plugin_category)
            ));
            if !finding.description.is_empty() {
                out.push_str(&format!("<p>{}</p>\n", html_escape(&finding.description)));
            }
            if !finding.recommendation.is_empty() {
                out.push_str(&format!(
                    "<p><i>{}</i></p>\n",
                    html_escape(&finding.recommendation)
                ));
            }
            out.push_str("</div>\n");
        }
        out.push_str("</body>\n</html>\n");
        out
    }

    fn render_xml(&self, result: &ScanResult) -> String {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        out.push_str(&format!(
            "<scan target=\"{}\" timestamp=\"{}\" version=\"{}\">\n",
            xml_escape(&result.target),
            result.timestamp.to_rfc3339(),
            xml_escape(&result.scan_info.scanner_version)
        ));
        out.push_str("  <plugins>\n");
        for plugin in &result.scan_info.plugins_used {
            out.push_str(&format!("    <plugin>{}</plugin>\n", xml_escape(plugin)));
        }
        out.push_str("  </plugins>\n  <findings>\n");
        for finding in &result.findings {
            out.push_str(&format!(
                "    <finding severity=\"{}\" confidence=\"{}\">\n",
                finding.severity, finding.confidence
            ));
            out.push_str(&format!(
                "      <title>{}</title>\n",
                xml_escape(&finding.title)
            ));
            out.push_str(&format!("      <url>{}</url>\n", xml_escape(&finding.url)));
            out.push_str(&format!(
                "      <plugin category=\"{}\">{}</plugin>\n",
                xml_escape(&finding.plugin_category),
                xml_escape(&finding.plugin_name)
            ));
            if !finding.description.is_empty() {
                out.push_str(&format!(
                    "      <description>{}</description>\n",
                    xml_escape(&finding.description)
                ));
            }
            if !finding.recommendation.is_empty() {
                out.push_str(&format!(
                    "      <recommendation>{}</recommendation>\n",
                    xml_escape(&finding.recommendation)
                ));
            }
            if !finding.payload.is_empty() {
                out.push_str(&format!(
                    "      <payload>{}</payload>\n",
                    xml_escape(&finding.payload)
                ));
            }
            out.push_str("    </finding>\n");
        }
        out.push_str("  </findings>\n</scan>\n");
        out
    }
}

fn html_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn xml_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Finding, PluginMetadata, Severity};

    fn sample_result() -> ScanResult {
        let metadata = PluginMetadata {
            name: "security_headers".to_string(),
            category: "configuration".to_string(),
            ..Default::default()
        };
        let mut result = ScanResult::new(
            "http://example.com",
            vec!["security_headers".to_string()],
        );
        result.add_finding(
            Finding::new(
                &metadata,
                "Missing <CSP> header",
                "http://example.com/",
                Severity::Low,
            )
            .with_description("No policy & no fallback")
            .with_request("GET / HTTP/1.1"),
        );
        result
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert_eq!("xml".parse::<ReportFormat>().unwrap(), ReportFormat::Xml);
        assert!("pdf".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_json_report_round_trips() {
        let generator = ReportGenerator::new(ReportConfig::default());
        let rendered = generator
            .generate(&sample_result(), ReportFormat::Json)
            .unwrap();
        let parsed: ScanResult = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed.target, "http://example.com");
        assert_eq!(parsed.findings.len(), 1);
        // Captures are scrubbed by default.
        assert!(parsed.findings[0].request.is_none());
    }

    #[test]
    fn test_request_capture_kept_when_configured() {
        let generator = ReportGenerator::new(ReportConfig {
            include_request_response: true,
            ..Default::default()
        });
        let rendered = generator
            .generate(&sample_result(), ReportFormat::Json)
            .unwrap();
        let parsed: ScanResult = serde_json::from_str(&rendered).unwrap();
        assert_eq!(
            parsed.findings[0].request.as_deref(),
            Some("GET / HTTP/1.1")
        );
    }

    #[test]
    fn test_html_and_xml_escape_markup() {
        let generator = ReportGenerator::new(ReportConfig::default());
        let html = generator
            .generate(&sample_result(), ReportFormat::Html)
            .unwrap();
        assert!(html.contains("Missing &lt;CSP&gt; header"));
        let xml = generator
            .generate(&sample_result(), ReportFormat::Xml)
            .unwrap();
        assert!(xml.contains("No policy &amp; no fallback"));
        assert!(xml.contains("<plugin category=\"configuration\">security_headers</plugin>"));
    }

    #[test]
    fn test_txt_report_contains_summary() {
        let generator = ReportGenerator::new(ReportConfig::default());
        let txt = generator
            .generate(&sample_result(), ReportFormat::Txt)
            .unwrap();
        assert!(txt.contains("Scan report for http://example.com"));
        assert!(txt.contains("low: 1"));
    }
}
