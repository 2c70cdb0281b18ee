use crate::core::{Finding, Plugin, PluginMetadata, RiskLevel, Severity};
use crate::transport::Transport;
use anyhow::Result;
use async_trait::async_trait;

const EXPECTED_HEADERS: [(&str, Severity, &str); 4] = [
    (
        "content-security-policy",
        Severity::Low,
        "Define a Content-Security-Policy to restrict where scripts, styles and frames may load from.",
    ),
    (
        "x-frame-options",
        Severity::Low,
        "Send X-Frame-Options (or a frame-ancestors CSP directive) to prevent clickjacking.",
    ),
    (
        "x-content-type-options",
        Severity::Info,
        "Send X-Content-Type-Options: nosniff to disable MIME sniffing.",
    ),
    (
        "referrer-policy",
        Severity::Info,
        "Set a Referrer-Policy to avoid leaking URLs to third parties.",
    ),
];

/// Reports missing HTTP response hardening headers on the target page.
pub struct SecurityHeadersPlugin {
    metadata: PluginMetadata,
}

impl SecurityHeadersPlugin {
    pub fn new() -> Self {
        Self {
            metadata: PluginMetadata {
                name: "security_headers".to_string(),
                description: "Checks the target response for missing security headers".to_string(),
                category: "configuration".to_string(),
                risk_level: RiskLevel::Low,
                version: "1.0.0".to_string(),
                author: "Harpoon".to_string(),
                references: vec![
                    "https://owasp.org/www-project-secure-headers/".to_string(),
                ],
                tags: vec!["headers".to_string(), "passive".to_string()],
            },
        }
    }
}

impl Default for SecurityHeadersPlugin {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Plugin for SecurityHeadersPlugin {
    fn metadata(&self) -> &PluginMetadata {
        &self.metadata
    }

    async fn run(&self, target: &str, transport: &Transport) -> Result<Vec<Finding>> {
        let response = transport.get(target).await?;
        let mut findings = Vec::new();

        for (header, severity, recommendation) in EXPECTED_HEADERS {
            if response.header(header).is_none() {
                findings.push(
                    Finding::new(
                        &self.metadata,
                        format!("Missing {header} header"),
                        &response.url,
                        severity,
                    )
                    .with_description(format!(
                        "The response from {} does not include the {header} header.",
                        response.url
                    ))
                    .with_recommendation(recommendation),
                );
            }
        }

        // HSTS only makes sense over TLS.
        if target.starts_with("https://")
            && response.header("strict-transport-security").is_none()
        {
            findings.push(
                Finding::new(
                    &self.metadata,
                    "Missing strict-transport-security header",
                    &response.url,
                    Severity::Low,
                )
                .with_description(format!(
                    "The HTTPS response from {} does not enforce transport security.",
                    response.url
                ))
                .with_recommendation(
                    "Send Strict-Transport-Security with a max-age of at least one year.",
                ),
            );
        }

        Ok(findings)
    }
}
