use anyhow::Result;
use clap::Args;
use colored::Colorize;
use harpoon_scanners::{
    Config, ProgressObserver, ReportFormat, ReportGenerator, ScanEngine, ScanResult, Severity,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Clone)]
pub struct ScanArgs {
    /// Target URL to scan
    pub target: String,

    /// Write the report to this file instead of printing to the console
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Report format: json, html, txt or xml (defaults to the configured one)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Run only the named plugin; repeat for several
    #[arg(short, long = "plugin", value_name = "NAME")]
    pub plugins: Vec<String>,
}

pub async fn execute(args: ScanArgs, config: Config) -> Result<()> {
    let format = match &args.format {
        Some(raw) => raw.parse::<ReportFormat>()?,
        None => config.reports.default_format,
    };

    println!("{} {}", "Scanning".green().bold(), args.target);

    let engine = ScanEngine::new(&config)?.with_observer(Arc::new(ConsoleProgress));
    let requested = (!args.plugins.is_empty()).then_some(args.plugins.as_slice());

    let mut result = engine.scan(&args.target, requested).await?;
    result.sort_by_severity();

    match &args.output {
        Some(path) => {
            ReportGenerator::new(config.reports.clone()).write(&result, path, format)?;
            println!(
                "{} {} ({} findings)",
                "Report written to".green(),
                path.display(),
                result.total_findings()
            );
        }
        None => display_results(&result),
    }

    Ok(())
}

struct ConsoleProgress;

impl ProgressObserver for ConsoleProgress {
    fn plugin_started(&self, plugin: &str) {
        println!("  {} {}", "▶".cyan(), plugin);
    }

    fn plugin_completed(&self, plugin: &str, findings: usize) {
        println!("  {} {} ({} findings)", "✓".green(), plugin, findings);
    }

    fn plugin_failed(&self, plugin: &str, error: &str) {
        println!("  {} {} - {}", "✗".red(), plugin, error.dimmed());
    }
}

fn display_results(result: &ScanResult) {
    println!();
    println!(
        "{}",
        format!("Scan results for {}", result.target).green().bold()
    );
    println!(
        "Plugins run: {}",
        result.scan_info.plugins_used.join(", ")
    );
    println!("Total findings: {}", result.total_findings());

    if result.findings.is_empty() {
        println!("{}", "No vulnerabilities found".green());
        return;
    }

    let count = result.count_by_severity();
    for (severity, value) in [
        (Severity::Critical, count.critical),
        (Severity::High, count.high),
        (Severity::Medium, count.medium),
        (Severity::Low, count.low),
        (Severity::Info, count.info),
    ] {
        if value > 0 {
            println!("  {}: {}", paint_severity(severity), value);
        }
    }

    for finding in &result.findings {
        println!();
        println!(
            "{} {}",
            paint_severity(finding.severity).bold(),
            finding.title.bold()
        );
        println!("  URL: {}", finding.url);
        println!(
            "  Plugin: {} ({})",
            finding.plugin_name.cyan(),
            finding.plugin_category
        );
        if !finding.description.is_empty() {
            println!("  {}", finding.description);
        }
        if !finding.recommendation.is_empty() {
            println!("  {}", finding.recommendation.dimmed());
        }
    }
}

fn paint_severity(severity: Severity) -> colored::ColoredString {
    match severity {
        Severity::Critical => severity.as_str().red().bold(),
        Severity::High => severity.as_str().red(),
        Severity::Medium => severity.as_str().yellow(),
        Severity::Low => severity.as_str().blue(),
        Severity::Info => severity.as_str().green(),
    }
}
