use anyhow::Result;
use clap::Args;
use colored::Colorize;
use harpoon_scanners::{Config, PluginRegistry};

#[derive(Args, Clone)]
pub struct PluginsArgs {
    /// Only show plugins in this category
    #[arg(long)]
    pub category: Option<String>,
}

pub fn execute(args: PluginsArgs, config: Config) -> Result<()> {
    let mut registry = PluginRegistry::new(config.plugins.clone());
    registry.load();

    let plugins = match &args.category {
        Some(category) => registry.filter_by_category(category),
        None => registry.list_all(),
    };

    if plugins.is_empty() {
        println!("No plugins registered");
        return Ok(());
    }

    println!(
        "{:<20} {:<24} {:<8} {}",
        "NAME".bold(),
        "CATEGORY".bold(),
        "RISK".bold(),
        "DESCRIPTION".bold()
    );
    for plugin in plugins {
        let metadata = plugin.metadata();
        println!(
            "{:<20} {:<24} {:<8} {}",
            metadata.name.cyan(),
            metadata.category,
            metadata.risk_level.as_str().yellow(),
            metadata.description
        );
    }

    Ok(())
}
