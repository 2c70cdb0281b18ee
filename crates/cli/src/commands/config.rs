use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use harpoon_scanners::Config;
use std::path::PathBuf;

#[derive(Args, Clone)]
pub struct InitConfigArgs {
    /// Where to write the sample configuration
    #[arg(short, long, default_value = "harpoon.toml")]
    pub output: PathBuf,
}

pub fn execute(args: InitConfigArgs) -> Result<()> {
    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    std::fs::write(&args.output, Config::sample())
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    println!(
        "{} {}",
        "Sample configuration written to".green(),
        args.output.display()
    );
    Ok(())
}
