use anyhow::Result;
use clap::{Parser, Subcommand};
use harpoon_scanners::Config;
use std::path::PathBuf;

mod commands;
use commands::{config::InitConfigArgs, plugins::PluginsArgs, scan::ScanArgs};

#[derive(Parser)]
#[command(name = "harpoon")]
#[command(about = "Pluggable web application vulnerability scanner")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress everything except errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a target for vulnerabilities
    Scan(ScanArgs),

    /// List registered plugins
    Plugins(PluginsArgs),

    /// Write a sample configuration file
    InitConfig(InitConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load_or_default(cli.config.as_deref())?;
    init_tracing(&config, cli.verbose, cli.quiet);

    match cli.command {
        Commands::Scan(args) => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(commands::scan::execute(args, config))
        }
        Commands::Plugins(args) => commands::plugins::execute(args, config),
        Commands::InitConfig(args) => commands::config::execute(args),
    }
}

fn init_tracing(config: &Config, verbose: bool, quiet: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter = tracing_subscriber::EnvFilter::try_new(level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
