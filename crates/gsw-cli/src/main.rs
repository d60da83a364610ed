use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "gsw")]
#[command(about = "GSW market price sheet builder", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tier x enchantment sweep: one master table per tier, columns `<city> T<tier>.<enchant>`
    Sweep(RunArgs),

    /// Base level only: one request per tier, columns `<city> T<tier>`
    Single(RunArgs),

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> local overrides ...)
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Layered config paths in merge order
    #[arg(long = "config", required = true)]
    pub config_paths: Vec<String>,

    /// Resource section of the catalog (e.g. ore, hide)
    #[arg(long)]
    pub resource: String,

    /// Only this tier (default: every tier in market.tiers)
    #[arg(long)]
    pub tier: Option<u8>,

    /// Root directory for run output (<out>/<run_id>/<sheet>.jsonl)
    #[arg(long, default_value = "exports")]
    pub out: PathBuf,

    /// Override market.base_url
    #[arg(long)]
    pub base_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env.local if present (dev convenience). Silent if missing.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Sweep(args) => commands::sheet::run(args, commands::Mode::Sweep).await?,
        Commands::Single(args) => commands::sheet::run(args, commands::Mode::Single).await?,
        Commands::ConfigHash { paths } => {
            let loaded = gsw_config::load_layered_yaml(&paths)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }
    }

    Ok(())
}

fn init_tracing() {
    // Logs go to stderr; stdout carries the key=value run summary.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
