mod commands;
mod summary;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "meridian", about = "Medical image viewer geometry toolkit")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Viewer config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print or save the default viewer config
    Config(commands::config::ConfigArgs),
    /// Convert a point between screen and image space
    Transform(commands::transform::TransformArgs),
    /// Report metrics for an exported measurement file
    Report(commands::report::ReportArgs),
    /// Compute a volume from per-slice contours
    Volume(commands::volume::VolumeArgs),
    /// Show MPR view state for a volume
    Mpr(commands::mpr::MprArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config_path = cli.config.as_deref();
    match &cli.command {
        Commands::Config(args) => commands::config::run(args, config_path),
        Commands::Transform(args) => commands::transform::run(args, config_path),
        Commands::Report(args) => commands::report::run(args, config_path),
        Commands::Volume(args) => commands::volume::run(args),
        Commands::Mpr(args) => commands::mpr::run(args, config_path),
    }
}
