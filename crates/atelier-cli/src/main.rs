//! Atelier CLI - Command-line interface for generative asset orchestration

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{fetch, generate, serve, status, wait};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "atelier")]
#[command(about = "Generate images and 3D models from prompts and sketches", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an asset
    #[command(subcommand)]
    Generate(generate::GenerateCommands),

    /// Show the job status of an asset
    Status {
        /// Asset id
        id: String,

        /// Use the mock store regardless of config
        #[arg(long)]
        mock: bool,
    },

    /// Wait until an asset is ready
    Wait {
        /// Asset id
        id: String,

        /// Maximum number of probes
        #[arg(long)]
        attempts: Option<u32>,

        /// Seconds between probes
        #[arg(long)]
        delay: Option<f64>,

        /// Readiness signal: status or binary
        #[arg(long, default_value = "status", value_parser = parse_probe)]
        probe: String,

        /// Preview kind for the binary probe (model or image)
        #[arg(long, default_value = "model")]
        kind: String,

        /// Use the mock store regardless of config
        #[arg(long)]
        mock: bool,
    },

    /// Download an asset's shared preview
    Fetch {
        /// Asset id
        id: String,

        /// Preview kind (model or image)
        #[arg(long, default_value = "model")]
        kind: String,

        /// Output path (defaults to <id>.<ext>)
        #[arg(short, long)]
        output: Option<String>,

        /// Use the mock store regardless of config
        #[arg(long)]
        mock: bool,
    },

    /// Start the HTTP service
    Serve {
        /// Address to bind (defaults to the configured one)
        #[arg(long)]
        bind: Option<String>,

        /// Use the mock store regardless of config
        #[arg(long)]
        mock: bool,
    },
}

fn parse_probe(s: &str) -> Result<String, String> {
    match s {
        "status" | "binary" => Ok(s.to_string()),
        _ => Err(format!("unknown probe '{}'; valid values: status, binary", s)),
    }
}

/// `RUST_LOG` directives when set and valid, otherwise `info`
fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(cmd) => generate::run(cmd),
        Commands::Status { id, mock } => status::run(&id, mock),
        Commands::Wait {
            id,
            attempts,
            delay,
            probe,
            kind,
            mock,
        } => wait::run(wait::WaitArgs {
            id,
            attempts,
            delay,
            probe,
            kind,
            mock,
        }),
        Commands::Fetch {
            id,
            kind,
            output,
            mock,
        } => fetch::run(&id, &kind, output.as_deref(), mock),
        Commands::Serve { bind, mock } => serve::run(bind, mock),
    }
}
