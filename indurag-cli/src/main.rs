//! indurag CLI: grounded maintenance answers from the terminal.
//!
//! Formats retrieved manual text into the four-section answer, parses stored
//! answers, and runs the HTTP service.

mod commands;
mod render;

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// indurag: grounded troubleshooting answers for industrial maintenance
#[derive(Parser, Debug)]
#[command(name = "indurag", version, about, long_about = None)]
struct Cli {
    /// Workspace directory (looked up for `.indurag/config.toml`)
    #[arg(short, long, default_value = ".", global = true)]
    workspace: PathBuf,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Format retrieved context into a grounded answer
    Format {
        /// The technician's question
        #[arg(short, long)]
        query: String,
        /// Machine the question is about
        #[arg(short, long)]
        machine: String,
        /// File holding the retrieved context (reads stdin when omitted)
        #[arg(short, long)]
        context_file: Option<PathBuf>,
        /// JSON file with retrieval chunk metadata to pass through
        #[arg(long)]
        chunks_file: Option<PathBuf>,
        /// Print the full response as JSON
        #[arg(long)]
        json: bool,
    },
    /// Parse a stored answer into its sections
    Parse {
        /// Answer file (reads stdin when omitted)
        file: Option<PathBuf>,
        /// Print the parsed sections as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the HTTP service
    Serve {
        /// Bind address, overriding `server.bind_addr`
        #[arg(short, long)]
        addr: Option<String>,
    },
    /// List generation tiers in the order they are tried
    Backends,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Subcommand, Debug)]
enum ConfigAction {
    /// Write a default `.indurag/config.toml` into the workspace
    Init,
    /// Print the merged configuration
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Human-readable stderr; RUST_LOG wins over -v
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)));

    // JSON file layer for structured logging
    let log_dir = directories::ProjectDirs::from("dev", "indurag", "indurag")
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."));
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "indurag.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    commands::handle_command(cli.command, &workspace).await
}
