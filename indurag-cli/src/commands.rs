//! CLI subcommand handlers.

use crate::Commands;
use crate::ConfigAction;
use crate::render;
use anyhow::Context;
use indurag_core::gateway;
use indurag_core::{
    ChunkRef, FormatRequest, FormatResponse, Formatter, FormatterConfig, ProviderChain, parse,
};
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

/// Handle a CLI subcommand.
pub async fn handle_command(command: Commands, workspace: &Path) -> anyhow::Result<()> {
    match command {
        Commands::Format {
            query,
            machine,
            context_file,
            chunks_file,
            json,
        } => {
            let request = FormatRequest {
                context: read_input(context_file.as_deref())?,
                query,
                machine,
                chunks: read_chunks(chunks_file.as_deref())?,
            };
            handle_format(request, json, workspace).await
        }
        Commands::Parse { file, json } => handle_parse(file.as_deref(), json),
        Commands::Serve { addr } => handle_serve(addr, workspace).await,
        Commands::Backends => handle_backends(workspace),
        Commands::Config { action } => handle_config(action, workspace),
    }
}

fn load(workspace: &Path) -> anyhow::Result<FormatterConfig> {
    let config = indurag_core::config::load_config(Some(workspace), None)
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;
    for warning in config.validate() {
        warn!("{}", warning);
    }
    Ok(config)
}

/// Read a file, or stdin when no path is given and stdin is not a terminal.
fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(p) => std::fs::read_to_string(p)
            .with_context(|| format!("Failed to read {}", p.display())),
        None if std::io::stdin().is_terminal() => Ok(String::new()),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn read_chunks(path: Option<&Path>) -> anyhow::Result<Vec<ChunkRef>> {
    let Some(p) = path else {
        return Ok(Vec::new());
    };
    let raw = std::fs::read_to_string(p).with_context(|| format!("Failed to read {}", p.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid chunk list in {}", p.display()))
}

async fn run_format(request: FormatRequest, workspace: &Path) -> anyhow::Result<FormatResponse> {
    let config = load(workspace)?;
    let chain = ProviderChain::from_config(&config)?;
    Ok(Formatter::new(chain).format(request).await)
}

async fn handle_format(request: FormatRequest, json: bool, workspace: &Path) -> anyhow::Result<()> {
    let response = run_format(request, workspace).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print!("{}", render::render_response(&response));
    }
    Ok(())
}

fn handle_parse(file: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let parsed = parse(&read_input(file)?);
    if parsed.is_empty() {
        anyhow::bail!("No answer sections found in input");
    }
    if json {
        println!("{}", serde_json::to_string_pretty(&parsed)?);
    } else {
        print!("{}", render::render_answer(&parsed));
    }
    Ok(())
}

async fn handle_serve(addr: Option<String>, workspace: &Path) -> anyhow::Result<()> {
    let config = load(workspace)?;
    let addr = addr.unwrap_or_else(|| config.server.bind_addr.clone());
    let formatter = Arc::new(Formatter::new(ProviderChain::from_config(&config)?));
    println!(
        "indurag serving on http://{} (tiers: {})",
        addr,
        formatter.chain().tier_names().join(" -> ")
    );
    gateway::serve(formatter, &addr)
        .await
        .with_context(|| format!("Server on {} failed", addr))
}

fn handle_backends(workspace: &Path) -> anyhow::Result<()> {
    let config = load(workspace)?;
    let chain = ProviderChain::from_config(&config)?;
    for (i, name) in chain.tier_names().iter().enumerate() {
        println!("{}. {}", i + 1, name);
    }
    Ok(())
}

fn config_path(workspace: &Path) -> PathBuf {
    workspace.join(".indurag").join("config.toml")
}

/// Hide inline credentials before printing.
fn masked(mut config: FormatterConfig) -> FormatterConfig {
    for backend in [&mut config.openai, &mut config.anthropic] {
        if backend.api_key.is_some() {
            backend.api_key = Some("****".to_string());
        }
    }
    config
}

fn handle_config(action: ConfigAction, workspace: &Path) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            let config_path = config_path(workspace);
            if config_path.exists() {
                println!(
                    "Configuration file already exists at: {}",
                    config_path.display()
                );
                return Ok(());
            }
            if let Some(dir) = config_path.parent() {
                std::fs::create_dir_all(dir)?;
            }
            let toml_str = toml::to_string_pretty(&FormatterConfig::default())?;
            std::fs::write(&config_path, &toml_str)?;
            println!(
                "Created default configuration at: {}",
                config_path.display()
            );
            Ok(())
        }
        ConfigAction::Show => {
            let config = masked(load(workspace)?);
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}
