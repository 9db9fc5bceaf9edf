mod replay;

use std::fs;
use std::path::{Path, PathBuf};

use canvas_core::config::{ConfigError, EditorConfig};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::replay::{Script, replay};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {}: {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("invalid JSON in {}: {source}", .path.display())]
    Json { path: PathBuf, source: serde_json::Error },
    #[error("failed to render scene: {0}")]
    Render(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Parser, Debug)]
#[command(name = "canvas-cli", about = "Replay recorded gestures against the canvas editing core")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Replay(ReplayArgs),
}

#[derive(Args, Debug)]
struct ReplayArgs {
    #[arg(help = "Script file with `scene` and `events`")]
    script: PathBuf,

    #[arg(long, env = "CANVAS_CONFIG", help = "EditorConfig JSON; defaults to CANVAS_* overrides")]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = false, help = "Print one line per mutation instead of the final scene")]
    summary: bool,
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Replay(args) => run_replay(&args),
    }
}

fn run_replay(args: &ReplayArgs) -> Result<(), CliError> {
    let config = match &args.config {
        Some(path) => read_json::<EditorConfig>(path)?,
        None => EditorConfig::from_env()?,
    };
    let script = read_json::<Script>(&args.script)?;
    let out = replay(script, config);

    if args.summary {
        for line in out.summary_lines() {
            println!("{line}");
        }
        return Ok(());
    }
    let rendered = serde_json::to_string_pretty(out.editor.scene())?;
    println!("{rendered}");
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let raw = fs::read_to_string(path).map_err(|source| CliError::Io { path: path.to_path_buf(), source })?;
    serde_json::from_str(&raw).map_err(|source| CliError::Json { path: path.to_path_buf(), source })
}
