//! treadboard: a live terminal dashboard for a networked treadmill.
//!
//! Run with:  `RUST_LOG=info treadboard --url http://treadmill.local:5000`

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tread_app::Overrides;
use tread_config::SourceMode;

#[derive(Debug, Parser)]
#[command(name = "treadboard", version, about = "Rolling treadmill telemetry dashboard")]
struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/treadboard/treadboard.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL, overrides `source.url`
    #[arg(short, long)]
    url: Option<String>,

    /// How to read telemetry, overrides `source.mode`
    #[arg(short, long, value_enum)]
    mode: Option<Mode>,

    /// Disable ANSI colors and screen clearing
    #[arg(long)]
    plain: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Poll,
    Stream,
}

impl From<Mode> for SourceMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Poll => SourceMode::Poll,
            Mode::Stream => SourceMode::Stream,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Frames go to stdout, so logs go to stderr. RUST_LOG controls verbosity (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("treadboard v{} starting", env!("CARGO_PKG_VERSION"));

    let path = cli.config.unwrap_or_else(tread_config::default_path);
    let config = tread_config::load(&path)
        .with_context(|| format!("loading config from '{}'", path.display()))?;

    let overrides = Overrides {
        url:   cli.url,
        mode:  cli.mode.map(Into::into),
        plain: cli.plain,
    };

    tread_app::run(path, config, overrides).await.map_err(Into::into)
}
