use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tokio_util::sync::CancellationToken;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

use photo_album::config::Configuration;
use photo_album::tasks::viewer;

#[derive(Debug, Parser)]
#[command(name = "photo-album", version, about = "Fullscreen screenshot album")]
struct Args {
    /// Path to YAML config; defaults apply when omitted
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Screenshot directory, overriding `screenshot-root`
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,
    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"))
        .add_directive(format!("photo_album={level}").parse()?)
        .add_directive("wgpu=warn".parse()?)
        .add_directive("winit=warn".parse()?)
        .add_directive("naga=warn".parse()?);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let Args {
        config,
        root,
        verbose,
    } = Args::parse();
    init_tracing(verbose)?;

    let mut cfg = match config.as_ref() {
        Some(path) => Configuration::from_yaml_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Configuration::default(),
    };
    if let Some(root) = root {
        cfg.screenshot_root = root;
    }
    let cfg = cfg.validated().context("invalid configuration values")?;
    info!(
        root = %cfg.screenshot_root.display(),
        assets = %cfg.assets_dir.display(),
        "configuration loaded"
    );

    let cancel = CancellationToken::new();

    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::warn!("ctrl-c handler failed: {err}");
                return;
            }
            info!("ctrl-c received; shutting down");
            cancel.cancel();
        });
    }

    #[cfg(unix)]
    {
        let cancel = cancel.clone();
        let mut term = signal(SignalKind::terminate()).context("failed to install SIGTERM handler")?;
        tokio::spawn(async move {
            if term.recv().await.is_some() {
                info!("SIGTERM received; shutting down");
                cancel.cancel();
            }
        });
    }

    // The event loop must own the main thread.
    let result = viewer::run_windowed(cfg, cancel.clone()).context("album viewer failed");
    cancel.cancel();
    result
}
