//! Once CLI command.
//!
//! Runs exactly one manager tick against a paper book and prints what it did.
//! Useful for checking a configuration against a saved snapshot.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use sltp_manager::{Manager, ManagerStatus, MemoryCanvas, PaperHost, PaperSnapshot, TickReport};

use super::load_config;

/// Arguments for the once command.
#[derive(Args, Debug, Clone)]
pub struct OnceArgs {
    /// Config file path
    #[arg(short, long, default_value = "config/Config.toml")]
    pub config: String,

    /// Profile overlay (reads Config.<profile>.toml next to the config file)
    #[arg(long)]
    pub profile: Option<String>,

    /// Paper book snapshot (JSON)
    #[arg(short, long, default_value = "config/snapshot.json")]
    pub snapshot: String,

    /// Force the enable flag on regardless of the config
    #[arg(long)]
    pub enable: bool,

    /// Write the book after the tick to this path
    #[arg(long)]
    pub write_snapshot: Option<String>,
}

#[derive(Debug, Serialize)]
struct OnceOutput {
    report: TickReport,
    status: ManagerStatus,
    book: PaperSnapshot,
}

/// Runs the once command.
///
/// # Errors
/// Returns an error if the config or snapshot cannot be loaded, or the
/// resulting book cannot be written.
pub async fn run_once(args: OnceArgs) -> Result<()> {
    let mut config = load_config(&args.config, args.profile.as_deref())?;
    if args.enable {
        config.execution.enabled = true;
    }

    let host = Arc::new(PaperHost::load(&args.snapshot)?);
    let mut manager = Manager::new(Arc::clone(&host), config, MemoryCanvas::default());
    manager.start();
    let report = manager.tick().await;
    let status = manager.status();
    manager.stop();

    let book = host.snapshot().await;
    if let Some(path) = &args.write_snapshot {
        std::fs::write(path, serde_json::to_string_pretty(&book)?)
            .with_context(|| format!("Failed to write snapshot {path}"))?;
        tracing::info!(path, "Snapshot written");
    }

    let output = OnceOutput {
        report,
        status,
        book,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
