//! Run CLI command.
//!
//! Starts the manager loop against a paper book. Lines typed on stdin act as
//! panel clicks and status queries:
//!
//! - `t` / `toggle`: flip the enable flag
//! - `on` / `off`: force the flag
//! - `s` / `status`: print the manager status as JSON
//! - `q` / `quit`: stop the manager

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};

use sltp_manager::{ControlHandle, Manager, PaperHost, TracingCanvas};

use super::load_config;

/// Arguments for the run command.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Config file path
    #[arg(short, long, default_value = "config/Config.toml")]
    pub config: String,

    /// Profile overlay (reads Config.<profile>.toml next to the config file)
    #[arg(long)]
    pub profile: Option<String>,

    /// Paper book snapshot (JSON)
    #[arg(short, long, default_value = "config/snapshot.json")]
    pub snapshot: String,

    /// Optional log file path (logs to file instead of stderr)
    #[arg(long)]
    pub log_file: Option<String>,

    /// Write the book to this path on shutdown
    #[arg(long)]
    pub write_snapshot: Option<String>,
}

/// Runs the manager until Ctrl-C or `q` on stdin.
///
/// # Errors
/// Returns an error if the config or snapshot cannot be loaded, the manager
/// task panics, or the final book cannot be written.
pub async fn run_manager(args: RunArgs) -> Result<()> {
    let config = load_config(&args.config, args.profile.as_deref())?;
    let host = Arc::new(PaperHost::load(&args.snapshot)?);

    let (handle, commands) = ControlHandle::channel(32);
    let manager = Manager::new(Arc::clone(&host), config, TracingCanvas::default());
    let manager_task = tokio::spawn(manager.run(commands));

    let console = tokio::spawn(read_console(handle.clone()));

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result.context("Failed to listen for Ctrl-C")?;
            tracing::info!("Received Ctrl-C, shutting down");
            // The manager may already be gone if the console sent quit
            let _ = handle.shutdown().await;
        }
        _ = console => {}
    }

    manager_task.await.context("Manager task failed")?;

    if let Some(path) = &args.write_snapshot {
        let book = host.snapshot().await;
        std::fs::write(path, serde_json::to_string_pretty(&book)?)
            .with_context(|| format!("Failed to write snapshot {path}"))?;
        tracing::info!(path, "Snapshot written");
    }

    Ok(())
}

/// Forward console lines to the manager until `quit` or end of input.
async fn read_console(handle: ControlHandle) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                // Stdin closed (e.g. running detached); keep running until Ctrl-C
                std::future::pending::<()>().await;
                return;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Console read failed");
                std::future::pending::<()>().await;
                return;
            }
        };

        let result = match line.trim() {
            "t" | "toggle" => handle.toggle().await,
            "on" => handle.enable().await,
            "off" => handle.disable().await,
            "s" | "status" => match handle.status().await {
                Ok(status) => serde_json::to_string_pretty(&status)
                    .map(|json| println!("{json}"))
                    .map_err(Into::into),
                Err(e) => Err(e),
            },
            "q" | "quit" => {
                let _ = handle.shutdown().await;
                return;
            }
            "" => Ok(()),
            other => {
                println!("Unknown command: {other} (t, on, off, s, q)");
                Ok(())
            }
        };

        if let Err(e) = result {
            tracing::warn!(error = %e, "Manager is not accepting commands");
            return;
        }
    }
}
