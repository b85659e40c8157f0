//! Preview CLI command.
//!
//! Prices every item in a paper book with the current policy and prints the
//! result without sending any modification.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use sltp_core::{filter, ItemId, ItemKind, TradableItem, TradingHost};
use sltp_manager::processor::{self, ModificationPlan};
use sltp_manager::PaperHost;

use super::load_config;

/// Arguments for the preview command.
#[derive(Args, Debug, Clone)]
pub struct PreviewArgs {
    /// Config file path
    #[arg(short, long, default_value = "config/Config.toml")]
    pub config: String,

    /// Profile overlay (reads Config.<profile>.toml next to the config file)
    #[arg(long)]
    pub profile: Option<String>,

    /// Paper book snapshot (JSON)
    #[arg(short, long, default_value = "config/snapshot.json")]
    pub snapshot: String,
}

#[derive(Debug, Serialize)]
struct PreviewRow {
    id: ItemId,
    kind: ItemKind,
    symbol: String,
    passes_filters: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    plan: Option<ModificationPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Runs the preview command.
///
/// Pending orders are listed only when the config applies to them.
///
/// # Errors
/// Returns an error if the config or snapshot cannot be loaded or the book
/// cannot be listed.
pub async fn run_preview(args: PreviewArgs) -> Result<()> {
    let config = load_config(&args.config, args.profile.as_deref())?;
    let host = PaperHost::load(&args.snapshot)?;

    let mut items: Vec<TradableItem> = host.positions().await?;
    if config.filters.apply_to_pending {
        items.extend(host.pending_orders().await?);
    }

    let mut rows = Vec::with_capacity(items.len());
    for item in &items {
        let passes_filters =
            filter::passes(item, &config.filters, &config.execution.chart_symbol);
        let (plan, error) = match host.symbol(&item.symbol).await {
            Ok(symbol) => (Some(processor::plan(item, &symbol, &config)), None),
            Err(e) => (None, Some(e.to_string())),
        };
        rows.push(PreviewRow {
            id: item.id,
            kind: item.kind,
            symbol: item.symbol.clone(),
            passes_filters,
            plan,
            error,
        });
    }

    let would_modify = rows
        .iter()
        .filter(|row| {
            row.passes_filters && row.plan.is_some_and(|plan| plan.reconciliation.needs_update())
        })
        .count();
    tracing::info!(items = rows.len(), would_modify, "Preview complete");
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}
