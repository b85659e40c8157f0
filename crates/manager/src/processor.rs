//! Per-item processing: filter → price policy → reconcile → host call.
//!
//! Nothing in here returns an error. Host failures are logged and reported as
//! [`ItemOutcome::Failed`] so one bad item never aborts a scan.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use sltp_core::{
    filter, pricing, reconcile, AppConfig, ItemKind, PriceTargets, Reconciliation, SymbolInfo,
    TradableItem, TradingHost,
};

use crate::types::ItemOutcome;

/// Computed prices for an item and the reconcile decision on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModificationPlan {
    pub targets: PriceTargets,
    pub reconciliation: Reconciliation,
}

/// Price and reconcile `item` against `symbol` without touching the host.
pub fn plan(item: &TradableItem, symbol: &SymbolInfo, config: &AppConfig) -> ModificationPlan {
    let targets = pricing::compute(item, symbol, &config.policy);
    let tolerance = reconcile::tolerance(item.kind, symbol);
    let reconciliation = reconcile::reconcile(item, &targets, &config.policy, tolerance);
    ModificationPlan {
        targets,
        reconciliation,
    }
}

/// Run one item through the filters and, if needed, ask the host to apply
/// new SL/TP prices.
pub async fn process_item<H>(host: &H, item: &TradableItem, config: &AppConfig) -> ItemOutcome
where
    H: TradingHost + ?Sized,
{
    if !filter::passes(item, &config.filters, &config.execution.chart_symbol) {
        debug!(item = %item.display_name(), "Filtered out");
        return ItemOutcome::Filtered;
    }

    let symbol = match host.symbol(&item.symbol).await {
        Ok(symbol) => symbol,
        Err(e) => {
            warn!(item = %item.display_name(), error = %e, "Cannot resolve symbol");
            return ItemOutcome::Failed;
        }
    };

    let ModificationPlan {
        targets,
        reconciliation,
    } = plan(item, &symbol, config);

    if !reconciliation.needs_update() {
        return ItemOutcome::Unchanged;
    }

    let result = match item.kind {
        ItemKind::Position => {
            host.modify_position(item.id, reconciliation.stop_loss, reconciliation.take_profit)
                .await
        }
        ItemKind::PendingOrder => {
            host.modify_pending_order(
                item.id,
                item.price,
                reconciliation.stop_loss,
                reconciliation.take_profit,
            )
            .await
        }
    };

    match result {
        Ok(()) => {
            info!(
                item = %item.display_name(),
                label = item.label,
                reference = %targets.reference,
                stop_loss = ?reconciliation.stop_loss,
                take_profit = ?reconciliation.take_profit,
                "SL/TP modified"
            );
            ItemOutcome::Modified
        }
        Err(e) => {
            warn!(
                item = %item.display_name(),
                label = item.label,
                error = %e,
                "Failed to modify SL/TP"
            );
            ItemOutcome::Failed
        }
    }
}
