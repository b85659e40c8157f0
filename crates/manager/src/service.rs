//! Main service loop: one scan of positions (and pending orders) per tick.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use sltp_core::{AppConfig, ItemId, ItemKind, ProcessedLedger, TradableItem, TradingHost};

use crate::control::{ControlCommand, ManagerStatus};
use crate::panel::{ChartCanvas, StatusPanel};
use crate::processor;
use crate::types::{ItemOutcome, ScanReport, TickReport};

/// Ledger cleanup runs at most once per this many poll intervals.
pub const CLEANUP_EVERY_INTERVALS: u32 = 10;

/// Applies the configured SL/TP policy to a host's positions and orders.
pub struct Manager<H: TradingHost, C: ChartCanvas> {
    host: Arc<H>,
    config: AppConfig,
    panel: StatusPanel<C>,
    processed_positions: ProcessedLedger,
    processed_orders: ProcessedLedger,
    last_cleanup: Option<DateTime<Utc>>,
    ticks: u64,
}

impl<H: TradingHost, C: ChartCanvas> Manager<H, C> {
    /// The enable flag starts from `config.execution.enabled`.
    pub fn new(host: Arc<H>, config: AppConfig, canvas: C) -> Self {
        let panel = StatusPanel::new(config.panel.clone(), config.execution.enabled, canvas);
        Self {
            host,
            config,
            panel,
            processed_positions: ProcessedLedger::new(),
            processed_orders: ProcessedLedger::new(),
            last_cleanup: None,
            ticks: 0,
        }
    }

    /// Clear any stale panel and draw a fresh one.
    pub fn start(&mut self) {
        self.panel.attach();
    }

    pub fn stop(&mut self) {
        self.panel.detach();
    }

    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.panel.enabled()
    }

    pub const fn panel(&self) -> &StatusPanel<C> {
        &self.panel
    }

    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn status(&self) -> ManagerStatus {
        ManagerStatus {
            enabled: self.panel.enabled(),
            processed_positions: self.processed_positions.len(),
            processed_orders: self.processed_orders.len(),
            ticks: self.ticks,
            panel: self.panel.view(),
        }
    }

    /// Apply a control command. Returns `false` when the manager should stop.
    pub fn handle_command(&mut self, command: ControlCommand) -> bool {
        match command {
            ControlCommand::Toggle => {
                let enabled = self.panel.toggle();
                info!(enabled, "Manager toggled");
            }
            ControlCommand::Enable => self.panel.set_enabled(true),
            ControlCommand::Disable => self.panel.set_enabled(false),
            ControlCommand::GetStatus(reply) => {
                let _ = reply.send(self.status());
            }
            ControlCommand::Shutdown => return false,
        }
        true
    }

    /// One timer tick: refresh the panel, then scan if enabled.
    pub async fn tick(&mut self) -> TickReport {
        self.ticks += 1;
        self.panel.refresh();

        if !self.panel.enabled() {
            return TickReport::default();
        }

        let mut report = TickReport {
            enabled: true,
            ..TickReport::default()
        };

        let positions = match self.host.positions().await {
            Ok(positions) => Some(positions),
            Err(e) => {
                error!(error = %e, "Failed to list positions");
                None
            }
        };
        if let Some(positions) = &positions {
            report.positions = Some(self.scan(positions, ItemKind::Position).await);
        }

        let orders = if self.config.filters.apply_to_pending {
            match self.host.pending_orders().await {
                Ok(orders) => Some(orders),
                Err(e) => {
                    error!(error = %e, "Failed to list pending orders");
                    None
                }
            }
        } else {
            None
        };
        if let Some(orders) = &orders {
            report.pending_orders = Some(self.scan(orders, ItemKind::PendingOrder).await);
        }

        report.ledger_cleaned = self
            .cleanup_ledgers(positions.as_deref(), orders.as_deref())
            .await;
        report
    }

    async fn scan(&mut self, items: &[TradableItem], kind: ItemKind) -> ScanReport {
        let process_once = self.config.execution.process_once;
        let mut report = ScanReport::default();

        for item in items {
            if process_once && self.ledger(kind).contains(item.id) {
                report.record(ItemOutcome::AlreadyProcessed);
                continue;
            }

            let outcome = processor::process_item(self.host.as_ref(), item, &self.config).await;
            if process_once && outcome == ItemOutcome::Modified {
                self.ledger_mut(kind).insert(item.id);
            }
            report.record(outcome);
        }

        report
    }

    /// Drop ledger entries for items that no longer exist. Only runs in
    /// process-once mode, with a non-empty ledger, when more than
    /// [`CLEANUP_EVERY_INTERVALS`] poll intervals have passed since the last run.
    /// A ledger whose listing failed this tick is left alone, and the cleanup
    /// timestamp is then kept so that ledger is retried on the next tick.
    async fn cleanup_ledgers(
        &mut self,
        positions: Option<&[TradableItem]>,
        orders: Option<&[TradableItem]>,
    ) -> usize {
        if !self.config.execution.process_once
            || (self.processed_positions.is_empty() && self.processed_orders.is_empty())
        {
            return 0;
        }

        let now = self.host.server_time().await;
        if !self.cleanup_due(now) {
            return 0;
        }

        let mut removed = 0;
        let mut skipped = false;
        match positions {
            Some(positions) => {
                removed += self.processed_positions.retain_live(&live_ids(positions));
            }
            None => skipped |= !self.processed_positions.is_empty(),
        }
        match orders {
            Some(orders) => removed += self.processed_orders.retain_live(&live_ids(orders)),
            None => skipped |= !self.processed_orders.is_empty(),
        }
        if !skipped {
            self.last_cleanup = Some(now);
        }

        if removed > 0 {
            debug!(removed, "Cleaned processed ledger");
        }
        removed
    }

    fn cleanup_due(&self, now: DateTime<Utc>) -> bool {
        let Some(last) = self.last_cleanup else {
            return true;
        };
        let window = self
            .config
            .execution
            .check_interval()
            .saturating_mul(CLEANUP_EVERY_INTERVALS);
        // A clock that went backwards counts as no time elapsed.
        (now - last).to_std().unwrap_or_default() > window
    }

    const fn ledger(&self, kind: ItemKind) -> &ProcessedLedger {
        match kind {
            ItemKind::Position => &self.processed_positions,
            ItemKind::PendingOrder => &self.processed_orders,
        }
    }

    fn ledger_mut(&mut self, kind: ItemKind) -> &mut ProcessedLedger {
        match kind {
            ItemKind::Position => &mut self.processed_positions,
            ItemKind::PendingOrder => &mut self.processed_orders,
        }
    }
}

impl<H, C> Manager<H, C>
where
    H: TradingHost + 'static,
    C: ChartCanvas + 'static,
{
    /// Run the manager until a shutdown command arrives.
    ///
    /// Ticks every `config.execution.check_interval_secs` seconds; the first
    /// tick fires one interval after start. Control commands are handled
    /// between ticks. If every control handle is dropped the manager keeps
    /// ticking.
    pub async fn run(mut self, mut commands: mpsc::Receiver<ControlCommand>) {
        let period = self.config.execution.check_interval();
        info!(
            chart_symbol = self.config.execution.chart_symbol,
            poll_secs = period.as_secs(),
            enabled = self.enabled(),
            process_once = self.config.execution.process_once,
            stop_loss_mode = ?self.config.policy.stop_loss.mode,
            stop_loss = %self.config.policy.stop_loss.value,
            take_profit_mode = ?self.config.policy.take_profit.mode,
            take_profit = %self.config.policy.take_profit.value,
            "Fixed SL/TP manager started"
        );

        self.start();

        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut commands_open = true;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let report = self.tick().await;
                    if report.modified() > 0 || report.failed() > 0 {
                        info!(
                            modified = report.modified(),
                            failed = report.failed(),
                            "Tick complete"
                        );
                    }
                }
                command = commands.recv(), if commands_open => match command {
                    Some(command) => {
                        if !self.handle_command(command) {
                            break;
                        }
                    }
                    None => commands_open = false,
                },
            }
        }

        self.stop();
        info!(ticks = self.ticks, "Fixed SL/TP manager stopped");
    }
}

fn live_ids(items: &[TradableItem]) -> HashSet<ItemId> {
    items.iter().map(|item| item.id).collect()
}
