//! Types for per-tick reporting.

use serde::{Deserialize, Serialize};

/// What happened to one item during a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemOutcome {
    /// Already in the processed ledger.
    AlreadyProcessed,
    /// Rejected by a filter.
    Filtered,
    /// Computed prices match the current ones within tolerance.
    Unchanged,
    /// Host accepted the new SL/TP.
    Modified,
    /// Symbol lookup or host modification failed; retried next tick.
    Failed,
}

/// Counts for one scan (positions or pending orders).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    pub scanned: usize,
    pub already_processed: usize,
    pub filtered: usize,
    pub unchanged: usize,
    pub modified: usize,
    pub failed: usize,
}

impl ScanReport {
    pub fn record(&mut self, outcome: ItemOutcome) {
        self.scanned += 1;
        match outcome {
            ItemOutcome::AlreadyProcessed => self.already_processed += 1,
            ItemOutcome::Filtered => self.filtered += 1,
            ItemOutcome::Unchanged => self.unchanged += 1,
            ItemOutcome::Modified => self.modified += 1,
            ItemOutcome::Failed => self.failed += 1,
        }
    }
}

/// Summary of one timer tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    /// Whether the enable flag allowed a scan this tick.
    pub enabled: bool,
    /// `None` when the position listing failed.
    pub positions: Option<ScanReport>,
    /// `None` when pending orders are excluded or the listing failed.
    pub pending_orders: Option<ScanReport>,
    /// Ledger entries removed by cleanup this tick.
    pub ledger_cleaned: usize,
}

impl TickReport {
    /// Total modifications accepted by the host this tick.
    #[must_use]
    pub fn modified(&self) -> usize {
        self.positions.map_or(0, |r| r.modified) + self.pending_orders.map_or(0, |r| r.modified)
    }

    /// Total failures this tick.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.positions.map_or(0, |r| r.failed) + self.pending_orders.map_or(0, |r| r.failed)
    }
}
