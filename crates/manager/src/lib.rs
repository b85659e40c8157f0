//! Fixed SL/TP manager service.
//!
//! Runs as a long-lived service that:
//! - Polls the trading host on a fixed interval
//! - Filters positions and (optionally) pending orders
//! - Computes stop-loss / take-profit prices from the configured policy
//! - Sends a modification only when prices actually change
//! - Remembers processed items in "process once" mode
//! - Keeps an on-chart panel in sync with the enable flag

pub mod control;
pub mod panel;
pub mod paper;
pub mod processor;
pub mod service;
pub mod types;

pub use control::{ControlCommand, ControlHandle, ManagerStatus};
pub use panel::{ChartCanvas, MemoryCanvas, PanelView, StatusPanel, TracingCanvas};
pub use paper::{PaperHost, PaperSnapshot};
pub use service::Manager;
pub use types::{ItemOutcome, ScanReport, TickReport};
