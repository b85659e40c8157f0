//! Core types and rules for the fixed SL/TP manager.
//!
//! Everything here is pure: filters, the SL/TP price policy, the
//! modification reconciler and the processed-ID ledger. The trading host is
//! reached only through the [`TradingHost`] trait.

pub mod config;
pub mod config_loader;
pub mod error;
pub mod filter;
pub mod ledger;
pub mod pricing;
pub mod reconcile;
pub mod traits;
pub mod types;

pub use config::{
    AppConfig, DirectionFilter, ExecutionConfig, FilterConfig, HorizontalCorner, PanelConfig,
    PricePolicy, PriceReference, StopLossConfig, StopLossMode, TakeProfitConfig, TakeProfitMode,
    VerticalCorner,
};
pub use config_loader::ConfigLoader;
pub use error::HostError;
pub use ledger::ProcessedLedger;
pub use pricing::PriceTargets;
pub use reconcile::Reconciliation;
pub use traits::TradingHost;
pub use types::{Direction, ItemId, ItemKind, Modification, SymbolInfo, TradableItem};
