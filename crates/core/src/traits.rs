use crate::error::HostError;
use crate::types::{ItemId, SymbolInfo, TradableItem};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// The trading host's object model as seen by the manager.
///
/// The host owns positions and orders; the manager only lists them and asks
/// for SL/TP changes. Every listing is a fresh snapshot.
#[async_trait]
pub trait TradingHost: Send + Sync {
    async fn positions(&self) -> Result<Vec<TradableItem>, HostError>;

    async fn pending_orders(&self) -> Result<Vec<TradableItem>, HostError>;

    async fn symbol(&self, name: &str) -> Result<SymbolInfo, HostError>;

    /// Set absolute SL/TP prices on an open position. `None` clears the field.
    async fn modify_position(
        &self,
        id: ItemId,
        stop_loss: Option<Decimal>,
        take_profit: Option<Decimal>,
    ) -> Result<(), HostError>;

    /// Set absolute SL/TP prices on a pending order, re-sending its target price.
    async fn modify_pending_order(
        &self,
        id: ItemId,
        target_price: Decimal,
        stop_loss: Option<Decimal>,
        take_profit: Option<Decimal>,
    ) -> Result<(), HostError>;

    async fn server_time(&self) -> DateTime<Utc>;
}
