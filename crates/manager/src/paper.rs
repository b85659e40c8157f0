//! In-memory trading host.
//!
//! Holds positions, pending orders and quotes loaded from a JSON snapshot and
//! applies SL/TP changes locally. Makes zero calls to a real broker. Used by
//! the CLI for dry runs and by tests as the host double.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use sltp_core::{
    Direction, HostError, ItemId, ItemKind, Modification, SymbolInfo, TradableItem, TradingHost,
};

/// Serialized state of a [`PaperHost`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperSnapshot {
    #[serde(default)]
    pub symbols: Vec<SymbolInfo>,
    #[serde(default)]
    pub positions: Vec<TradableItem>,
    #[serde(default)]
    pub pending_orders: Vec<TradableItem>,
}

#[derive(Debug, Default)]
struct Book {
    symbols: HashMap<String, SymbolInfo>,
    positions: BTreeMap<ItemId, TradableItem>,
    orders: BTreeMap<ItemId, TradableItem>,
    rejections: HashMap<ItemId, String>,
    modifications: Vec<Modification>,
    clock: Option<DateTime<Utc>>,
    unavailable: HashSet<ItemKind>,
}

impl Book {
    fn list(&self, kind: ItemKind) -> Result<Vec<TradableItem>, HostError> {
        if self.unavailable.contains(&kind) {
            return Err(HostError::Unavailable(format!("{kind} listing is offline")));
        }
        Ok(self.items(kind).values().cloned().collect())
    }

    fn items(&self, kind: ItemKind) -> &BTreeMap<ItemId, TradableItem> {
        match kind {
            ItemKind::Position => &self.positions,
            ItemKind::PendingOrder => &self.orders,
        }
    }

    fn items_mut(&mut self, kind: ItemKind) -> &mut BTreeMap<ItemId, TradableItem> {
        match kind {
            ItemKind::Position => &mut self.positions,
            ItemKind::PendingOrder => &mut self.orders,
        }
    }

    fn apply(
        &mut self,
        kind: ItemKind,
        id: ItemId,
        target_price: Option<Decimal>,
        stop_loss: Option<Decimal>,
        take_profit: Option<Decimal>,
    ) -> Result<(), HostError> {
        let item = self
            .items(kind)
            .get(&id)
            .ok_or(HostError::ItemNotFound(id))?;

        if let Some(reason) = self.rejections.get(&id) {
            return Err(HostError::Rejected {
                item_id: id,
                reason: reason.clone(),
            });
        }

        let symbol = self
            .symbols
            .get(&item.symbol)
            .ok_or_else(|| HostError::SymbolNotFound(item.symbol.clone()))?;

        // Positions are protected relative to the live quote, orders relative
        // to the price they will fill at.
        let anchor = match kind {
            ItemKind::Position => symbol.market_price(item.direction),
            ItemKind::PendingOrder => target_price.unwrap_or(item.price),
        };
        validate_protection(id, item.direction, anchor, stop_loss, take_profit)?;

        let item = self
            .items_mut(kind)
            .get_mut(&id)
            .ok_or(HostError::ItemNotFound(id))?;
        if let Some(target) = target_price {
            item.price = target;
        }
        item.stop_loss = stop_loss;
        item.take_profit = take_profit;

        self.modifications.push(Modification {
            item_id: id,
            kind,
            target_price,
            stop_loss,
            take_profit,
        });
        Ok(())
    }
}

fn validate_protection(
    id: ItemId,
    direction: Direction,
    anchor: Decimal,
    stop_loss: Option<Decimal>,
    take_profit: Option<Decimal>,
) -> Result<(), HostError> {
    let (sl_ok, tp_ok) = match direction {
        Direction::Buy => (
            stop_loss.map_or(true, |sl| sl < anchor),
            take_profit.map_or(true, |tp| tp > anchor),
        ),
        Direction::Sell => (
            stop_loss.map_or(true, |sl| sl > anchor),
            take_profit.map_or(true, |tp| tp < anchor),
        ),
    };

    if !sl_ok {
        return Err(HostError::Rejected {
            item_id: id,
            reason: format!("invalid stop-loss {stop_loss:?} for {direction} at {anchor}"),
        });
    }
    if !tp_ok {
        return Err(HostError::Rejected {
            item_id: id,
            reason: format!("invalid take-profit {take_profit:?} for {direction} at {anchor}"),
        });
    }
    Ok(())
}

/// Paper trading host backed by an in-memory book.
#[derive(Debug, Default)]
pub struct PaperHost {
    book: Mutex<Book>,
}

impl PaperHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a host from a snapshot. Items are re-tagged with the kind of the
    /// list they appear in.
    #[must_use]
    pub fn from_snapshot(snapshot: PaperSnapshot) -> Self {
        let mut book = Book::default();
        for symbol in snapshot.symbols {
            book.symbols.insert(symbol.name.clone(), symbol);
        }
        for mut item in snapshot.positions {
            item.kind = ItemKind::Position;
            book.positions.insert(item.id, item);
        }
        for mut item in snapshot.pending_orders {
            item.kind = ItemKind::PendingOrder;
            book.orders.insert(item.id, item);
        }
        Self {
            book: Mutex::new(book),
        }
    }

    /// Load a host from a JSON snapshot file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid snapshot.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        let snapshot: PaperSnapshot = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid snapshot {}", path.display()))?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Current book contents.
    pub async fn snapshot(&self) -> PaperSnapshot {
        let book = self.book.lock().await;
        let mut symbols: Vec<SymbolInfo> = book.symbols.values().cloned().collect();
        symbols.sort_by(|a, b| a.name.cmp(&b.name));
        PaperSnapshot {
            symbols,
            positions: book.positions.values().cloned().collect(),
            pending_orders: book.orders.values().cloned().collect(),
        }
    }

    pub async fn add_symbol(&self, symbol: SymbolInfo) {
        self.book
            .lock()
            .await
            .symbols
            .insert(symbol.name.clone(), symbol);
    }

    /// Insert or replace an item, keyed by its kind and ID.
    pub async fn add_item(&self, item: TradableItem) {
        self.book
            .lock()
            .await
            .items_mut(item.kind)
            .insert(item.id, item);
    }

    /// Close a position or cancel an order. Returns the removed item.
    pub async fn remove_item(&self, kind: ItemKind, id: ItemId) -> Option<TradableItem> {
        self.book.lock().await.items_mut(kind).remove(&id)
    }

    /// Look an item up by ID, positions first.
    pub async fn item(&self, id: ItemId) -> Option<TradableItem> {
        let book = self.book.lock().await;
        book.positions
            .get(&id)
            .or_else(|| book.orders.get(&id))
            .cloned()
    }

    /// Update the quote of a known symbol. Returns `false` if the symbol is unknown.
    pub async fn set_quote(&self, symbol: &str, bid: Decimal, ask: Decimal) -> bool {
        let mut book = self.book.lock().await;
        match book.symbols.get_mut(symbol) {
            Some(info) => {
                info.bid = bid;
                info.ask = ask;
                true
            }
            None => false,
        }
    }

    /// Make listings of `kind` fail with [`HostError::Unavailable`] until re-enabled.
    pub async fn set_listing_available(&self, kind: ItemKind, available: bool) {
        let mut book = self.book.lock().await;
        if available {
            book.unavailable.remove(&kind);
        } else {
            book.unavailable.insert(kind);
        }
    }

    /// Make every modification of `id` fail with `reason` until cleared.
    pub async fn reject(&self, id: ItemId, reason: &str) {
        self.book
            .lock()
            .await
            .rejections
            .insert(id, reason.to_string());
    }

    pub async fn clear_rejection(&self, id: ItemId) {
        self.book.lock().await.rejections.remove(&id);
    }

    /// Every accepted modification, in order.
    pub async fn modifications(&self) -> Vec<Modification> {
        self.book.lock().await.modifications.clone()
    }

    /// Pin the server clock.
    pub async fn set_time(&self, time: DateTime<Utc>) {
        self.book.lock().await.clock = Some(time);
    }

    /// Move a pinned clock forward (pins it at now first if unpinned).
    pub async fn advance(&self, by: Duration) {
        let mut book = self.book.lock().await;
        let now = book.clock.unwrap_or_else(Utc::now);
        book.clock = Some(now + by);
    }
}

#[async_trait]
impl TradingHost for PaperHost {
    async fn positions(&self) -> Result<Vec<TradableItem>, HostError> {
        self.book.lock().await.list(ItemKind::Position)
    }

    async fn pending_orders(&self) -> Result<Vec<TradableItem>, HostError> {
        self.book.lock().await.list(ItemKind::PendingOrder)
    }

    async fn symbol(&self, name: &str) -> Result<SymbolInfo, HostError> {
        self.book
            .lock()
            .await
            .symbols
            .get(name)
            .cloned()
            .ok_or_else(|| HostError::SymbolNotFound(name.to_string()))
    }

    async fn modify_position(
        &self,
        id: ItemId,
        stop_loss: Option<Decimal>,
        take_profit: Option<Decimal>,
    ) -> Result<(), HostError> {
        debug!(id, ?stop_loss, ?take_profit, "Paper position modification");
        self.book
            .lock()
            .await
            .apply(ItemKind::Position, id, None, stop_loss, take_profit)
    }

    async fn modify_pending_order(
        &self,
        id: ItemId,
        target_price: Decimal,
        stop_loss: Option<Decimal>,
        take_profit: Option<Decimal>,
    ) -> Result<(), HostError> {
        debug!(id, %target_price, ?stop_loss, ?take_profit, "Paper order modification");
        self.book.lock().await.apply(
            ItemKind::PendingOrder,
            id,
            Some(target_price),
            stop_loss,
            take_profit,
        )
    }

    async fn server_time(&self) -> DateTime<Utc> {
        self.book.lock().await.clock.unwrap_or_else(Utc::now)
    }
}
