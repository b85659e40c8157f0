//! Domain types shared by the filter, pricing and reconcile stages.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Host-assigned identifier of a position or pending order.
pub type ItemId = i64;

/// Trade direction of a position or pending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Buy,
    Sell,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// Whether an item is a live position or a pending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    #[default]
    Position,
    PendingOrder,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Position => write!(f, "position"),
            Self::PendingOrder => write!(f, "pending_order"),
        }
    }
}

/// Snapshot of a position or pending order as reported by the host.
///
/// `price` is the entry price for positions and the target price for
/// pending orders. Snapshots are fetched fresh every tick and never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradableItem {
    pub id: ItemId,
    #[serde(default)]
    pub kind: ItemKind,
    pub symbol: String,
    pub direction: Direction,
    pub price: Decimal,
    #[serde(default)]
    pub stop_loss: Option<Decimal>,
    #[serde(default)]
    pub take_profit: Option<Decimal>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub comment: String,
}

impl TradableItem {
    /// Create an open position snapshot without SL/TP, label or comment.
    #[must_use]
    pub fn position(id: ItemId, symbol: &str, direction: Direction, entry_price: Decimal) -> Self {
        Self {
            id,
            kind: ItemKind::Position,
            symbol: symbol.to_string(),
            direction,
            price: entry_price,
            stop_loss: None,
            take_profit: None,
            label: String::new(),
            comment: String::new(),
        }
    }

    /// Create a pending order snapshot without SL/TP, label or comment.
    #[must_use]
    pub fn pending_order(
        id: ItemId,
        symbol: &str,
        direction: Direction,
        target_price: Decimal,
    ) -> Self {
        Self {
            kind: ItemKind::PendingOrder,
            ..Self::position(id, symbol, direction, target_price)
        }
    }

    #[must_use]
    pub fn with_stop_loss(mut self, stop_loss: Decimal) -> Self {
        self.stop_loss = Some(stop_loss);
        self
    }

    #[must_use]
    pub fn with_take_profit(mut self, take_profit: Decimal) -> Self {
        self.take_profit = Some(take_profit);
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    #[must_use]
    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = comment.to_string();
        self
    }

    /// Human-readable reference used in log lines (e.g., "position #42 EURUSD").
    pub fn display_name(&self) -> String {
        format!("{} #{} {}", self.kind, self.id, self.symbol)
    }
}

/// Symbol metadata resolved from the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub name: String,
    /// Price increment that one "point" of configured distance maps to.
    pub pip_size: Decimal,
    pub bid: Decimal,
    pub ask: Decimal,
}

impl SymbolInfo {
    #[must_use]
    pub fn new(name: &str, pip_size: Decimal, bid: Decimal, ask: Decimal) -> Self {
        Self {
            name: name.to_string(),
            pip_size,
            bid,
            ask,
        }
    }

    /// Current market price used as reference for the given direction.
    ///
    /// Buys use the bid (the price they would close at), sells the ask.
    #[must_use]
    pub const fn market_price(&self, direction: Direction) -> Decimal {
        match direction {
            Direction::Buy => self.bid,
            Direction::Sell => self.ask,
        }
    }
}

/// A modification request sent to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modification {
    pub item_id: ItemId,
    pub kind: ItemKind,
    /// Target price re-sent with pending order modifications; `None` for positions.
    pub target_price: Option<Decimal>,
    pub stop_loss: Option<Decimal>,
    pub take_profit: Option<Decimal>,
}
