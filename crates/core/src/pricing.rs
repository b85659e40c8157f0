//! Stop-loss / take-profit price policy.
//!
//! Turns a [`PricePolicy`] into absolute SL/TP prices for one item. Buy and
//! sell are mirror images around the reference price: protective offsets go
//! below the reference for buys and above it for sells, profit offsets the
//! other way.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{PricePolicy, PriceReference, StopLossMode, TakeProfitMode};
use crate::types::{Direction, SymbolInfo, TradableItem};

/// Prices derived for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTargets {
    /// Price the pip offsets were measured from.
    pub reference: Decimal,
    pub stop_loss: Option<Decimal>,
    pub take_profit: Option<Decimal>,
}

/// Compute target SL/TP prices for `item`.
///
/// Inapplicable settings (zero distance, percentage TP without a usable
/// stop-loss) produce `None` rather than an error.
pub fn compute(item: &TradableItem, symbol: &SymbolInfo, policy: &PricePolicy) -> PriceTargets {
    let reference = reference_price(item, symbol, policy.price_reference);
    let stop_loss = stop_loss_price(item, symbol, policy, reference);
    let take_profit = take_profit_price(item, symbol, policy, reference, stop_loss);

    PriceTargets {
        reference,
        stop_loss,
        take_profit,
    }
}

/// Price offsets are measured from: the item's own price or the live quote.
pub const fn reference_price(
    item: &TradableItem,
    symbol: &SymbolInfo,
    reference: PriceReference,
) -> Decimal {
    match reference {
        PriceReference::Open => item.price,
        PriceReference::Current => symbol.market_price(item.direction),
    }
}

/// +1 for buys, -1 for sells: the sign of a profitable move.
fn profit_sign(direction: Direction) -> Decimal {
    match direction {
        Direction::Buy => Decimal::ONE,
        Direction::Sell => Decimal::NEGATIVE_ONE,
    }
}

fn stop_loss_price(
    item: &TradableItem,
    symbol: &SymbolInfo,
    policy: &PricePolicy,
    reference: Decimal,
) -> Option<Decimal> {
    let config = &policy.stop_loss;
    match config.mode {
        StopLossMode::Unchanged => item.stop_loss,
        StopLossMode::Level => Some(config.value),
        StopLossMode::Points if config.value > Decimal::ZERO => {
            Some(reference - profit_sign(item.direction) * config.value * symbol.pip_size)
        }
        StopLossMode::Points => None,
    }
}

fn take_profit_price(
    item: &TradableItem,
    symbol: &SymbolInfo,
    policy: &PricePolicy,
    reference: Decimal,
    stop_loss: Option<Decimal>,
) -> Option<Decimal> {
    let config = &policy.take_profit;
    let sign = profit_sign(item.direction);
    match config.mode {
        TakeProfitMode::Unchanged => item.take_profit,
        TakeProfitMode::Level => Some(config.value),
        TakeProfitMode::Points if config.value > Decimal::ZERO => {
            Some(reference + sign * config.value * symbol.pip_size)
        }
        TakeProfitMode::Points => None,
        TakeProfitMode::Percentage => {
            // Distance is measured from the item's own price, even when the
            // offset is applied to the live quote.
            let sl_distance = sign * (item.price - stop_loss?);
            if sl_distance > Decimal::ZERO {
                Some(reference + sign * sl_distance * config.value / Decimal::ONE_HUNDRED)
            } else {
                None
            }
        }
    }
}
