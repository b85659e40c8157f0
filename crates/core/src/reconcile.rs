//! Decide whether freshly computed SL/TP prices warrant a host call.
//!
//! Two gates: existing values win unless overwriting is allowed, and a field
//! only counts as changed when it moves by more than the tolerance.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::PricePolicy;
use crate::pricing::PriceTargets;
use crate::types::{ItemKind, SymbolInfo, TradableItem};

/// Absolute change threshold for pending orders (0.1), which the host
/// prices in raw terms rather than pips.
pub const PENDING_ORDER_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

/// Change threshold for an item of `kind`: half a pip for positions.
pub fn tolerance(kind: ItemKind, symbol: &SymbolInfo) -> Decimal {
    match kind {
        ItemKind::Position => symbol.pip_size / Decimal::TWO,
        ItemKind::PendingOrder => PENDING_ORDER_TOLERANCE,
    }
}

/// Final SL/TP to send and which of them actually moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub stop_loss: Option<Decimal>,
    pub take_profit: Option<Decimal>,
    pub stop_loss_changed: bool,
    pub take_profit_changed: bool,
}

impl Reconciliation {
    #[must_use]
    pub const fn needs_update(&self) -> bool {
        self.stop_loss_changed || self.take_profit_changed
    }
}

/// Reconcile computed `targets` against the prices `item` currently carries.
pub fn reconcile(
    item: &TradableItem,
    targets: &PriceTargets,
    policy: &PricePolicy,
    tolerance: Decimal,
) -> Reconciliation {
    let stop_loss = gate(
        targets.stop_loss,
        item.stop_loss,
        policy.stop_loss.overwrite_existing,
    );
    let take_profit = gate(
        targets.take_profit,
        item.take_profit,
        policy.take_profit.overwrite_existing,
    );

    Reconciliation {
        stop_loss,
        take_profit,
        stop_loss_changed: changed(stop_loss, item.stop_loss, tolerance),
        take_profit_changed: changed(take_profit, item.take_profit, tolerance),
    }
}

fn gate(computed: Option<Decimal>, current: Option<Decimal>, overwrite: bool) -> Option<Decimal> {
    match current {
        Some(existing) if !overwrite => Some(existing),
        _ => computed,
    }
}

fn changed(new: Option<Decimal>, current: Option<Decimal>, tolerance: Decimal) -> bool {
    match (new, current) {
        (None, _) => false,
        (Some(_), None) => true,
        (Some(new), Some(current)) => (new - current).abs() > tolerance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{StopLossConfig, TakeProfitConfig};
    use crate::types::Direction;
    use rust_decimal_macros::dec;

    fn targets(sl: Option<Decimal>, tp: Option<Decimal>) -> PriceTargets {
        PriceTargets {
            reference: dec!(1.2000),
            stop_loss: sl,
            take_profit: tp,
        }
    }

    fn policy(overwrite_sl: bool, overwrite_tp: bool) -> PricePolicy {
        PricePolicy {
            stop_loss: StopLossConfig {
                overwrite_existing: overwrite_sl,
                ..StopLossConfig::default()
            },
            take_profit: TakeProfitConfig {
                overwrite_existing: overwrite_tp,
                ..TakeProfitConfig::default()
            },
            ..PricePolicy::default()
        }
    }

    fn eurusd() -> SymbolInfo {
        SymbolInfo::new("EURUSD", dec!(0.0001), dec!(1.2000), dec!(1.2001))
    }

    #[test]
    fn tolerance_is_half_pip_for_positions_and_fixed_for_orders() {
        assert_eq!(tolerance(ItemKind::Position, &eurusd()), dec!(0.00005));
        assert_eq!(tolerance(ItemKind::PendingOrder, &eurusd()), dec!(0.1));
    }

    #[test]
    fn new_values_on_bare_item_need_update() {
        let item = TradableItem::position(1, "EURUSD", Direction::Buy, dec!(1.2000));
        let r = reconcile(
            &item,
            &targets(Some(dec!(1.1800)), Some(dec!(1.2400))),
            &policy(false, false),
            dec!(0.00005),
        );
        assert_eq!(r.stop_loss, Some(dec!(1.1800)));
        assert_eq!(r.take_profit, Some(dec!(1.2400)));
        assert!(r.stop_loss_changed && r.take_profit_changed);
        assert!(r.needs_update());
    }

    #[test]
    fn existing_stop_wins_without_overwrite() {
        let order = TradableItem::pending_order(5, "EURUSD", Direction::Buy, dec!(1.2000))
            .with_stop_loss(dec!(1.1900));
        let r = reconcile(
            &order,
            &targets(Some(dec!(1.1800)), None),
            &policy(false, false),
            PENDING_ORDER_TOLERANCE,
        );
        assert_eq!(r.stop_loss, Some(dec!(1.1900)));
        assert!(!r.stop_loss_changed);
        assert!(!r.needs_update());
    }

    #[test]
    fn existing_take_profit_wins_without_overwrite_even_if_stop_moves() {
        let item = TradableItem::position(1, "EURUSD", Direction::Buy, dec!(1.2000))
            .with_take_profit(dec!(1.2500));
        let r = reconcile(
            &item,
            &targets(Some(dec!(1.1800)), Some(dec!(1.2400))),
            &policy(true, false),
            dec!(0.00005),
        );
        assert_eq!(r.take_profit, Some(dec!(1.2500)));
        assert!(r.stop_loss_changed);
        assert!(!r.take_profit_changed);
    }

    #[test]
    fn overwrite_replaces_existing_stop() {
        let item = TradableItem::position(1, "EURUSD", Direction::Buy, dec!(1.2000))
            .with_stop_loss(dec!(1.1900));
        let r = reconcile(
            &item,
            &targets(Some(dec!(1.1800)), None),
            &policy(true, false),
            dec!(0.00005),
        );
        assert_eq!(r.stop_loss, Some(dec!(1.1800)));
        assert!(r.needs_update());
    }

    #[test]
    fn moves_within_tolerance_are_ignored() {
        let item = TradableItem::position(1, "EURUSD", Direction::Buy, dec!(1.2000))
            .with_stop_loss(dec!(1.18000));
        let within = reconcile(
            &item,
            &targets(Some(dec!(1.18004)), None),
            &policy(true, true),
            dec!(0.00005),
        );
        assert!(!within.needs_update());

        let at_edge = reconcile(
            &item,
            &targets(Some(dec!(1.18005)), None),
            &policy(true, true),
            dec!(0.00005),
        );
        assert!(!at_edge.needs_update());

        let beyond = reconcile(
            &item,
            &targets(Some(dec!(1.18006)), None),
            &policy(true, true),
            dec!(0.00005),
        );
        assert!(beyond.needs_update());
    }

    #[test]
    fn missing_computed_value_is_never_a_change() {
        let item = TradableItem::position(1, "EURUSD", Direction::Buy, dec!(1.2000))
            .with_take_profit(dec!(1.2500));
        let r = reconcile(&item, &targets(None, None), &policy(true, true), dec!(0.00005));
        assert!(!r.needs_update());
        assert_eq!(r.take_profit, None);
    }

    #[test]
    fn second_pass_after_applying_is_a_no_op() {
        let item = TradableItem::position(1, "EURUSD", Direction::Sell, dec!(1.3000));
        let computed = targets(Some(dec!(1.3100)), Some(dec!(1.2950)));
        let first = reconcile(&item, &computed, &policy(true, true), dec!(0.00005));
        assert!(first.needs_update());

        let applied = TradableItem {
            stop_loss: first.stop_loss,
            take_profit: first.take_profit,
            ..item
        };
        let second = reconcile(&applied, &computed, &policy(true, true), dec!(0.00005));
        assert!(!second.needs_update());
    }
}
