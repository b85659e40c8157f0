//! Item filters: direction, symbol, magic number and comment.
//!
//! All enabled filters must pass. The magic number is matched as a substring
//! of the item label because the host has no numeric tag field.

use crate::config::{DirectionFilter, FilterConfig};
use crate::types::{Direction, TradableItem};

/// Whether the manager may touch `item`.
///
/// `chart_symbol` is the symbol of the chart the manager is attached to,
/// consulted only when `current_symbol_only` is set.
pub fn passes(item: &TradableItem, config: &FilterConfig, chart_symbol: &str) -> bool {
    passes_direction(item.direction, config.direction)
        && (!config.current_symbol_only || item.symbol == chart_symbol)
        && (!config.only_magic_number || label_has_magic(&item.label, config.magic_number))
        && (!config.only_with_comment || item.comment == config.matching_comment)
}

const fn passes_direction(direction: Direction, filter: DirectionFilter) -> bool {
    !matches!(
        (filter, direction),
        (DirectionFilter::Buy, Direction::Sell) | (DirectionFilter::Sell, Direction::Buy)
    )
}

fn label_has_magic(label: &str, magic_number: i64) -> bool {
    !label.is_empty() && label.contains(&magic_number.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn open_filters() -> FilterConfig {
        FilterConfig {
            current_symbol_only: false,
            direction: DirectionFilter::All,
            only_magic_number: false,
            magic_number: 0,
            only_with_comment: false,
            matching_comment: String::new(),
            apply_to_pending: false,
        }
    }

    fn buy() -> TradableItem {
        TradableItem::position(1, "EURUSD", Direction::Buy, dec!(1.1000))
    }

    fn sell() -> TradableItem {
        TradableItem::position(2, "EURUSD", Direction::Sell, dec!(1.1000))
    }

    #[test]
    fn open_filters_accept_everything() {
        let config = open_filters();
        assert!(passes(&buy(), &config, "GBPUSD"));
        assert!(passes(&sell(), &config, "GBPUSD"));
    }

    #[test]
    fn direction_filter_rejects_opposite_side() {
        let buy_only = FilterConfig {
            direction: DirectionFilter::Buy,
            ..open_filters()
        };
        assert!(passes(&buy(), &buy_only, "EURUSD"));
        assert!(!passes(&sell(), &buy_only, "EURUSD"));

        let sell_only = FilterConfig {
            direction: DirectionFilter::Sell,
            ..open_filters()
        };
        assert!(!passes(&buy(), &sell_only, "EURUSD"));
        assert!(passes(&sell(), &sell_only, "EURUSD"));
    }

    #[test]
    fn symbol_filter_requires_chart_symbol() {
        let config = FilterConfig {
            current_symbol_only: true,
            ..open_filters()
        };
        assert!(passes(&buy(), &config, "EURUSD"));
        assert!(!passes(&buy(), &config, "USDJPY"));
    }

    #[test]
    fn magic_number_is_a_label_substring() {
        let config = FilterConfig {
            only_magic_number: true,
            magic_number: 4242,
            ..open_filters()
        };
        assert!(passes(&buy().with_label("4242"), &config, "EURUSD"));
        assert!(passes(&buy().with_label("grid-4242-a"), &config, "EURUSD"));
        assert!(!passes(&buy().with_label("424"), &config, "EURUSD"));
        assert!(!passes(&buy(), &config, "EURUSD"));
    }

    #[test]
    fn empty_label_never_matches_magic_zero() {
        let config = FilterConfig {
            only_magic_number: true,
            magic_number: 0,
            ..open_filters()
        };
        assert!(!passes(&buy(), &config, "EURUSD"));
        assert!(passes(&buy().with_label("bot0"), &config, "EURUSD"));
    }

    #[test]
    fn comment_filter_is_exact() {
        let config = FilterConfig {
            only_with_comment: true,
            matching_comment: "swing".to_string(),
            ..open_filters()
        };
        assert!(passes(&buy().with_comment("swing"), &config, "EURUSD"));
        assert!(!passes(&buy().with_comment("swing trade"), &config, "EURUSD"));
        assert!(!passes(&buy().with_comment("Swing"), &config, "EURUSD"));
        assert!(!passes(&buy(), &config, "EURUSD"));
    }

    #[test]
    fn disabled_comment_filter_ignores_comment() {
        let config = FilterConfig {
            only_with_comment: false,
            matching_comment: "swing".to_string(),
            ..open_filters()
        };
        assert!(passes(&buy().with_comment("anything"), &config, "EURUSD"));
    }

    #[test]
    fn filters_combine_with_and() {
        let config = FilterConfig {
            current_symbol_only: true,
            direction: DirectionFilter::Sell,
            only_magic_number: true,
            magic_number: 7,
            only_with_comment: true,
            matching_comment: "hedge".to_string(),
            apply_to_pending: false,
        };
        let matching = sell().with_label("ea-7").with_comment("hedge");
        assert!(passes(&matching, &config, "EURUSD"));

        // Break one filter at a time.
        assert!(!passes(&matching, &config, "GBPUSD"));
        assert!(!passes(
            &TradableItem { direction: Direction::Buy, ..matching.clone() },
            &config,
            "EURUSD"
        ));
        assert!(!passes(&matching.clone().with_label("ea-8"), &config, "EURUSD"));
        assert!(!passes(&matching.with_comment("hedged"), &config, "EURUSD"));
    }
}
