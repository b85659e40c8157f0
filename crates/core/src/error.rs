use thiserror::Error;

use crate::types::ItemId;

/// Errors reported by a [`TradingHost`](crate::traits::TradingHost).
///
/// None of these abort a scan: the caller logs them and moves on to the next item.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The host has no metadata for this symbol.
    #[error("Symbol {0} not found")]
    SymbolNotFound(String),

    /// The item disappeared between listing and modification.
    #[error("Item #{0} not found")]
    ItemNotFound(ItemId),

    /// The host refused the modification (invalid price, market closed, ...).
    #[error("Modification of #{item_id} rejected: {reason}")]
    Rejected {
        /// Item the request was for.
        item_id: ItemId,
        /// Host-reported error detail.
        reason: String,
    },

    /// The host could not be reached or returned garbage.
    #[error("Host unavailable: {0}")]
    Unavailable(String),
}
