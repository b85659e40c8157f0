use std::collections::HashSet;

use crate::types::ItemId;

/// IDs of items already modified, for "process once" mode.
///
/// Entries are only removed by [`ProcessedLedger::retain_live`], so an ID may
/// outlive its item until the next cleanup.
#[derive(Debug, Clone, Default)]
pub struct ProcessedLedger {
    ids: HashSet<ItemId>,
}

impl ProcessedLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, id: ItemId) -> bool {
        self.ids.contains(&id)
    }

    /// Returns `true` if the ID was not already recorded.
    pub fn insert(&mut self, id: ItemId) -> bool {
        self.ids.insert(id)
    }

    /// Drop every ID not present in `live`. Returns how many were removed.
    pub fn retain_live(&mut self, live: &HashSet<ItemId>) -> usize {
        let before = self.ids.len();
        self.ids.retain(|id| live.contains(id));
        before - self.ids.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
