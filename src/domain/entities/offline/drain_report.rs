use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Summary of one drain+refresh cycle.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DrainReport {
    /// Operations replayed and removed from the queue.
    pub replayed_count: u32,
    /// Operations the remote rejected; removed and counted, not retried.
    pub conflict_count: u32,
    /// Operations still queued when the cycle ended (non-zero after a
    /// mid-drain connectivity loss).
    pub pending_count: u32,
    /// Placeholder ids replaced by server-assigned ids during this cycle.
    pub remapped_ids: HashMap<String, i64>,
}

impl DrainReport {
    pub fn is_clean(&self) -> bool {
        self.conflict_count == 0 && self.pending_count == 0
    }
}
