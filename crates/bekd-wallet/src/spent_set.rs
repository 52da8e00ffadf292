//! In-memory `SpentSet` implementation: single-use enforcement backed by
//! a mutex-guarded hash set. A durable or replicated store is out of
//! scope for this crate.

use std::collections::HashSet;
use std::sync::Mutex;

use bekd_types::SpentSet;

#[derive(Default)]
pub struct InMemorySpentSet {
    spent: Mutex<HashSet<[u8; 32]>>,
}

impl InMemorySpentSet {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SpentSet for InMemorySpentSet {
    fn try_mark(&self, rho: &[u8; 32]) -> bool {
        let mut spent = self.spent.lock().expect("spent-set mutex poisoned");
        spent.insert(*rho)
    }

    fn contains(&self, rho: &[u8; 32]) -> bool {
        self.spent.lock().expect("spent-set mutex poisoned").contains(rho)
    }
}
