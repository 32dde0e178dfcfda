//! Thread-safe price cache holding one immutable snapshot at a time.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;

use crate::domain::{InstrumentId, PriceInfo, Snapshot};

/// Latest known quotes for every instrument.
///
/// Readers clone an `Arc` to the current [`Snapshot`] and work on it without
/// holding the lock. A refresh builds the next snapshot off to the side and
/// swaps the pointer, so a reader sees either the old or the new snapshot in
/// full, never a mix.
pub struct PriceCache {
    current: RwLock<Arc<Snapshot>>,
}

impl PriceCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(Snapshot::default())),
        }
    }

    /// Replace the whole mapping with `entries`.
    ///
    /// Nothing from the previous snapshot survives. Returns the number of
    /// instruments in the new snapshot.
    pub fn replace(&self, entries: Vec<PriceInfo>) -> usize {
        let next = Arc::new(Snapshot::new(entries, Utc::now()));
        let len = next.len();
        *self.current.write() = next;
        len
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current.read())
    }

    /// Quote for one instrument; `None` if no successful refresh has seen it.
    #[must_use]
    pub fn get(&self, id: &InstrumentId) -> Option<PriceInfo> {
        self.snapshot().get(id).cloned()
    }

    /// Owned copy of the current mapping.
    #[must_use]
    pub fn get_all(&self) -> HashMap<InstrumentId, PriceInfo> {
        self.snapshot().to_map()
    }

    /// Number of instruments in the current snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    /// Returns true if no refresh has succeeded yet (or the last one was empty).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PriceCache {
    fn default() -> Self {
        Self::new()
    }
}
