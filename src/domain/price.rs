//! Market quotes and the snapshot that holds them.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::InstrumentId;

/// USD quote for one instrument as seen in a single fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceInfo {
    /// Stable provider identifier.
    pub id: InstrumentId,
    /// 1-based position in the fetch that produced this entry.
    ///
    /// Reassigned on every refresh; never use it as a key.
    pub seq: u32,
    pub name: String,
    pub symbol: String,
    pub price_usd: f64,
    pub market_cap: f64,
    pub percent_change_24h: f64,
    /// Provider timestamp, passed through verbatim.
    pub last_updated: String,
}

/// Complete set of quotes produced by one successful fetch.
///
/// A snapshot is immutable once built; refreshing replaces it wholesale.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    prices: HashMap<InstrumentId, PriceInfo>,
    refreshed_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// Build a snapshot from decoded entries.
    ///
    /// Duplicate identifiers keep the last entry.
    #[must_use]
    pub fn new(entries: Vec<PriceInfo>, refreshed_at: DateTime<Utc>) -> Self {
        let prices = entries
            .into_iter()
            .map(|info| (info.id.clone(), info))
            .collect();
        Self {
            prices,
            refreshed_at: Some(refreshed_at),
        }
    }

    #[must_use]
    pub fn get(&self, id: &InstrumentId) -> Option<&PriceInfo> {
        self.prices.get(id)
    }

    /// When the snapshot was built; `None` for the initial empty snapshot.
    #[must_use]
    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&InstrumentId, &PriceInfo)> {
        self.prices.iter()
    }

    /// Owned copy of the mapping.
    #[must_use]
    pub fn to_map(&self) -> HashMap<InstrumentId, PriceInfo> {
        self.prices.clone()
    }
}
