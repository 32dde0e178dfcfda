//! Quote provider ports.

use async_trait::async_trait;

use crate::domain::{Coin, InstrumentId, PriceInfo, TickerDetails};
use crate::error::Result;

/// Bulk source of quotes for every listed instrument.
#[async_trait]
pub trait TickerFeed: Send + Sync {
    /// Fetch and decode the full instrument list.
    ///
    /// Either every entry decodes or the call fails; callers never see a
    /// partial list.
    async fn fetch_tickers(&self) -> Result<Vec<PriceInfo>>;
}

/// On-demand coin search and single-ticker lookups.
#[async_trait]
pub trait CoinLookup: Send + Sync {
    /// Search the coin directory by symbol, falling back to name.
    ///
    /// Returns matches in provider order; empty when nothing matches.
    async fn search(&self, query: &str) -> Result<Vec<Coin>>;

    /// Fetch the live ticker for one coin, or `None` if it is not traded.
    async fn ticker(&self, id: &InstrumentId) -> Result<Option<TickerDetails>>;
}
