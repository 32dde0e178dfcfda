//! Coin directory entries and on-demand ticker details.

use serde::{Deserialize, Serialize};

use super::id::InstrumentId;

/// A search hit from the provider's coin directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub id: InstrumentId,
    pub name: String,
    pub symbol: String,
    pub rank: u32,
}

/// Live ticker for a single coin, fetched on request.
///
/// Every numeric field is optional because untraded or freshly listed
/// coins come back with gaps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickerDetails {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub price_usd: Option<f64>,
    pub price_btc: Option<f64>,
    pub percent_change_1h: Option<f64>,
    pub percent_change_24h: Option<f64>,
    pub percent_change_7d: Option<f64>,
    pub volume_24h_usd: Option<f64>,
    pub market_cap_usd: Option<f64>,
    pub circulating_supply: Option<f64>,
    pub total_supply: Option<f64>,
}

impl TickerDetails {
    /// True when the provider returned a USD quote.
    #[must_use]
    pub fn is_traded(&self) -> bool {
        self.price_usd.is_some()
    }
}
