//! CoinPaprika response payloads.
//!
//! Example `/tickers` entry:
//! ```json
//! {"id":"btc-bitcoin","name":"Bitcoin","symbol":"BTC","rank":1,
//!  "circulating_supply":19700000,"total_supply":19700000,
//!  "last_updated":"2024-12-31T12:34:56Z",
//!  "quotes":{"USD":{"price":95000.1,"volume_24h":1.2e10,"market_cap":1.8e12,
//!   "percent_change_1h":0.1,"percent_change_24h":-1.5,"percent_change_7d":3.2}}}
//! ```

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::domain::{Coin, InstrumentId, PriceInfo, TickerDetails};
use crate::error::{Error, Result};

/// One quote currency inside a ticker.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuoteDto {
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub volume_24h: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub percent_change_1h: Option<f64>,
    #[serde(default)]
    pub percent_change_24h: Option<f64>,
    #[serde(default)]
    pub percent_change_7d: Option<f64>,
}

/// Ticker as returned by `/tickers` and `/tickers/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TickerDto {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub circulating_supply: Option<f64>,
    #[serde(default)]
    pub total_supply: Option<f64>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub quotes: Option<HashMap<String, QuoteDto>>,
}

impl TickerDto {
    fn quote(&self, currency: &str) -> Option<&QuoteDto> {
        self.quotes.as_ref()?.get(currency)
    }

    /// Convert a bulk-feed entry into a cache entry at position `seq`.
    ///
    /// Returns `None` when the entry carries no USD price.
    #[must_use]
    pub fn into_price_info(self, seq: u32) -> Option<PriceInfo> {
        let usd = self.quote("USD")?;
        let price_usd = usd.price?;
        let market_cap = usd.market_cap.unwrap_or_default();
        let percent_change_24h = usd.percent_change_24h.unwrap_or_default();

        Some(PriceInfo {
            seq,
            price_usd,
            market_cap,
            percent_change_24h,
            id: InstrumentId::from(self.id),
            name: self.name.unwrap_or_default(),
            symbol: self.symbol.unwrap_or_default(),
            last_updated: self.last_updated.unwrap_or_default(),
        })
    }

    /// Convert a single-ticker response into on-demand details.
    #[must_use]
    pub fn into_details(self) -> TickerDetails {
        let usd = self.quote("USD").cloned().unwrap_or_default();
        let btc = self.quote("BTC").cloned().unwrap_or_default();

        TickerDetails {
            id: self.id,
            name: self.name.unwrap_or_default(),
            symbol: self.symbol.unwrap_or_default(),
            price_usd: usd.price,
            price_btc: btc.price,
            percent_change_1h: usd.percent_change_1h,
            percent_change_24h: usd.percent_change_24h,
            percent_change_7d: usd.percent_change_7d,
            volume_24h_usd: usd.volume_24h,
            market_cap_usd: usd.market_cap,
            circulating_supply: self.circulating_supply,
            total_supply: self.total_supply,
        }
    }
}

/// Decode a full `/tickers` body.
///
/// Sequence numbers follow response order starting at 1. Entries that do not
/// decode or have no USD price are skipped with a warning.
///
/// # Errors
///
/// Returns [`Error::Parse`] when a non-empty body yields no usable entry.
pub fn decode_tickers(body: Vec<Value>) -> Result<Vec<PriceInfo>> {
    let total = body.len();
    let mut prices = Vec::with_capacity(total);

    for (i, raw) in body.into_iter().enumerate() {
        let seq = i as u32 + 1;
        let dto = match serde_json::from_value::<TickerDto>(raw) {
            Ok(dto) => dto,
            Err(e) => {
                warn!(seq, error = %e, "Skipping undecodable ticker");
                continue;
            }
        };
        let id = dto.id.clone();
        match dto.into_price_info(seq) {
            Some(price) => prices.push(price),
            None => warn!(seq, instrument = %id, "Skipping ticker without USD price"),
        }
    }

    if total > 0 && prices.is_empty() {
        return Err(Error::Parse(format!("none of {total} tickers had a USD price")));
    }
    if prices.len() < total {
        warn!(kept = prices.len(), skipped = total - prices.len(), "Ticker batch had bad entries");
    }
    Ok(prices)
}

/// `/search` response; only currencies are requested.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponseDto {
    #[serde(default)]
    pub currencies: Vec<CurrencyDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrencyDto {
    pub id: String,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub rank: u32,
}

impl From<CurrencyDto> for Coin {
    fn from(dto: CurrencyDto) -> Self {
        Self {
            id: InstrumentId::from(dto.id),
            name: dto.name,
            symbol: dto.symbol,
            rank: dto.rank,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICKERS: &str = r#"[
        {"id":"btc-bitcoin","name":"Bitcoin","symbol":"BTC","rank":1,
         "circulating_supply":19700000,"total_supply":19700000,"max_supply":21000000,
         "last_updated":"2024-12-31T12:34:56Z",
         "quotes":{"USD":{"price":95000.5,"volume_24h":12000000000.0,"market_cap":1800000000000.0,
           "percent_change_1h":0.1,"percent_change_24h":-1.5,"percent_change_7d":3.2}}},
        {"id":"new-coin","name":"New","symbol":"NEW",
         "quotes":{"USD":{"price":0.5}}}
    ]"#;

    #[test]
    fn decode_tickers_assigns_sequence_in_response_order() {
        let body: Vec<Value> = serde_json::from_str(TICKERS).unwrap();
        let prices = decode_tickers(body).unwrap();

        assert_eq!(prices.len(), 2);
        assert_eq!(prices[0].id.as_str(), "btc-bitcoin");
        assert_eq!(prices[0].seq, 1);
        assert_eq!(prices[0].price_usd, 95000.5);
        assert_eq!(prices[0].percent_change_24h, -1.5);
        assert_eq!(prices[0].last_updated, "2024-12-31T12:34:56Z");
        assert_eq!(prices[1].seq, 2);
    }

    #[test]
    fn missing_numeric_fields_default_to_zero() {
        let body: Vec<Value> = serde_json::from_str(TICKERS).unwrap();
        let prices = decode_tickers(body).unwrap();

        assert_eq!(prices[1].market_cap, 0.0);
        assert_eq!(prices[1].percent_change_24h, 0.0);
        assert_eq!(prices[1].last_updated, "");
    }

    #[test]
    fn odd_entries_are_skipped_and_the_rest_kept() {
        let body: Vec<Value> = serde_json::from_str(
            r#"[{"id":"a","name":"A","symbol":"A","quotes":{"USD":{"price":1.0}}},
                {"id":"odd-coin","name":"Odd","symbol":"ODD"},
                {"id":"no-price","name":"NoPrice","symbol":"NP","quotes":{"USD":{"market_cap":5.0}}},
                {"id":"nameless","name":null,"symbol":"NL","quotes":{"USD":{"price":2.0}}},
                {"name":"Missing id"},
                {"id":"c","name":"C","symbol":"C","quotes":{"USD":{"price":3.0}}}]"#,
        )
        .unwrap();

        let prices = decode_tickers(body).unwrap();

        let ids: Vec<_> = prices.iter().map(|p| (p.id.as_str(), p.seq)).collect();
        assert_eq!(ids, [("a", 1), ("nameless", 4), ("c", 6)]);
        assert_eq!(prices[1].name, "");
        assert_eq!(prices[1].price_usd, 2.0);
    }

    #[test]
    fn batch_without_any_usd_price_fails() {
        let body: Vec<Value> = serde_json::from_str(
            r#"[{"id":"a","name":"A","symbol":"A","quotes":{}},
                {"id":"b","name":"B","symbol":"B","quotes":null}]"#,
        )
        .unwrap();

        assert!(matches!(decode_tickers(body), Err(Error::Parse(_))));
        assert!(decode_tickers(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn malformed_body_is_rejected() {
        assert!(serde_json::from_str::<Vec<Value>>(r#"{"error":"rate limited"}"#).is_err());
    }

    #[test]
    fn details_carry_usd_and_btc_quotes() {
        let dto: TickerDto = serde_json::from_str(
            r#"{"id":"eth-ethereum","name":"Ethereum","symbol":"ETH",
                "circulating_supply":120000000,"total_supply":null,
                "quotes":{"USD":{"price":3500.0,"volume_24h":1.0e10},"BTC":{"price":0.037}}}"#,
        )
        .unwrap();

        let details = dto.into_details();
        assert!(details.is_traded());
        assert_eq!(details.price_btc, Some(0.037));
        assert_eq!(details.volume_24h_usd, Some(1.0e10));
        assert_eq!(details.circulating_supply, Some(120_000_000.0));
        assert_eq!(details.total_supply, None);
        assert_eq!(details.percent_change_7d, None);
    }

    #[test]
    fn search_response_ignores_other_categories() {
        let resp: SearchResponseDto = serde_json::from_str(
            r#"{"currencies":[{"id":"btc-bitcoin","name":"Bitcoin","symbol":"BTC","rank":1,"is_new":false}],
                "exchanges":[{"id":"binance"}]}"#,
        )
        .unwrap();

        let coins: Vec<Coin> = resp.currencies.into_iter().map(Coin::from).collect();
        assert_eq!(coins.len(), 1);
        assert_eq!(coins[0].id.as_str(), "btc-bitcoin");
        assert_eq!(coins[0].rank, 1);
    }
}
