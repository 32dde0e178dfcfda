//! CoinPaprika REST API client.
//!
//! Uses the public API by default. When an API key is supplied the client
//! talks to the pro API instead and sends the key in the `Authorization`
//! header.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client as HttpClient, StatusCode};
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

use super::dto::{decode_tickers, SearchResponseDto, TickerDto};
use super::settings::CoinPaprikaConfig;
use crate::domain::{Coin, InstrumentId, PriceInfo, TickerDetails};
use crate::error::{ConfigError, Error, Result};
use crate::port::{CoinLookup, TickerFeed};

/// HTTP client for the CoinPaprika REST API.
pub struct CoinPaprikaClient {
    http: HttpClient,
    base_url: String,
    retry_max_attempts: u32,
    retry_backoff_ms: u64,
}

impl CoinPaprikaClient {
    /// Client for `base_url` with default HTTP settings and no retries.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: HttpClient::new(),
            base_url: trim_base(base_url.into()),
            retry_max_attempts: 1,
            retry_backoff_ms: 0,
        }
    }

    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the API key is not a valid header
    /// value or the HTTP client cannot be built.
    pub fn from_config(config: &CoinPaprikaConfig, api_key: Option<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let base_url = match api_key.filter(|k| !k.trim().is_empty()) {
            Some(key) => {
                let value = HeaderValue::from_str(key.trim()).map_err(|e| ConfigError::InvalidValue {
                    field: "API_PRO_KEY",
                    reason: e.to_string(),
                })?;
                headers.insert(AUTHORIZATION, value);
                config.pro_api_url.clone()
            }
            None => config.api_url.clone(),
        };

        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: trim_base(base_url),
            retry_max_attempts: config.retry_max_attempts,
            retry_backoff_ms: config.retry_backoff_ms,
        })
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn tickers_url(&self) -> Result<Url> {
        Ok(Url::parse(&format!("{}/tickers", self.base_url))?)
    }

    fn search_url(&self, query: &str, by_symbol: bool) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/search", self.base_url))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", query).append_pair("c", "currencies");
            if by_symbol {
                pairs.append_pair("modifier", "symbol_search");
            }
        }
        Ok(url)
    }

    fn ticker_url(&self, id: &InstrumentId) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/tickers", self.base_url))?;
        url.path_segments_mut()
            .map_err(|()| Error::Parse(format!("cannot extend base url `{}`", self.base_url)))?
            .push(id.as_str());
        url.query_pairs_mut().append_pair("quotes", "USD,BTC");
        Ok(url)
    }

    /// Send a GET, retrying timeouts and connection failures.
    async fn send_with_retry(&self, url: &Url) -> Result<reqwest::Response> {
        let mut attempt = 0;
        let max_attempts = self.retry_max_attempts.max(1);

        loop {
            attempt += 1;
            match self.http.get(url.clone()).send().await {
                Ok(response) => return Ok(response),
                Err(err) => {
                    if attempt >= max_attempts || !Self::should_retry(&err) {
                        return Err(err.into());
                    }
                    self.backoff(attempt, max_attempts, &err).await;
                }
            }
        }
    }

    async fn get_json<T>(&self, url: &Url) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self.send_with_retry(url).await?.error_for_status()?;
        Ok(response.json::<T>().await?)
    }

    fn should_retry(err: &reqwest::Error) -> bool {
        err.is_timeout() || err.is_connect()
    }

    async fn backoff(&self, attempt: u32, max_attempts: u32, err: &reqwest::Error) {
        warn!(
            attempt,
            max_attempts,
            error = %err,
            "HTTP request failed, retrying"
        );
        if self.retry_backoff_ms > 0 {
            sleep(Duration::from_millis(self.retry_backoff_ms)).await;
        }
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

#[async_trait]
impl TickerFeed for CoinPaprikaClient {
    async fn fetch_tickers(&self) -> Result<Vec<PriceInfo>> {
        let body: Vec<serde_json::Value> = self.get_json(&self.tickers_url()?).await?;
        decode_tickers(body)
    }
}

#[async_trait]
impl CoinLookup for CoinPaprikaClient {
    async fn search(&self, query: &str) -> Result<Vec<Coin>> {
        let query = query.trim();
        let by_symbol: SearchResponseDto = self.get_json(&self.search_url(query, true)?).await?;
        if !by_symbol.currencies.is_empty() {
            return Ok(by_symbol.currencies.into_iter().map(Coin::from).collect());
        }

        debug!(query, "No symbol match, trying name search");
        let by_name: SearchResponseDto = self.get_json(&self.search_url(query, false)?).await?;
        Ok(by_name.currencies.into_iter().map(Coin::from).collect())
    }

    async fn ticker(&self, id: &InstrumentId) -> Result<Option<TickerDetails>> {
        let response = self.send_with_retry(&self.ticker_url(id)?).await?;
        if matches!(response.status(), StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST) {
            debug!(instrument = %id, status = %response.status(), "Coin not traded");
            return Ok(None);
        }

        let dto: TickerDto = response.error_for_status()?.json().await?;
        Ok(Some(dto.into_details()))
    }
}
