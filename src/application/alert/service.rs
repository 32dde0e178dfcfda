//! Alert creation and listing for the chat layer.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::application::cache::PriceCache;
use crate::domain::{Alert, AlertTarget, InstrumentId, NewAlert};
use crate::error::{AlertError, Result};
use crate::port::AlertStore;

/// Creates and lists alerts on behalf of a chat.
#[derive(Clone)]
pub struct AlertService {
    store: Arc<dyn AlertStore>,
    cache: Arc<PriceCache>,
}

impl AlertService {
    pub fn new(store: Arc<dyn AlertStore>, cache: Arc<PriceCache>) -> Self {
        Self { store, cache }
    }

    /// Create an alert for `instrument` in `chat_id`.
    ///
    /// `raw_target` is parsed by [`AlertTarget::parse`]. The baseline is the
    /// instrument's cached USD price at this moment.
    ///
    /// # Errors
    ///
    /// [`AlertError::InvalidTarget`] for a malformed target,
    /// [`AlertError::PriceUnavailable`] when the instrument has no cached
    /// price, or a store error.
    pub async fn create(&self, chat_id: i64, instrument: &InstrumentId, raw_target: &str) -> Result<Alert> {
        let target = AlertTarget::parse(raw_target)?;
        let quote = self
            .cache
            .get(instrument)
            .ok_or_else(|| AlertError::PriceUnavailable(instrument.to_string()))?;

        let alert = self
            .store
            .insert(NewAlert {
                chat_id,
                instrument: instrument.clone(),
                target,
                reference_price: quote.price_usd,
                created_at: Utc::now(),
            })
            .await?;

        info!(
            alert_id = %alert.id,
            chat_id,
            instrument = %alert.instrument,
            kind = %alert.kind,
            target = alert.target,
            "Alert created"
        );
        Ok(alert)
    }

    /// Alerts for one chat in storage order.
    pub async fn list(&self, chat_id: i64) -> Result<Vec<Alert>> {
        self.store.list_by_chat(chat_id).await
    }

    /// Cache the service reads baselines from.
    #[must_use]
    pub fn cache(&self) -> &Arc<PriceCache> {
        &self.cache
    }
}
