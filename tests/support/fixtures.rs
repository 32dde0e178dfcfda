use chrono::{DateTime, Utc};

use paprika_bot::domain::{AlertTarget, InstrumentId, NewAlert, PriceInfo};

pub fn quote(id: &str, price_usd: f64) -> PriceInfo {
    PriceInfo {
        id: InstrumentId::from(id),
        seq: 1,
        name: id.to_uppercase(),
        symbol: id.chars().take(3).collect::<String>().to_uppercase(),
        price_usd,
        market_cap: 0.0,
        percent_change_24h: 0.0,
        last_updated: "2025-01-15T00:00:00Z".into(),
    }
}

pub fn new_alert(chat_id: i64, instrument: &str, target: AlertTarget, reference_price: f64) -> NewAlert {
    NewAlert {
        chat_id,
        instrument: InstrumentId::from(instrument),
        target,
        reference_price,
        created_at: created_at(),
    }
}

pub fn created_at() -> DateTime<Utc> {
    "2025-01-15T12:00:00Z".parse().expect("valid timestamp")
}
