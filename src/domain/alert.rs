//! Price alerts and their trigger rules.
//!
//! An alert is either a price floor (`price`) or a directional percent move
//! relative to the price captured when it was created (`percent`). Alerts
//! fire once and are then removed.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{AlertId, InstrumentId};
use super::price::PriceInfo;
use crate::error::AlertError;

/// Kind of trigger condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    /// Fires when the price reaches or exceeds the target.
    Price,
    /// Fires when the percent change from the baseline crosses the target.
    Percent,
}

impl AlertKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::Percent => "percent",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "price" => Ok(Self::Price),
            "percent" => Ok(Self::Percent),
            other => Err(format!("unknown alert type `{other}`")),
        }
    }
}

/// A user-supplied threshold after parsing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlertTarget {
    Price(f64),
    Percent(f64),
}

impl AlertTarget {
    /// Parse a raw target as typed in chat.
    ///
    /// A `%` anywhere or a leading `-` makes it a percent target; anything
    /// else is an absolute USD price.
    ///
    /// # Errors
    ///
    /// Returns [`AlertError::InvalidTarget`] if the number does not parse,
    /// is not finite, a price is not positive, or a percent is zero.
    pub fn parse(raw: &str) -> Result<Self, AlertError> {
        let trimmed = raw.trim();
        if trimmed.contains('%') || trimmed.starts_with('-') {
            let value = parse_number(&trimmed.replace('%', ""), "percent", raw)?;
            if value == 0.0 {
                return Err(invalid("percent", raw, "must not be zero"));
            }
            Ok(Self::Percent(value))
        } else {
            let value = parse_number(trimmed, "price", raw)?;
            if value <= 0.0 {
                return Err(invalid("price", raw, "must be greater than zero"));
            }
            Ok(Self::Price(value))
        }
    }

    #[must_use]
    pub const fn kind(self) -> AlertKind {
        match self {
            Self::Price(_) => AlertKind::Price,
            Self::Percent(_) => AlertKind::Percent,
        }
    }

    #[must_use]
    pub const fn value(self) -> f64 {
        match self {
            Self::Price(v) | Self::Percent(v) => v,
        }
    }
}

fn parse_number(text: &str, kind: &'static str, raw: &str) -> Result<f64, AlertError> {
    let value: f64 = text
        .trim()
        .replace(',', "")
        .parse()
        .map_err(|_| invalid(kind, raw, "not a number"))?;
    if !value.is_finite() {
        return Err(invalid(kind, raw, "not a finite number"));
    }
    Ok(value)
}

fn invalid(kind: &'static str, raw: &str, reason: &'static str) -> AlertError {
    AlertError::InvalidTarget {
        kind,
        raw: raw.to_string(),
        reason,
    }
}

/// A persisted alert.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub id: AlertId,
    /// Chat that receives the notification.
    pub chat_id: i64,
    pub instrument: InstrumentId,
    /// Absolute USD price or signed percent, depending on `kind`.
    pub target: f64,
    /// USD price captured at creation; baseline for percent alerts.
    pub reference_price: f64,
    pub kind: AlertKind,
    pub created_at: DateTime<Utc>,
}

/// An alert that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAlert {
    pub chat_id: i64,
    pub instrument: InstrumentId,
    pub target: AlertTarget,
    pub reference_price: f64,
    pub created_at: DateTime<Utc>,
}

/// Why an alert's condition holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trigger {
    /// Price reached the floor.
    PriceReached { current: f64 },
    /// Percent change crossed the target in its direction.
    PercentMoved { current: f64, change: f64 },
}

/// Outcome of checking one alert against a price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Evaluation {
    Triggered(Trigger),
    Pending,
    /// The baseline is unusable (zero, negative or not finite).
    InvalidBaseline,
}

/// Percent change from `reference` to `current`, or `None` without a usable baseline.
#[must_use]
pub fn percent_change(reference: f64, current: f64) -> Option<f64> {
    if !reference.is_finite() || reference <= 0.0 {
        return None;
    }
    Some((current - reference) / reference * 100.0)
}

impl Alert {
    /// Check the trigger condition against the current USD price.
    ///
    /// Price alerts fire at or above the target. Percent alerts are
    /// directional: positive targets fire on rises of at least the target,
    /// negative targets on drops of at least the target. A zero percent
    /// target never fires.
    #[must_use]
    pub fn evaluate(&self, current: f64) -> Evaluation {
        match self.kind {
            AlertKind::Price => {
                if current >= self.target {
                    Evaluation::Triggered(Trigger::PriceReached { current })
                } else {
                    Evaluation::Pending
                }
            }
            AlertKind::Percent => {
                let Some(change) = percent_change(self.reference_price, current) else {
                    return Evaluation::InvalidBaseline;
                };
                let crossed = (self.target > 0.0 && change >= self.target)
                    || (self.target < 0.0 && change <= self.target);
                if crossed {
                    Evaluation::Triggered(Trigger::PercentMoved { current, change })
                } else {
                    Evaluation::Pending
                }
            }
        }
    }
}

/// Everything a notifier needs to tell a chat that an alert fired.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggeredAlert {
    pub alert: Alert,
    pub name: String,
    pub symbol: String,
    pub trigger: Trigger,
}

impl TriggeredAlert {
    #[must_use]
    pub fn new(alert: Alert, quote: &PriceInfo, trigger: Trigger) -> Self {
        Self {
            alert,
            name: quote.name.clone(),
            symbol: quote.symbol.clone(),
            trigger,
        }
    }

    #[must_use]
    pub fn chat_id(&self) -> i64 {
        self.alert.chat_id
    }
}

/// What to do with a triggered alert whose notification failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryPolicy {
    /// Delete after the send attempt regardless of its outcome.
    #[default]
    AtMostOnce,
    /// Delete only after a confirmed send; failed sends retry next cycle.
    AtLeastOnce,
}

impl DeliveryPolicy {
    #[must_use]
    pub const fn should_delete(self, delivered: bool) -> bool {
        match self {
            Self::AtMostOnce => true,
            Self::AtLeastOnce => delivered,
        }
    }
}
