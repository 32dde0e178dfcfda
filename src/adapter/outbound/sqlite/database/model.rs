//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::{alerts, metrics};

/// Database row for an alert (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = alerts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AlertRow {
    pub id: i64,
    pub chat_id: i64,
    pub ticker: String,
    pub target: f64,
    pub alert_type: String,
    pub current_price: f64,
    pub created_at: String,
}

/// Database row for an alert (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = alerts)]
pub struct NewAlertRow {
    pub chat_id: i64,
    pub ticker: String,
    pub target: f64,
    pub alert_type: String,
    pub current_price: f64,
    pub created_at: String,
}

/// Database row for one metric sample.
///
/// Unlabeled metrics use empty strings for both label columns.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = metrics)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MetricRow {
    pub metric_name: String,
    pub label_key: String,
    pub label_value: String,
    pub metric_value: f64,
}
