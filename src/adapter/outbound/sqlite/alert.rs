//! SQLite alert store implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use tracing::warn;

use crate::adapter::outbound::sqlite::database::connection::DbPool;
use crate::adapter::outbound::sqlite::database::model::{AlertRow, NewAlertRow};
use crate::adapter::outbound::sqlite::database::schema::alerts;
use crate::domain::{Alert, AlertId, AlertKind, InstrumentId, NewAlert};
use crate::error::{Error, Result};
use crate::port::AlertStore;

/// SQLite-backed alert store.
pub struct SqliteAlertStore {
    pool: DbPool,
}

impl SqliteAlertStore {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn to_row(alert: &NewAlert) -> NewAlertRow {
        NewAlertRow {
            chat_id: alert.chat_id,
            ticker: alert.instrument.to_string(),
            target: alert.target.value(),
            alert_type: alert.target.kind().as_str().to_string(),
            current_price: alert.reference_price,
            created_at: alert.created_at.to_rfc3339(),
        }
    }

    fn from_row(row: AlertRow) -> Result<Alert> {
        let kind: AlertKind = row.alert_type.parse().map_err(Error::Parse)?;
        let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&row.created_at)
            .map_err(|e| Error::Parse(e.to_string()))?
            .with_timezone(&Utc);

        Ok(Alert {
            id: AlertId::new(row.id),
            chat_id: row.chat_id,
            instrument: InstrumentId::from(row.ticker),
            target: row.target,
            reference_price: row.current_price,
            kind,
            created_at,
        })
    }

    /// Decode rows, skipping any that no longer decode.
    fn decode_all(rows: Vec<AlertRow>) -> Vec<Alert> {
        rows.into_iter()
            .filter_map(|row| {
                let id = row.id;
                match Self::from_row(row) {
                    Ok(alert) => Some(alert),
                    Err(e) => {
                        warn!(alert_id = id, error = %e, "Skipping undecodable alert row");
                        None
                    }
                }
            })
            .collect()
    }
}

#[async_trait]
impl AlertStore for SqliteAlertStore {
    async fn insert(&self, alert: NewAlert) -> Result<Alert> {
        let row = Self::to_row(&alert);
        let mut conn = self.pool.get()?;

        let stored: AlertRow = conn.transaction(|conn| {
            diesel::insert_into(alerts::table)
                .values(&row)
                .execute(conn)?;
            alerts::table
                .order(alerts::id.desc())
                .select(AlertRow::as_select())
                .first(conn)
        })?;

        Self::from_row(stored)
    }

    async fn list_all(&self) -> Result<Vec<Alert>> {
        let mut conn = self.pool.get()?;

        let rows: Vec<AlertRow> = alerts::table
            .order(alerts::id.asc())
            .select(AlertRow::as_select())
            .load(&mut conn)?;

        Ok(Self::decode_all(rows))
    }

    async fn list_by_chat(&self, chat_id: i64) -> Result<Vec<Alert>> {
        let mut conn = self.pool.get()?;

        let rows: Vec<AlertRow> = alerts::table
            .filter(alerts::chat_id.eq(chat_id))
            .order(alerts::id.asc())
            .select(AlertRow::as_select())
            .load(&mut conn)?;

        Ok(Self::decode_all(rows))
    }

    async fn delete(&self, id: AlertId) -> Result<bool> {
        let mut conn = self.pool.get()?;

        let deleted = diesel::delete(alerts::table.find(id.value())).execute(&mut conn)?;

        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::sqlite::database::connection::open;
    use crate::domain::AlertTarget;

    fn store() -> (tempfile::TempDir, SqliteAlertStore) {
        let dir = tempfile::tempdir().unwrap();
        let url = dir.path().join("alerts.db").to_string_lossy().into_owned();
        let pool = open(&url).unwrap();
        (dir, SqliteAlertStore::new(pool))
    }

    fn new_alert(chat_id: i64, instrument: &str, target: AlertTarget) -> NewAlert {
        NewAlert {
            chat_id,
            instrument: InstrumentId::from(instrument),
            target,
            reference_price: 100.0,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_ids_and_round_trips_fields() {
        let (_dir, store) = store();

        let first = store
            .insert(new_alert(1, "btc-bitcoin", AlertTarget::Price(70_000.0)))
            .await
            .unwrap();
        let second = store
            .insert(new_alert(1, "eth-ethereum", AlertTarget::Percent(-10.0)))
            .await
            .unwrap();

        assert!(second.id > first.id);
        assert_eq!(first.kind, AlertKind::Price);
        assert_eq!(second.kind, AlertKind::Percent);
        assert_eq!(second.target, -10.0);
        assert_eq!(second.reference_price, 100.0);
        assert_eq!(second.instrument.as_str(), "eth-ethereum");
    }

    #[tokio::test]
    async fn list_by_chat_filters_and_keeps_order() {
        let (_dir, store) = store();
        store.insert(new_alert(1, "a", AlertTarget::Price(1.0))).await.unwrap();
        store.insert(new_alert(2, "b", AlertTarget::Price(2.0))).await.unwrap();
        store.insert(new_alert(1, "c", AlertTarget::Price(3.0))).await.unwrap();

        let chat_one: Vec<_> = store
            .list_by_chat(1)
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.instrument.to_string())
            .collect();
        assert_eq!(chat_one, vec!["a", "c"]);
        assert_eq!(store.list_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn delete_reports_whether_row_existed() {
        let (_dir, store) = store();
        let alert = store.insert(new_alert(1, "a", AlertTarget::Price(1.0))).await.unwrap();

        assert!(store.delete(alert.id).await.unwrap());
        assert!(!store.delete(alert.id).await.unwrap());
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn undecodable_rows_are_skipped() {
        let (_dir, store) = store();
        store.insert(new_alert(1, "a", AlertTarget::Price(1.0))).await.unwrap();

        let mut conn = store.pool.get().unwrap();
        diesel::insert_into(alerts::table)
            .values(NewAlertRow {
                chat_id: 1,
                ticker: "b".into(),
                target: 5.0,
                alert_type: "percent_change".into(),
                current_price: 1.0,
                created_at: Utc::now().to_rfc3339(),
            })
            .execute(&mut conn)
            .unwrap();
        drop(conn);

        let alerts = store.list_all().await.unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].instrument.as_str(), "a");
    }
}
