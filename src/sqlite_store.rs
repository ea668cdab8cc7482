//! SQLite-backed rate storage.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::FromRow;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::RateError;
use crate::rate_record::{NewRate, RateRecord};
use crate::store::RateStore;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS InterestRateHistory (
    Id INTEGER PRIMARY KEY AUTOINCREMENT,
    Date TEXT NOT NULL,
    Rate TEXT NOT NULL
)";

const SELECT_COLUMNS: &str = "SELECT Id AS id, Date AS date, Rate AS rate FROM InterestRateHistory";

#[derive(Debug, FromRow)]
struct RateRow {
    id: i64,
    date: NaiveDate,
    // Kept as text so the decimal scale survives a round trip.
    rate: String,
}

impl TryFrom<RateRow> for RateRecord {
    type Error = RateError;

    fn try_from(row: RateRow) -> Result<Self, Self::Error> {
        let rate = Decimal::from_str(&row.rate).map_err(|e| RateError::CorruptRecord {
            id: row.id,
            reason: format!("rate {:?}: {e}", row.rate),
        })?;

        Ok(RateRecord {
            id: row.id,
            date: row.date,
            rate,
        })
    }
}

#[derive(Debug)]
pub struct SqliteRateStore {
    pool: SqlitePool,
}

impl SqliteRateStore {
    /// Open `url`, creating the database file and table if absent.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, RateError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Self::with_pool(pool).await
    }

    /// Private in-memory database. A single connection that is never
    /// recycled, since each SQLite memory connection is its own database.
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self, RateError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        Self::with_pool(pool).await
    }

    pub async fn with_pool(pool: SqlitePool) -> Result<Self, RateError> {
        sqlx::query(CREATE_TABLE).execute(&pool).await?;
        Ok(Self { pool })
    }
}

impl RateStore for SqliteRateStore {
    async fn list(&self) -> Result<Vec<RateRecord>, RateError> {
        let rows: Vec<RateRow> = sqlx::query_as(&format!("{SELECT_COLUMNS} ORDER BY Id"))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(RateRecord::try_from).collect()
    }

    async fn get(&self, id: i64) -> Result<RateRecord, RateError> {
        let row: Option<RateRow> = sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE Id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.ok_or(RateError::NotFound(id))?.try_into()
    }

    async fn create(&self, new_rate: NewRate) -> Result<RateRecord, RateError> {
        let result = sqlx::query("INSERT INTO InterestRateHistory (Date, Rate) VALUES (?, ?)")
            .bind(new_rate.date)
            .bind(new_rate.rate.to_string())
            .execute(&self.pool)
            .await?;

        let record = new_rate.into_record(result.last_insert_rowid());
        log::info!("created rate {} for {}", record.id, record.date);
        Ok(record)
    }

    async fn update(&self, id: i64, new_rate: NewRate) -> Result<RateRecord, RateError> {
        let result = sqlx::query("UPDATE InterestRateHistory SET Date = ?, Rate = ? WHERE Id = ?")
            .bind(new_rate.date)
            .bind(new_rate.rate.to_string())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RateError::NotFound(id));
        }

        log::info!("updated rate {id} to {} on {}", new_rate.rate, new_rate.date);
        Ok(new_rate.into_record(id))
    }

    async fn delete(&self, id: i64) -> Result<(), RateError> {
        let result = sqlx::query("DELETE FROM InterestRateHistory WHERE Id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RateError::NotFound(id));
        }

        log::info!("deleted rate {id}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn new_rate(date: &str, rate: &str) -> NewRate {
        NewRate {
            date: NaiveDate::from_str(date).unwrap(),
            rate: Decimal::from_str(rate).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips() {
        let store = SqliteRateStore::in_memory().await.unwrap();
        let created = store.create(new_rate("2024-08-08", "5.250")).await.unwrap();
        let fetched = store.get(created.id).await.unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.rate.to_string(), "5.250");
        assert_eq!(fetched.date.to_string(), "2024-08-08");
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = SqliteRateStore::in_memory().await.unwrap();
        let created = store.create(new_rate("2024-01-01", "2")).await.unwrap();

        let updated = store
            .update(created.id, new_rate("2024-01-02", "2.5"))
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(store.list().await.unwrap(), vec![updated]);

        store.delete(created.id).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_id_is_not_found() {
        let store = SqliteRateStore::in_memory().await.unwrap();

        assert!(matches!(store.get(1).await, Err(RateError::NotFound(1))));
        assert!(matches!(
            store.update(1, new_rate("2024-01-01", "1")).await,
            Err(RateError::NotFound(1))
        ));
        assert!(matches!(store.delete(1).await, Err(RateError::NotFound(1))));
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let store = SqliteRateStore::in_memory().await.unwrap();
        let first = store.create(new_rate("2024-01-01", "1")).await.unwrap();
        store.delete(first.id).await.unwrap();
        let second = store.create(new_rate("2024-01-01", "1")).await.unwrap();

        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_file_store_persists_across_reopen() {
        let tmp_dir = TempDir::new().unwrap();
        let url = format!("sqlite://{}", tmp_dir.path().join("rates.db").display());

        let store = SqliteRateStore::connect(&url, 1).await.unwrap();
        let created = store.create(new_rate("2023-12-31", "7.75")).await.unwrap();
        drop(store);

        let reopened = SqliteRateStore::connect(&url, 1).await.unwrap();
        assert_eq!(reopened.list().await.unwrap(), vec![created]);
    }

    #[tokio::test]
    async fn test_unreadable_rate_is_reported() {
        let store = SqliteRateStore::in_memory().await.unwrap();
        sqlx::query("INSERT INTO InterestRateHistory (Date, Rate) VALUES ('2024-01-01', 'abc')")
            .execute(&store.pool)
            .await
            .unwrap();

        assert!(matches!(
            store.list().await,
            Err(RateError::CorruptRecord { id: 1, .. })
        ));
    }
}
