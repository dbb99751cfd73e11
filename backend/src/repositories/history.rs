//! History persistence gateway
//!
//! Records are handed back newest first from every implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use bmigo_shared::{HistoryRecord, ModeFlags, NewHistoryRecord, RecordMode};

use crate::error::ServiceResult;

/// Storage for saved calculations
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Append a record, assigning its id and timestamp
    async fn save(&self, record: NewHistoryRecord) -> ServiceResult<HistoryRecord>;

    /// All records, newest first
    async fn list(&self) -> ServiceResult<Vec<HistoryRecord>>;

    /// Most recent record, if any
    async fn latest(&self) -> ServiceResult<Option<HistoryRecord>>;

    /// Remove one record; false when no record had this id
    async fn delete(&self, id: Uuid) -> ServiceResult<bool>;

    /// Remove every record, returning how many were removed
    async fn clear(&self) -> ServiceResult<u64>;
}

// ============================================================================
// SQLite
// ============================================================================

/// History row from database
#[derive(Debug, Clone, sqlx::FromRow)]
struct HistoryRow {
    id: Uuid,
    created_at: DateTime<Utc>,
    bmi: f64,
    weight: f64,
    height: f64,
    mode: String,
    indian_mode: bool,
    athlete_mode: bool,
    status: String,
}

impl From<HistoryRow> for HistoryRecord {
    fn from(row: HistoryRow) -> Self {
        let flags = ModeFlags {
            indian: row.indian_mode,
            athlete: row.athlete_mode,
        };
        HistoryRecord {
            id: row.id,
            timestamp: row.created_at,
            bmi: row.bmi,
            weight: row.weight,
            height: row.height,
            mode: row
                .mode
                .parse()
                .unwrap_or_else(|_| RecordMode::from_flags(flags)),
            flags,
            status: row.status,
        }
    }
}

const SELECT_COLUMNS: &str =
    "SELECT id, created_at, bmi, weight, height, mode, indian_mode, athlete_mode, status FROM history";

/// SQLite-backed history
#[derive(Clone)]
pub struct SqliteHistoryRepository {
    pool: SqlitePool,
}

impl SqliteHistoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl HistoryRepository for SqliteHistoryRepository {
    async fn save(&self, record: NewHistoryRecord) -> ServiceResult<HistoryRecord> {
        let record = record.into_record(Uuid::new_v4(), Utc::now());

        sqlx::query(
            r#"
            INSERT INTO history (id, created_at, bmi, weight, height, mode, indian_mode, athlete_mode, status)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.id)
        .bind(record.timestamp)
        .bind(record.bmi)
        .bind(record.weight)
        .bind(record.height)
        .bind(record.mode.as_str())
        .bind(record.flags.indian)
        .bind(record.flags.athlete)
        .bind(&record.status)
        .execute(&self.pool)
        .await?;

        debug!(id = %record.id, bmi = record.bmi, "History record saved");
        Ok(record)
    }

    async fn list(&self) -> ServiceResult<Vec<HistoryRecord>> {
        let rows = sqlx::query_as::<_, HistoryRow>(&format!(
            "{} ORDER BY created_at DESC, rowid DESC",
            SELECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(HistoryRecord::from).collect())
    }

    async fn latest(&self) -> ServiceResult<Option<HistoryRecord>> {
        let row = sqlx::query_as::<_, HistoryRow>(&format!(
            "{} ORDER BY created_at DESC, rowid DESC LIMIT 1",
            SELECT_COLUMNS
        ))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(HistoryRecord::from))
    }

    async fn delete(&self, id: Uuid) -> ServiceResult<bool> {
        let result = sqlx::query("DELETE FROM history WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear(&self) -> ServiceResult<u64> {
        let result = sqlx::query("DELETE FROM history")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

// ============================================================================
// In-memory
// ============================================================================

/// Process-local history, used when no database is configured and in tests
#[derive(Default)]
pub struct InMemoryHistoryRepository {
    records: RwLock<Vec<HistoryRecord>>,
}

impl InMemoryHistoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with existing records (any order)
    pub fn with_records(mut records: Vec<HistoryRecord>) -> Self {
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl HistoryRepository for InMemoryHistoryRepository {
    async fn save(&self, record: NewHistoryRecord) -> ServiceResult<HistoryRecord> {
        let record = record.into_record(Uuid::new_v4(), Utc::now());
        self.records.write().await.insert(0, record.clone());
        Ok(record)
    }

    async fn list(&self) -> ServiceResult<Vec<HistoryRecord>> {
        Ok(self.records.read().await.clone())
    }

    async fn latest(&self) -> ServiceResult<Option<HistoryRecord>> {
        Ok(self.records.read().await.first().cloned())
    }

    async fn delete(&self, id: Uuid) -> ServiceResult<bool> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id != id);
        Ok(records.len() < before)
    }

    async fn clear(&self) -> ServiceResult<u64> {
        let mut records = self.records.write().await;
        let removed = records.len() as u64;
        records.clear();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use proptest::prelude::*;

    fn new_record(bmi: f64, weight: f64, athlete: bool) -> NewHistoryRecord {
        NewHistoryRecord {
            bmi,
            weight,
            height: 175.0,
            flags: ModeFlags {
                indian: true,
                athlete,
            },
            status: "Normal".to_string(),
        }
    }

    async fn sqlite_repo() -> SqliteHistoryRepository {
        let pool = db::create_memory_pool().await.unwrap();
        db::run_migrations(&pool).await.unwrap();
        SqliteHistoryRepository::new(pool)
    }

    async fn exercise_gateway(repo: &dyn HistoryRepository) {
        assert!(repo.list().await.unwrap().is_empty());
        assert!(repo.latest().await.unwrap().is_none());

        let first = repo.save(new_record(22.857142857142858, 70.0, false)).await.unwrap();
        let second = repo.save(new_record(23.183673469387756, 71.0, true)).await.unwrap();

        let listed = repo.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
        // REAL columns keep the full f64
        assert_eq!(listed[1].bmi, 22.857142857142858);
        assert_eq!(listed[0].mode, RecordMode::Athlete);
        assert!(listed[0].flags.indian);
        assert_eq!(listed[1].mode, RecordMode::Indian);

        assert_eq!(repo.latest().await.unwrap().map(|r| r.id), Some(second.id));

        assert!(repo.delete(first.id).await.unwrap());
        assert!(!repo.delete(first.id).await.unwrap());
        assert_eq!(repo.list().await.unwrap().len(), 1);

        repo.save(new_record(24.0, 73.5, false)).await.unwrap();
        assert_eq!(repo.clear().await.unwrap(), 2);
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sqlite_gateway() {
        let repo = sqlite_repo().await;
        exercise_gateway(&repo).await;
    }

    #[tokio::test]
    async fn test_in_memory_gateway() {
        let repo = InMemoryHistoryRepository::new();
        exercise_gateway(&repo).await;
    }

    #[tokio::test]
    async fn test_in_memory_seed_is_sorted_newest_first() {
        let now = Utc::now();
        let older = new_record(20.0, 61.0, false).into_record(Uuid::new_v4(), now - chrono::Duration::days(3));
        let newer = new_record(21.0, 64.0, false).into_record(Uuid::new_v4(), now);
        let repo = InMemoryHistoryRepository::with_records(vec![older.clone(), newer.clone()]);

        let listed = repo.list().await.unwrap();
        assert_eq!(listed[0].id, newer.id);
        assert_eq!(listed[1].id, older.id);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Property: saving and re-listing keeps measurements and mode exactly
        #[test]
        fn prop_sqlite_round_trip_preserves_measurements(
            bmi in 3.0f64..=120.0,
            weight in 20.0f64..=300.0,
            height in 50.0f64..=250.0,
            indian in any::<bool>(),
            athlete in any::<bool>()
        ) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();

            let (saved, listed) = runtime.block_on(async {
                let repo = sqlite_repo().await;
                let saved = repo
                    .save(NewHistoryRecord {
                        bmi,
                        weight,
                        height,
                        flags: ModeFlags { indian, athlete },
                        status: "Normal".to_string(),
                    })
                    .await
                    .unwrap();
                (saved, repo.list().await.unwrap())
            });

            prop_assert_eq!(listed.len(), 1);
            let stored = &listed[0];
            prop_assert_eq!(stored.id, saved.id);
            prop_assert_eq!(stored.bmi, bmi);
            prop_assert_eq!(stored.weight, weight);
            prop_assert_eq!(stored.height, height);
            prop_assert_eq!(stored.flags, ModeFlags { indian, athlete });
            prop_assert_eq!(stored.mode, saved.mode);
        }
    }
}
