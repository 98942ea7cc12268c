use async_trait::async_trait;
use sqlx::SqlitePool;
use std::ops::Range;
use wink_core::sequence::{Result, SequenceStore};
use wink_core::SequencerError;

const SEQUENCES_DDL: &str = include_str!("../ddl/sqlite/sequences.sql");

/// Name of the sequence that backs short-link ids.
pub const DEFAULT_SEQUENCE: &str = "short_links";

/// A [`SequenceStore`] that keeps named high-water marks in SQLite.
///
/// Each reservation is a single `UPDATE ... RETURNING`, so the mark is
/// committed before any id from the block is used. Marks are limited to
/// `i64::MAX`.
#[derive(Debug, Clone)]
pub struct SqliteSequenceStore {
    pool: SqlitePool,
    name: String,
}

impl SqliteSequenceStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_name(pool, DEFAULT_SEQUENCE)
    }

    pub fn with_name(pool: SqlitePool, name: impl Into<String>) -> Self {
        Self {
            pool,
            name: name.into(),
        }
    }

    /// Creates the `sequences` table and seeds this sequence at `start`.
    ///
    /// An existing mark is left untouched.
    pub async fn migrate(&self, start: u64) -> Result<()> {
        let start = i64::try_from(start).map_err(|_| SequencerError::Exhausted)?;

        sqlx::raw_sql(SEQUENCES_DDL)
            .execute(&self.pool)
            .await
            .map_err(checkpoint_error)?;

        sqlx::query("INSERT OR IGNORE INTO sequences (name, next_id) VALUES (?, ?)")
            .bind(&self.name)
            .bind(start)
            .execute(&self.pool)
            .await
            .map_err(checkpoint_error)?;

        Ok(())
    }

    /// The first id that has not been reserved yet.
    pub async fn high_water_mark(&self) -> Result<u64> {
        let next: Option<i64> = sqlx::query_scalar("SELECT next_id FROM sequences WHERE name = ?")
            .bind(&self.name)
            .fetch_optional(&self.pool)
            .await
            .map_err(checkpoint_error)?;

        next.map(|n| n as u64).ok_or_else(|| self.missing())
    }

    fn missing(&self) -> SequencerError {
        SequencerError::Checkpoint(format!("sequence '{}' is not initialized", self.name))
    }
}

fn checkpoint_error(err: sqlx::Error) -> SequencerError {
    SequencerError::Checkpoint(err.to_string())
}

#[async_trait]
impl SequenceStore for SqliteSequenceStore {
    async fn reserve(&self, count: u64) -> Result<Range<u64>> {
        let count = i64::try_from(count).map_err(|_| SequencerError::Exhausted)?;

        let end: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE sequences
            SET next_id = next_id + ?
            WHERE name = ?
              AND next_id <= ?
            RETURNING next_id
            "#,
        )
        .bind(count)
        .bind(&self.name)
        .bind(i64::MAX - count)
        .fetch_optional(&self.pool)
        .await
        .map_err(checkpoint_error)?;

        match end {
            Some(end) => Ok((end - count) as u64..end as u64),
            None => {
                // Either the row is missing or the mark cannot advance.
                self.high_water_mark().await?;
                Err(SequencerError::Exhausted)
            }
        }
    }
}
