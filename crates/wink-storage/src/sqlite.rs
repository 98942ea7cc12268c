use async_trait::async_trait;
use jiff::Timestamp;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use wink_core::error::StorageError;
use wink_core::repository::{ReadRepository, Repository, Result, UrlRecord};
use wink_core::shortcode::ShortCode;

const SHORT_LINKS_DDL: &str = include_str!("../ddl/sqlite/short_links.sql");

/// Opens a SQLite pool, creating the database file if it does not exist.
///
/// An in-memory database lives inside a single connection, so such pools
/// are pinned to one connection that is never recycled.
pub async fn open_pool(database_url: &str) -> std::result::Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let pool_options = if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new()
    };

    pool_options.connect_with(options).await
}

/// SQLite implementation of the repository contract.
///
/// Soft delete is implemented with `deleted_at`. Reads only return active
/// records (`deleted_at IS NULL` and not expired). Purging clears
/// `original_url` but keeps the row, so a code is never bound twice.
/// Timestamps are stored as Unix milliseconds.
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Creates a repository from an existing SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new SQLite connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = open_pool(database_url).await.map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Creates the `short_links` table and its indexes if they are missing.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::raw_sql(SHORT_LINKS_DDL)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}

fn parse_timestamp(column: &str, millis: i64) -> Result<Timestamp> {
    Timestamp::from_millisecond(millis).map_err(|e| {
        StorageError::InvalidData(format!("invalid {column} timestamp '{millis}': {e}"))
    })
}

fn decode_record(row: &SqliteRow) -> Result<UrlRecord> {
    let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
    let original_url: String = row.try_get("original_url").map_err(map_sqlx_error)?;
    let created_at: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;
    let expire_at: Option<i64> = row.try_get("expire_at").map_err(map_sqlx_error)?;

    Ok(UrlRecord {
        // Ids are stored bit-for-bit in a signed column.
        id: id as u64,
        original_url,
        created_at: parse_timestamp("created_at", created_at)?,
        expire_at: expire_at
            .map(|millis| parse_timestamp("expire_at", millis))
            .transpose()?,
    })
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

pub(crate) fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Configuration(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl ReadRepository for SqliteRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        let now = Timestamp::now().as_millisecond();

        let row = sqlx::query(
            r#"
            SELECT id, original_url, created_at, expire_at
            FROM short_links
            WHERE code = ?
              AND deleted_at IS NULL
              AND original_url IS NOT NULL
              AND (expire_at IS NULL OR expire_at > ?)
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(decode_record).transpose()
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        let exists = sqlx::query(
            r#"
            SELECT 1
            FROM short_links
            WHERE code = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?
        .is_some();

        Ok(exists)
    }
}

#[async_trait]
impl Repository for SqliteRepository {
    async fn insert(&self, code: &ShortCode, record: UrlRecord) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO short_links (code, id, original_url, created_at, expire_at, deleted_at)
            VALUES (?, ?, ?, ?, ?, NULL)
            "#,
        )
        .bind(code.as_str())
        .bind(record.id as i64)
        .bind(record.original_url.as_str())
        .bind(record.created_at.as_millisecond())
        .bind(record.expire_at.map(|ts| ts.as_millisecond()))
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => match self.get(code).await? {
                Some(existing) if existing.original_url == record.original_url => Ok(()),
                _ => Err(StorageError::Conflict(code.to_string())),
            },
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<ShortCode>> {
        let code: Option<String> = sqlx::query_scalar(
            r#"
            SELECT code
            FROM short_links
            WHERE original_url = ?
              AND expire_at IS NULL
              AND deleted_at IS NULL
            ORDER BY created_at, id
            LIMIT 1
            "#,
        )
        .bind(url)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        code.map(|code| {
            ShortCode::parse(&code).map_err(|e| StorageError::InvalidData(e.to_string()))
        })
        .transpose()
    }

    async fn delete(&self, code: &ShortCode) -> Result<bool> {
        let now = Timestamp::now().as_millisecond();

        let expire_at: Option<Option<i64>> = sqlx::query_scalar(
            r#"
            UPDATE short_links
            SET deleted_at = ?
            WHERE code = ?
              AND deleted_at IS NULL
              AND original_url IS NOT NULL
            RETURNING expire_at
            "#,
        )
        .bind(now)
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        // Tombstoning an already expired record does not count as a removal.
        Ok(matches!(expire_at, Some(expire_at) if expire_at.is_none_or(|at| at > now)))
    }

    async fn purge_expired(&self, now: Timestamp) -> Result<usize> {
        let now = now.as_millisecond();
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let expired = sqlx::query(
            r#"
            UPDATE short_links
            SET original_url = NULL,
                deleted_at = ?
            WHERE original_url IS NOT NULL
              AND deleted_at IS NULL
              AND expire_at IS NOT NULL
              AND expire_at <= ?
            "#,
        )
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        // Deleted rows lose their payload too but are not counted.
        sqlx::query(
            r#"
            UPDATE short_links
            SET original_url = NULL
            WHERE original_url IS NOT NULL
              AND deleted_at IS NOT NULL
            "#,
        )
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(expired.rows_affected() as usize)
    }
}
