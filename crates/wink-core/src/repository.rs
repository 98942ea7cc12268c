use crate::error::StorageError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A stored URL record in the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlRecord {
    /// The sequence id the short code was minted from.
    pub id: u64,
    /// The normalized URL that was shortened.
    pub original_url: String,
    /// When the record was created.
    pub created_at: Timestamp,
    /// When the record expires, if ever.
    pub expire_at: Option<Timestamp>,
}

impl UrlRecord {
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expire_at.is_some_and(|expire_at| now >= expire_at)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Timestamp::now())
    }

    /// Permanent records never expire and take part in idempotent creation.
    pub fn is_permanent(&self) -> bool {
        self.expire_at.is_none()
    }
}

/// A short code together with the record it resolves to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortLink {
    pub code: ShortCode,
    pub record: UrlRecord,
}

/// A read-only view of a repository.
///
/// This trait provides only the read operations from [`Repository`],
/// allowing services like the redirector to have read-only access.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the URL record for a given short code.
    /// Returns `None` if the code does not exist, was deleted, or has expired.
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>>;

    /// Checks whether a short code was ever bound, including deleted and
    /// purged codes. Bound codes are never handed out again.
    async fn exists(&self, code: &ShortCode) -> Result<bool>;
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Binds a short code to a record and, for permanent records, indexes the
    /// URL for idempotent creation.
    ///
    /// Re-inserting the same URL under an active code is a no-op. Returns
    /// `Err(Conflict)` if the code is bound to a different URL or has been
    /// deleted or purged.
    async fn insert(&self, code: &ShortCode, record: UrlRecord) -> Result<()>;

    /// Finds the active permanent short code for a normalized URL.
    async fn find_by_url(&self, url: &str) -> Result<Option<ShortCode>>;

    /// Tombstones the record for a given short code.
    /// Returns `true` if an active record existed and was removed.
    async fn delete(&self, code: &ShortCode) -> Result<bool>;

    /// Drops the payload of expired and deleted records, keeping a tombstone
    /// for each code.
    ///
    /// Returns the number of records that were still bound when they expired.
    /// Deleted records are not counted, and a record is counted at most once.
    async fn purge_expired(&self, now: Timestamp) -> Result<usize>;
}

#[async_trait]
impl<T: ReadRepository + ?Sized> ReadRepository for Arc<T> {
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        (**self).get(code).await
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        (**self).exists(code).await
    }
}

#[async_trait]
impl<T: Repository + ?Sized> Repository for Arc<T> {
    async fn insert(&self, code: &ShortCode, record: UrlRecord) -> Result<()> {
        (**self).insert(code, record).await
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<ShortCode>> {
        (**self).find_by_url(url).await
    }

    async fn delete(&self, code: &ShortCode) -> Result<bool> {
        (**self).delete(code).await
    }

    async fn purge_expired(&self, now: Timestamp) -> Result<usize> {
        (**self).purge_expired(now).await
    }
}
