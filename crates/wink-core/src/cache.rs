use crate::error::CacheError;
use crate::repository::UrlRecord;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use std::future::Future;

pub type Result<T> = std::result::Result<T, CacheError>;

/// A cache for URL records.
///
/// This trait provides a domain-specific caching abstraction for [`UrlRecord`]s,
/// using [`ShortCode`] as the key. Only positive lookups are cached, so a
/// code that is issued after a failed lookup is never shadowed.
#[async_trait]
pub trait UrlCache: Send + Sync + 'static {
    /// Get URL record from cache.
    ///
    /// Returns `Ok(None)` if the key is not in the cache.
    async fn get_url(&self, code: &ShortCode) -> Result<Option<UrlRecord>>;

    /// Store URL record in cache.
    async fn set_url(&self, code: &ShortCode, record: &UrlRecord) -> Result<()>;

    /// Remove URL record from cache.
    ///
    /// It is not an error if the key does not exist.
    async fn del(&self, code: &ShortCode) -> Result<()>;

    /// Get URL record from cache, computing it with `fetch` on a miss.
    ///
    /// A `Some` result from `fetch` is stored; `None` is not. Implementations
    /// may coalesce concurrent misses for the same key into one fetch.
    async fn get_or_compute<F, Fut>(&self, code: &ShortCode, fetch: F) -> Result<Option<UrlRecord>>
    where
        F: FnOnce(&ShortCode) -> Fut + Send,
        Fut: Future<Output = Result<Option<UrlRecord>>> + Send,
    {
        if let Some(record) = self.get_url(code).await? {
            return Ok(Some(record));
        }

        let fetched = fetch(code).await?;
        if let Some(record) = &fetched {
            self.set_url(code, record).await?;
        }
        Ok(fetched)
    }
}
