use async_trait::async_trait;
use jiff::Timestamp;
use tokio::sync::RwLock;
use tracing::{trace, warn};
use wink_core::repository::Result;
use wink_core::{CacheError, ReadRepository, Repository, ShortCode, StorageError, UrlCache, UrlRecord};

/// A repository decorator that adds read-through caching.
///
/// This implementation composes any [`ReadRepository`] with any [`UrlCache`]
/// implementation. Reads check the cache first and fall back to the inner
/// repository; found records are cached. When the inner repository is
/// writable, writes pass through and deletes evict the cached entry.
///
/// A failing cache never fails a read: the inner repository is asked
/// directly instead.
///
/// Cache lookups hold `loads` shared and deletes hold it exclusively, so a
/// load that read a record before it was deleted has finished filling the
/// cache by the time the delete evicts it.
#[derive(Debug)]
pub struct CachedRepository<R, C> {
    inner: R,
    cache: C,
    loads: RwLock<()>,
}

impl<R: ReadRepository, C: UrlCache> CachedRepository<R, C> {
    /// Creates a new cached repository decorator.
    pub fn new(inner: R, cache: C) -> Self {
        Self {
            inner,
            cache,
            loads: RwLock::new(()),
        }
    }

    /// Evicts a cached entry.
    pub async fn invalidate(&self, code: &ShortCode) -> Result<()> {
        trace!(code = %code, "invalidating cache entry");
        self.cache
            .del(code)
            .await
            .map_err(|e| StorageError::Operation(e.to_string()))
    }
}

#[async_trait]
impl<R: ReadRepository, C: UrlCache> ReadRepository for CachedRepository<R, C> {
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        let loaded = {
            let _load = self.loads.read().await;
            self.cache
                .get_or_compute(code, |c| {
                    let code = c.clone();
                    async move {
                        trace!(code = %code, "loading from inner repository");
                        self.inner.get(&code).await.map_err(CacheError::from)
                    }
                })
                .await
        };

        let record = match loaded {
            Ok(record) => record,
            Err(CacheError::Loader(e)) => return Err(e),
            Err(e) => {
                warn!(code = %code, error = %e, "cache error, falling back to inner repository");
                self.inner.get(code).await?
            }
        };

        // A cached record can outlive its expiry.
        let now = Timestamp::now();
        Ok(record.filter(|record| !record.is_expired_at(now)))
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        match self.cache.get_url(code).await {
            Ok(Some(_)) => return Ok(true),
            Ok(None) => {}
            Err(e) => {
                warn!(code = %code, error = %e, "cache error on existence check, falling back to inner repository");
            }
        }

        self.inner.exists(code).await
    }
}

#[async_trait]
impl<R: Repository, C: UrlCache> Repository for CachedRepository<R, C> {
    async fn insert(&self, code: &ShortCode, record: UrlRecord) -> Result<()> {
        self.inner.insert(code, record).await
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<ShortCode>> {
        self.inner.find_by_url(url).await
    }

    async fn delete(&self, code: &ShortCode) -> Result<bool> {
        let _exclusive = self.loads.write().await;

        let deleted = self.inner.delete(code).await?;
        if let Err(e) = self.invalidate(code).await {
            warn!(code = %code, error = %e, "failed to evict deleted code from cache");
        }
        Ok(deleted)
    }

    async fn purge_expired(&self, now: Timestamp) -> Result<usize> {
        self.inner.purge_expired(now).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MokaUrlCache;
    use jiff::SignedDuration;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Notify;
    use wink_storage::InMemoryRepository;

    /// A cache that fails every operation.
    struct DownCache;

    #[async_trait]
    impl UrlCache for DownCache {
        async fn get_url(&self, _code: &ShortCode) -> wink_core::cache::Result<Option<UrlRecord>> {
            Err(CacheError::Unavailable("connection refused".to_string()))
        }

        async fn set_url(
            &self,
            _code: &ShortCode,
            _record: &UrlRecord,
        ) -> wink_core::cache::Result<()> {
            Err(CacheError::Unavailable("connection refused".to_string()))
        }

        async fn del(&self, _code: &ShortCode) -> wink_core::cache::Result<()> {
            Err(CacheError::Unavailable("connection refused".to_string()))
        }
    }

    /// Parks the first `get` after it has read the inner record, until
    /// `release` is notified.
    #[derive(Default)]
    struct GatedRepository {
        inner: InMemoryRepository,
        gated: AtomicBool,
        loading: Notify,
        release: Notify,
    }

    #[async_trait]
    impl ReadRepository for GatedRepository {
        async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
            let record = self.inner.get(code).await?;
            if !self.gated.swap(true, Ordering::SeqCst) {
                self.loading.notify_one();
                self.release.notified().await;
            }
            Ok(record)
        }

        async fn exists(&self, code: &ShortCode) -> Result<bool> {
            self.inner.exists(code).await
        }
    }

    #[async_trait]
    impl Repository for GatedRepository {
        async fn insert(&self, code: &ShortCode, record: UrlRecord) -> Result<()> {
            self.inner.insert(code, record).await
        }

        async fn find_by_url(&self, url: &str) -> Result<Option<ShortCode>> {
            self.inner.find_by_url(url).await
        }

        async fn delete(&self, code: &ShortCode) -> Result<bool> {
            self.inner.delete(code).await
        }

        async fn purge_expired(&self, now: Timestamp) -> Result<usize> {
            self.inner.purge_expired(now).await
        }
    }

    fn code(s: &str) -> ShortCode {
        ShortCode::parse(s).unwrap()
    }

    fn test_record(url: &str, expire_at: Option<Timestamp>) -> UrlRecord {
        UrlRecord {
            id: 7,
            original_url: url.to_string(),
            created_at: Timestamp::now(),
            expire_at,
        }
    }

    fn test_service() -> (
        CachedRepository<InMemoryRepository, MokaUrlCache>,
        MokaUrlCache,
    ) {
        let inner = InMemoryRepository::new();
        let cache = MokaUrlCache::new();
        let cached = CachedRepository::new(inner, cache.clone());
        (cached, cache)
    }

    #[tokio::test]
    async fn get_populates_cache() {
        let (cached, cache) = test_service();
        let c = code("abc123");
        let record = test_record("https://example.com", None);

        cached.insert(&c, record.clone()).await.unwrap();
        assert_eq!(cache.get_url(&c).await.unwrap(), None);

        assert_eq!(cached.get(&c).await.unwrap(), Some(record.clone()));
        assert_eq!(cache.get_url(&c).await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn get_from_cache_when_cache_hit() {
        let (cached, cache) = test_service();
        let c = code("abc123");
        let record = test_record("https://example.com", None);

        // Only the cache knows about this code.
        cache.set_url(&c, &record).await.unwrap();

        assert_eq!(cached.get(&c).await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn miss_does_not_shadow_later_insert() {
        let (cached, _cache) = test_service();
        let c = code("b7");

        assert_eq!(cached.get(&c).await.unwrap(), None);

        let record = test_record("https://example.com/a/b?c=1", None);
        cached.insert(&c, record.clone()).await.unwrap();
        assert_eq!(cached.get(&c).await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn expired_cached_record_is_not_returned() {
        let (cached, cache) = test_service();
        let c = code("abc123");
        let expired = Timestamp::now() - SignedDuration::from_secs(1);

        cache
            .set_url(&c, &test_record("https://example.com", Some(expired)))
            .await
            .unwrap();

        assert_eq!(cached.get(&c).await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_evicts_cached_record() {
        let (cached, cache) = test_service();
        let c = code("abc123");

        cached
            .insert(&c, test_record("https://example.com", None))
            .await
            .unwrap();
        assert!(cached.get(&c).await.unwrap().is_some());

        assert!(cached.delete(&c).await.unwrap());
        assert_eq!(cache.get_url(&c).await.unwrap(), None);
        assert_eq!(cached.get(&c).await.unwrap(), None);
        assert!(cached.exists(&c).await.unwrap());
    }

    #[tokio::test]
    async fn exists_checks_inner_when_not_in_cache() {
        let (cached, _cache) = test_service();
        let c = code("abc123");

        assert!(!cached.exists(&c).await.unwrap());
        cached
            .insert(&c, test_record("https://example.com", None))
            .await
            .unwrap();
        assert!(cached.exists(&c).await.unwrap());
    }

    #[tokio::test]
    async fn find_by_url_passes_through() {
        let (cached, _cache) = test_service();
        let c = code("abc123");

        cached
            .insert(&c, test_record("https://example.com", None))
            .await
            .unwrap();
        assert_eq!(
            cached.find_by_url("https://example.com").await.unwrap(),
            Some(c)
        );
    }

    #[tokio::test]
    async fn broken_cache_falls_back_to_inner() {
        let cached = CachedRepository::new(InMemoryRepository::new(), DownCache);
        let c = code("abc123");
        let record = test_record("https://example.com", None);

        cached.insert(&c, record.clone()).await.unwrap();

        assert_eq!(cached.get(&c).await.unwrap(), Some(record));
        assert!(cached.exists(&c).await.unwrap());
        assert!(cached.delete(&c).await.unwrap());
        assert!(cached.invalidate(&c).await.is_err());
    }

    #[tokio::test]
    async fn delete_during_load_does_not_resurrect_code() {
        let cache = MokaUrlCache::new();
        let cached = Arc::new(CachedRepository::new(
            GatedRepository::default(),
            cache.clone(),
        ));
        let c = code("b7");
        cached
            .insert(&c, test_record("https://example.com/", None))
            .await
            .unwrap();

        let load = tokio::spawn({
            let cached = Arc::clone(&cached);
            let c = c.clone();
            async move { cached.get(&c).await }
        });
        cached.inner.loading.notified().await;

        let delete = tokio::spawn({
            let cached = Arc::clone(&cached);
            let c = c.clone();
            async move { cached.delete(&c).await }
        });
        // The delete waits for the parked load.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!delete.is_finished());

        cached.inner.release.notify_one();
        load.await.unwrap().unwrap();
        assert!(delete.await.unwrap().unwrap());

        assert_eq!(cache.get_url(&c).await.unwrap(), None);
        assert_eq!(cached.get(&c).await.unwrap(), None);
    }
}
