use async_trait::async_trait;
use moka::future::Cache;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, trace};
use typed_builder::TypedBuilder;
use wink_core::{CacheError, ShortCode, UrlCache, UrlRecord};

/// Type alias for cache results.
pub type Result<T> = std::result::Result<T, CacheError>;

const DEFAULT_MAX_CAPACITY: u64 = 10_000;

/// Why a single-flight load produced no entry. Never stored by moka.
#[derive(Debug)]
enum Miss {
    Absent,
    Failed(CacheError),
}

/// An in-memory cache implementation using Moka.
///
/// This implementation stores URL records in a concurrent, high-performance
/// in-memory cache. Only found records are stored.
#[derive(Debug, Clone)]
pub struct MokaUrlCache {
    cache: Cache<ShortCode, UrlRecord>,
}

impl MokaUrlCache {
    /// Creates a new Moka URL cache with default settings.
    ///
    /// The cache will have a default maximum capacity of 10,000 entries.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_CAPACITY)
    }

    /// Creates a new Moka URL cache with a custom maximum capacity.
    pub fn with_capacity(max_capacity: u64) -> Self {
        let cache = Cache::builder().max_capacity(max_capacity).build();
        Self { cache }
    }

    /// Creates a new Moka URL cache whose entries expire `ttl` after insertion.
    pub fn with_ttl(max_capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    /// Returns a builder for creating a custom cache configuration.
    pub fn builder() -> CacheConfigBuilder {
        CacheConfig::builder()
    }
}

impl Default for MokaUrlCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UrlCache for MokaUrlCache {
    async fn get_url(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        match self.cache.get(code).await {
            Some(record) => {
                trace!(code = %code, "cache hit");
                Ok(Some(record))
            }
            None => {
                trace!(code = %code, "cache miss");
                Ok(None)
            }
        }
    }

    async fn set_url(&self, code: &ShortCode, record: &UrlRecord) -> Result<()> {
        self.cache.insert(code.clone(), record.clone()).await;
        trace!(code = %code, "cached record");
        Ok(())
    }

    async fn del(&self, code: &ShortCode) -> Result<()> {
        self.cache.invalidate(code).await;
        debug!(code = %code, "evicted record from cache");
        Ok(())
    }

    async fn get_or_compute<F, Fut>(&self, code: &ShortCode, fetch: F) -> Result<Option<UrlRecord>>
    where
        F: FnOnce(&ShortCode) -> Fut + Send,
        Fut: Future<Output = Result<Option<UrlRecord>>> + Send,
    {
        // try_get_with coalesces concurrent loads of one key. A miss is
        // reported as an error so that it is shared with waiters but not kept.
        let loaded = self
            .cache
            .try_get_with(code.clone(), async {
                trace!(code = %code, "cache miss, loading");
                match fetch(code).await {
                    Ok(Some(record)) => Ok(record),
                    Ok(None) => Err(Miss::Absent),
                    Err(e) => Err(Miss::Failed(e)),
                }
            })
            .await;

        match loaded {
            Ok(record) => Ok(Some(record)),
            Err(miss) => match miss.as_ref() {
                Miss::Absent => Ok(None),
                Miss::Failed(e) => Err(e.clone()),
            },
        }
    }
}

/// Configuration for creating a MokaUrlCache with custom settings.
#[derive(Debug, TypedBuilder, Default)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold.
    #[builder(default, setter(strip_option))]
    max_capacity: Option<u64>,
    /// Time-to-live for cache entries.
    #[builder(default, setter(strip_option))]
    ttl: Option<Duration>,
    /// Time-to-idle for cache entries.
    #[builder(default)]
    tti: Option<Duration>,
}

impl From<CacheConfig> for MokaUrlCache {
    fn from(config: CacheConfig) -> Self {
        let mut builder = Cache::builder();

        if let Some(capacity) = config.max_capacity {
            builder = builder.max_capacity(capacity);
        }

        if let Some(ttl) = config.ttl {
            builder = builder.time_to_live(ttl);
        }

        if let Some(tti) = config.tti {
            builder = builder.time_to_idle(tti);
        }

        MokaUrlCache {
            cache: builder.build(),
        }
    }
}
