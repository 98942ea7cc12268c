use crate::error::Result;
use crate::normalize::normalize_url;
use crate::shortener::Shortener;
use async_trait::async_trait;
use jiff::Timestamp;
use std::sync::Arc;
use tracing::{debug, info};
use wink_core::{
    Repository, Sequencer, ShortCode, ShortCodeCodec, ShortLink, ShortenParams, UrlRecord,
};

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a `Repository`, a `Sequencer` and a codec to handle:
/// - URL normalization
/// - Idempotent reuse of permanent links
/// - Expiration policy conversion
///
/// Two concurrent requests for the same unseen URL may both allocate a
/// code. Both stay valid; only the first one is found by later requests.
#[derive(Debug)]
pub struct ShortenerService<R, S> {
    repository: Arc<R>,
    sequencer: Arc<S>,
    codec: ShortCodeCodec,
}

impl<R, S> Clone for ShortenerService<R, S> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            sequencer: Arc::clone(&self.sequencer),
            codec: self.codec,
        }
    }
}

impl<R: Repository, S: Sequencer> ShortenerService<R, S> {
    /// Creates a new `ShortenerService` that emits plain base62 codes.
    pub fn new(repository: Arc<R>, sequencer: Arc<S>) -> Self {
        Self::with_codec(repository, sequencer, ShortCodeCodec::plain())
    }

    pub fn with_codec(repository: Arc<R>, sequencer: Arc<S>, codec: ShortCodeCodec) -> Self {
        Self {
            repository,
            sequencer,
            codec,
        }
    }

    /// Returns the active permanent link for `url`, if one exists.
    async fn existing_link(&self, url: &str) -> Result<Option<ShortLink>> {
        let Some(code) = self.repository.find_by_url(url).await? else {
            return Ok(None);
        };
        // The link may have been deleted between the two reads.
        let record = self.repository.get(&code).await?;
        Ok(record.map(|record| ShortLink { code, record }))
    }
}

#[async_trait]
impl<R: Repository, S: Sequencer> Shortener for ShortenerService<R, S> {
    async fn shorten(&self, params: ShortenParams) -> Result<ShortLink> {
        let original_url = normalize_url(&params.original_url)?;
        let now = Timestamp::now();
        let expire_at = params.expiration.expire_at(now)?;

        if expire_at.is_none() {
            if let Some(link) = self.existing_link(&original_url).await? {
                debug!(code = %link.code, url = %original_url, "reusing existing short link");
                return Ok(link);
            }
        }

        let id = self.sequencer.next().await?;
        let code = self.codec.encode(id);
        let record = UrlRecord {
            id,
            original_url,
            created_at: now,
            expire_at,
        };

        self.repository.insert(&code, record.clone()).await?;
        info!(code = %code, id, url = %record.original_url, "created short link");

        Ok(ShortLink { code, record })
    }

    async fn delete(&self, code: &ShortCode) -> Result<bool> {
        let deleted = self.repository.delete(code).await?;
        if deleted {
            info!(code = %code, "deleted short link");
        }
        Ok(deleted)
    }
}
