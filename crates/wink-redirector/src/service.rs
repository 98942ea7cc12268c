use std::sync::Arc;

use crate::redirector::Redirector;
use async_trait::async_trait;
use tracing::{debug, trace};
use wink_core::{ReadRepository, ShortCode, UrlRecord};

/// Service for handling URL redirects.
///
/// Uses a read-only repository to fetch URL records and handles expiration
/// checks. It never touches the sequencer, so lookups keep working when id
/// allocation is down.
#[derive(Debug)]
pub struct RedirectorService<R> {
    repository: Arc<R>,
}

impl<R> Clone for RedirectorService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: ReadRepository> RedirectorService<R> {
    /// Creates a new RedirectorService with the given repository.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Resolves an already parsed short code.
    ///
    /// * `Ok(Some(record))` - The record if found and not expired
    /// * `Ok(None)` - If the code doesn't exist, was deleted or has expired
    /// * `Err(e)` - If there was an error accessing the repository
    pub async fn resolve_code(&self, code: &ShortCode) -> crate::Result<Option<UrlRecord>> {
        trace!(code = %code, "resolving short code");

        match self.repository.get(code).await? {
            Some(record) if record.is_expired() => {
                debug!(code = %code, "record has expired");
                Ok(None)
            }
            Some(record) => {
                debug!(code = %code, url = %record.original_url, "resolved short code");
                Ok(Some(record))
            }
            None => {
                trace!(code = %code, "short code not found");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl<R: ReadRepository> Redirector for RedirectorService<R> {
    async fn resolve(&self, code: &str) -> crate::Result<Option<UrlRecord>> {
        let code = ShortCode::parse(code)?;
        self.resolve_code(&code).await
    }
}
