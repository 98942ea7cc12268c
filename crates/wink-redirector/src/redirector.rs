use crate::Result;
use async_trait::async_trait;
use wink_core::UrlRecord;

#[async_trait]
pub trait Redirector: Send + Sync + 'static {
    /// Resolves a short code to its stored URL record.
    ///
    /// Returns `Err(MalformedCode)` if `code` is not a canonical short code
    /// and `None` if the code does not exist, was deleted or has expired.
    async fn resolve(&self, code: &str) -> Result<Option<UrlRecord>>;
}
