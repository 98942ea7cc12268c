use crate::error::Result;
use async_trait::async_trait;
use wink_core::{ShortCode, ShortLink, ShortenParams};

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Shortens a URL and returns the code it is reachable under.
    ///
    /// Submitting the same permanent URL again returns the existing code.
    async fn shorten(&self, params: ShortenParams) -> Result<ShortLink>;

    /// Deletes a short link. Returns `false` if there was no active link.
    async fn delete(&self, code: &ShortCode) -> Result<bool>;
}
