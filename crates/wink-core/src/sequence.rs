use crate::error::SequencerError;
use async_trait::async_trait;
use std::ops::Range;
use std::sync::Arc;

pub type Result<T> = std::result::Result<T, SequencerError>;

/// A source of unique sequence ids.
///
/// `next` never yields the same value twice for the lifetime of the
/// implementation, no matter how many callers race on it. Ids may be skipped.
#[async_trait]
pub trait Sequencer: Send + Sync + 'static {
    async fn next(&self) -> Result<u64>;
}

/// A durable high-water mark for a sequence.
///
/// `reserve` persists the advanced mark before returning, so a block handed
/// out once is never handed out again, even across restarts.
#[async_trait]
pub trait SequenceStore: Send + Sync + 'static {
    /// Reserves `count` consecutive ids and returns them as a half-open range.
    async fn reserve(&self, count: u64) -> Result<Range<u64>>;
}

#[async_trait]
impl<T: Sequencer + ?Sized> Sequencer for Arc<T> {
    async fn next(&self) -> Result<u64> {
        (**self).next().await
    }
}

#[async_trait]
impl<T: SequenceStore + ?Sized> SequenceStore for Arc<T> {
    async fn reserve(&self, count: u64) -> Result<Range<u64>> {
        (**self).reserve(count).await
    }
}
