use async_trait::async_trait;
use parking_lot::Mutex;
use std::ops::Range;
use wink_core::sequence::{Result, SequenceStore};
use wink_core::SequencerError;

/// A [`SequenceStore`] that keeps its high-water mark in memory.
///
/// Nothing survives a restart, so pair it only with storage that does not
/// survive one either.
#[derive(Debug, Default)]
pub struct InMemorySequenceStore {
    next: Mutex<u64>,
}

impl InMemorySequenceStore {
    pub fn new() -> Self {
        Self::with_offset(0)
    }

    pub fn with_offset(offset: u64) -> Self {
        Self {
            next: Mutex::new(offset),
        }
    }

    /// The first id that has not been reserved yet.
    pub fn high_water_mark(&self) -> u64 {
        *self.next.lock()
    }
}

#[async_trait]
impl SequenceStore for InMemorySequenceStore {
    async fn reserve(&self, count: u64) -> Result<Range<u64>> {
        let mut next = self.next.lock();
        let start = *next;
        let end = start.checked_add(count).ok_or(SequencerError::Exhausted)?;
        *next = end;
        Ok(start..end)
    }
}
