use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use wink_core::sequence::{Result, Sequencer};
use wink_core::SequencerError;

/// A sequencer backed by a single atomic counter.
///
/// Guarantees uniqueness within a single instance and keeps no durable
/// state, so it suits in-memory deployments and tests. To resume after a
/// restart, start from a known offset with [`AtomicSequencer::with_offset`].
#[derive(Debug, Default)]
pub struct AtomicSequencer {
    counter: AtomicU64,
}

impl AtomicSequencer {
    pub fn new() -> Self {
        Self::with_offset(0)
    }

    /// Creates a sequencer whose first id is `offset`.
    pub fn with_offset(offset: u64) -> Self {
        Self {
            counter: AtomicU64::new(offset),
        }
    }

    fn next_id(&self) -> Result<u64> {
        self.counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                current.checked_add(1)
            })
            .map_err(|_| SequencerError::Exhausted)
    }
}

#[async_trait]
impl Sequencer for AtomicSequencer {
    async fn next(&self) -> Result<u64> {
        self.next_id()
    }
}
