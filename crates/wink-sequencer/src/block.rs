use async_trait::async_trait;
use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error};
use typed_builder::TypedBuilder;
use wink_core::sequence::{Result, SequenceStore, Sequencer};
use wink_core::SequencerError;

/// Number of ids reserved from the store per refill.
pub const DEFAULT_BLOCK_SIZE: u64 = 1000;

/// Configures a [`BlockSequencer`].
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct BlockSequencerSettings {
    /// How many ids to reserve from the store at once. Must be non-zero.
    ///
    /// Larger blocks mean fewer store round-trips and larger gaps after a
    /// restart.
    #[builder(default = DEFAULT_BLOCK_SIZE)]
    pub block_size: u64,
}

impl Default for BlockSequencerSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A sequencer that serves ids from blocks reserved in a [`SequenceStore`].
///
/// The common path takes one short lock on the current block. When the block
/// runs dry, a single caller reserves the next one while the others wait on
/// the refill lock and then take from the fresh block.
///
/// If a reservation fails the sequencer stops handing out ids for good:
/// the store may or may not have advanced, and continuing from memory could
/// reissue ids after a restart.
pub struct BlockSequencer<S> {
    store: S,
    block_size: u64,
    current: parking_lot::Mutex<Range<u64>>,
    refill: tokio::sync::Mutex<()>,
    poisoned: AtomicBool,
}

impl<S: SequenceStore> BlockSequencer<S> {
    pub fn new(store: S, settings: BlockSequencerSettings) -> Result<Self> {
        if settings.block_size == 0 {
            return Err(SequencerError::InvalidBlockSize(settings.block_size));
        }

        Ok(Self {
            store,
            block_size: settings.block_size,
            current: parking_lot::Mutex::new(0..0),
            refill: tokio::sync::Mutex::new(()),
            poisoned: AtomicBool::new(false),
        })
    }

    /// Returns `false` once a reservation has failed.
    pub fn is_available(&self) -> bool {
        !self.poisoned.load(Ordering::Acquire)
    }

    fn take(&self) -> Option<u64> {
        self.current.lock().next()
    }

    fn ensure_available(&self) -> Result<()> {
        if self.is_available() {
            Ok(())
        } else {
            Err(SequencerError::Unavailable(
                "a previous block reservation failed".to_string(),
            ))
        }
    }

    async fn refill_and_take(&self) -> Result<u64> {
        let _refill = self.refill.lock().await;

        // Another caller may have refilled or failed while we waited.
        self.ensure_available()?;
        if let Some(id) = self.take() {
            return Ok(id);
        }

        match self.store.reserve(self.block_size).await {
            Ok(mut block) => {
                debug!(start = block.start, end = block.end, "reserved id block");
                let Some(id) = block.next() else {
                    self.poisoned.store(true, Ordering::Release);
                    return Err(SequencerError::Checkpoint(
                        "store returned an empty block".to_string(),
                    ));
                };
                *self.current.lock() = block;
                Ok(id)
            }
            Err(e) => {
                self.poisoned.store(true, Ordering::Release);
                error!(error = %e, "id block reservation failed; sequencer disabled");
                match e {
                    SequencerError::Exhausted => Err(SequencerError::Exhausted),
                    other => Err(SequencerError::Unavailable(other.to_string())),
                }
            }
        }
    }
}

#[async_trait]
impl<S: SequenceStore> Sequencer for BlockSequencer<S> {
    async fn next(&self) -> Result<u64> {
        self.ensure_available()?;
        if let Some(id) = self.take() {
            return Ok(id);
        }
        self.refill_and_take().await
    }
}
