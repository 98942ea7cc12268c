//! Sequence id allocation for short codes.
//!
//! [`AtomicSequencer`] is a process-lifetime counter. [`BlockSequencer`]
//! hands out ids from blocks reserved in a durable [`SequenceStore`], so a
//! restart can skip ids but never reissue one.

mod atomic;
mod block;
mod memory;

pub use atomic::AtomicSequencer;
pub use block::{BlockSequencer, BlockSequencerSettings, DEFAULT_BLOCK_SIZE};
pub use memory::InMemorySequenceStore;
pub use wink_core::sequence::{SequenceStore, Sequencer};
pub use wink_core::SequencerError;
