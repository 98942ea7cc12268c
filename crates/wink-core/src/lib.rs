//! Core types and traits for the Wink short-link engine.
//!
//! This crate provides the encoder that maps sequence ids to short codes,
//! the stored record model, the error taxonomy, and the traits shared by the
//! sequencer, storage, shortener and redirector crates.

pub mod base62;
pub mod cache;
pub mod codec;
pub mod error;
pub mod obfuscator;
pub mod repository;
pub mod sequence;
pub mod shortcode;
pub mod shortener;

pub use cache::UrlCache;
pub use codec::ShortCodeCodec;
pub use error::{CacheError, CoreError, SequencerError, StorageError};
pub use obfuscator::Obfuscator;
pub use repository::{ReadRepository, Repository, ShortLink, UrlRecord};
pub use sequence::{SequenceStore, Sequencer};
pub use shortcode::ShortCode;
pub use shortener::{ExpirationPolicy, ShortenParams};
