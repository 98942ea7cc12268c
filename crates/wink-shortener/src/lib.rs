//! URL shortener service implementation.
//!
//! This crate provides the create path of the engine: URL normalization,
//! idempotent lookup, id allocation and storage. Core types are re-exported
//! from `wink_core`.

pub mod error;
pub mod normalize;
pub mod service;
pub mod shortener;

pub use error::ShortenerError;
pub use normalize::normalize_url;
pub use service::ShortenerService;
pub use shortener::Shortener;
pub use wink_core::{ExpirationPolicy, ShortLink, ShortenParams};
