//! Redirector service library with caching support.
//!
//! This crate provides a [`RedirectorService`] that resolves short codes
//! to their original URLs. It uses the Repository decorator pattern to
//! add transparent caching via an in-memory (Moka) cache.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use wink_redirector::{CachedRepository, MokaUrlCache, Redirector, RedirectorService};
//! use wink_storage::InMemoryRepository;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let cached_repo = CachedRepository::new(InMemoryRepository::new(), MokaUrlCache::new());
//! let service = RedirectorService::new(Arc::new(cached_repo));
//!
//! if let Some(record) = service.resolve("b7").await? {
//!     println!("Redirect to: {}", record.original_url);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod error;
pub mod redirector;
pub mod repository;
pub mod service;

pub use cache::{CacheConfig, MokaUrlCache};
pub use error::{RedirectorError, Result};
pub use redirector::Redirector;
pub use repository::CachedRepository;
pub use service::RedirectorService;
