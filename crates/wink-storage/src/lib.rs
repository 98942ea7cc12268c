pub mod memory;
pub mod sequence;
pub mod sqlite;
pub mod sweeper;

pub use memory::InMemoryRepository;
pub use sequence::SqliteSequenceStore;
pub use sqlite::{open_pool, SqliteRepository};
pub use sweeper::Sweeper;
pub use wink_core::repository::{ReadRepository, Repository};
pub use wink_core::StorageError;
