use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use jiff::Timestamp;
use wink_core::error::StorageError;
use wink_core::repository::{ReadRepository, Repository, Result, UrlRecord};
use wink_core::shortcode::ShortCode;

/// Storage slot for a short code.
///
/// A code that was ever bound keeps its slot forever so it is never
/// handed out again; only the payload goes away.
#[derive(Debug, Clone)]
enum Slot {
    Live(UrlRecord),
    Tombstone,
}

/// In-memory implementation of the repository contract using DashMap.
///
/// DashMap provides better concurrency than RwLock<HashMap> because it
/// uses sharded locks, allowing concurrent reads and writes to different
/// buckets without blocking.
///
/// Locks on `url_index` may be held while reading `storage`, never the
/// other way round.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    storage: DashMap<ShortCode, Slot>,
    url_index: DashMap<String, ShortCode>,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn is_live(&self, code: &ShortCode, now: Timestamp) -> bool {
        self.storage
            .get(code)
            .is_some_and(|slot| matches!(slot.value(), Slot::Live(r) if !r.is_expired_at(now)))
    }

    /// Points `url` at `code` unless it already points at a live code.
    fn index_url(&self, url: String, code: &ShortCode, now: Timestamp) {
        match self.url_index.entry(url) {
            Entry::Vacant(entry) => {
                entry.insert(code.clone());
            }
            Entry::Occupied(mut entry) => {
                if !self.is_live(entry.get(), now) {
                    entry.insert(code.clone());
                }
            }
        }
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        let now = Timestamp::now();

        let record = self.storage.get(code).and_then(|slot| match slot.value() {
            Slot::Live(record) if !record.is_expired_at(now) => Some(record.clone()),
            _ => None,
        });

        Ok(record)
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        Ok(self.storage.contains_key(code))
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert(&self, code: &ShortCode, record: UrlRecord) -> Result<()> {
        let now = Timestamp::now();
        let indexed_url = record.is_permanent().then(|| record.original_url.clone());

        match self.storage.entry(code.clone()) {
            Entry::Occupied(entry) => {
                return match entry.get() {
                    Slot::Live(existing)
                        if existing.original_url == record.original_url
                            && !existing.is_expired_at(now) =>
                    {
                        Ok(())
                    }
                    _ => Err(StorageError::Conflict(code.to_string())),
                };
            }
            Entry::Vacant(entry) => {
                entry.insert(Slot::Live(record));
            }
        }

        if let Some(url) = indexed_url {
            self.index_url(url, code, now);
        }
        Ok(())
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<ShortCode>> {
        let Some(code) = self.url_index.get(url).map(|entry| entry.value().clone()) else {
            return Ok(None);
        };

        Ok(self.is_live(&code, Timestamp::now()).then_some(code))
    }

    async fn delete(&self, code: &ShortCode) -> Result<bool> {
        let now = Timestamp::now();

        let Some(mut slot) = self.storage.get_mut(code) else {
            return Ok(false);
        };
        let Slot::Live(record) = slot.value() else {
            return Ok(false);
        };
        let active = !record.is_expired_at(now);
        let url = record.original_url.clone();
        *slot.value_mut() = Slot::Tombstone;
        drop(slot);

        self.url_index.remove_if(&url, |_, indexed| indexed == code);
        Ok(active)
    }

    async fn purge_expired(&self, now: Timestamp) -> Result<usize> {
        let mut purged = 0;

        for mut slot in self.storage.iter_mut() {
            let expired = matches!(slot.value(), Slot::Live(r) if r.is_expired_at(now));
            if expired {
                *slot.value_mut() = Slot::Tombstone;
                purged += 1;
            }
        }

        Ok(purged)
    }
}
