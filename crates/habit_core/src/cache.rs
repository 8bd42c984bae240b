use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::debug;

use crate::document::PeriodDocument;
use crate::period::PeriodId;
use crate::store::PeriodStore;

/// Session-local copies of every period touched so far, keyed
/// `"{mode}:{id}"`.
///
/// The cache owns the store: a period is read from disk at most once per
/// session and every later access goes through the cached copy. Edits made
/// through [`modify`](Self::modify) are written through to the store.
pub struct PeriodCache {
    store: PeriodStore,
    entries: RwLock<HashMap<String, PeriodDocument>>,
}

impl PeriodCache {
    pub fn new(store: PeriodStore) -> Self {
        Self {
            store,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn key(id: &PeriodId) -> String {
        format!("{}:{}", id.mode(), id)
    }

    pub fn store(&self) -> &PeriodStore {
        &self.store
    }

    /// Returns the cached document, loading it from the store on a miss.
    pub fn get(&self, id: &PeriodId) -> PeriodDocument {
        let key = Self::key(id);
        if let Some(doc) = self.entries.read().get(&key) {
            debug!(%key, "period cache hit");
            return doc.clone();
        }
        let mut entries = self.entries.write();
        Self::load_entry(&mut entries, &self.store, id).clone()
    }

    /// Overwrites the cached document without touching storage.
    pub fn put(&self, id: &PeriodId, doc: PeriodDocument) {
        self.entries.write().insert(Self::key(id), doc);
    }

    /// Applies `edit` to the cached copy of `id` and writes the result
    /// through to storage when the document changed.
    ///
    /// An `Err` from `edit` skips the write. Edits must not touch the
    /// document before deciding to fail.
    pub fn modify<T, E>(
        &self,
        id: &PeriodId,
        edit: impl FnOnce(&mut PeriodDocument) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut entries = self.entries.write();
        let doc = Self::load_entry(&mut entries, &self.store, id);
        let before = doc.clone();
        let value = edit(&mut *doc)?;
        if *doc != before {
            self.store.write(id, doc);
        }
        Ok(value)
    }

    pub fn contains(&self, id: &PeriodId) -> bool {
        self.entries.read().contains_key(&Self::key(id))
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn load_entry<'a>(
        entries: &'a mut HashMap<String, PeriodDocument>,
        store: &PeriodStore,
        id: &PeriodId,
    ) -> &'a mut PeriodDocument {
        entries.entry(Self::key(id)).or_insert_with(|| {
            debug!(period = %id, "period cache miss");
            store.read(id)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;
    use std::sync::Arc;

    use super::*;
    use crate::notifications::MemoryNotifier;
    use crate::storage::FsAdapter;

    fn cache_in(dir: &std::path::Path) -> PeriodCache {
        PeriodCache::new(PeriodStore::new(
            dir,
            Arc::new(FsAdapter),
            Arc::new(MemoryNotifier::new()),
        ))
    }

    #[test]
    fn keys_include_mode() {
        let id: PeriodId = "2024-03-W2".parse().unwrap();
        assert_eq!(PeriodCache::key(&id), "week:2024-03-W2");
    }

    #[test]
    fn cached_copy_wins_over_disk() {
        let temp = tempfile::tempdir().unwrap();
        let cache = cache_in(temp.path());
        let id: PeriodId = "2024-03".parse().unwrap();
        assert!(cache.is_empty());
        assert!(cache.get(&id).habits.is_empty());

        let path = cache.store().path_for(&id);
        std::fs::write(&path, r#"{"habits": ["Edited outside"]}"#).unwrap();
        assert!(cache.get(&id).habits.is_empty());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn put_prepopulates_unvisited_period() {
        let temp = tempfile::tempdir().unwrap();
        let cache = cache_in(temp.path());
        let id: PeriodId = "2024-04".parse().unwrap();
        let mut doc = PeriodDocument::new();
        doc.habits.push("Read".into());
        doc.order.push("Read".into());
        cache.put(&id, doc.clone());
        assert!(cache.contains(&id));
        assert_eq!(cache.get(&id), doc);
        assert!(!cache.store().path_for(&id).exists());
    }

    #[test]
    fn unchanged_edit_skips_write() {
        let temp = tempfile::tempdir().unwrap();
        let cache = cache_in(temp.path());
        let id: PeriodId = "2024-03".parse().unwrap();
        cache.get(&id);
        let path = cache.store().path_for(&id);
        std::fs::remove_file(&path).unwrap();

        cache
            .modify(&id, |_doc| Ok::<_, Infallible>(()))
            .unwrap();
        assert!(!path.exists());

        cache
            .modify(&id, |doc| {
                doc.habits.push("Read".into());
                doc.order.push("Read".into());
                Ok::<_, Infallible>(())
            })
            .unwrap();
        assert!(path.exists());
    }
}
