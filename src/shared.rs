use parking_lot::{RwLock, RwLockReadGuard};
use rayon::prelude::*;
use std::sync::Arc;

use crate::config::IndexConfig;
use crate::document::DocHandle;
use crate::error::Result;
use crate::ngram_index::{IndexStats, NgramIndex};
use crate::posting::Occurrences;

/// Thread-safe handle to an [`NgramIndex`].
///
/// Writers hold the lock exclusively; any number of readers may search at
/// once. A search never observes a half-applied insert or remove.
#[derive(Debug, Clone, Default)]
pub struct SharedIndex {
    inner: Arc<RwLock<NgramIndex>>,
}

impl SharedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: IndexConfig) -> Result<Self> {
        Ok(Self::from(NgramIndex::with_config(config)?))
    }

    pub fn insert(&self, content: &str) -> DocHandle {
        self.inner.write().insert(content)
    }

    /// Insert several documents under one write lock
    pub fn insert_all<'a, I>(&self, contents: I) -> Vec<DocHandle>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut index = self.inner.write();
        contents.into_iter().map(|content| index.insert(content)).collect()
    }

    pub fn remove(&self, handle: DocHandle) -> Result<()> {
        self.inner.write().remove(handle)
    }

    /// Owned copy of a document's content
    pub fn content_of(&self, handle: DocHandle) -> Result<String> {
        self.inner.read().content_of(handle).map(str::to_owned)
    }

    pub fn search(&self, query: &str) -> Occurrences {
        self.inner.read().search(query)
    }

    /// Run many queries in parallel against one consistent state
    pub fn search_batch<Q>(&self, queries: &[Q]) -> Vec<Occurrences>
    where
        Q: AsRef<str> + Sync,
    {
        let guard = self.inner.read();
        let index: &NgramIndex = &guard;
        queries
            .par_iter()
            .map(|query| index.search(query.as_ref()))
            .collect()
    }

    /// Hold a read lock across several calls; writers wait until it is dropped
    pub fn snapshot(&self) -> RwLockReadGuard<'_, NgramIndex> {
        self.inner.read()
    }

    pub fn document_count(&self) -> usize {
        self.inner.read().document_count()
    }

    pub fn stats(&self) -> IndexStats {
        self.inner.read().stats()
    }

    pub fn clear(&self) {
        self.inner.write().clear();
    }
}

impl From<NgramIndex> for SharedIndex {
    fn from(index: NgramIndex) -> Self {
        Self {
            inner: Arc::new(RwLock::new(index)),
        }
    }
}
