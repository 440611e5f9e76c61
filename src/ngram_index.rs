use bytesize::ByteSize;
use log::{debug, warn};

use crate::config::IndexConfig;
use crate::document::{DocHandle, DocumentStore};
use crate::error::{NgramError, Result};
use crate::index::InvertedIndex;
use crate::posting::{Occurrences, Posting};
use crate::search::SearchOptions;

/// Point-in-time counters describing an index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexStats {
    /// Live documents
    pub documents: usize,

    /// Distinct n-grams with at least one posting
    pub distinct_ngrams: usize,

    /// Postings across all n-grams
    pub postings: usize,

    /// Rough footprint of the inverted index
    pub estimated_memory: ByteSize,
}

/// Main entry point for the n-gram index
///
/// Owns the documents and the inverted index over them, keeping the two in
/// step on every insert and remove.
#[derive(Debug, Clone)]
pub struct NgramIndex {
    config: IndexConfig,
    store: DocumentStore,
    index: InvertedIndex,

    /// Set while the memory estimate sits above the configured warning level
    over_memory_warning: bool,
}

impl NgramIndex {
    /// Create a new empty index with the default configuration
    pub fn new() -> Self {
        let config = IndexConfig::default();
        Self {
            index: InvertedIndex::new(config.scheme()),
            store: DocumentStore::new(),
            config,
            over_memory_warning: false,
        }
    }

    /// Create a new empty index from a configuration
    pub fn with_config(config: IndexConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            index: InvertedIndex::new(config.scheme()),
            store: DocumentStore::new(),
            config,
            over_memory_warning: false,
        })
    }

    /// The configuration this index was built with
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Store a copy of `content` and index its n-grams
    pub fn insert(&mut self, content: &str) -> DocHandle {
        let handle = self.store.insert(content);
        let added = self.index.add_postings(handle, content);
        debug!("inserted {handle} with {added} postings");

        if self.config.collect_metrics {
            metrics::counter!("ngram_index.documents_inserted", 1);
            self.record_gauges();
        }
        self.check_memory();

        handle
    }

    /// Remove a document and every posting that references it
    pub fn remove(&mut self, handle: DocHandle) -> Result<()> {
        let content = self.store.content_of(handle)?;
        let removed = self.index.remove_postings(handle, content);
        self.store.remove(handle)?;
        debug!("removed {handle} and {removed} postings");

        if self.config.collect_metrics {
            metrics::counter!("ngram_index.documents_removed", 1);
            self.record_gauges();
        }
        self.check_memory();

        Ok(())
    }

    /// Read-only access to a live document's content
    pub fn content_of(&self, handle: DocHandle) -> Result<&str> {
        self.store.content_of(handle)
    }

    /// Whether `handle` refers to a live document
    pub fn contains_document(&self, handle: DocHandle) -> bool {
        self.store.contains(handle)
    }

    /// Every occurrence of `query` across all documents
    pub fn search(&self, query: &str) -> Occurrences {
        let results = self.index.search(query);
        self.record_search(&results);
        results
    }

    /// Search with a result limit and/or a single-document restriction
    pub fn search_with(&self, query: &str, options: &SearchOptions) -> Result<Occurrences> {
        if let Some(doc) = options.within {
            if !self.store.contains(doc) {
                return Err(NgramError::InvalidHandle(doc));
            }
        }

        let mut results = self.index.search_anchored(query, options.within);
        if let Some(limit) = options.limit {
            results = results.into_iter().take(limit).collect();
        }

        self.record_search(&results);
        Ok(results)
    }

    /// Number of occurrences of `query`
    pub fn count(&self, query: &str) -> usize {
        self.search(query).len()
    }

    /// Whether `query` occurs anywhere
    pub fn matches(&self, query: &str) -> bool {
        !self.index.search(query).is_empty()
    }

    /// The `len` units of text starting at a posting.
    ///
    /// `Ok(None)` when the range runs past the end of the document or, with
    /// byte units, splits a UTF-8 sequence.
    pub fn excerpt(&self, posting: &Posting, len: usize) -> Result<Option<&str>> {
        let content = self.store.content_of(posting.doc)?;
        let unit = self.config.unit;

        let Some(start) = unit.byte_offset(content, posting.offset) else {
            return Ok(None);
        };
        let excerpt = unit
            .byte_offset(&content[start..], len)
            .map(|end| &content[start..start + end]);

        Ok(excerpt)
    }

    /// Get the number of documents in the index
    pub fn document_count(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Iterate over live documents
    pub fn documents(&self) -> impl Iterator<Item = (DocHandle, &str)> + '_ {
        self.store.iter()
    }

    /// Read access to the underlying inverted index
    pub fn inverted_index(&self) -> &InvertedIndex {
        &self.index
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            documents: self.store.len(),
            distinct_ngrams: self.index.gram_count(),
            postings: self.index.posting_count(),
            estimated_memory: self.index.estimated_memory(),
        }
    }

    /// Clear the index. Every outstanding handle becomes invalid.
    pub fn clear(&mut self) {
        self.store.clear();
        self.index.clear();
        self.over_memory_warning = false;
        debug!("cleared index");

        if self.config.collect_metrics {
            self.record_gauges();
        }
    }

    fn record_gauges(&self) {
        metrics::gauge!("ngram_index.documents", self.store.len() as f64);
        metrics::gauge!("ngram_index.postings", self.index.posting_count() as f64);
    }

    fn record_search(&self, results: &Occurrences) {
        if self.config.collect_metrics {
            metrics::counter!("ngram_index.searches", 1);
            metrics::histogram!("ngram_index.search_hits", results.len() as f64);
        }
    }

    fn check_memory(&mut self) {
        let Some(threshold) = self.config.memory_warning else {
            return;
        };

        let estimate = self.index.estimated_memory();
        let over = estimate > threshold;
        if over && !self.over_memory_warning {
            warn!("n-gram index estimated at {estimate}, above the {threshold} warning level");
        }
        self.over_memory_warning = over;
    }
}

impl Default for NgramIndex {
    fn default() -> Self {
        Self::new()
    }
}
