use bytesize::ByteSize;
use rustc_hash::FxHashMap;

use crate::document::DocHandle;
use crate::ngram::{NGram, NGramScheme, Unit};
use crate::posting::{Posting, PostingSet};

static EMPTY_POSTINGS: PostingSet = PostingSet::new();

/// Inverted index mapping each distinct n-gram to the postings where it occurs
#[derive(Debug, Clone)]
pub struct InvertedIndex {
    /// How document content is cut into n-grams
    scheme: NGramScheme,

    /// N-gram to posting set; a key only exists while its set is non-empty
    postings: FxHashMap<NGram, PostingSet>,

    /// Total postings across all keys
    posting_count: usize,
}

impl InvertedIndex {
    /// Create a new empty index using `scheme` for decomposition
    pub fn new(scheme: NGramScheme) -> Self {
        Self {
            scheme,
            postings: FxHashMap::default(),
            posting_count: 0,
        }
    }

    /// The decomposition scheme shared by indexing and querying
    pub fn scheme(&self) -> NGramScheme {
        self.scheme
    }

    /// Record a posting for every n-gram of `content`.
    ///
    /// Returns the number of postings that were not already present.
    pub fn add_postings(&mut self, doc: DocHandle, content: &str) -> usize {
        let mut added = 0;

        for (offset, gram) in self.scheme.decompose(content) {
            if self
                .postings
                .entry(gram)
                .or_default()
                .insert(Posting::new(doc, offset))
            {
                added += 1;
            }
        }

        self.posting_count += added;
        added
    }

    /// Erase the postings `add_postings` recorded for the same `doc` and `content`.
    ///
    /// Returns the number of postings removed.
    pub fn remove_postings(&mut self, doc: DocHandle, content: &str) -> usize {
        let mut removed = 0;

        for (offset, gram) in self.scheme.decompose(content) {
            let Some(samples) = self.postings.get_mut(&gram) else {
                continue;
            };

            if samples.remove(&Posting::new(doc, offset)) {
                removed += 1;
            }

            if samples.is_empty() {
                self.postings.remove(&gram);
            }
        }

        self.posting_count -= removed;
        removed
    }

    /// Postings for `gram`; empty when the n-gram was never indexed
    pub fn postings_for(&self, gram: &NGram) -> &PostingSet {
        self.postings.get(gram).unwrap_or(&EMPTY_POSTINGS)
    }

    /// Whether any document currently contains `gram`
    pub fn contains_gram(&self, gram: &NGram) -> bool {
        self.postings.contains_key(gram)
    }

    /// Number of distinct n-grams
    pub fn gram_count(&self) -> usize {
        self.postings.len()
    }

    /// Number of postings across all n-grams
    pub fn posting_count(&self) -> usize {
        self.posting_count
    }

    /// Whether any posting references `doc`. Scans the whole index.
    pub fn references(&self, doc: DocHandle) -> bool {
        self.postings
            .values()
            .any(|samples| samples.iter().any(|posting| posting.doc == doc))
    }

    /// Rough heap footprint of the key map and posting sets
    pub fn estimated_memory(&self) -> ByteSize {
        let mut size = std::mem::size_of::<Self>();

        // Keys spill to the heap once they outgrow the inline buffer
        for gram in self.postings.keys() {
            size += std::mem::size_of::<NGram>() + std::mem::size_of::<PostingSet>();
            if gram.len() > 4 {
                size += gram.len() * std::mem::size_of::<Unit>();
            }
        }

        size += self.posting_count * std::mem::size_of::<Posting>();

        ByteSize::b(size as u64)
    }

    /// Drop every posting
    pub fn clear(&mut self) {
        self.postings.clear();
        self.posting_count = 0;
    }
}

impl Default for InvertedIndex {
    fn default() -> Self {
        Self::new(NGramScheme::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentStore;
    use crate::ngram::TextUnit;

    fn gram(text: &str) -> NGram {
        NGram::of(text, TextUnit::Char)
    }

    #[test]
    fn test_add_postings() {
        let mut store = DocumentStore::new();
        let doc = store.insert("abcabc");
        let mut index = InvertedIndex::default();

        assert_eq!(index.add_postings(doc, "abcabc"), 4);
        assert_eq!(index.gram_count(), 3);
        assert_eq!(index.posting_count(), 4);

        let abc: Vec<_> = index.postings_for(&gram("abc")).iter().copied().collect();
        assert_eq!(abc, vec![Posting::new(doc, 0), Posting::new(doc, 3)]);

        let bca: Vec<_> = index.postings_for(&gram("bca")).iter().copied().collect();
        assert_eq!(bca, vec![Posting::new(doc, 1)]);
    }

    #[test]
    fn test_add_postings_is_idempotent() {
        let mut store = DocumentStore::new();
        let doc = store.insert("abcd");
        let mut index = InvertedIndex::default();

        assert_eq!(index.add_postings(doc, "abcd"), 2);
        assert_eq!(index.add_postings(doc, "abcd"), 0);
        assert_eq!(index.posting_count(), 2);
    }

    #[test]
    fn test_remove_postings_drops_empty_keys() {
        let mut store = DocumentStore::new();
        let h1 = store.insert("abcabc");
        let h2 = store.insert("xabc");
        let mut index = InvertedIndex::default();
        index.add_postings(h1, "abcabc");
        index.add_postings(h2, "xabc");

        assert_eq!(index.remove_postings(h1, "abcabc"), 4);
        assert!(!index.references(h1));
        assert!(index.references(h2));

        // "abc" survives through h2, "bca" and "cab" are gone
        assert!(index.contains_gram(&gram("abc")));
        assert!(!index.contains_gram(&gram("bca")));
        assert!(!index.contains_gram(&gram("cab")));
        assert_eq!(index.gram_count(), 2);
        assert_eq!(index.posting_count(), 2);
    }

    #[test]
    fn test_absent_gram_has_empty_postings() {
        let index = InvertedIndex::default();
        assert!(index.postings_for(&gram("xyz")).is_empty());
        assert!(!index.contains_gram(&gram("xyz")));
    }

    #[test]
    fn test_short_content_contributes_nothing() {
        let mut store = DocumentStore::new();
        let doc = store.insert("ab");
        let mut index = InvertedIndex::default();

        assert_eq!(index.add_postings(doc, "ab"), 0);
        assert_eq!(index.add_postings(doc, ""), 0);
        assert_eq!(index.gram_count(), 0);
        assert!(!index.references(doc));
    }

    #[test]
    fn test_clear_and_memory_estimate() {
        let mut store = DocumentStore::new();
        let doc = store.insert("the quick brown fox");
        let mut index = InvertedIndex::default();

        let empty = index.estimated_memory();
        index.add_postings(doc, "the quick brown fox");
        assert!(index.estimated_memory() > empty);

        index.clear();
        assert_eq!(index.gram_count(), 0);
        assert_eq!(index.posting_count(), 0);
        assert_eq!(index.estimated_memory(), empty);
    }
}
