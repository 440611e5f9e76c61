use log::trace;

use crate::document::DocHandle;
use crate::index::InvertedIndex;
use crate::posting::{Occurrences, Posting, PostingSet};

/// Search configuration options
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Maximum number of occurrences to return, taken in result order (default: unlimited)
    pub limit: Option<usize>,

    /// Only report occurrences inside this document (default: all documents)
    pub within: Option<DocHandle>,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of occurrences
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Restrict the search to a single document
    pub fn within(mut self, doc: DocHandle) -> Self {
        self.within = Some(doc);
        self
    }
}

/// Posting set of one query n-gram together with the n-gram's position in the query
struct Aligned<'a> {
    shift: usize,
    postings: &'a PostingSet,
}

impl Aligned<'_> {
    /// Whether this n-gram occurs where a query anchored at `anchor` needs it
    fn supports(&self, anchor: &Posting) -> bool {
        self.postings
            .contains(&Posting::new(anchor.doc, anchor.offset + self.shift))
    }
}

/// Shift every posting back by `shift`, yielding the query start each one implies.
///
/// Postings that start before `shift` cannot anchor the query and are dropped.
pub(crate) fn normalize(postings: &PostingSet, shift: usize) -> Occurrences {
    postings
        .iter()
        .filter_map(|posting| {
            posting
                .offset
                .checked_sub(shift)
                .map(|anchor| Posting::new(posting.doc, anchor))
        })
        .collect()
}

impl InvertedIndex {
    /// Find every occurrence of `query` across the indexed documents.
    ///
    /// A query shorter than one n-gram has no positional evidence and yields
    /// an empty result.
    pub fn search(&self, query: &str) -> Occurrences {
        self.search_anchored(query, None)
    }

    /// Positional intersection of the query's n-grams, optionally restricted to one document
    pub(crate) fn search_anchored(&self, query: &str, within: Option<DocHandle>) -> Occurrences {
        let mut aligned: Vec<Aligned<'_>> = self
            .scheme()
            .decompose(query)
            .map(|(shift, gram)| Aligned {
                shift,
                postings: self.postings_for(&gram),
            })
            .collect();

        // Smallest set first keeps the candidate list short
        aligned.sort_by_key(|entry| entry.postings.len());

        let Some((seed, rest)) = aligned.split_first() else {
            trace!("query {query:?} is shorter than one n-gram");
            return Occurrences::new();
        };

        trace!(
            "query {query:?}: {} n-grams, smallest posting set has {} entries",
            aligned.len(),
            seed.postings.len()
        );

        let mut candidates = normalize(seed.postings, seed.shift);
        if let Some(doc) = within {
            candidates.retain(|anchor| anchor.doc == doc);
        }

        for next in rest {
            if candidates.is_empty() {
                break;
            }
            candidates.retain(|anchor| next.supports(anchor));
        }

        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentStore;
    use crate::ngram::{NGramScheme, TextUnit};

    fn create_test_index(docs: &[&str]) -> (DocumentStore, InvertedIndex, Vec<DocHandle>) {
        let mut store = DocumentStore::new();
        let mut index = InvertedIndex::default();
        let handles = docs
            .iter()
            .map(|content| {
                let handle = store.insert(content);
                index.add_postings(handle, content);
                handle
            })
            .collect();
        (store, index, handles)
    }

    #[test]
    fn test_search_exact_match() {
        let (_store, index, handles) = create_test_index(&["abcabc"]);

        let results = index.search("bca");
        assert_eq!(results.into_iter().collect::<Vec<_>>(), vec![Posting::new(handles[0], 1)]);

        let results = index.search("abc");
        assert_eq!(
            results.into_iter().collect::<Vec<_>>(),
            vec![Posting::new(handles[0], 0), Posting::new(handles[0], 3)]
        );
    }

    #[test]
    fn test_search_requires_every_ngram_aligned() {
        // Both trigrams of "abcd" exist, but never next to each other
        let (_store, index, _) = create_test_index(&["abc bcd"]);
        assert!(index.search("abcd").is_empty());

        let (_store, index, handles) = create_test_index(&["abc bcd", "xabcdx"]);
        let results: Vec<_> = index.search("abcd").into_iter().collect();
        assert_eq!(results, vec![Posting::new(handles[1], 1)]);
    }

    #[test]
    fn test_search_missing_and_short_queries() {
        let (_store, index, _) = create_test_index(&["abcabc"]);

        assert!(index.search("xyz").is_empty());
        assert!(index.search("ab").is_empty());
        assert!(index.search("").is_empty());
    }

    #[test]
    fn test_search_repeated_ngram_in_query() {
        let (_store, index, handles) = create_test_index(&["aaaa", "aaa"]);

        let results: Vec<_> = index.search("aaaa").into_iter().collect();
        assert_eq!(results, vec![Posting::new(handles[0], 0)]);

        let results: Vec<_> = index.search("aaa").into_iter().collect();
        assert_eq!(
            results,
            vec![
                Posting::new(handles[0], 0),
                Posting::new(handles[1], 0),
                Posting::new(handles[0], 1),
            ]
        );
    }

    #[test]
    fn test_search_anchored_to_one_document() {
        let (_store, index, handles) = create_test_index(&["needle", "a needle"]);

        let results: Vec<_> = index
            .search_anchored("needle", Some(handles[1]))
            .into_iter()
            .collect();
        assert_eq!(results, vec![Posting::new(handles[1], 2)]);
    }

    #[test]
    fn test_matches_fold_over_normalized_sets() {
        let (_store, index, _) =
            create_test_index(&["banana bandana", "cabana", "ananas", "nanana"]);

        for query in ["ana", "anan", "banana", "nana", "andan", "abana"] {
            let folded = index
                .scheme()
                .decompose(query)
                .map(|(shift, gram)| normalize(index.postings_for(&gram), shift))
                .reduce(|acc, next| acc.intersection(&next).copied().collect())
                .unwrap_or_default();

            assert_eq!(index.search(query), folded, "query {query:?}");
        }
    }

    #[test]
    fn test_search_with_bigram_bytes() {
        let mut store = DocumentStore::new();
        let mut index = InvertedIndex::new(NGramScheme::new(2, TextUnit::Byte));
        let doc = store.insert("héhé");
        index.add_postings(doc, "héhé");

        // Byte offsets: h=0, é=1..3, h=3, é=4..6
        let results: Vec<_> = index.search("hé").into_iter().collect();
        assert_eq!(results, vec![Posting::new(doc, 0), Posting::new(doc, 3)]);
    }
}
