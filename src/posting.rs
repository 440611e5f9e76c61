use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::document::DocHandle;

/// One occurrence: `offset` units into the document behind `doc`.
///
/// In the index a posting marks where an n-gram starts; in search results it
/// marks where the whole query starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Posting {
    pub doc: DocHandle,
    pub offset: usize,
}

impl Posting {
    pub fn new(doc: DocHandle, offset: usize) -> Self {
        Self { doc, offset }
    }
}

// Offset first; the handle only breaks ties between documents.
impl Ord for Posting {
    fn cmp(&self, other: &Self) -> Ordering {
        self.offset
            .cmp(&other.offset)
            .then_with(|| self.doc.cmp(&other.doc))
    }
}

impl PartialOrd for Posting {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Ordered set of postings for one n-gram
pub type PostingSet = BTreeSet<Posting>;

/// Search result: every `(document, start offset)` where the query occurs
pub type Occurrences = BTreeSet<Posting>;
