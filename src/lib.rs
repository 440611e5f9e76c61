//! # N-gram Index
//!
//! An in-memory n-gram full-text search index. It stores a changing
//! collection of text documents and reports every place a query string
//! occurs, without scanning document bodies at query time.
//!
//! ## Features
//!
//! - Positional n-gram postings with exact substring matches
//! - Stable document handles that survive other inserts and removals
//! - Configurable window size, counted in bytes or chars
//! - Thread-safe wrapper with parallel batch search
//!
//! ## Example
//!
//! ```rust
//! use ngram_index::{NgramIndex, Posting};
//!
//! let mut index = NgramIndex::new();
//! let doc = index.insert("abcabc");
//!
//! let results = index.search("bca");
//! assert!(results.contains(&Posting::new(doc, 1)));
//!
//! index.remove(doc).unwrap();
//! assert!(index.search("bca").is_empty());
//! ```

mod config;
mod document;
mod error;
mod index;
mod ngram;
mod ngram_index;
mod posting;
mod search;
mod shared;

// Re-export public API
pub use config::IndexConfig;
pub use document::{DocHandle, DocumentStore};
pub use error::{NgramError, Result};
pub use index::InvertedIndex;
pub use ngram::{NGram, NGramScheme, NGrams, TextUnit, Unit, Units, Windows, WindowsExt};
pub use ngram_index::{IndexStats, NgramIndex};
pub use posting::{Occurrences, Posting, PostingSet};
pub use search::SearchOptions;
pub use shared::SharedIndex;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
