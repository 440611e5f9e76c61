//! Indexing and query benchmark
//!
//! Measures insert/remove throughput and query latency for queries of
//! different lengths over a synthetic corpus.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ngram_index::{NgramIndex, SharedIndex};

/// Benchmark configuration
struct BenchmarkConfig {
    /// Number of documents to insert
    doc_count: usize,

    /// Document length in chars
    doc_len: usize,

    /// Random seed for reproducibility
    seed: u64,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            doc_count: 2_000,
            doc_len: 500,
            seed: 42,
        }
    }
}

fn corpus(config: &BenchmarkConfig) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    (0..config.doc_count)
        .map(|_| {
            (&mut rng)
                .sample_iter(&Alphanumeric)
                .take(config.doc_len)
                .map(char::from)
                .collect()
        })
        .collect()
}

fn bench_insert_remove(c: &mut Criterion) {
    let docs = corpus(&BenchmarkConfig::default());

    c.bench_function("insert_remove_document", |b| {
        let mut index = NgramIndex::new();
        let mut next = 0;
        b.iter(|| {
            let handle = index.insert(black_box(&docs[next % docs.len()]));
            next += 1;
            index.remove(handle).ok();
        })
    });
}

fn bench_search(c: &mut Criterion) {
    let docs = corpus(&BenchmarkConfig::default());
    let mut index = NgramIndex::new();
    for doc in &docs {
        index.insert(doc);
    }

    let mut group = c.benchmark_group("search");
    for len in [3, 5, 10, 40] {
        // A substring that is known to occur at least once
        let query = docs[docs.len() / 2][100..100 + len].to_string();
        group.bench_with_input(BenchmarkId::from_parameter(len), &query, |b, query| {
            b.iter(|| index.search(black_box(query)))
        });
    }
    group.finish();
}

fn bench_search_batch(c: &mut Criterion) {
    let docs = corpus(&BenchmarkConfig::default());
    let shared = SharedIndex::new();
    shared.insert_all(docs.iter().map(String::as_str));

    let queries: Vec<&str> = docs.iter().take(64).map(|doc| &doc[200..208]).collect();

    c.bench_function("search_batch_64", |b| {
        b.iter(|| shared.search_batch(black_box(&queries)))
    });
}

criterion_group!(benches, bench_insert_remove, bench_search, bench_search_batch);
criterion_main!(benches);
