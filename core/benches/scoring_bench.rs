use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;
use trecrank_core::{InvertedIndex, Searcher, SimilarityKind, Tokenizer};

const WORDS: &[&str] = &[
    "mining", "gold", "silver", "coal", "federal", "program", "food", "stamps", "energy", "policy",
    "water", "rights", "education", "grants", "health", "insurance", "tax", "reform", "trade", "export",
];

fn synthetic_text(seed: usize, len: usize) -> String {
    (0..len)
        .map(|i| WORDS[(seed * 31 + i * 7 + i * i) % WORDS.len()])
        .collect::<Vec<_>>()
        .join(" ")
}

fn build(tokenizer: &Tokenizer, docs: usize) -> InvertedIndex {
    let mut index = InvertedIndex::new();
    for d in 0..docs {
        index.add_document(format!("D{d:05}"), tokenizer.tokenize(&synthetic_text(d, 200)));
    }
    index
}

fn bench_tokenize(c: &mut Criterion) {
    let tokenizer = Tokenizer::default();
    let text = synthetic_text(7, 5_000);
    c.bench_function("tokenize_5k_words", |b| b.iter(|| tokenizer.tokenize(&text)));
}

fn bench_scoring(c: &mut Criterion) {
    let tokenizer = Arc::new(Tokenizer::default());
    let index = build(&tokenizer, 2_000);
    for kind in [SimilarityKind::Tf, SimilarityKind::TfIdf, SimilarityKind::Bm25] {
        let searcher = Searcher::new(index.clone(), tokenizer.clone(), kind);
        c.bench_function(&format!("query_{}", kind.name().to_lowercase()), |b| {
            b.iter(|| searcher.run_query("gold mining federal energy policy", Some(10)))
        });
    }
}

criterion_group!(benches, bench_tokenize, bench_scoring);
criterion_main!(benches);
