use super::{add_normalized, l2_norm, ScoreMap, Similarity};
use crate::index::InvertedIndex;
use crate::{DocId, Term};
use std::collections::HashMap;

/// Cosine over `tf * log10(N / df)` document weights.
///
/// Documents are length-normalized, the query vector is not: query weights are
/// `qtf * idf` as-is.
#[derive(Debug, Clone, Default)]
pub struct TfIdfSimilarity {
    idf: HashMap<Term, f64>,
    doc_norms: HashMap<DocId, f64>,
}

impl TfIdfSimilarity {
    /// IDF of `term`; 0 for terms not in the index.
    pub fn idf(&self, term: &str) -> f64 { self.idf.get(term).copied().unwrap_or(0.0) }

    pub fn norm(&self, doc: &str) -> f64 { self.doc_norms.get(doc).copied().unwrap_or(0.0) }
}

impl Similarity for TfIdfSimilarity {
    fn initialize(index: &InvertedIndex) -> Self {
        let n = index.document_count() as f64;
        let idf: HashMap<Term, f64> = index
            .terms()
            .filter(|(_, postings)| !postings.is_empty())
            .map(|(term, postings)| (term.clone(), (n / postings.len() as f64).log10()))
            .collect();

        let doc_norms = index
            .documents()
            .map(|(doc, terms)| {
                let weights = terms.iter().map(|(t, &tf)| tf as f64 * idf.get(t).copied().unwrap_or(0.0));
                (doc.clone(), l2_norm(weights))
            })
            .collect();

        Self { idf, doc_norms }
    }

    fn accumulate(&self, index: &InvertedIndex, term: &str, qtf: u32, scores: &mut ScoreMap) {
        let idf = self.idf(term);
        let query_weight = qtf as f64 * idf;
        for (doc, &tf) in index.postings_for(term) {
            let doc_weight = tf as f64 * idf;
            add_normalized(scores, doc, query_weight * doc_weight, self.norm(doc));
        }
    }
}
