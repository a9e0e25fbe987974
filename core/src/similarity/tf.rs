use super::{add_normalized, l2_norm, ScoreMap, Similarity};
use crate::index::InvertedIndex;
use crate::DocId;
use std::collections::HashMap;

/// Cosine over raw term frequencies.
#[derive(Debug, Clone, Default)]
pub struct TfSimilarity {
    doc_norms: HashMap<DocId, f64>,
}

impl TfSimilarity {
    pub fn norm(&self, doc: &str) -> f64 { self.doc_norms.get(doc).copied().unwrap_or(0.0) }
}

impl Similarity for TfSimilarity {
    fn initialize(index: &InvertedIndex) -> Self {
        let doc_norms = index
            .documents()
            .map(|(doc, terms)| (doc.clone(), l2_norm(terms.values().map(|&tf| tf as f64))))
            .collect();
        Self { doc_norms }
    }

    fn accumulate(&self, index: &InvertedIndex, term: &str, qtf: u32, scores: &mut ScoreMap) {
        for (doc, &tf) in index.postings_for(term) {
            add_normalized(scores, doc, qtf as f64 * tf as f64, self.norm(doc));
        }
    }
}
