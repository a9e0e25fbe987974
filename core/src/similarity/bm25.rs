use super::{ScoreMap, Similarity};
use crate::index::InvertedIndex;

/// BM25 k1 parameter - controls term frequency saturation
pub const BM25_K1: f64 = 2.0;

/// BM25 b parameter - controls length normalization
pub const BM25_B: f64 = 0.75;

/// Okapi BM25 with `log10` Robertson-Sparck-Jones IDF.
///
/// Document length is the number of distinct terms in the document, and
/// `avgdl` is its mean over the corpus. IDF is not clamped, so a term present
/// in more than half of the documents contributes negatively.
#[derive(Debug, Clone, Default)]
pub struct Bm25Similarity {
    num_docs: f64,
    avgdl: f64,
}

impl Bm25Similarity {
    pub fn average_document_length(&self) -> f64 { self.avgdl }

    /// IDF for a term found in `df` documents.
    pub fn idf(&self, df: usize) -> f64 {
        let df = df as f64;
        ((self.num_docs - df + 0.5) / (df + 0.5)).log10()
    }

    /// Saturating term-frequency component for one document.
    pub fn tf_component(&self, tf: u32, doc_len: usize) -> f64 {
        let tf = tf as f64;
        let length_norm = if self.avgdl > 0.0 {
            1.0 - BM25_B + BM25_B * (doc_len as f64 / self.avgdl)
        } else {
            1.0 - BM25_B
        };
        tf * (BM25_K1 + 1.0) / (tf + BM25_K1 * length_norm)
    }
}

impl Similarity for Bm25Similarity {
    fn initialize(index: &InvertedIndex) -> Self {
        Self { num_docs: index.document_count() as f64, avgdl: index.average_document_length() }
    }

    /// Query frequency does not weight the term; each distinct query term
    /// contributes once.
    fn accumulate(&self, index: &InvertedIndex, term: &str, _qtf: u32, scores: &mut ScoreMap) {
        let postings = index.postings_for(term);
        if postings.is_empty() {
            return;
        }
        let idf = self.idf(postings.len());
        for (doc, &tf) in postings {
            let contrib = idf * self.tf_component(tf, index.document_length(doc));
            *scores.entry(doc.clone()).or_insert(0.0) += contrib;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QueryTerms;

    #[test]
    fn idf_can_be_negative_for_common_terms() {
        let mut idx = InvertedIndex::new();
        for d in ["a", "b", "c"] {
            idx.add_document(d, ["common"]);
        }
        idx.add_document("d", ["rare"]);
        let sim = Bm25Similarity::initialize(&idx);
        assert!(sim.idf(3) < 0.0);
        assert!(sim.idf(1) > 0.0);
        let scores = sim.score(&idx, &QueryTerms::from([("common".to_string(), 1)]));
        assert!(scores["a"] < 0.0);
    }

    #[test]
    fn score_matches_formula() {
        let mut idx = InvertedIndex::new();
        idx.add_document("a", ["x", "x", "y"]);
        idx.add_document("b", ["y", "z", "w"]);
        idx.add_document("c", ["w"]);
        let sim = Bm25Similarity::initialize(&idx);
        // distinct lengths 2, 3, 1
        assert!((sim.average_document_length() - 2.0).abs() < 1e-12);

        let scores = sim.score(&idx, &QueryTerms::from([("x".to_string(), 1)]));
        let idf = (2.5f64 / 1.5).log10();
        let expected = idf * 2.0 * 3.0 / (2.0 + 2.0 * (0.25 + 0.75 * 2.0 / 2.0));
        assert!((scores["a"] - expected).abs() < 1e-12);
    }

    #[test]
    fn query_repetition_does_not_scale_score() {
        let mut idx = InvertedIndex::new();
        idx.add_document("a", ["x"]);
        idx.add_document("b", ["y"]);
        idx.add_document("c", ["z"]);
        let sim = Bm25Similarity::initialize(&idx);
        let once = sim.score(&idx, &QueryTerms::from([("x".to_string(), 1)]));
        let thrice = sim.score(&idx, &QueryTerms::from([("x".to_string(), 3)]));
        assert_eq!(once, thrice);
    }
}
