mod bm25;
mod tf;
mod tfidf;

pub use bm25::{Bm25Similarity, BM25_B, BM25_K1};
pub use tf::TfSimilarity;
pub use tfidf::TfIdfSimilarity;

use crate::error::{Error, Result};
use crate::index::InvertedIndex;
use crate::{DocId, QueryTerms};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Document -> score for one query. Documents that match no query term are
/// absent and have an implicit score of 0.
pub type ScoreMap = HashMap<DocId, f64>;

/// Shared flag a caller can set to stop an in-flight query.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self { Self::default() }

    pub fn cancel(&self) { self.0.store(true, Ordering::Relaxed); }

    pub fn is_cancelled(&self) -> bool { self.0.load(Ordering::Relaxed) }
}

pub trait Similarity: Send + Sync {
    /// Precompute norms and corpus statistics for `index`.
    fn initialize(index: &InvertedIndex) -> Self
    where
        Self: Sized;

    /// Add the contribution of one query term with query frequency `qtf`.
    fn accumulate(&self, index: &InvertedIndex, term: &str, qtf: u32, scores: &mut ScoreMap);

    fn score(&self, index: &InvertedIndex, query: &QueryTerms) -> ScoreMap {
        let mut scores = ScoreMap::new();
        for (term, &qtf) in query {
            self.accumulate(index, term, qtf, &mut scores);
        }
        scores
    }

    /// Like [`Similarity::score`] but checks `cancel` before each query term.
    fn score_cancellable(
        &self,
        index: &InvertedIndex,
        query: &QueryTerms,
        cancel: &CancellationToken,
    ) -> Result<ScoreMap> {
        let mut scores = ScoreMap::new();
        for (term, &qtf) in query {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            self.accumulate(index, term, qtf, &mut scores);
        }
        Ok(scores)
    }
}

/// `sqrt(sum w^2)` over an iterator of weights.
pub(crate) fn l2_norm<I: IntoIterator<Item = f64>>(weights: I) -> f64 {
    weights.into_iter().map(|w| w * w).sum::<f64>().sqrt()
}

/// Add `value / norm` to `doc`, treating a zero norm as no contribution.
pub(crate) fn add_normalized(scores: &mut ScoreMap, doc: &DocId, value: f64, norm: f64) {
    let contrib = if norm > 0.0 { value / norm } else { 0.0 };
    *scores.entry(doc.clone()).or_insert(0.0) += contrib;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityKind {
    Tf,
    #[value(name = "tfidf", alias = "tf-idf")]
    TfIdf,
    #[default]
    Bm25,
}

impl SimilarityKind {
    pub fn name(&self) -> &'static str {
        match self {
            SimilarityKind::Tf => "TF",
            SimilarityKind::TfIdf => "TFIDF",
            SimilarityKind::Bm25 => "BM25",
        }
    }

    /// Build the model for `index`.
    pub fn bind(self, index: &InvertedIndex) -> RankingModel {
        match self {
            SimilarityKind::Tf => RankingModel::Tf(TfSimilarity::initialize(index)),
            SimilarityKind::TfIdf => RankingModel::TfIdf(TfIdfSimilarity::initialize(index)),
            SimilarityKind::Bm25 => RankingModel::Bm25(Bm25Similarity::initialize(index)),
        }
    }
}

impl fmt::Display for SimilarityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl FromStr for SimilarityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "tf" => Ok(SimilarityKind::Tf),
            "tfidf" | "tf-idf" => Ok(SimilarityKind::TfIdf),
            "bm25" => Ok(SimilarityKind::Bm25),
            _ => Err(Error::UnknownSimilarity(s.to_string())),
        }
    }
}

/// A similarity model bound to an index.
#[derive(Debug, Clone)]
pub enum RankingModel {
    Tf(TfSimilarity),
    TfIdf(TfIdfSimilarity),
    Bm25(Bm25Similarity),
}

impl RankingModel {
    pub fn kind(&self) -> SimilarityKind {
        match self {
            RankingModel::Tf(_) => SimilarityKind::Tf,
            RankingModel::TfIdf(_) => SimilarityKind::TfIdf,
            RankingModel::Bm25(_) => SimilarityKind::Bm25,
        }
    }

    fn as_similarity(&self) -> &dyn Similarity {
        match self {
            RankingModel::Tf(s) => s,
            RankingModel::TfIdf(s) => s,
            RankingModel::Bm25(s) => s,
        }
    }

    pub fn score(&self, index: &InvertedIndex, query: &QueryTerms) -> ScoreMap {
        self.as_similarity().score(index, query)
    }

    pub fn score_cancellable(
        &self,
        index: &InvertedIndex,
        query: &QueryTerms,
        cancel: &CancellationToken,
    ) -> Result<ScoreMap> {
        self.as_similarity().score_cancellable(index, query, cancel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("TF".parse::<SimilarityKind>().unwrap(), SimilarityKind::Tf);
        assert_eq!("tfidf".parse::<SimilarityKind>().unwrap(), SimilarityKind::TfIdf);
        assert_eq!("Bm25".parse::<SimilarityKind>().unwrap(), SimilarityKind::Bm25);
        assert!(matches!("cosine".parse::<SimilarityKind>(), Err(Error::UnknownSimilarity(_))));
    }

    #[test]
    fn bind_selects_variant() {
        let idx = InvertedIndex::new();
        for kind in [SimilarityKind::Tf, SimilarityKind::TfIdf, SimilarityKind::Bm25] {
            assert_eq!(kind.bind(&idx).kind(), kind);
        }
    }

    #[test]
    fn cancelled_token_stops_scoring() {
        let mut idx = InvertedIndex::new();
        idx.add_document("a", ["cat"]);
        let model = SimilarityKind::Tf.bind(&idx);
        let query = QueryTerms::from([("cat".to_string(), 1)]);
        let cancel = CancellationToken::new();
        assert!(model.score_cancellable(&idx, &query, &cancel).is_ok());
        cancel.cancel();
        assert!(matches!(model.score_cancellable(&idx, &query, &cancel), Err(Error::Cancelled)));
    }

    #[test]
    fn zero_norm_adds_nothing() {
        let mut scores = ScoreMap::new();
        add_normalized(&mut scores, &"d".to_string(), 3.0, 0.0);
        assert_eq!(scores.get("d"), Some(&0.0));
    }
}
