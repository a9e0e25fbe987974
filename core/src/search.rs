use crate::error::Result;
use crate::index::InvertedIndex;
use crate::similarity::{CancellationToken, RankingModel, ScoreMap, SimilarityKind};
use crate::tokenizer::Tokenizer;
use crate::{DocId, QueryTerms};
use std::cmp::Ordering;
use std::sync::Arc;

/// One ranked result.
pub type Hit = (DocId, f64);

/// Runs queries against a finished index with one bound similarity model.
///
/// The index is read-only once it is moved in here, so a `Searcher` can be
/// shared across threads and queried concurrently.
pub struct Searcher {
    tokenizer: Arc<Tokenizer>,
    index: InvertedIndex,
    model: RankingModel,
}

impl Searcher {
    pub fn new(index: InvertedIndex, tokenizer: Arc<Tokenizer>, kind: SimilarityKind) -> Self {
        let model = kind.bind(&index);
        tracing::debug!(similarity = %kind, num_docs = index.document_count(), "bound similarity");
        Self { tokenizer, index, model }
    }

    /// Rebind to another similarity, recomputing its norms.
    pub fn set_similarity(&mut self, kind: SimilarityKind) {
        self.model = kind.bind(&self.index);
        tracing::info!(similarity = %kind, "similarity set");
    }

    pub fn similarity(&self) -> SimilarityKind { self.model.kind() }

    pub fn index(&self) -> &InvertedIndex { &self.index }

    pub fn tokenizer(&self) -> &Tokenizer { &self.tokenizer }

    pub fn query_terms(&self, text: &str) -> QueryTerms { self.tokenizer.term_counts(text) }

    /// Score `text` and return hits ordered by score descending, ties by
    /// document id ascending, truncated to `max_results` when given.
    pub fn run_query(&self, text: &str, max_results: Option<usize>) -> Vec<Hit> {
        let query = self.query_terms(text);
        if query.is_empty() {
            return Vec::new();
        }
        rank(self.model.score(&self.index, &query), max_results)
    }

    /// Like [`Searcher::run_query`], failing with `Error::Cancelled` once
    /// `cancel` fires. A query with no terms returns no hits either way.
    pub fn run_query_cancellable(
        &self,
        text: &str,
        max_results: Option<usize>,
        cancel: &CancellationToken,
    ) -> Result<Vec<Hit>> {
        let query = self.query_terms(text);
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let scores = self.model.score_cancellable(&self.index, &query, cancel)?;
        Ok(rank(scores, max_results))
    }
}

fn by_score_then_id(a: &Hit, b: &Hit) -> Ordering {
    b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0))
}

/// Sort a score map into a ranked list.
pub fn rank(scores: ScoreMap, max_results: Option<usize>) -> Vec<Hit> {
    let mut hits: Vec<Hit> = scores.into_iter().collect();
    hits.sort_by(by_score_then_id);
    if let Some(k) = max_results {
        hits.truncate(k);
    }
    hits
}
