pub mod cache;
pub mod corpus;
pub mod error;
pub mod index;
pub mod persist;
pub mod search;
pub mod similarity;
pub mod tokenizer;
pub mod topics;
pub mod trec;

use std::collections::BTreeMap;

pub type DocId = String;
pub type Term = String;

/// Term -> frequency in a query. Ordered so scores accumulate in the same
/// order on every run.
pub type QueryTerms = BTreeMap<Term, u32>;

pub use error::{Error, Result};
pub use index::InvertedIndex;
pub use search::{Hit, Searcher};
pub use similarity::{CancellationToken, RankingModel, ScoreMap, Similarity, SimilarityKind};
pub use tokenizer::{Tokenizer, TokenizerConfig};
