use anyhow::{Context, Result};
use axum::{extract::{Path, Query, State}, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use trecrank_core::persist::{load_index, load_or_build, IndexPaths};
use trecrank_core::{Searcher, SimilarityKind, Tokenizer, TokenizerConfig};

const MAX_K: usize = 1000;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { 10 }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub similarity: String,
    pub took_ms: u128,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub rank: usize,
    pub doc_id: String,
    pub score: f64,
}

#[derive(Serialize)]
pub struct DocResponse {
    pub doc_id: String,
    pub distinct_terms: usize,
    pub total_terms: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub searcher: Arc<Searcher>,
}

/// Where the server gets its index from.
pub struct IndexSource {
    pub index_dir: PathBuf,
    /// When set, a missing or incompatible index is rebuilt from this corpus.
    pub corpus: Option<PathBuf>,
    pub similarity: SimilarityKind,
    pub tokenizer: TokenizerConfig,
}

pub fn load_searcher(source: &IndexSource) -> Result<Searcher> {
    let tokenizer = Arc::new(Tokenizer::new(source.tokenizer.clone()));
    let index = match &source.corpus {
        Some(corpus) => load_or_build(corpus, &source.index_dir, true, &tokenizer)
            .with_context(|| format!("preparing index from {}", corpus.display()))?,
        None => load_index(&IndexPaths::new(&source.index_dir), tokenizer.config())
            .with_context(|| format!("loading index at {}", source.index_dir.display()))?,
    };
    Ok(Searcher::new(index, tokenizer, source.similarity))
}

pub fn build_app(searcher: Arc<Searcher>) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .with_state(AppState { searcher })
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let k = params.k.clamp(1, MAX_K);
    let mut hits = state.searcher.run_query(&params.q, None);
    let total_hits = hits.len();
    hits.truncate(k);

    let results = hits
        .into_iter()
        .enumerate()
        .map(|(rank, (doc_id, score))| SearchHit { rank, doc_id, score })
        .collect();

    let elapsed = start.elapsed();
    tracing::debug!(query = %params.q, total_hits, "search");
    Json(SearchResponse {
        query: params.q,
        similarity: state.searcher.similarity().to_string(),
        took_ms: elapsed.as_millis(),
        took_s: elapsed.as_secs_f64(),
        total_hits,
        results,
    })
}

pub async fn doc_handler(State(state): State<AppState>, Path(doc_id): Path<String>) -> Result<Json<DocResponse>, (StatusCode, String)> {
    let index = state.searcher.index();
    if !index.contains_document(&doc_id) {
        return Err((StatusCode::NOT_FOUND, format!("document {doc_id} not found")));
    }
    Ok(Json(DocResponse {
        distinct_terms: index.document_length(&doc_id),
        total_terms: index.document_token_count(&doc_id),
        doc_id,
    }))
}
