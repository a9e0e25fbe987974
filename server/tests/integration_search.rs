use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use std::fs;
use std::sync::Arc;
use tempfile::tempdir;
use tower::ServiceExt;
use trecrank_core::{InvertedIndex, Searcher, SimilarityKind, Tokenizer, TokenizerConfig};

fn tiny_app(kind: SimilarityKind) -> Router {
    let tokenizer = Arc::new(Tokenizer::default());
    let mut index = InvertedIndex::new();
    index.add_document("docA", tokenizer.tokenize("cat sat mat"));
    index.add_document("docB", tokenizer.tokenize("cat cat dog"));
    index.add_document("empty", tokenizer.tokenize(""));
    server::build_app(Arc::new(Searcher::new(index, tokenizer, kind)))
}

async fn call(app: Router, uri: &str) -> (StatusCode, Bytes) {
    let req = Request::get(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, body)
}

#[tokio::test]
async fn search_returns_ranked_results() {
    let (status, body) = call(tiny_app(SimilarityKind::Tf), "/search?q=cat&k=2").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["similarity"], "TF");
    assert_eq!(json["total_hits"], 2);
    let arr = json["results"].as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["doc_id"], "docB");
    assert_eq!(arr[0]["rank"], 0);
    assert_eq!(arr[1]["doc_id"], "docA");
}

#[tokio::test]
async fn search_truncates_to_k() {
    let (_, body) = call(tiny_app(SimilarityKind::Tf), "/search?q=cat&k=1").await;
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["total_hits"], 2);
    assert_eq!(json["results"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_terms_return_empty_results() {
    let (status, body) = call(tiny_app(SimilarityKind::Bm25), "/search?q=zebra").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["total_hits"], 0);
    assert!(json["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn doc_endpoint_reports_lengths() {
    let (status, body) = call(tiny_app(SimilarityKind::Tf), "/doc/docB").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["distinct_terms"], 2);
    assert_eq!(json["total_terms"], 3);

    let (status, _) = call(tiny_app(SimilarityKind::Tf), "/doc/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_is_ok() {
    let (status, body) = call(tiny_app(SimilarityKind::Tf), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"ok");
}

#[test]
fn load_searcher_builds_from_corpus() {
    let dir = tempdir().unwrap();
    let corpus = dir.path().join("docs");
    fs::create_dir_all(&corpus).unwrap();
    fs::write(corpus.join("d1"), "rust systems programming").unwrap();
    fs::write(corpus.join("d2"), "learning rust").unwrap();

    let source = server::IndexSource {
        index_dir: dir.path().join("index"),
        corpus: Some(corpus),
        similarity: SimilarityKind::TfIdf,
        tokenizer: TokenizerConfig::default(),
    };
    let searcher = server::load_searcher(&source).unwrap();
    assert_eq!(searcher.index().document_count(), 2);
    assert_eq!(searcher.similarity(), SimilarityKind::TfIdf);

    // second load goes through the stored index
    let without_corpus = server::IndexSource { corpus: None, ..source };
    assert_eq!(server::load_searcher(&without_corpus).unwrap().index().document_count(), 2);
}
