use anyhow::Result;
use clap::Parser;
use server::{build_app, load_searcher, IndexSource};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};
use trecrank_core::{SimilarityKind, TokenizerConfig};

#[derive(Parser)]
struct Args {
    /// Index directory path
    #[arg(long, default_value = "./index")]
    index: PathBuf,
    /// Corpus to build the index from when none is stored
    #[arg(long)]
    corpus: Option<PathBuf>,
    /// Similarity used to rank results
    #[arg(long, value_enum, default_value_t = SimilarityKind::Bm25)]
    sim: SimilarityKind,
    /// Drop English stopwords before stemming
    #[arg(long, default_value_t = false)]
    stopwords: bool,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let source = IndexSource {
        index_dir: args.index,
        corpus: args.corpus,
        similarity: args.sim,
        tokenizer: TokenizerConfig { remove_stopwords: args.stopwords, ..TokenizerConfig::default() },
    };
    let searcher = tokio::task::spawn_blocking(move || load_searcher(&source)).await??;
    let app = build_app(Arc::new(searcher));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, similarity = %args.sim, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
