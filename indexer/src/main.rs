use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};
use trecrank_core::persist::{load_index, load_or_build, IndexPaths};
use trecrank_core::topics::read_topics;
use trecrank_core::trec::{run_topics, TrecWriter, DEFAULT_TAG};
use trecrank_core::{Searcher, SimilarityKind, Tokenizer, TokenizerConfig};

#[derive(Parser)]
#[command(name = "trecrank")]
#[command(about = "Build an inverted index and rank documents with TF, TF-IDF or BM25", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct TokenizerArgs {
    /// Drop English stopwords before stemming
    #[arg(long, default_value_t = false)]
    stopwords: bool,
    /// Maximum number of cached stems
    #[arg(long, default_value_t = trecrank_core::cache::DEFAULT_STEM_CACHE_CAPACITY)]
    cache_capacity: usize,
}

impl TokenizerArgs {
    fn tokenizer(&self) -> Tokenizer {
        Tokenizer::new(TokenizerConfig { remove_stopwords: self.stopwords, stem_cache_capacity: self.cache_capacity })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index from a corpus directory, one document per file
    Build {
        /// Corpus directory
        #[arg(long)]
        corpus: PathBuf,
        /// Output index directory
        #[arg(long)]
        index: PathBuf,
        #[command(flatten)]
        tokenizer: TokenizerArgs,
    },
    /// Run every topic of a topics file and write a TREC-eval run file
    Run {
        #[arg(long)]
        corpus: PathBuf,
        #[arg(long)]
        index: PathBuf,
        /// Topics file, one `<queryId> <query text>` per line
        #[arg(long)]
        topics: PathBuf,
        /// Run file to write
        #[arg(long)]
        output: PathBuf,
        #[arg(long, value_enum, default_value_t = SimilarityKind::Bm25)]
        sim: SimilarityKind,
        /// Reuse a stored index instead of rebuilding it
        #[arg(long, default_value_t = false)]
        reuse: bool,
        #[arg(long, default_value_t = 10)]
        max_results: usize,
        /// System tag written in the last column
        #[arg(long, default_value = DEFAULT_TAG)]
        tag: String,
        #[command(flatten)]
        tokenizer: TokenizerArgs,
    },
    /// Query a stored index and print ranked documents
    Query {
        #[arg(long)]
        index: PathBuf,
        #[arg(long, value_enum, default_value_t = SimilarityKind::Bm25)]
        sim: SimilarityKind,
        #[arg(short, long, default_value_t = 10)]
        k: usize,
        #[command(flatten)]
        tokenizer: TokenizerArgs,
        /// Query text
        #[arg(required = true)]
        text: Vec<String>,
    },
}

fn create_output(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    File::create(path).with_context(|| format!("creating {}", path.display()))
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { corpus, index, tokenizer } => {
            load_or_build(&corpus, &index, false, &tokenizer.tokenizer())
                .with_context(|| format!("building index from {}", corpus.display()))?;
            Ok(())
        }
        Commands::Run { corpus, index, topics, output, sim, reuse, max_results, tag, tokenizer } => {
            let tokenizer = Arc::new(tokenizer.tokenizer());
            let inverted = load_or_build(&corpus, &index, reuse, &tokenizer)
                .with_context(|| format!("preparing index at {}", index.display()))?;
            let searcher = Searcher::new(inverted, tokenizer, sim);
            tracing::info!(similarity = %sim, "index ready");

            let topics = read_topics(&topics).with_context(|| format!("reading topics {}", topics.display()))?;
            let file = create_output(&output)?;
            let mut writer = TrecWriter::new(BufWriter::new(file), tag);
            let lines = run_topics(&searcher, &topics, Some(max_results), &mut writer)?;
            writer.finish()?;
            tracing::info!(queries = topics.len(), lines, output = %output.display(), "run complete");
            Ok(())
        }
        Commands::Query { index, sim, k, tokenizer, text } => {
            let tokenizer = Arc::new(tokenizer.tokenizer());
            let inverted = load_index(&IndexPaths::new(&index), tokenizer.config())
                .with_context(|| format!("loading index at {}", index.display()))?;
            let searcher = Searcher::new(inverted, tokenizer, sim);
            for (rank, (doc, score)) in searcher.run_query(&text.join(" "), Some(k)).iter().enumerate() {
                println!("{rank}\t{doc}\t{score:.6}");
            }
            Ok(())
        }
    }
}
