use crate::corpus::index_directory;
use crate::error::{Error, Result};
use crate::index::{InvertedIndex, TermFreqs};
use crate::tokenizer::{Tokenizer, TokenizerConfig};
use crate::DocId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, create_dir_all, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Bumped whenever the on-disk layout changes.
pub const INDEX_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u64,
    pub num_terms: u64,
    pub created_at: String,
    pub version: u32,
    pub corpus: String,
    pub tokenizer: TokenizerConfig,
}

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    fn postings(&self) -> PathBuf { self.root.join("postings.bin") }
    fn meta(&self) -> PathBuf { self.root.join("meta.json") }

    /// An index is complete only once its meta file exists.
    pub fn exists(&self) -> bool { self.meta().is_file() && self.postings().is_file() }
}

/// Write `bytes` next to `path` and rename into place.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = path.with_extension("tmp");
    {
        let mut f = File::create(&tmp)?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn save_postings(paths: &IndexPaths, docs: &HashMap<DocId, TermFreqs>) -> Result<()> {
    create_dir_all(&paths.root)?;
    let bytes = bincode::serialize(docs)?;
    write_atomic(&paths.postings(), &bytes)
}

pub fn load_postings(paths: &IndexPaths) -> Result<HashMap<DocId, TermFreqs>> {
    let mut f = File::open(paths.postings())?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    let docs = bincode::deserialize(&buf)?;
    Ok(docs)
}

pub fn save_meta(paths: &IndexPaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let json = serde_json::to_string_pretty(meta)?;
    write_atomic(&paths.meta(), json.as_bytes())
}

pub fn load_meta(paths: &IndexPaths) -> Result<MetaFile> {
    let mut f = File::open(paths.meta())?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    let meta: MetaFile = serde_json::from_str(&buf)?;
    Ok(meta)
}

fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_default()
}

/// How a corpus path is recorded in `meta.json`: canonical when it resolves.
fn corpus_key(corpus: &Path) -> String {
    fs::canonicalize(corpus)
        .unwrap_or_else(|_| corpus.to_path_buf())
        .display()
        .to_string()
}

/// Persist `index`. The meta file is written last, so a crash mid-save leaves
/// no loadable index behind.
pub fn save_index(paths: &IndexPaths, index: &InvertedIndex, corpus: &Path, tokenizer: &TokenizerConfig) -> Result<MetaFile> {
    if paths.meta().exists() {
        fs::remove_file(paths.meta())?;
    }
    save_postings(paths, index.document_map())?;
    let meta = MetaFile {
        num_docs: index.document_count() as u64,
        num_terms: index.term_count() as u64,
        created_at: now_rfc3339(),
        version: INDEX_VERSION,
        corpus: corpus_key(corpus),
        tokenizer: tokenizer.clone(),
    };
    save_meta(paths, &meta)?;
    tracing::info!(root = %paths.root.display(), num_docs = meta.num_docs, "index saved");
    Ok(meta)
}

/// Load a stored index, refusing one written by another layout version or an
/// incompatible tokenizer.
pub fn load_index(paths: &IndexPaths, tokenizer: &TokenizerConfig) -> Result<InvertedIndex> {
    load_index_checked(paths, tokenizer, None)
}

/// Like [`load_index`], and also refuses an index built from another corpus
/// when `corpus` is given.
pub fn load_index_checked(paths: &IndexPaths, tokenizer: &TokenizerConfig, corpus: Option<&Path>) -> Result<InvertedIndex> {
    let meta = load_meta(paths)?;
    if meta.version != INDEX_VERSION {
        return Err(Error::IncompatibleIndex {
            path: paths.root.clone(),
            reason: format!("version {} != {}", meta.version, INDEX_VERSION),
        });
    }
    if !meta.tokenizer.is_compatible_with(tokenizer) {
        return Err(Error::IncompatibleIndex {
            path: paths.root.clone(),
            reason: "tokenizer settings differ".into(),
        });
    }
    if let Some(corpus) = corpus {
        let requested = corpus_key(corpus);
        if meta.corpus != requested {
            return Err(Error::IncompatibleIndex {
                path: paths.root.clone(),
                reason: format!("built from corpus {} not {}", meta.corpus, requested),
            });
        }
    }
    let index = InvertedIndex::from_documents(load_postings(paths)?);
    tracing::info!(root = %paths.root.display(), num_docs = index.document_count(), created_at = %meta.created_at, "index loaded");
    Ok(index)
}

/// Load the index stored at `index_dir` when `reuse_existing` is set and a
/// compatible one is there; otherwise build it from `corpus` and store it.
pub fn load_or_build(corpus: &Path, index_dir: &Path, reuse_existing: bool, tokenizer: &Tokenizer) -> Result<InvertedIndex> {
    let paths = IndexPaths::new(index_dir);
    if reuse_existing && paths.exists() {
        match load_index_checked(&paths, tokenizer.config(), Some(corpus)) {
            Ok(index) => return Ok(index),
            Err(Error::IncompatibleIndex { reason, .. }) => {
                tracing::warn!(%reason, "stored index not reusable, rebuilding");
            }
            Err(e) => return Err(e),
        }
    }
    let index = index_directory(corpus, tokenizer)?;
    save_index(&paths, &index, corpus, tokenizer.config())?;
    Ok(index)
}
