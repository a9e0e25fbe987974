use crate::error::{Error, Result};
use crate::index::InvertedIndex;
use crate::tokenizer::Tokenizer;
use crate::DocId;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Document id of a corpus file: its file name.
pub fn document_id(path: &Path) -> Option<DocId> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

/// Every regular file under `root`, in a stable order.
pub fn list_documents(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Build an index over every file under `root`, one document per file.
///
/// The index is only returned once every file was read; on any failure the
/// partially filled index is dropped.
pub fn index_directory(root: &Path, tokenizer: &Tokenizer) -> Result<InvertedIndex> {
    let files = list_documents(root)?;
    tracing::info!(root = %root.display(), files = files.len(), "indexing corpus");

    let mut staging = InvertedIndex::new();
    let mut seen: HashMap<DocId, PathBuf> = HashMap::new();
    for (i, path) in files.into_iter().enumerate() {
        let Some(id) = document_id(&path) else { continue };
        if seen.contains_key(&id) {
            return Err(Error::DuplicateDocument { id, path });
        }
        let bytes = fs::read(&path)?;
        let text = String::from_utf8_lossy(&bytes);
        staging.add_document(id.clone(), tokenizer.tokenize(&text));
        seen.insert(id, path);
        if (i + 1) % 1000 == 0 {
            tracing::info!(indexed = i + 1, "progress");
        }
    }

    let stats = tokenizer.cache_stats();
    tracing::info!(
        num_docs = staging.document_count(),
        num_terms = staging.term_count(),
        stem_cache_hits = stats.hits,
        stem_cache_misses = stats.misses,
        "corpus indexed"
    );
    Ok(staging)
}
