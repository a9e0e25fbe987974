use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias used throughout the core crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// I/O error while reading the corpus or the stored index
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Two files in the corpus resolved to the same document id
    #[error("duplicate document id {id:?} at {path}")]
    DuplicateDocument { id: String, path: PathBuf },

    /// A stored index exists but cannot be reused with the current settings
    #[error("incompatible index at {path}: {reason}")]
    IncompatibleIndex { path: PathBuf, reason: String },

    /// Scoring was cancelled before it finished
    #[error("query cancelled")]
    Cancelled,

    /// Similarity name did not match any known model
    #[error("unknown similarity {0:?}, expected one of TF, TFIDF, BM25")]
    UnknownSimilarity(String),
}

impl From<bincode::Error> for Error {
    fn from(e: bincode::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<walkdir::Error> for Error {
    fn from(e: walkdir::Error) -> Self {
        let msg = e.to_string();
        match e.into_io_error() {
            Some(io) => Error::Io(io),
            None => Error::Io(io::Error::new(io::ErrorKind::Other, msg)),
        }
    }
}
