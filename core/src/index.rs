use crate::{DocId, Term};
use std::collections::HashMap;

/// Document -> count for a single term.
pub type Postings = HashMap<DocId, u32>;

/// Term -> count for a single document.
pub type TermFreqs = HashMap<Term, u32>;

lazy_static::lazy_static! {
    static ref EMPTY_POSTINGS: Postings = Postings::new();
}

/// Postings store kept as two mirror maps. Every `(term, doc, count)` in one
/// map appears in the other with the same count, and no count is zero.
#[derive(Debug, Default, Clone)]
pub struct InvertedIndex {
    term_to_doc_freq: HashMap<Term, Postings>,
    doc_to_term_freq: HashMap<DocId, TermFreqs>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Rebuild both mirrors from the per-document term counts. Zero counts are
    /// dropped.
    pub fn from_documents(docs: HashMap<DocId, TermFreqs>) -> Self {
        let mut index = Self::new();
        for (doc, terms) in docs {
            let entry = index.doc_to_term_freq.entry(doc.clone()).or_default();
            for (term, count) in terms {
                if count == 0 { continue; }
                *entry.entry(term.clone()).or_insert(0) += count;
                *index.term_to_doc_freq.entry(term).or_default().entry(doc.clone()).or_insert(0) += count;
            }
        }
        index
    }

    /// Count every term occurrence of `tokens` against `id`. Calling twice for
    /// the same id accumulates. A document with no tokens is still registered.
    pub fn add_document<I, T>(&mut self, id: impl Into<DocId>, tokens: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<Term>,
    {
        let id = id.into();
        let doc_terms = self.doc_to_term_freq.entry(id.clone()).or_default();
        for token in tokens {
            let term = token.into();
            *self.term_to_doc_freq.entry(term.clone()).or_default().entry(id.clone()).or_insert(0) += 1;
            *doc_terms.entry(term).or_insert(0) += 1;
        }
    }

    /// Documents containing `term` with their counts; empty for unseen terms.
    pub fn postings_for(&self, term: &str) -> &Postings {
        self.term_to_doc_freq.get(term).unwrap_or(&EMPTY_POSTINGS)
    }

    pub fn term_frequency(&self, doc: &str, term: &str) -> u32 {
        self.doc_to_term_freq
            .get(doc)
            .and_then(|terms| terms.get(term))
            .copied()
            .unwrap_or(0)
    }

    /// Number of documents containing `term` at least once.
    pub fn document_frequency(&self, term: &str) -> usize {
        self.term_to_doc_freq.get(term).map_or(0, |p| p.len())
    }

    pub fn document_count(&self) -> usize { self.doc_to_term_freq.len() }

    pub fn term_count(&self) -> usize { self.term_to_doc_freq.len() }

    /// Number of distinct terms in `doc`. This is the length BM25 normalizes by.
    pub fn document_length(&self, doc: &str) -> usize {
        self.doc_to_term_freq.get(doc).map_or(0, |t| t.len())
    }

    /// Total token count of `doc`.
    pub fn document_token_count(&self, doc: &str) -> u64 {
        self.doc_to_term_freq
            .get(doc)
            .map_or(0, |t| t.values().map(|&c| c as u64).sum())
    }

    /// Mean of `document_length` over all documents, 0 for an empty index.
    pub fn average_document_length(&self) -> f64 {
        let n = self.document_count();
        if n == 0 {
            return 0.0;
        }
        let total: usize = self.doc_to_term_freq.values().map(|t| t.len()).sum();
        total as f64 / n as f64
    }

    pub fn contains_document(&self, doc: &str) -> bool { self.doc_to_term_freq.contains_key(doc) }

    pub fn terms_of(&self, doc: &str) -> Option<&TermFreqs> { self.doc_to_term_freq.get(doc) }

    pub fn documents(&self) -> impl Iterator<Item = (&DocId, &TermFreqs)> {
        self.doc_to_term_freq.iter()
    }

    pub fn terms(&self) -> impl Iterator<Item = (&Term, &Postings)> {
        self.term_to_doc_freq.iter()
    }

    /// The document side alone; enough to rebuild the whole index.
    pub fn document_map(&self) -> &HashMap<DocId, TermFreqs> { &self.doc_to_term_freq }

    pub fn is_empty(&self) -> bool { self.doc_to_term_freq.is_empty() }
}
