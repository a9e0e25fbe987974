use crate::cache::{CacheStats, StemCache, DEFAULT_STEM_CACHE_CAPACITY};
use crate::{QueryTerms, Term};
use lazy_static::lazy_static;
use parking_lot::Mutex;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref RE: Regex = Regex::new(r"(?u)[\p{L}\p{N}][\p{L}\p{N}_']*").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","can't","cannot","could","couldn't",
            "did","didn't","do","does","doesn't","doing","don't","down","during",
            "each","few","for","from","further",
            "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
            "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
            "let's","me","more","most","mustn't","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","she'd","she'll","she's","should","shouldn't","so","some","such",
            "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
            "under","until","up","very",
            "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","with","won't","would","wouldn't",
            "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// Settings that change which terms a text produces. Stored alongside a
/// persisted index so a reused index is only loaded by a compatible tokenizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizerConfig {
    pub remove_stopwords: bool,
    /// Not part of the compatibility check, only bounds memory.
    #[serde(default = "default_cache_capacity")]
    pub stem_cache_capacity: usize,
}

fn default_cache_capacity() -> usize { DEFAULT_STEM_CACHE_CAPACITY }

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self { remove_stopwords: false, stem_cache_capacity: DEFAULT_STEM_CACHE_CAPACITY }
    }
}

impl TokenizerConfig {
    /// True when two configs produce the same terms for every input.
    pub fn is_compatible_with(&self, other: &TokenizerConfig) -> bool {
        self.remove_stopwords == other.remove_stopwords
    }
}

/// Turns raw text into an ordered sequence of stems. Stemming goes through a
/// bounded cache owned by this instance, so independent tokenizers never
/// share state.
pub struct Tokenizer {
    config: TokenizerConfig,
    stemmer: Stemmer,
    cache: Mutex<StemCache>,
}

impl Default for Tokenizer {
    fn default() -> Self { Self::new(TokenizerConfig::default()) }
}

impl Tokenizer {
    pub fn new(config: TokenizerConfig) -> Self {
        let cache = Mutex::new(StemCache::new(config.stem_cache_capacity));
        Self { config, stemmer: Stemmer::create(Algorithm::English), cache }
    }

    pub fn config(&self) -> &TokenizerConfig { &self.config }

    pub fn cache_stats(&self) -> CacheStats { self.cache.lock().stats() }

    /// Tokenize text into stems using NFKC normalization, lowercase,
    /// optional stopword removal, and Snowball English stemming.
    pub fn tokenize(&self, text: &str) -> Vec<Term> {
        let normalized = text.nfkc().collect::<String>().to_lowercase();
        let mut tokens = Vec::new();
        for mat in RE.find_iter(&normalized) {
            let token = mat.as_str();
            if self.config.remove_stopwords && is_stopword(token) { continue; }
            tokens.push(self.stem(token));
        }
        tokens
    }

    // The lock is never held while stemming.
    fn stem(&self, token: &str) -> Term {
        let cached = self.cache.lock().get(token);
        if let Some(stem) = cached {
            return stem;
        }
        let stem = self.stemmer.stem(token).into_owned();
        self.cache.lock().insert(token, stem.clone());
        stem
    }

    /// Tokenize and count repeated stems.
    pub fn term_counts(&self, text: &str) -> QueryTerms {
        term_counts(self.tokenize(text))
    }
}

/// Count occurrences of each term.
pub fn term_counts<I>(tokens: I) -> QueryTerms
where
    I: IntoIterator<Item = Term>,
{
    let mut counts = QueryTerms::new();
    for t in tokens {
        *counts.entry(t).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        let t = Tokenizer::default().tokenize("Running, runner's run!");
        assert!(t.iter().any(|w| w == "run"));
    }

    #[test]
    fn counts_repeated_stems() {
        let counts = Tokenizer::default().term_counts("cats cat CAT dog");
        assert_eq!(counts.get("cat"), Some(&3));
        assert_eq!(counts.get("dog"), Some(&1));
    }

    #[test]
    fn cache_is_per_instance() {
        let a = Tokenizer::default();
        let b = Tokenizer::default();
        a.tokenize("running running");
        assert_eq!(a.cache_stats().hits, 1);
        assert_eq!(b.cache_stats(), CacheStats::default());
    }

    #[test]
    fn cache_capacity_is_respected() {
        let tok = Tokenizer::new(TokenizerConfig { remove_stopwords: false, stem_cache_capacity: 2 });
        tok.tokenize("alpha beta gamma delta");
        assert_eq!(tok.cache_stats().len, 2);
    }

    #[test]
    fn concurrent_tokenize_agrees_and_counts_every_token() {
        let tok = Tokenizer::default();
        let text = "miners mining gold, running runners ran in the hills";
        let expected = Tokenizer::default().tokenize(text);
        let threads = 8;
        let rounds = 25;
        std::thread::scope(|s| {
            let handles: Vec<_> = (0..threads)
                .map(|_| s.spawn(|| (0..rounds).map(|_| tok.tokenize(text)).collect::<Vec<_>>()))
                .collect();
            for h in handles {
                for out in h.join().unwrap() {
                    assert_eq!(out, expected);
                }
            }
        });
        let stats = tok.cache_stats();
        assert_eq!(stats.hits + stats.misses, (expected.len() * threads * rounds) as u64);
        assert!(stats.len <= expected.len());
    }
}
