use trecrank_core::tokenizer::{Tokenizer, TokenizerConfig};

#[test]
fn it_normalizes_and_stems() {
    let words = Tokenizer::default().tokenize("Running Runners RUN! The café's menu.");
    // Stemming to "run" should appear
    assert!(words.contains(&"run".to_string()));
    // Unicode normalization keeps the accent, lowercases, stems
    assert!(words.iter().any(|w| w.starts_with("café")));
}

#[test]
fn it_keeps_stopwords_by_default() {
    let words = Tokenizer::default().tokenize("The quick brown fox and the lazy dog");
    assert!(words.contains(&"the".to_string()));
    assert_eq!(words.len(), 8);
}

#[test]
fn it_filters_stopwords_when_configured() {
    let tok = Tokenizer::new(TokenizerConfig { remove_stopwords: true, ..TokenizerConfig::default() });
    let words = tok.tokenize("The quick brown fox and the lazy dog");
    assert!(!words.contains(&"the".to_string()));
    assert!(!words.contains(&"and".to_string()));
}

#[test]
fn it_drops_punctuation_and_keeps_numbers() {
    let words = Tokenizer::default().tokenize("1998 budget, (revised) -- final.");
    assert_eq!(words, vec!["1998", "budget", "revis", "final"]);
}

#[test]
fn it_reuses_cached_stems() {
    let tok = Tokenizer::default();
    tok.tokenize("connection connection connection");
    let stats = tok.cache_stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 2);
}
