use crate::error::Result;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub id: String,
    pub text: String,
}

/// Parse `<queryId> <queryText...>` lines. The id must be an integer;
/// lines without one are skipped. A topic with an id but no text is kept and
/// simply retrieves nothing. Invalid UTF-8 is decoded lossily.
pub fn parse_topics<R: BufRead>(reader: R) -> Result<Vec<Topic>> {
    let mut topics = Vec::new();
    for (lineno, bytes) in reader.split(b'\n').enumerate() {
        let bytes = bytes?;
        let line = String::from_utf8_lossy(&bytes);
        let trimmed = line.trim();
        if trimmed.is_empty() { continue; }
        match parse_line(trimmed) {
            Some(topic) => topics.push(topic),
            None => tracing::warn!(line = lineno + 1, content = trimmed, "skipping malformed topic line"),
        }
    }
    Ok(topics)
}

fn parse_line(line: &str) -> Option<Topic> {
    let (id, rest) = match line.split_once(char::is_whitespace) {
        Some((id, rest)) => (id, rest.trim()),
        None => (line, ""),
    };
    if id.parse::<u64>().is_err() {
        return None;
    }
    Some(Topic { id: id.to_string(), text: rest.to_string() })
}

pub fn read_topics(path: &Path) -> Result<Vec<Topic>> {
    let f = File::open(path)?;
    parse_topics(BufReader::new(f))
}
