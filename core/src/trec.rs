use crate::error::Result;
use crate::search::{Hit, Searcher};
use crate::topics::Topic;
use std::io::Write;

pub const DEFAULT_TAG: &str = "MY_IR_SYSTEM";

/// Writes `queryId Q0 documentId rank score tag` lines, rank starting at 0.
pub struct TrecWriter<W: Write> {
    out: W,
    tag: String,
    lines: usize,
}

impl<W: Write> TrecWriter<W> {
    pub fn new(out: W, tag: impl Into<String>) -> Self {
        Self { out, tag: tag.into(), lines: 0 }
    }

    pub fn write_hits(&mut self, query_id: &str, hits: &[Hit]) -> Result<()> {
        for (rank, (doc, score)) in hits.iter().enumerate() {
            writeln!(self.out, "{} Q0 {} {} {} {}", query_id, doc, rank, score, self.tag)?;
            self.lines += 1;
        }
        Ok(())
    }

    pub fn lines_written(&self) -> usize { self.lines }

    pub fn finish(mut self) -> Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Run every topic through `searcher` and write the hits. Returns the number
/// of lines written.
pub fn run_topics<W: Write>(
    searcher: &Searcher,
    topics: &[Topic],
    max_results: Option<usize>,
    writer: &mut TrecWriter<W>,
) -> Result<usize> {
    let before = writer.lines_written();
    for topic in topics {
        let hits = searcher.run_query(&topic.text, max_results);
        tracing::debug!(query_id = %topic.id, hits = hits.len(), "query done");
        writer.write_hits(&topic.id, &hits)?;
    }
    Ok(writer.lines_written() - before)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_lines_with_zero_based_rank() {
        let mut w = TrecWriter::new(Vec::new(), DEFAULT_TAG);
        w.write_hits("551", &[("G00-01".into(), 1.5), ("G00-02".into(), 0.25)]).unwrap();
        assert_eq!(w.lines_written(), 2);
        let out = String::from_utf8(w.finish().unwrap()).unwrap();
        assert_eq!(out, "551 Q0 G00-01 0 1.5 MY_IR_SYSTEM\n551 Q0 G00-02 1 0.25 MY_IR_SYSTEM\n");
    }

    #[test]
    fn empty_hits_write_nothing() {
        let mut w = TrecWriter::new(Vec::new(), "tag");
        w.write_hits("1", &[]).unwrap();
        assert!(w.finish().unwrap().is_empty());
    }
}
