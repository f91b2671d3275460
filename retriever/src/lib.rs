use anyhow::{Context, Result};
use ranker::{DocId, IndexDigest, InvertedIndex, QueryScorer, Weighting};
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// A pre-tokenized query read from a query file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub id: String,
    pub terms: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct IndexSummary {
    pub scheme: Weighting,
    pub num_docs: usize,
    pub num_terms: usize,
    pub scored_docs: usize,
}

/// Load an inverted index stored as `{"term": {"doc_id": count, ...}, ...}`.
pub fn load_index(path: &Path) -> Result<InvertedIndex> {
    let f = File::open(path).with_context(|| format!("opening index {}", path.display()))?;
    let index: InvertedIndex = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parsing index {}", path.display()))?;
    Ok(index)
}

/// Parse queries, one per line: `<query-id> <term> <term> ...`.
/// Blank lines and `#` comments are skipped; a query may have no terms.
pub fn parse_queries<R: BufRead>(reader: R) -> Result<Vec<Query>> {
    let mut queries = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("reading query line {}", lineno + 1))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') { continue; }
        let mut fields = line.split_whitespace();
        let Some(id) = fields.next() else { continue };
        queries.push(Query { id: id.to_string(), terms: fields.map(str::to_string).collect() });
    }
    Ok(queries)
}

pub fn load_queries(path: &Path) -> Result<Vec<Query>> {
    let f = File::open(path).with_context(|| format!("opening queries {}", path.display()))?;
    parse_queries(BufReader::new(f))
}

/// Rank every query, returning `(query id, ranked doc ids)` in input order.
pub fn rank_queries(digest: &IndexDigest, queries: &[Query], top_k: usize) -> Vec<(String, Vec<DocId>)> {
    let scorer = QueryScorer::new(digest);
    queries
        .iter()
        .map(|q| (q.id.clone(), scorer.rank(&q.terms, top_k)))
        .collect()
}

/// Write results as `<query-id> <doc-id>` lines in rank order.
pub fn write_results<W: Write>(mut out: W, results: &[(String, Vec<DocId>)]) -> Result<()> {
    for (qid, docs) in results {
        for doc in docs {
            writeln!(out, "{qid} {doc}")?;
        }
    }
    out.flush()?;
    Ok(())
}

pub fn summarize(digest: &IndexDigest) -> IndexSummary {
    IndexSummary {
        scheme: digest.scheme(),
        num_docs: digest.num_docs(),
        num_terms: digest.num_terms(),
        scored_docs: digest.num_scored_docs(),
    }
}

/// Load the index, optionally validate it, and build its digest.
pub fn prepare(index_path: &Path, weighting: &str, strict: bool) -> Result<IndexDigest> {
    let index = load_index(index_path)?;
    if strict {
        index.validate().context("index failed validation")?;
    }
    let scheme = Weighting::from(weighting);
    let digest = IndexDigest::new(&index, scheme);
    tracing::info!(%scheme, num_docs = digest.num_docs(), num_terms = digest.num_terms(), "index loaded");
    Ok(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_query_lines() {
        let text = "# header\n1 cat dog\n\n2   zzz\n3\n";
        let queries = parse_queries(text.as_bytes()).unwrap();
        assert_eq!(queries.len(), 3);
        assert_eq!(queries[0], Query { id: "1".into(), terms: vec!["cat".into(), "dog".into()] });
        assert_eq!(queries[1].terms, vec!["zzz".to_string()]);
        assert!(queries[2].terms.is_empty());
    }

    #[test]
    fn writes_one_line_per_hit() {
        let mut buf = Vec::new();
        write_results(&mut buf, &[("7".into(), vec![3, 1]), ("8".into(), vec![])]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "7 3\n7 1\n");
    }
}
