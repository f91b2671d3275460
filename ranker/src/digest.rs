//! Load-time digest of an inverted index under one weighting scheme.

use crate::index::{DocId, InvertedIndex};
use crate::weighting::{idf, log_tf, Weighting};
use std::collections::HashMap;

/// Immutable weight and norm tables derived from an [`InvertedIndex`].
///
/// Weights and norms always come from the same [`Weighting`]; a digest never
/// mixes schemes. Everything is computed in [`IndexDigest::new`] and only read
/// afterwards, so a digest can be shared across threads freely.
#[derive(Debug, Clone)]
pub struct IndexDigest {
    scheme: Weighting,
    num_docs: usize,
    idf: HashMap<String, f64>,
    postings: HashMap<String, Vec<DocId>>, // sorted by doc_id
    weights: HashMap<DocId, HashMap<String, f64>>,
    norms: HashMap<DocId, f64>,
}

impl IndexDigest {
    pub fn new(index: &InvertedIndex, scheme: Weighting) -> Self {
        let num_docs = index.doc_ids().len();

        let mut postings: HashMap<String, Vec<DocId>> = HashMap::with_capacity(index.num_terms());
        let mut idf_table: HashMap<String, f64> = HashMap::with_capacity(index.num_terms());
        for (term, docs) in &index.postings {
            if docs.is_empty() { continue; }
            let mut plist: Vec<DocId> = docs.keys().copied().collect();
            plist.sort_unstable();
            idf_table.insert(term.clone(), idf(num_docs, plist.len()));
            postings.insert(term.clone(), plist);
        }

        let weights = build_weights(index, scheme, &idf_table);
        let norms = build_norms(&weights);

        tracing::debug!(
            %scheme,
            num_docs,
            num_terms = postings.len(),
            scored_docs = norms.len(),
            "index digest built"
        );
        Self { scheme, num_docs, idf: idf_table, postings, weights, norms }
    }

    pub fn scheme(&self) -> Weighting { self.scheme }

    /// Number of distinct document ids in the source index.
    pub fn num_docs(&self) -> usize { self.num_docs }

    pub fn num_terms(&self) -> usize { self.postings.len() }

    /// Documents with a non-zero norm, i.e. the ones that can be scored.
    pub fn num_scored_docs(&self) -> usize { self.norms.len() }

    pub fn doc_frequency(&self, term: &str) -> usize {
        self.postings.get(term).map_or(0, Vec::len)
    }

    /// `log10(N / df)` for an indexed term, `None` for unknown terms.
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.idf.get(term).copied()
    }

    /// Ascending ids of the documents containing `term`.
    pub fn postings(&self, term: &str) -> &[DocId] {
        self.postings.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn weight(&self, doc: DocId, term: &str) -> Option<f64> {
        self.weights.get(&doc)?.get(term).copied()
    }

    pub fn weights(&self, doc: DocId) -> Option<&HashMap<String, f64>> {
        self.weights.get(&doc)
    }

    pub fn norm(&self, doc: DocId) -> Option<f64> {
        self.norms.get(&doc).copied()
    }
}

fn build_weights(
    index: &InvertedIndex,
    scheme: Weighting,
    idf_table: &HashMap<String, f64>,
) -> HashMap<DocId, HashMap<String, f64>> {
    let mut weights: HashMap<DocId, HashMap<String, f64>> = HashMap::new();
    for (term, docs) in &index.postings {
        let term_idf = idf_table.get(term).copied().unwrap_or(0.0);
        for (&doc, &count) in docs {
            let w = match scheme {
                Weighting::Binary => 1.0,
                Weighting::TermFrequency => log_tf(count),
                Weighting::TfIdf => count as f64 * term_idf,
            };
            weights.entry(doc).or_default().insert(term.clone(), w);
        }
    }
    weights
}

/// Euclidean norm per document. Documents whose weights are all zero (a
/// `tfidf` document made only of terms present everywhere) get no entry and
/// are never scored.
fn build_norms(weights: &HashMap<DocId, HashMap<String, f64>>) -> HashMap<DocId, f64> {
    weights
        .iter()
        .filter_map(|(&doc, terms)| {
            let norm = terms.values().map(|w| w * w).sum::<f64>().sqrt();
            (norm > 0.0).then_some((doc, norm))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn sample() -> InvertedIndex {
        [("cat", 1, 2), ("cat", 2, 1), ("dog", 2, 3), ("owl", 3, 4), ("cat", 3, 1)]
            .into_iter()
            .collect()
    }

    #[test]
    fn counts_distinct_documents() {
        let digest = IndexDigest::new(&sample(), Weighting::Binary);
        assert_eq!(digest.num_docs(), 3);
        assert_eq!(digest.num_terms(), 3);
        assert_eq!(digest.doc_frequency("cat"), 3);
        assert_eq!(digest.doc_frequency("zzz"), 0);
        assert_eq!(digest.postings("cat"), &[1, 2, 3]);
        assert!(digest.postings("zzz").is_empty());
    }

    #[test]
    fn binary_weights_ignore_counts() {
        let digest = IndexDigest::new(&sample(), Weighting::Binary);
        assert_eq!(digest.weight(2, "dog"), Some(1.0));
        assert_eq!(digest.weight(3, "owl"), Some(1.0));
        assert_eq!(digest.weight(1, "dog"), None);
        assert!((digest.norm(2).unwrap() - 2f64.sqrt()).abs() < EPS);
    }

    #[test]
    fn term_frequency_weights_are_log_scaled() {
        let digest = IndexDigest::new(&sample(), Weighting::TermFrequency);
        assert!((digest.weight(1, "cat").unwrap() - (1.0 + 2f64.log10())).abs() < EPS);
        assert_eq!(digest.weight(2, "cat"), Some(1.0));
        assert!((digest.weight(3, "owl").unwrap() - (1.0 + 4f64.log10())).abs() < EPS);
    }

    #[test]
    fn single_term_document_norm_is_its_weight() {
        let digest = IndexDigest::new(&sample(), Weighting::TermFrequency);
        assert!((digest.norm(1).unwrap() - digest.weight(1, "cat").unwrap()).abs() < EPS);
    }

    #[test]
    fn tfidf_weights_scale_count_by_idf() {
        let digest = IndexDigest::new(&sample(), Weighting::TfIdf);
        let dog_idf = 3f64.log10();
        assert!((digest.idf("dog").unwrap() - dog_idf).abs() < EPS);
        assert!((digest.weight(2, "dog").unwrap() - 3.0 * dog_idf).abs() < EPS);
        assert!((digest.weight(3, "owl").unwrap() - 4.0 * dog_idf).abs() < EPS);
        // "cat" is in every document
        assert_eq!(digest.weight(1, "cat"), Some(0.0));
    }

    #[test]
    fn all_zero_tfidf_document_has_no_norm() {
        let digest = IndexDigest::new(&sample(), Weighting::TfIdf);
        assert_eq!(digest.norm(1), None);
        assert!(digest.norm(2).is_some());
        assert_eq!(digest.num_scored_docs(), 2);
    }

    #[test]
    fn empty_index_builds_empty_tables() {
        let digest = IndexDigest::new(&InvertedIndex::new(), Weighting::TfIdf);
        assert_eq!(digest.num_docs(), 0);
        assert_eq!(digest.num_scored_docs(), 0);
        assert_eq!(digest.idf("cat"), None);
    }
}
