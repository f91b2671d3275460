//! Query-time scoring and top-k ranking against an [`IndexDigest`].

use crate::digest::IndexDigest;
use crate::index::DocId;
use crate::weighting::Weighting;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

pub const DEFAULT_TOP_K: usize = 10;

/// Sparse query weights under the digest's scheme.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryVector {
    pub weights: HashMap<String, f64>,
}

impl QueryVector {
    pub fn get(&self, term: &str) -> Option<f64> { self.weights.get(term).copied() }

    pub fn is_empty(&self) -> bool { self.weights.is_empty() }

    /// Euclidean length of the query vector. Not used by ranking, which
    /// normalizes by the document norm only.
    pub fn norm(&self) -> f64 {
        self.weights.values().map(|w| w * w).sum::<f64>().sqrt()
    }
}

/// Ranks documents by dot product with the query divided by the document norm.
///
/// Holds only a shared borrow of the digest; every call allocates its own
/// transient state.
#[derive(Debug, Clone, Copy)]
pub struct QueryScorer<'a> {
    digest: &'a IndexDigest,
}

impl<'a> QueryScorer<'a> {
    pub fn new(digest: &'a IndexDigest) -> Self { Self { digest } }

    pub fn digest(&self) -> &'a IndexDigest { self.digest }

    /// Documents sharing at least one term with the query, ascending.
    pub fn candidates<S: AsRef<str>>(&self, query: &[S]) -> BTreeSet<DocId> {
        query
            .iter()
            .flat_map(|term| self.digest.postings(term.as_ref()).iter().copied())
            .collect()
    }

    pub fn query_vector<S: AsRef<str>>(&self, query: &[S]) -> QueryVector {
        let mut counts: HashMap<&str, u32> = HashMap::new();
        for term in query {
            *counts.entry(term.as_ref()).or_insert(0) += 1;
        }
        let weights: HashMap<String, f64> = match self.digest.scheme() {
            Weighting::Binary => counts.into_keys().map(|t| (t.to_string(), 1.0)).collect(),
            // Raw in-query counts: queries are not log-dampened.
            Weighting::TermFrequency => counts
                .into_iter()
                .map(|(t, c)| (t.to_string(), c as f64))
                .collect(),
            Weighting::TfIdf => counts
                .into_iter()
                .filter_map(|(t, c)| Some((t.to_string(), self.digest.idf(t)? * c as f64)))
                .collect(),
        };
        QueryVector { weights }
    }

    /// Sparse dot product with the document's weights over the document norm.
    /// `None` when the document has no norm and therefore cannot be scored.
    pub fn score(&self, doc: DocId, query: &QueryVector) -> Option<f64> {
        let norm = self.digest.norm(doc)?;
        let doc_weights = self.digest.weights(doc)?;
        let (small, large) = if query.weights.len() <= doc_weights.len() {
            (&query.weights, doc_weights)
        } else {
            (doc_weights, &query.weights)
        };
        let dot: f64 = small
            .iter()
            .filter_map(|(term, w)| large.get(term).map(|other| w * other))
            .sum();
        Some(dot / norm)
    }

    /// Top `top_k` candidates with their scores, highest first. Ties go to
    /// the lower document id.
    pub fn rank_scored<S: AsRef<str>>(&self, query: &[S], top_k: usize) -> Vec<(DocId, f64)> {
        if query.is_empty() || top_k == 0 {
            return Vec::new();
        }
        let candidates = self.candidates(query);
        if candidates.is_empty() {
            return Vec::new();
        }
        let qv = self.query_vector(query);
        let mut scored: Vec<(DocId, f64)> = candidates
            .into_iter()
            .filter_map(|doc| self.score(doc, &qv).map(|s| (doc, s)))
            .collect();
        tracing::debug!(query_terms = query.len(), candidates = scored.len(), top_k, "scored query");

        // partial selection for top-k, then order the kept prefix
        if scored.len() > top_k {
            scored.select_nth_unstable_by(top_k - 1, by_score_then_id);
            scored.truncate(top_k);
        }
        scored.sort_unstable_by(by_score_then_id);
        scored
    }

    /// Ids of the top `top_k` documents, highest score first.
    pub fn rank<S: AsRef<str>>(&self, query: &[S], top_k: usize) -> Vec<DocId> {
        self.rank_scored(query, top_k).into_iter().map(|(doc, _)| doc).collect()
    }

    pub fn rank_default<S: AsRef<str>>(&self, query: &[S]) -> Vec<DocId> {
        self.rank(query, DEFAULT_TOP_K)
    }
}

fn by_score_then_id(a: &(DocId, f64), b: &(DocId, f64)) -> Ordering {
    b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0))
}
