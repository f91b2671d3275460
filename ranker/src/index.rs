use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

pub type DocId = u32;

/// Raw inverted index: term -> (doc id -> occurrence count).
///
/// Serializes as a plain nested map, e.g. `{"cat": {"1": 2, "2": 1}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvertedIndex {
    pub postings: HashMap<String, HashMap<DocId, u32>>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Record `count` occurrences of `term` in `doc`, replacing any previous count.
    pub fn insert(&mut self, term: impl Into<String>, doc: DocId, count: u32) {
        self.postings.entry(term.into()).or_default().insert(doc, count);
    }

    pub fn postings(&self, term: &str) -> Option<&HashMap<DocId, u32>> {
        self.postings.get(term)
    }

    pub fn num_terms(&self) -> usize { self.postings.len() }

    pub fn is_empty(&self) -> bool { self.postings.is_empty() }

    /// Distinct document ids across all terms, ascending.
    pub fn doc_ids(&self) -> BTreeSet<DocId> {
        self.postings.values().flat_map(|docs| docs.keys().copied()).collect()
    }

    /// Check the well-formedness the scorer assumes: every term has at least
    /// one posting and every count is positive.
    pub fn validate(&self) -> Result<()> {
        for (term, docs) in &self.postings {
            if docs.is_empty() {
                bail!("term {term:?} has an empty posting list");
            }
            if let Some((doc, _)) = docs.iter().find(|(_, count)| **count == 0) {
                bail!("term {term:?} has a zero count for document {doc}");
            }
        }
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<(S, DocId, u32)> for InvertedIndex {
    fn from_iter<I: IntoIterator<Item = (S, DocId, u32)>>(iter: I) -> Self {
        let mut index = InvertedIndex::new();
        for (term, doc, count) in iter {
            index.insert(term, doc, count);
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_ids_are_distinct_across_terms() {
        let index: InvertedIndex = [("cat", 1, 2), ("cat", 2, 1), ("dog", 2, 3), ("eel", 7, 1)]
            .into_iter()
            .collect();
        assert_eq!(index.doc_ids().into_iter().collect::<Vec<_>>(), vec![1, 2, 7]);
        assert_eq!(index.num_terms(), 3);
    }

    #[test]
    fn validate_rejects_zero_counts() {
        let mut index = InvertedIndex::new();
        index.insert("cat", 1, 2);
        assert!(index.validate().is_ok());
        index.insert("dog", 4, 0);
        let err = index.validate().unwrap_err();
        assert!(err.to_string().contains("dog"));
    }

    #[test]
    fn validate_rejects_empty_posting_lists() {
        let mut index = InvertedIndex::new();
        index.postings.insert("ghost".into(), HashMap::new());
        assert!(index.validate().is_err());
    }

    #[test]
    fn deserializes_from_nested_json_map() {
        let index: InvertedIndex = serde_json::from_str(r#"{"cat": {"1": 2, "2": 1}, "dog": {"2": 3}}"#).unwrap();
        assert_eq!(index.postings("cat").and_then(|p| p.get(&1)), Some(&2));
        assert_eq!(index.postings("dog").map(|p| p.len()), Some(1));
        assert!(index.postings("zzz").is_none());
    }
}
