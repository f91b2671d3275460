//! Term-weighting schemes shared by document and query vectors.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// How raw term counts become vector weights.
///
/// Parsing is permissive: any unrecognized name selects [`Weighting::Binary`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Weighting {
    /// 1 for every term present.
    #[default]
    Binary,
    /// `1 + log10(count)` for documents, raw count for queries.
    TermFrequency,
    /// `count * log10(N / df)`.
    #[serde(rename = "tfidf")]
    TfIdf,
}

impl Weighting {
    pub fn as_str(self) -> &'static str {
        match self {
            Weighting::Binary => "binary",
            Weighting::TermFrequency => "term-frequency",
            Weighting::TfIdf => "tfidf",
        }
    }
}

impl From<&str> for Weighting {
    fn from(name: &str) -> Self {
        match name {
            "binary" => Weighting::Binary,
            "term-frequency" | "tf" => Weighting::TermFrequency,
            "tfidf" => Weighting::TfIdf,
            other => {
                tracing::warn!(scheme = other, "unrecognized weighting scheme, using binary");
                Weighting::Binary
            }
        }
    }
}

impl FromStr for Weighting {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> { Ok(Weighting::from(s)) }
}

impl fmt::Display for Weighting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Sub-linear term frequency: `1 + log10(count)`, or 0 when the term is absent.
pub fn log_tf(count: u32) -> f64 {
    if count > 0 { 1.0 + (count as f64).log10() } else { 0.0 }
}

/// Inverse document frequency `log10(num_docs / doc_freq)`.
///
/// `doc_freq` must be non-zero; every indexed term occurs in at least one document.
pub fn idf(num_docs: usize, doc_freq: usize) -> f64 {
    (num_docs as f64 / doc_freq as f64).log10()
}
