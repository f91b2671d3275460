//! Vector-space ranking over a precomputed inverted index.
//!
//! [`IndexDigest`] turns raw per-document term counts into weight vectors and
//! norms once; [`QueryScorer`] ranks documents against tokenized queries.

pub mod digest;
pub mod index;
pub mod scorer;
pub mod weighting;

pub use digest::IndexDigest;
pub use index::{DocId, InvertedIndex};
pub use scorer::{QueryScorer, QueryVector, DEFAULT_TOP_K};
pub use weighting::Weighting;
