// Term-weighted similarity index and ranking over recipe ingredients

pub mod search;
pub mod tfidf;

// Re-exports
pub use search::{rank, RankedResult, SearchIndex};
pub use tfidf::{tokenize, TfIdfIndex};
