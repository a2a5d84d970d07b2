//! Boolean AND full-text search over short documents.
//!
//! Text goes through [`Analyzer`] (tokenize, lowercase, drop stopwords, stem)
//! into an [`InvertedIndex`]; [`InvertedIndex::search`] intersects the
//! postings of every query term.

pub mod analyzer;
pub mod document;
pub mod dump;
pub mod error;
pub mod index;
pub mod search;
pub mod shared;

pub use analyzer::{Analyzer, Term};
pub use document::{DocId, Document};
pub use error::IndexError;
pub use index::InvertedIndex;
pub use search::{intersection, NoMatchReason, SearchOutcome};
pub use shared::{IndexStats, SharedIndex};
