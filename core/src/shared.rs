use parking_lot::RwLock;

use crate::error::IndexError;
use crate::index::InvertedIndex;
use crate::search::SearchOutcome;
use crate::{DocId, Document};

/// An [`InvertedIndex`] behind a single-writer, many-reader lock.
///
/// `add_checked` holds the write lock for the whole batch, so a search sees either
/// none or all of a batch.
#[derive(Debug, Default)]
pub struct SharedIndex {
    inner: RwLock<InvertedIndex>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexStats {
    pub num_terms: usize,
    pub num_documents: usize,
    pub last_doc_id: Option<DocId>,
}

impl SharedIndex {
    pub fn new(index: InvertedIndex) -> Self {
        Self { inner: RwLock::new(index) }
    }

    pub fn add_checked(&self, documents: &[Document]) -> Result<(), IndexError> {
        self.inner.write().add_checked(documents)
    }

    pub fn search(&self, query: &str) -> SearchOutcome {
        self.inner.read().search(query)
    }

    pub fn stats(&self) -> IndexStats {
        let index = self.inner.read();
        IndexStats {
            num_terms: index.num_terms(),
            num_documents: index.num_documents(),
            last_doc_id: index.last_doc_id(),
        }
    }
}

impl From<InvertedIndex> for SharedIndex {
    fn from(index: InvertedIndex) -> Self { Self::new(index) }
}
