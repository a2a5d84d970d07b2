use std::collections::HashMap;

use crate::analyzer::{Analyzer, Term};
use crate::error::IndexError;
use crate::{DocId, Document};

/// Inverted index mapping each term to the ids of the documents containing it.
///
/// The outer map has no meaningful order. Postings lists are ascending and
/// duplicate-free as long as documents are added once each, in ascending id
/// order. `add` does not check this; `add_checked` does.
#[derive(Debug, Default, Clone)]
pub struct InvertedIndex {
    analyzer: Analyzer,
    postings: HashMap<Term, Vec<DocId>>,
    num_docs: usize,
    last_doc_id: Option<DocId>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    pub fn analyzer(&self) -> &Analyzer { &self.analyzer }

    /// Append `documents` to the index.
    ///
    /// A document id is skipped for a term only when it is already the last
    /// entry of that term's postings, so repeated terms inside one document
    /// are stored once. Adding the same document again after others leaves a
    /// duplicate id behind.
    pub fn add(&mut self, documents: &[Document]) {
        for doc in documents {
            for term in self.analyzer.analyze(&doc.text) {
                let ids = self.postings.entry(term).or_default();
                if ids.last() == Some(&doc.id) {
                    continue;
                }
                ids.push(doc.id);
            }
            self.num_docs += 1;
            self.last_doc_id = Some(self.last_doc_id.map_or(doc.id, |prev| prev.max(doc.id)));
        }
        tracing::debug!(added = documents.len(), num_terms = self.postings.len(), "added documents");
    }

    /// Like [`add`](Self::add), but rejects the whole batch unless every id is
    /// strictly greater than the one before it, including ids already indexed.
    pub fn add_checked(&mut self, documents: &[Document]) -> Result<(), IndexError> {
        let mut previous = self.last_doc_id;
        for doc in documents {
            if let Some(prev) = previous {
                if doc.id <= prev {
                    return Err(IndexError::OutOfOrder { previous: prev, found: doc.id });
                }
            }
            previous = Some(doc.id);
        }
        self.add(documents);
        Ok(())
    }

    pub fn postings(&self, term: &str) -> Option<&[DocId]> {
        self.postings.get(term).map(Vec::as_slice)
    }

    pub fn contains_term(&self, term: &str) -> bool { self.postings.contains_key(term) }

    pub fn terms(&self) -> impl Iterator<Item = &str> + '_ {
        self.postings.keys().map(String::as_str)
    }

    pub fn num_terms(&self) -> usize { self.postings.len() }

    /// Number of documents passed to `add`, counting repeats.
    pub fn num_documents(&self) -> usize { self.num_docs }

    /// Highest document id added so far.
    pub fn last_doc_id(&self) -> Option<DocId> { self.last_doc_id }

    pub fn is_empty(&self) -> bool { self.postings.is_empty() }
}
