use std::borrow::Cow;

use crate::analyzer::Term;
use crate::index::InvertedIndex;
use crate::DocId;

/// Why a query matched nothing without computing any intersection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoMatchReason {
    /// The query analyzed to zero terms.
    EmptyQuery,
    /// This term has no postings at all.
    UnknownTerm(Term),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    NoMatch(NoMatchReason),
    /// Every term was indexed; ids ascending, possibly empty.
    Matches(Vec<DocId>),
}

impl SearchOutcome {
    pub fn doc_ids(&self) -> &[DocId] {
        match self {
            SearchOutcome::NoMatch(_) => &[],
            SearchOutcome::Matches(ids) => ids,
        }
    }

    pub fn into_doc_ids(self) -> Vec<DocId> {
        match self {
            SearchOutcome::NoMatch(_) => Vec::new(),
            SearchOutcome::Matches(ids) => ids,
        }
    }

    pub fn is_no_match(&self) -> bool { matches!(self, SearchOutcome::NoMatch(_)) }

    pub fn is_empty(&self) -> bool { self.doc_ids().is_empty() }

    pub fn len(&self) -> usize { self.doc_ids().len() }
}

/// Set intersection of two ascending, duplicate-free id lists.
///
/// Unsorted or duplicated input does not panic but gives a wrong answer.
pub fn intersection(a: &[DocId], b: &[DocId]) -> Vec<DocId> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] < b[j] {
            i += 1;
        } else if a[i] > b[j] {
            j += 1;
        } else {
            out.push(a[i]);
            i += 1;
            j += 1;
        }
    }
    out
}

impl InvertedIndex {
    /// Documents containing every term of `query`.
    ///
    /// A single term that was never indexed ends the search with
    /// [`SearchOutcome::NoMatch`], whatever the other terms are.
    pub fn search(&self, query: &str) -> SearchOutcome {
        let mut result: Option<Cow<'_, [DocId]>> = None;
        for term in self.analyzer().analyze(query) {
            let Some(ids) = self.postings(&term) else {
                tracing::trace!(%term, "term not indexed");
                return SearchOutcome::NoMatch(NoMatchReason::UnknownTerm(term));
            };
            result = Some(match result {
                None => Cow::Borrowed(ids),
                Some(acc) => Cow::Owned(intersection(&acc, ids)),
            });
        }
        match result {
            Some(ids) => SearchOutcome::Matches(ids.into_owned()),
            None => SearchOutcome::NoMatch(NoMatchReason::EmptyQuery),
        }
    }
}
