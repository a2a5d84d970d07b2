use thiserror::Error;

use crate::DocId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// A document id did not come after the last id already accepted.
    #[error("document id {found} is not greater than the previous id {previous}")]
    OutOfOrder { previous: DocId, found: DocId },
}
