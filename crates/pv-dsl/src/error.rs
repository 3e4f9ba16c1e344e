//! Error types for loading conversation payloads.

use pv_core::{DocumentError, NodeId, ReferenceOrigin};

/// Result type for load operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Why a payload could not be turned into a document.
///
/// Loading is all-or-nothing: any of these means no document was produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
    /// The payload does not follow the format's grammar.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// Two node records share an id.
    #[error("duplicate node id: \"{0}\"")]
    DuplicateId(NodeId),

    /// A reference names a node the payload does not define.
    #[error("dangling reference: {origin} refers to unknown node \"{target}\"")]
    DanglingReference {
        /// Where the reference was written.
        origin: ReferenceOrigin,
        /// The unresolved node id.
        target: NodeId,
    },

    /// Zero or several nodes are marked as the entry point.
    #[error("missing entry: expected exactly one entry node, found {found}")]
    MissingEntry {
        /// How many entry markers were found.
        found: usize,
    },
}

impl From<DocumentError> for LoadError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::DuplicateId(id) => LoadError::DuplicateId(id),
            DocumentError::DanglingReference { origin, target } => {
                LoadError::DanglingReference { origin, target }
            }
            DocumentError::MissingEntry { found } => LoadError::MissingEntry { found },
            other @ DocumentError::NodeNotFound(_) => LoadError::MalformedPayload(other.to_string()),
        }
    }
}
