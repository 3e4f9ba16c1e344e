use std::fmt;

use crate::node::NodeId;

/// Alias for `Result<T, DocumentError>`.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Errors raised while building or querying a [`GraphDocument`](crate::GraphDocument).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DocumentError {
    /// The requested node ID does not exist in the document.
    #[error("node not found: \"{0}\"")]
    NodeNotFound(NodeId),

    /// Two nodes share the same identifier.
    #[error("duplicate node id: \"{0}\"")]
    DuplicateId(NodeId),

    /// A reference names a node that does not exist in the document.
    #[error("{origin} refers to unknown node \"{target}\"")]
    DanglingReference {
        /// Where the unresolved reference was found.
        origin: ReferenceOrigin,
        /// The node ID that could not be resolved.
        target: NodeId,
    },

    /// The document does not have exactly one entry node.
    #[error("expected exactly one entry node, found {found}")]
    MissingEntry {
        /// How many nodes were flagged as the entry point.
        found: usize,
    },
}

/// The place a node reference was written down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceOrigin {
    /// The target of a choice, by owning node and position.
    Choice {
        /// The node that owns the choice.
        node: NodeId,
        /// Zero-based position of the choice within the node.
        index: usize,
    },
    /// An endpoint of a layout edge.
    Edge {
        /// The edge's source node.
        from: NodeId,
        /// The edge's destination node.
        to: NodeId,
    },
    /// A layout position entry.
    Position,
}

impl fmt::Display for ReferenceOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceOrigin::Choice { node, index } => {
                write!(f, "choice {index} of node \"{node}\"")
            }
            ReferenceOrigin::Edge { from, to } => write!(f, "layout edge {from} -> {to}"),
            ReferenceOrigin::Position => write!(f, "layout position"),
        }
    }
}
