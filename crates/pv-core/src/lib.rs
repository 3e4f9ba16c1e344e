//! Core types for Palaver: conversation nodes, choices, and the graph document.
//!
//! This crate defines the validated, immutable model that the loaders in
//! `pv-dsl` produce and the traversal engine in `pv-dialogue` walks. It is
//! independent of any persisted format: a [`GraphDocument`] can also be
//! assembled in code through a [`DocumentBuilder`].

/// The immutable conversation graph and its builder.
pub mod document;
/// Error types used throughout the crate.
pub mod error;
/// Editor-only layout data (edges and node positions).
pub mod layout;
/// Nodes, choices, and node identifiers.
pub mod node;

/// Re-export document types.
pub use document::{DocumentBuilder, DocumentMeta, GraphDocument, NodeIndex};
/// Re-export error types.
pub use error::{DocumentError, DocumentResult, ReferenceOrigin};
/// Re-export layout types.
pub use layout::{Edge, Layout, Position};
/// Re-export node types.
pub use node::{Choice, Node, NodeId};
