use std::collections::{HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::error::{DocumentError, DocumentResult, ReferenceOrigin};
use crate::layout::Layout;
use crate::node::{Node, NodeId};

/// Descriptive metadata about a conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// Human-readable title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Free-text notes for authors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Position of a node inside the document that issued it.
///
/// Obtained from [`GraphDocument::entry_index`] or [`GraphDocument::index_of`]
/// and only meaningful for that same document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeIndex(usize);

/// A validated, immutable conversation.
///
/// Every choice target resolves, node ids are unique and exactly one node is
/// the entry point. There are no mutating methods, so one document can back
/// any number of concurrent conversations behind an `Arc`.
#[derive(Debug, Clone)]
pub struct GraphDocument {
    meta: DocumentMeta,
    nodes: Vec<Node>,
    entry: usize,
    layout: Layout,

    // Indexes
    by_id: HashMap<NodeId, usize>,
}

impl GraphDocument {
    /// Metadata about the conversation.
    pub fn meta(&self) -> &DocumentMeta {
        &self.meta
    }

    /// Editor layout data. Never consulted during traversal.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Look up a node by ID.
    pub fn get_node(&self, id: &NodeId) -> DocumentResult<&Node> {
        self.by_id
            .get(id)
            .map(|&i| &self.nodes[i])
            .ok_or_else(|| DocumentError::NodeNotFound(id.clone()))
    }

    /// Whether a node with this ID exists.
    pub fn contains(&self, id: &NodeId) -> bool {
        self.by_id.contains_key(id)
    }

    /// The node conversations start at.
    pub fn entry_node(&self) -> &Node {
        &self.nodes[self.entry]
    }

    /// ID of the entry node.
    pub fn entry_id(&self) -> &NodeId {
        &self.entry_node().id
    }

    /// Index of the entry node.
    pub fn entry_index(&self) -> NodeIndex {
        NodeIndex(self.entry)
    }

    /// Resolve a node ID to its index.
    pub fn index_of(&self, id: &NodeId) -> DocumentResult<NodeIndex> {
        self.by_id
            .get(id)
            .map(|&i| NodeIndex(i))
            .ok_or_else(|| DocumentError::NodeNotFound(id.clone()))
    }

    /// Node at a previously resolved index.
    ///
    /// # Panics
    ///
    /// Panics if `index` was issued by a different, smaller document.
    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.nodes[index.0]
    }

    /// All nodes in declaration order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total number of choices across all nodes.
    pub fn choice_count(&self) -> usize {
        self.nodes.iter().map(|n| n.choices.len()).sum()
    }

    // -----------------------------------------------------------------------
    // Analysis (authoring tools only)
    // -----------------------------------------------------------------------

    /// IDs of every node some sequence of choices can reach from the entry.
    pub fn reachable_from_entry(&self) -> HashSet<&NodeId> {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([self.entry]);
        seen.insert(&self.nodes[self.entry].id);

        while let Some(i) = queue.pop_front() {
            for target in self.nodes[i].choices.iter().filter_map(|c| c.target.as_ref()) {
                if seen.insert(target)
                    && let Some(&next) = self.by_id.get(target)
                {
                    queue.push_back(next);
                }
            }
        }
        seen
    }

    /// Nodes no conversation can ever reach, in declaration order.
    pub fn unreachable_nodes(&self) -> Vec<&Node> {
        let reachable = self.reachable_from_entry();
        self.nodes
            .iter()
            .filter(|n| !reachable.contains(&n.id))
            .collect()
    }

    /// Nodes without choices, in declaration order.
    pub fn terminal_nodes(&self) -> Vec<&Node> {
        self.nodes.iter().filter(|n| n.is_terminal()).collect()
    }
}

/// Collects node records and validates them into a [`GraphDocument`].
#[derive(Debug, Clone, Default)]
pub struct DocumentBuilder {
    meta: DocumentMeta,
    nodes: Vec<Node>,
    entries: Vec<usize>,
    layout: Layout,
}

impl DocumentBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.meta.title = Some(title.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.meta.description = Some(description.into());
        self
    }

    /// Replace all metadata.
    pub fn with_meta(mut self, meta: DocumentMeta) -> Self {
        self.meta = meta;
        self
    }

    /// Attach editor layout data.
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Add a regular node.
    pub fn node(mut self, node: Node) -> Self {
        self.add_node(node, false);
        self
    }

    /// Add the node conversations start at.
    pub fn entry(mut self, node: Node) -> Self {
        self.add_node(node, true);
        self
    }

    /// Add a node, optionally flagged as the entry point.
    pub fn add_node(&mut self, node: Node, is_entry: bool) {
        if is_entry {
            self.entries.push(self.nodes.len());
        }
        self.nodes.push(node);
    }

    /// Validate the collected records and produce the document.
    ///
    /// Checks run in a fixed order: duplicate ids, then unresolved
    /// references, then the entry point. The first failure is returned.
    pub fn build(self) -> DocumentResult<GraphDocument> {
        let mut by_id = HashMap::with_capacity(self.nodes.len());
        for (i, node) in self.nodes.iter().enumerate() {
            if by_id.insert(node.id.clone(), i).is_some() {
                return Err(DocumentError::DuplicateId(node.id.clone()));
            }
        }

        for node in &self.nodes {
            for (index, choice) in node.choices.iter().enumerate() {
                if let Some(target) = &choice.target
                    && !by_id.contains_key(target)
                {
                    return Err(DocumentError::DanglingReference {
                        origin: ReferenceOrigin::Choice {
                            node: node.id.clone(),
                            index,
                        },
                        target: target.clone(),
                    });
                }
            }
        }

        for edge in &self.layout.edges {
            for end in [&edge.from, &edge.to] {
                if !by_id.contains_key(end) {
                    return Err(DocumentError::DanglingReference {
                        origin: ReferenceOrigin::Edge {
                            from: edge.from.clone(),
                            to: edge.to.clone(),
                        },
                        target: end.clone(),
                    });
                }
            }
        }
        if let Some(id) = self.layout.positions.keys().find(|id| !by_id.contains_key(*id)) {
            return Err(DocumentError::DanglingReference {
                origin: ReferenceOrigin::Position,
                target: id.clone(),
            });
        }

        let entry = match self.entries.as_slice() {
            [entry] => *entry,
            other => return Err(DocumentError::MissingEntry { found: other.len() }),
        };

        Ok(GraphDocument {
            meta: self.meta,
            nodes: self.nodes,
            entry,
            layout: self.layout,
            by_id,
        })
    }
}
