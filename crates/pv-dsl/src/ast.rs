//! Syntax tree for `.talk` files.

/// Source span as a byte range.
pub type Span = std::ops::Range<usize>;

/// An AST node with source location.
#[derive(Debug, Clone)]
pub struct Spanned<T> {
    /// The wrapped AST node.
    pub node: T,
    /// The byte range of this node in the source text.
    pub span: Span,
}

/// A parsed source file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Top-level items in source order.
    pub items: Vec<Spanned<Item>>,
}

impl SourceFile {
    /// All node declarations in source order.
    pub fn nodes(&self) -> impl Iterator<Item = &Spanned<NodeDecl>> {
        self.items.iter().filter_map(|item| match &item.node {
            Item::Node(decl) => Some(decl),
            _ => None,
        })
    }

    /// Span of the first declaration of a node id.
    pub fn node_span(&self, id: &str) -> Option<Span> {
        self.nodes()
            .find(|decl| decl.node.id.node == id)
            .map(|decl| decl.span.clone())
    }
}

/// A top-level item.
#[derive(Debug, Clone)]
pub enum Item {
    /// `conversation "Title"`.
    Title(String),
    /// `description "..."` or `description """..."""`.
    Description(String),
    /// `[entry] node <id> { ... }`.
    Node(Spanned<NodeDecl>),
    /// `layout { ... }`.
    Layout(Vec<Spanned<LayoutStmt>>),
}

/// A node declaration, e.g. `entry node greeting { ... }`.
#[derive(Debug, Clone)]
pub struct NodeDecl {
    /// Whether the node carries the `entry` marker.
    pub entry: bool,
    /// The node id as written.
    pub id: Spanned<String>,
    /// Statements inside the braces.
    pub body: Vec<Spanned<NodeStmt>>,
}

/// A statement inside a node body.
#[derive(Debug, Clone)]
pub enum NodeStmt {
    /// `speaker "Name"`.
    Speaker(String),
    /// `says "Line"`.
    Says(String),
    /// `choice "Text" [-> target]`.
    Choice {
        /// The reply text.
        text: String,
        /// Target node id; absent means the reply ends the conversation.
        target: Option<Spanned<String>>,
    },
}

/// A statement inside a `layout` block.
#[derive(Debug, Clone)]
pub enum LayoutStmt {
    /// `a -> b`: an editor edge.
    Edge {
        /// Source node id.
        from: Spanned<String>,
        /// Destination node id.
        to: Spanned<String>,
    },
    /// `a at 10 20`: a canvas position.
    Position {
        /// The positioned node id.
        node: Spanned<String>,
        /// Horizontal coordinate.
        x: f32,
        /// Vertical coordinate.
        y: f32,
    },
}
