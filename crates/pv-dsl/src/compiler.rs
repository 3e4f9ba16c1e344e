//! Lowers a parsed `.talk` file into a validated [`GraphDocument`].

use pv_core::{
    Choice, DocumentBuilder, DocumentError, DocumentMeta, Edge, GraphDocument, Layout, Node,
    Position, ReferenceOrigin,
};

use crate::ast::{Item, LayoutStmt, NodeDecl, NodeStmt, SourceFile, Span, Spanned};
use crate::error::LoadError;

/// A load error pinned to the part of the source that caused it.
#[derive(Debug, Clone)]
pub struct SourceError {
    /// What went wrong.
    pub error: LoadError,
    /// Where it went wrong.
    pub span: Span,
}

fn malformed(span: Span, message: impl Into<String>) -> SourceError {
    SourceError {
        error: LoadError::MalformedPayload(message.into()),
        span,
    }
}

/// Compile a syntax tree into a document.
pub fn compile(ast: &SourceFile) -> Result<GraphDocument, SourceError> {
    let mut builder = DocumentBuilder::new();
    let mut meta = DocumentMeta::default();
    let mut layout = Layout::new();

    for item in &ast.items {
        match &item.node {
            Item::Title(title) => {
                if meta.title.is_some() {
                    return Err(malformed(item.span.clone(), "conversation title given twice"));
                }
                meta.title = Some(title.clone());
            }
            Item::Description(description) => {
                if meta.description.is_some() {
                    return Err(malformed(item.span.clone(), "description given twice"));
                }
                meta.description = Some(description.clone());
            }
            Item::Node(decl) => {
                let node = compile_node(decl)?;
                builder.add_node(node, decl.node.entry);
            }
            Item::Layout(stmts) => {
                for stmt in stmts {
                    match &stmt.node {
                        LayoutStmt::Edge { from, to } => {
                            layout.edges.push(Edge::new(from.node.as_str(), to.node.as_str()));
                        }
                        LayoutStmt::Position { node, x, y } => {
                            let previous = layout
                                .positions
                                .insert(node.node.as_str().into(), Position(*x, *y));
                            if previous.is_some() {
                                return Err(malformed(
                                    stmt.span.clone(),
                                    format!("position of node \"{}\" given twice", node.node),
                                ));
                            }
                        }
                    }
                }
            }
        }
    }

    builder
        .with_meta(meta)
        .with_layout(layout)
        .build()
        .map_err(|err| locate(ast, err))
}

fn compile_node(decl: &Spanned<NodeDecl>) -> Result<Node, SourceError> {
    let id = &decl.node.id.node;
    let mut speaker = None;
    let mut text = None;
    let mut choices = Vec::new();

    for stmt in &decl.node.body {
        match &stmt.node {
            NodeStmt::Speaker(name) => {
                if speaker.replace(name.clone()).is_some() {
                    return Err(malformed(
                        stmt.span.clone(),
                        format!("node \"{id}\" has more than one speaker"),
                    ));
                }
            }
            NodeStmt::Says(line) => {
                if text.replace(line.clone()).is_some() {
                    return Err(malformed(
                        stmt.span.clone(),
                        format!("node \"{id}\" has more than one `says` line"),
                    ));
                }
            }
            NodeStmt::Choice { text, target } => {
                let mut choice = Choice::new(text.clone());
                if let Some(target) = target {
                    choice = choice.with_target(target.node.as_str());
                }
                choices.push(choice);
            }
        }
    }

    let text = text.ok_or_else(|| {
        malformed(
            decl.node.id.span.clone(),
            format!("node \"{id}\" has no `says` line"),
        )
    })?;

    Ok(Node {
        id: id.as_str().into(),
        speaker,
        text,
        choices,
    })
}

/// Find the source span responsible for a document validation failure.
fn locate(ast: &SourceFile, err: DocumentError) -> SourceError {
    let span = match &err {
        DocumentError::DuplicateId(id) => ast
            .nodes()
            .filter(|d| d.node.id.node == id.as_str())
            .nth(1)
            .map(|d| d.node.id.span.clone()),
        DocumentError::DanglingReference {
            origin: ReferenceOrigin::Choice { node, index },
            ..
        } => ast
            .nodes()
            .find(|d| d.node.id.node == node.as_str())
            .and_then(|d| {
                d.node
                    .body
                    .iter()
                    .filter_map(|stmt| match &stmt.node {
                        NodeStmt::Choice { target, .. } => Some(target),
                        _ => None,
                    })
                    .nth(*index)
                    .and_then(|target| target.as_ref().map(|t| t.span.clone()))
            }),
        DocumentError::DanglingReference { origin, target } => {
            layout_stmts(ast).find_map(|stmt| match (&stmt.node, origin) {
                (LayoutStmt::Edge { from, to }, ReferenceOrigin::Edge { .. }) => {
                    [from, to]
                        .into_iter()
                        .find(|end| end.node == target.as_str())
                        .map(|end| end.span.clone())
                }
                (LayoutStmt::Position { node, .. }, ReferenceOrigin::Position)
                    if node.node == target.as_str() =>
                {
                    Some(node.span.clone())
                }
                _ => None,
            })
        }
        DocumentError::MissingEntry { found } if *found > 1 => ast
            .nodes()
            .filter(|d| d.node.entry)
            .nth(1)
            .map(|d| d.span.clone()),
        DocumentError::MissingEntry { .. } | DocumentError::NodeNotFound(_) => {
            ast.nodes().next().map(|d| d.span.clone())
        }
    };

    SourceError {
        error: err.into(),
        span: span.unwrap_or(0..0),
    }
}

fn layout_stmts(ast: &SourceFile) -> impl Iterator<Item = &Spanned<LayoutStmt>> {
    ast.items
        .iter()
        .filter_map(|item| match &item.node {
            Item::Layout(stmts) => Some(stmts),
            _ => None,
        })
        .flatten()
}
