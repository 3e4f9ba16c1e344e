//! Writes documents back out in `.talk` syntax.

use std::fmt::Write;

use pv_core::{GraphDocument, NodeId};

/// Render a document as `.talk` source.
///
/// The output loads back into a document with the same nodes, choices,
/// metadata and layout.
pub fn to_source(document: &GraphDocument) -> String {
    let mut out = String::new();
    let meta = document.meta();

    if let Some(title) = &meta.title {
        let _ = writeln!(out, "conversation {}", quote(title));
    }
    if let Some(description) = &meta.description {
        let _ = writeln!(out, "description {}", quote(description));
    }

    let entry = document.entry_id();
    for node in document.nodes() {
        if !out.is_empty() {
            out.push('\n');
        }
        let marker = if &node.id == entry { "entry " } else { "" };
        let _ = writeln!(out, "{marker}node {} {{", node_ref(&node.id));
        if let Some(speaker) = &node.speaker {
            let _ = writeln!(out, "    speaker {}", quote(speaker));
        }
        let _ = writeln!(out, "    says {}", quote(&node.text));
        for choice in &node.choices {
            match &choice.target {
                Some(target) => {
                    let _ = writeln!(out, "    choice {} -> {}", quote(&choice.text), node_ref(target));
                }
                None => {
                    let _ = writeln!(out, "    choice {}", quote(&choice.text));
                }
            }
        }
        out.push_str("}\n");
    }

    let layout = document.layout();
    if !layout.is_empty() {
        out.push_str("\nlayout {\n");
        for edge in &layout.edges {
            let _ = writeln!(out, "    {} -> {}", node_ref(&edge.from), node_ref(&edge.to));
        }
        for (node, position) in &layout.positions {
            let _ = writeln!(out, "    {} at {} {}", node_ref(node), position.0, position.1);
        }
        out.push_str("}\n");
    }

    out
}

/// Node ids are written bare when the lexer would read them back unchanged.
fn node_ref(id: &NodeId) -> String {
    let s = id.as_str();
    let bare_word = s
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    let bare_integer = !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());

    if bare_word || bare_integer {
        s.to_string()
    } else {
        quote(s)
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}
