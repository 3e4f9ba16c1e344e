//! Conversation file formats for Palaver.
//!
//! Turns persisted payloads into validated [`GraphDocument`]s and writes them
//! back out. Two syntaxes are supported: the `.talk` text format (lexed with
//! logos, parsed with chumsky) and JSON. Loading never touches the
//! filesystem; callers hand in the bytes.

/// Syntax tree for `.talk` files.
pub mod ast;
/// Lowering from syntax tree to document.
pub mod compiler;
/// Span-annotated diagnostics and terminal rendering.
pub mod diagnostics;
/// Load error types.
pub mod error;
/// Format names and detection.
pub mod format;
/// JSON persistence.
pub mod json;
/// `.talk` tokenizer.
pub mod lexer;
/// `.talk` parser.
pub mod parser;
/// `.talk` writer.
pub mod writer;

use pv_core::GraphDocument;

pub use diagnostics::{Diagnostic, Severity, render_diagnostics};
pub use error::{LoadError, LoadResult};
pub use format::Format;
pub use json::{load_json, to_json};
pub use writer::to_source;

/// Load a document from raw payload bytes, detecting the syntax.
///
/// A leading UTF-8 byte order mark is ignored.
pub fn load(payload: &[u8]) -> LoadResult<GraphDocument> {
    let text = payload_text(payload)?;
    load_as(text, Format::detect(text))
}

/// Decode payload bytes as UTF-8 text without a leading byte order mark.
pub fn payload_text(payload: &[u8]) -> LoadResult<&str> {
    let text = std::str::from_utf8(payload)
        .map_err(|e| LoadError::MalformedPayload(format!("payload is not valid UTF-8: {e}")))?;
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text))
}

/// Load a document from text in a known syntax.
pub fn load_as(text: &str, format: Format) -> LoadResult<GraphDocument> {
    match format {
        Format::Json => load_json(text),
        Format::Talk => load_source(text),
    }
}

/// Serialize a document in the given syntax.
pub fn save_as(document: &GraphDocument, format: Format) -> serde_json::Result<String> {
    match format {
        Format::Json => to_json(document),
        Format::Talk => Ok(to_source(document)),
    }
}

/// Load a document from `.talk` source.
pub fn load_source(source: &str) -> LoadResult<GraphDocument> {
    let (tokens, lex_errors) = lexer::lex(source);
    if let Some(err) = lex_errors.first() {
        return Err(malformed_at(source, err.span.start, &err.message));
    }

    let ast = parser::parse(&tokens).map_err(|errors| match errors.first() {
        Some(err) => malformed_at(source, err.span.start, &err.message),
        None => LoadError::MalformedPayload("unparseable input".into()),
    })?;

    compiler::compile(&ast).map_err(|e| e.error)
}

fn malformed_at(source: &str, offset: usize, message: &str) -> LoadError {
    let (line, column) = diagnostics::line_col(source, offset);
    LoadError::MalformedPayload(format!("line {line}, column {column}: {message}"))
}

/// Check `.talk` source and report every problem with its location.
///
/// Errors mean [`load_source`] would fail. Warnings flag nodes that no
/// sequence of choices can reach from the entry node.
pub fn check_source(source: &str) -> Vec<Diagnostic> {
    let (tokens, lex_errors) = lexer::lex(source);
    let mut diagnostics: Vec<Diagnostic> = lex_errors
        .into_iter()
        .map(|e| Diagnostic::error(e.span, e.message))
        .collect();

    let ast = match parser::parse(&tokens) {
        Ok(ast) => ast,
        Err(parse_errors) => {
            diagnostics.extend(
                parse_errors
                    .into_iter()
                    .map(|e| Diagnostic::error(e.span, e.message)),
            );
            return diagnostics;
        }
    };
    if !diagnostics.is_empty() {
        return diagnostics;
    }

    match compiler::compile(&ast) {
        Ok(document) => {
            for node in document.unreachable_nodes() {
                let span = ast.node_span(node.id.as_str()).unwrap_or(0..0);
                diagnostics.push(
                    Diagnostic::warning(span, format!("node \"{}\" is never reached", node.id))
                        .with_label(format!("no choice leads to \"{}\"", node.id)),
                );
            }
        }
        Err(e) => diagnostics.push(Diagnostic::error(e.span, e.error.to_string())),
    }

    diagnostics
}
