use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::ast::*;
use crate::lexer::Token;

type Span = SimpleSpan;

/// Parse error with source span.
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Byte range of the offending input.
    pub span: std::ops::Range<usize>,
    /// Human-readable description.
    pub message: String,
}

fn spanned<T>(node: T, span: Span) -> Spanned<T> {
    Spanned {
        node,
        span: span.into_range(),
    }
}

/// Build the full source-file parser.
fn source_file_parser<'a, I>() -> impl Parser<'a, I, SourceFile, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    // -- Helpers --

    let kw = |k: &'static str| select! { Token::Word(ref w) if w.as_str() == k => () }.labelled(k);
    let string_lit = select! { Token::Str(s) => s }.labelled("string");
    let doc_string = select! { Token::DocString(s) => s }.labelled("doc string");
    let text = choice((string_lit.clone(), doc_string)).labelled("text");

    let number = select! {
        Token::Integer(s) => s,
        Token::Float(s) => s,
    }
    .try_map(|raw: String, span| {
        match raw.parse::<f32>() {
            Ok(n) if n.is_finite() => Ok(n),
            _ => Err(Rich::custom(span, format!("invalid number: {raw}"))),
        }
    })
    .labelled("number");

    // Node ids: bare words, integers or quoted strings
    let node_ref = select! {
        Token::Word(w) => w,
        Token::Integer(s) => s,
        Token::Str(s) => s,
    }
    .map_with(|id, e| spanned(id, e.span()))
    .labelled("node id");

    // Zero or more newlines
    let nl = just(Token::Newline).repeated().to(());
    // One or more newlines
    let nl1 = just(Token::Newline).repeated().at_least(1).to(());

    // -- Node body --

    let speaker = kw("speaker")
        .ignore_then(text.clone())
        .map(NodeStmt::Speaker)
        .labelled("speaker");

    let says = kw("says")
        .ignore_then(text.clone())
        .map(NodeStmt::Says)
        .labelled("says");

    let choice_stmt = kw("choice")
        .ignore_then(text.clone())
        .then(just(Token::Arrow).ignore_then(node_ref.clone()).or_not())
        .map(|(text, target)| NodeStmt::Choice { text, target })
        .labelled("choice");

    let node_stmt = choice((speaker, says, choice_stmt)).map_with(|stmt, e| spanned(stmt, e.span()));

    let node_body = node_stmt
        .separated_by(nl1.clone())
        .allow_trailing()
        .collect::<Vec<_>>()
        .delimited_by(
            just(Token::LBrace).then(nl.clone()),
            nl.clone().then(just(Token::RBrace)),
        );

    // [entry] node <id> { ... }
    let node_decl = kw("entry")
        .or_not()
        .then_ignore(kw("node"))
        .then(node_ref.clone())
        .then(node_body)
        .map_with(|((entry, id), body), e| {
            Item::Node(spanned(
                NodeDecl {
                    entry: entry.is_some(),
                    id,
                    body,
                },
                e.span(),
            ))
        })
        .labelled("node declaration");

    // -- Layout --

    let position = node_ref
        .clone()
        .then_ignore(kw("at"))
        .then(number.clone())
        .then(number)
        .map(|((node, x), y)| LayoutStmt::Position { node, x, y })
        .labelled("position");

    let edge = node_ref
        .clone()
        .then_ignore(just(Token::Arrow))
        .then(node_ref)
        .map(|(from, to)| LayoutStmt::Edge { from, to })
        .labelled("edge");

    let layout_stmt = choice((position, edge)).map_with(|stmt, e| spanned(stmt, e.span()));

    let layout_decl = kw("layout")
        .ignore_then(
            layout_stmt
                .separated_by(nl1.clone())
                .allow_trailing()
                .collect::<Vec<_>>()
                .delimited_by(
                    just(Token::LBrace).then(nl.clone()),
                    nl.clone().then(just(Token::RBrace)),
                ),
        )
        .map(Item::Layout)
        .labelled("layout block");

    // -- Header --

    let title = kw("conversation")
        .ignore_then(string_lit)
        .map(Item::Title)
        .labelled("conversation title");

    let description = kw("description")
        .ignore_then(text)
        .map(Item::Description)
        .labelled("description");

    let item = choice((title, description, layout_decl, node_decl))
        .map_with(|item, e| spanned(item, e.span()));

    // -- File --
    item.separated_by(nl1)
        .allow_trailing()
        .collect::<Vec<_>>()
        .padded_by(nl)
        .then_ignore(end())
        .map(|items| SourceFile { items })
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse a token stream into an AST.
pub fn parse(tokens: &[(Token, std::ops::Range<usize>)]) -> Result<SourceFile, Vec<ParseError>> {
    let token_iter = tokens
        .iter()
        .map(|(tok, span)| (tok.clone(), Span::from(span.clone())));

    let len = tokens.last().map_or(0, |(_, s)| s.end);
    let eoi: Span = (len..len).into();
    let stream = Stream::from_iter(token_iter).map(eoi, |(t, s): (_, _)| (t, s));

    let (output, errors) = source_file_parser().parse(stream).into_output_errors();

    if let Some(ast) = output
        && errors.is_empty()
    {
        return Ok(ast);
    }

    Err(errors
        .into_iter()
        .map(|e| ParseError {
            span: e.span().into_range(),
            message: e.to_string(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer;

    fn parse_source(source: &str) -> Result<SourceFile, Vec<ParseError>> {
        let (tokens, lex_errors) = lexer::lex(source);
        assert!(lex_errors.is_empty(), "lex errors: {lex_errors:?}");
        parse(&tokens)
    }

    fn single_node(ast: &SourceFile) -> &NodeDecl {
        let nodes: Vec<_> = ast.nodes().collect();
        assert_eq!(nodes.len(), 1);
        &nodes[0].node
    }

    #[test]
    fn parse_entry_node() {
        let ast = parse_source(
            r#"entry node greeting {
    speaker "Brom"
    says "Well met."
    choice "Who are you?" -> about
    choice "Farewell."
}"#,
        )
        .unwrap();

        let decl = single_node(&ast);
        assert!(decl.entry);
        assert_eq!(decl.id.node, "greeting");
        assert_eq!(decl.body.len(), 4);
        assert!(matches!(&decl.body[0].node, NodeStmt::Speaker(s) if s == "Brom"));
        assert!(matches!(&decl.body[1].node, NodeStmt::Says(s) if s == "Well met."));
        match &decl.body[2].node {
            NodeStmt::Choice { text, target } => {
                assert_eq!(text, "Who are you?");
                assert_eq!(target.as_ref().unwrap().node, "about");
            }
            other => panic!("expected choice, got {other:?}"),
        }
        assert!(matches!(&decl.body[3].node, NodeStmt::Choice { target: None, .. }));
    }

    #[test]
    fn parse_plain_node_with_doc_string() {
        let ast = parse_source(
            r#"node about {
    says """
    Brom, smith of this village.
    """
}"#,
        )
        .unwrap();

        let decl = single_node(&ast);
        assert!(!decl.entry);
        assert!(matches!(&decl.body[0].node, NodeStmt::Says(s) if s == "Brom, smith of this village."));
    }

    #[test]
    fn parse_integer_and_quoted_ids() {
        let ast = parse_source(
            r#"entry node 1 {
    says "first"
    choice "next" -> "second node"
}

node "second node" {
    says "second"
}"#,
        )
        .unwrap();

        let ids: Vec<_> = ast.nodes().map(|d| d.node.id.node.as_str()).collect();
        assert_eq!(ids, vec!["1", "second node"]);
    }

    #[test]
    fn parse_header_and_layout() {
        let ast = parse_source(
            r#"-- The blacksmith at the crossroads
conversation "The Blacksmith"
description "Brom's greeting."

entry node greeting {
    says "Well met."
}

layout {
    greeting at 120 -40.5
    greeting -> greeting
}
"#,
        )
        .unwrap();

        assert_eq!(ast.items.len(), 4);
        assert!(matches!(&ast.items[0].node, Item::Title(t) if t == "The Blacksmith"));
        assert!(matches!(&ast.items[1].node, Item::Description(d) if d == "Brom's greeting."));
        match &ast.items[3].node {
            Item::Layout(stmts) => {
                assert_eq!(stmts.len(), 2);
                assert!(matches!(
                    &stmts[0].node,
                    LayoutStmt::Position { x, y, .. } if *x == 120.0 && *y == -40.5
                ));
                assert!(matches!(&stmts[1].node, LayoutStmt::Edge { .. }));
            }
            other => panic!("expected layout, got {other:?}"),
        }
    }

    #[test]
    fn parse_empty_body() {
        let ast = parse_source("entry node quiet {\n}").unwrap();
        assert!(single_node(&ast).body.is_empty());
    }

    #[test]
    fn parse_empty_file() {
        let ast = parse_source("\n\n-- nothing here\n").unwrap();
        assert!(ast.items.is_empty());
    }

    #[test]
    fn node_span_covers_declaration() {
        let source = "entry node a {\n    says \"hi\"\n}";
        let ast = parse_source(source).unwrap();
        assert_eq!(ast.node_span("a"), Some(0..source.len()));
        assert_eq!(ast.node_span("b"), None);
    }

    #[test]
    fn missing_brace_is_an_error() {
        let errors = parse_source("node a {\n    says \"hi\"\n").unwrap_err();
        assert!(!errors.is_empty());
    }

    #[test]
    fn unknown_statement_is_an_error() {
        let errors = parse_source("node a {\n    shouts \"hi\"\n}").unwrap_err();
        assert!(!errors.is_empty());
    }

    #[test]
    fn choice_arrow_requires_target() {
        assert!(parse_source("node a {\n    choice \"go\" ->\n}").is_err());
    }
}
