use logos::Logos;
use std::fmt;

/// Token type for `.talk` conversation files.
///
/// Keywords (`node`, `says`, `choice`, ...) are plain `Token::Word`s; the
/// parser decides from context whether a word is a keyword or a node id.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Left brace `{`.
    LBrace,
    /// Right brace `}`.
    RBrace,
    /// Arrow `->` pointing at a target node.
    Arrow,
    /// Newline character (statement separator).
    Newline,
    /// Triple-quoted doc string (`"""..."""`), trimmed.
    DocString(String),
    /// Double-quoted string literal with escapes resolved.
    Str(String),
    /// Integer literal, kept as written so it can double as a node id.
    Integer(String),
    /// Floating-point literal, kept as written.
    Float(String),
    /// Bare word (identifier or keyword).
    Word(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::Arrow => write!(f, "->"),
            Token::Newline => write!(f, "newline"),
            Token::DocString(_) => write!(f, "doc string"),
            Token::Str(s) => write!(f, "\"{s}\""),
            Token::Integer(s) => write!(f, "{s}"),
            Token::Float(s) => write!(f, "{s}"),
            Token::Word(w) => write!(f, "{w}"),
        }
    }
}

#[derive(Logos, Debug)]
#[logos(skip r"[ \t\r]+")]
#[logos(skip r"--[^\n]*")]
enum RawToken {
    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("->")]
    Arrow,

    #[token("\n")]
    Newline,

    #[token("\"\"\"")]
    DocStringStart,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    Str,

    #[regex(r"-?[0-9]+\.[0-9]+")]
    Float,

    #[regex(r"-?[0-9]+")]
    Integer,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Word,
}

/// A lexer error with source location.
#[derive(Debug, Clone)]
pub struct LexError {
    /// Byte range of the erroneous input in the source.
    pub span: std::ops::Range<usize>,
    /// Human-readable description of the lexer error.
    pub message: String,
}

/// Lex source text into a sequence of `(Token, Span)` pairs.
///
/// Lexing continues past errors so every problem in a file is reported at once.
pub fn lex(source: &str) -> (Vec<(Token, std::ops::Range<usize>)>, Vec<LexError>) {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    let mut lexer = RawToken::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(raw) => {
                let token = match raw {
                    RawToken::LBrace => Token::LBrace,
                    RawToken::RBrace => Token::RBrace,
                    RawToken::Arrow => Token::Arrow,
                    RawToken::Newline => Token::Newline,
                    RawToken::DocStringStart => {
                        let remainder = lexer.remainder();
                        match remainder.find("\"\"\"") {
                            Some(end_idx) => {
                                let content = &remainder[..end_idx];
                                lexer.bump(end_idx + 3);
                                let full_span = span.start..lexer.span().end;
                                tokens.push((
                                    Token::DocString(content.trim().to_string()),
                                    full_span,
                                ));
                                continue;
                            }
                            None => {
                                errors.push(LexError {
                                    span: span.clone(),
                                    message: "unterminated doc string (missing closing \"\"\")"
                                        .to_string(),
                                });
                                // Nothing after an unterminated doc string can be trusted.
                                break;
                            }
                        }
                    }
                    RawToken::Str => {
                        let slice = lexer.slice();
                        Token::Str(unescape(&slice[1..slice.len() - 1]))
                    }
                    RawToken::Float => Token::Float(lexer.slice().to_string()),
                    RawToken::Integer => Token::Integer(lexer.slice().to_string()),
                    RawToken::Word => Token::Word(lexer.slice().to_string()),
                };
                tokens.push((token, span));
            }
            Err(()) => {
                errors.push(LexError {
                    span: span.clone(),
                    message: format!("unexpected character: {:?}", &source[span.clone()]),
                });
            }
        }
    }

    (tokens, errors)
}

/// Resolve escape sequences in a string literal.
///
/// Supports `\\`, `\n`, `\r`, `\t`, `\"`. Unknown sequences are kept as-is.
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some('t') => out.push('\t'),
                Some('\\') => out.push('\\'),
                Some('"') => out.push('"'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}
