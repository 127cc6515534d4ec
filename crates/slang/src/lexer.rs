//! Tokenizer for the slang surface grammar (spec.md section 6: Input
//! format). Grounded on `examples/plotnik-lang-plotnik`'s use of `logos`
//! for a small DSL's lexer: a `#[derive(Logos)]` token enum with
//! `#[token]`/`#[regex]` callbacks, no hand-rolled character scanner.
//!
//! Unlike `plotnik-lib`'s span-based, lossless (CST-oriented) token
//! stream, slang's parser only needs enough position information to
//! attach a `Position` to AST nodes for error reporting, so tokens carry
//! an already-resolved line/column pair rather than a byte span.

use logos::Logos;

use crate::error::{Error, Result};
use crate::position::Position;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"//[^\n]*")]
pub enum Token {
    #[token("let")]
    Let,
    #[token("import")]
    Import,
    #[token("if")]
    If,
    #[token("then")]
    Then,
    #[token("else")]
    Else,
    #[token("function")]
    Function,
    #[token("namespace")]
    Namespace,
    #[token("true")]
    True,
    #[token("false")]
    False,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_owned())]
    Ident(String),

    #[regex(r"[0-9]+\.[0-9]+", |lex| lex.slice().parse().ok())]
    Float(f64),
    #[regex(r"[0-9]+", |lex| lex.slice().parse().ok())]
    Int(i64),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| unescape(lex.slice()))]
    Str(String),

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token("=")]
    Equals,
    #[token("::")]
    ColonColon,
    #[token(":")]
    Colon,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("^")]
    Caret,
    #[token("%")]
    Percent,
    #[token("==")]
    EqEq,
    #[token("<=")]
    Le,
    #[token(">=")]
    Ge,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Let => write!(f, "'let'"),
            Self::Import => write!(f, "'import'"),
            Self::If => write!(f, "'if'"),
            Self::Then => write!(f, "'then'"),
            Self::Else => write!(f, "'else'"),
            Self::Function => write!(f, "'function'"),
            Self::Namespace => write!(f, "'namespace'"),
            Self::True => write!(f, "'true'"),
            Self::False => write!(f, "'false'"),
            Self::Ident(name) => write!(f, "identifier '{name}'"),
            Self::Float(value) => write!(f, "float '{value}'"),
            Self::Int(value) => write!(f, "int '{value}'"),
            Self::Str(value) => write!(f, "string {value:?}"),
            Self::LParen => write!(f, "'('"),
            Self::RParen => write!(f, "')'"),
            Self::LBrace => write!(f, "'{{'"),
            Self::RBrace => write!(f, "'}}'"),
            Self::LBracket => write!(f, "'['"),
            Self::RBracket => write!(f, "']'"),
            Self::Comma => write!(f, "','"),
            Self::Semicolon => write!(f, "';'"),
            Self::Equals => write!(f, "'='"),
            Self::ColonColon => write!(f, "'::'"),
            Self::Colon => write!(f, "':'"),
            Self::Lt => write!(f, "'<'"),
            Self::Gt => write!(f, "'>'"),
            Self::Plus => write!(f, "'+'"),
            Self::Minus => write!(f, "'-'"),
            Self::Star => write!(f, "'*'"),
            Self::Slash => write!(f, "'/'"),
            Self::Caret => write!(f, "'^'"),
            Self::Percent => write!(f, "'%'"),
            Self::EqEq => write!(f, "'=='"),
            Self::Le => write!(f, "'<='"),
            Self::Ge => write!(f, "'>='"),
            Self::Bang => write!(f, "'!'"),
            Self::Tilde => write!(f, "'~'"),
        }
    }
}

/// Undoes the handful of escapes slang string literals support, stripping
/// the surrounding quotes first.
fn unescape(raw: &str) -> Option<String> {
    let inner = raw.get(1..raw.len() - 1)?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '"' => out.push('"'),
            '\\' => out.push('\\'),
            other => out.push(other),
        }
    }
    Some(out)
}

/// A token paired with the source position of its first character.
#[derive(Debug, Clone)]
pub struct Spanned {
    pub token: Token,
    pub position: Position,
}

/// The byte offset of the start of each line in `source`, used to convert
/// a logos byte span into a `Position` without re-scanning the source on
/// every token.
fn line_starts(source: &str) -> Vec<usize> {
    let mut starts = vec![0];
    for (index, byte) in source.bytes().enumerate() {
        if byte == b'\n' {
            starts.push(index + 1);
        }
    }
    starts
}

fn position_at(line_starts: &[usize], offset: usize) -> Position {
    let line_index = match line_starts.binary_search(&offset) {
        Ok(index) => index,
        Err(index) => index - 1,
    };
    let line = (line_index + 1) as u32;
    let column = (offset - line_starts[line_index]) as u32 + 1;
    Position::new(line, column)
}

/// Tokenizes the full source into a flat token list. Unlike
/// `plotnik-lib::parser::lexer::lex`, slang has no lossless-CST
/// requirement, so a single lexer error aborts tokenization immediately
/// rather than coalescing `Garbage` runs.
pub fn lex(source: &str) -> Result<Vec<Spanned>> {
    let starts = line_starts(source);
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);
    while let Some(result) = lexer.next() {
        let position = position_at(&starts, lexer.span().start);
        match result {
            Ok(token) => tokens.push(Spanned { token, position }),
            Err(()) => {
                return Err(Error::parse_error(
                    position,
                    format!("unexpected character '{}'", &source[lexer.span()]),
                ));
            }
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexes_keywords_over_identifiers() {
        let tokens = lex("let x = true;").unwrap();
        assert!(matches!(tokens[0].token, Token::Let));
        assert!(matches!(tokens[1].token, Token::Ident(ref n) if n == "x"));
        assert!(matches!(tokens[3].token, Token::True));
    }

    #[test]
    fn lexes_float_vs_int() {
        let tokens = lex("1 1.5").unwrap();
        assert!(matches!(tokens[0].token, Token::Int(1)));
        assert!(matches!(tokens[1].token, Token::Float(v) if (v - 1.5).abs() < f64::EPSILON));
    }

    #[test]
    fn lexes_string_escapes() {
        let tokens = lex(r#""a\nb""#).unwrap();
        assert!(matches!(&tokens[0].token, Token::Str(s) if s == "a\nb"));
    }

    #[test]
    fn tracks_line_and_column() {
        let tokens = lex("1\n  2").unwrap();
        assert_eq!(tokens[1].position, Position::new(2, 3));
    }

    #[test]
    fn rejects_unknown_characters() {
        assert!(lex("1 @ 2").is_err());
    }
}
