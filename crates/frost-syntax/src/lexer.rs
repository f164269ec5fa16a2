//! Tokenizer for Frost source text, built on [`logos`].
//!
//! Produces span-based tokens; text is sliced from the source only when a
//! caller needs it, via [`Token::text`].

use logos::Logos;
use std::ops::Range;

/// Identifiers reserved for language constructs; never usable as a bound
/// name even though they lex as identifier-shaped words.
pub const RESERVED_WORDS: &[&str] = &[
    "if", "elif", "else", "def", "export", "fn", "reduce", "map", "foreach", "filter", "with",
    "init", "true", "false", "and", "or", "not", "null",
];

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"#[^\n]*")]
pub enum TokenKind {
    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,
    #[token("[")]
    BracketOpen,
    #[token("]")]
    BracketClose,
    #[token("{")]
    BraceOpen,
    #[token("}")]
    BraceClose,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token("=")]
    Equals,
    #[token("...")]
    Ellipsis,
    #[token(".")]
    Dot,
    #[token("@")]
    At,
    #[token("->")]
    Arrow,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,

    #[token("if")]
    If,
    #[token("elif")]
    Elif,
    #[token("else")]
    Else,
    #[token("def")]
    Def,
    #[token("export")]
    Export,
    #[token("fn")]
    Fn,
    #[token("reduce")]
    Reduce,
    #[token("map")]
    Map,
    #[token("foreach")]
    Foreach,
    #[token("filter")]
    Filter,
    #[token("with")]
    With,
    #[token("init")]
    Init,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("not")]
    Not,
    #[token("null")]
    Null,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,

    #[regex(r"[0-9]+", priority = 3)]
    IntLiteral,
    #[regex(r"[0-9]+\.[0-9]+")]
    FloatLiteral,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r#"'([^'\\\n]|\\.)*'"#)]
    StringLiteral,

    #[regex(r#"\$"([^"\\\n]|\\.)*""#)]
    #[regex(r#"\$'([^'\\\n]|\\.)*'"#)]
    FormatStringLiteral,

    /// One or more characters that matched nothing above; coalesced at the
    /// tokenizer level so a run of garbage is a single error span.
    Garbage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Range<usize>,
}

impl Token {
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.span.clone()]
    }
}

/// Tokenizes `source`, coalescing consecutive unrecognized characters into
/// single `Garbage` tokens rather than one error per byte.
pub fn lex(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);
    let mut garbage_start: Option<usize> = None;

    loop {
        match lexer.next() {
            Some(Ok(kind)) => {
                if let Some(start) = garbage_start.take() {
                    tokens.push(Token { kind: TokenKind::Garbage, span: start..lexer.span().start });
                }
                tokens.push(Token { kind, span: lexer.span() });
            }
            Some(Err(())) => {
                if garbage_start.is_none() {
                    garbage_start = Some(lexer.span().start);
                }
            }
            None => {
                if let Some(start) = garbage_start.take() {
                    tokens.push(Token { kind: TokenKind::Garbage, span: start..source.len() });
                }
                break;
            }
        }
    }

    tokens
}

/// True for identifier text that names a reserved word rather than a
/// user-definable symbol.
pub fn is_reserved(word: &str) -> bool {
    RESERVED_WORDS.contains(&word)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_arithmetic_expression() {
        assert_eq!(
            kinds("1 + 2 * 3"),
            vec![
                TokenKind::IntLiteral,
                TokenKind::Plus,
                TokenKind::IntLiteral,
                TokenKind::Star,
                TokenKind::IntLiteral,
            ]
        );
    }

    #[test]
    fn distinguishes_int_from_float() {
        let toks = lex("3 3.0");
        assert_eq!(toks[0].kind, TokenKind::IntLiteral);
        assert_eq!(toks[1].kind, TokenKind::FloatLiteral);
    }

    #[test]
    fn keywords_take_priority_over_identifiers() {
        assert_eq!(kinds("if true else"), vec![TokenKind::If, TokenKind::True, TokenKind::Else]);
    }

    #[test]
    fn word_operators_lex_as_keywords() {
        assert_eq!(kinds("a and b or not c"), vec![
            TokenKind::Identifier, TokenKind::And, TokenKind::Identifier,
            TokenKind::Or, TokenKind::Not, TokenKind::Identifier,
        ]);
    }

    #[test]
    fn coalesces_garbage_runs() {
        let toks = lex("1 ` ~ 2");
        assert!(toks.iter().any(|t| t.kind == TokenKind::Garbage));
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(kinds("1 # trailing comment\n+ 2"), vec![TokenKind::IntLiteral, TokenKind::Plus, TokenKind::IntLiteral]);
    }

    #[test]
    fn format_string_literal_is_distinct_from_plain_string() {
        let toks = lex(r#"$"hi ${x}""#);
        assert_eq!(toks[0].kind, TokenKind::FormatStringLiteral);
    }

    #[test]
    fn single_and_double_quoted_strings_both_lex() {
        assert_eq!(kinds(r#" "a" 'b' "#), vec![TokenKind::StringLiteral, TokenKind::StringLiteral]);
    }
}
