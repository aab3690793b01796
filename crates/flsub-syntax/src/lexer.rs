//! 字句解析器 (logos)

use crate::SyntaxError;
use logos::Logos;
use std::fmt;

/// Raw tokens. Keywords are not distinguished here because their
/// spellings come from the configurable `Symbols` table.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token<'a> {
    #[regex(r"[A-Za-z]+", |lex| lex.slice())]
    Word(&'a str),

    #[token(".")]
    Dot,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    /// Any other single non-blank character, e.g. `~`
    #[regex(r"[^A-Za-z \t\r\n\f().]", |lex| lex.slice())]
    Symbol(&'a str),
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Word(text) | Token::Symbol(text) => write!(f, "'{}'", text),
            Token::Dot => write!(f, "'.'"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
        }
    }
}

/// A token and the byte offset it starts at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spanned<'a> {
    pub token: Token<'a>,
    pub position: usize,
}

pub fn tokenize(input: &str) -> Result<Vec<Spanned<'_>>, SyntaxError> {
    let mut lexer = Token::lexer(input);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let position = lexer.span().start;
        match result {
            Ok(token) => tokens.push(Spanned { token, position }),
            Err(()) => {
                return Err(SyntaxError::MalformedExpression {
                    position,
                    message: format!("unrecognized input {:?}", lexer.slice()),
                });
            }
        }
    }

    Ok(tokens)
}
