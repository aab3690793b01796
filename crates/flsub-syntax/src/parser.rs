//! 再帰下降構文解析器
//!
//! 優先順位 (弱い順): `or`, `and`, ロール制限 (`forall r.` / `exists r.` / `r.`),
//! 否定 (`~`, `not`)。単項演算子は右結合です。

use crate::lexer::{Spanned, Token};
use crate::symbols::{Keyword, Symbols};
use crate::tree::{Connective, Constant, Quantifier, TokenTree};
use crate::SyntaxError;

/// Uppercase letter followed by one or more letters.
pub fn is_concept_name(text: &str) -> bool {
    let mut chars = text.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
        && text.len() > 1
        && chars.all(|c| c.is_ascii_alphabetic())
}

/// Lowercase letter followed by one or more letters.
pub fn is_role_name(text: &str) -> bool {
    let mut chars = text.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
        && text.len() > 1
        && chars.all(|c| c.is_ascii_alphabetic())
}

/// Deepest nesting of negations, restrictions and parentheses accepted.
pub const MAX_NESTING: usize = 256;

pub struct Parser<'s, 'a> {
    tokens: &'s [Spanned<'a>],
    symbols: &'s Symbols,
    cursor: usize,
    end: usize,
    depth: usize,
}

impl<'s, 'a> Parser<'s, 'a> {
    /// `end` is the input length, reported as the position of errors at
    /// end of input.
    pub fn new(tokens: &'s [Spanned<'a>], symbols: &'s Symbols, end: usize) -> Self {
        Self {
            tokens,
            symbols,
            cursor: 0,
            end,
            depth: 0,
        }
    }

    /// Parse the whole token stream as one expression.
    pub fn parse(mut self) -> Result<TokenTree, SyntaxError> {
        let tree = self.parse_disjunction()?;

        if let Some(spanned) = self.peek() {
            return Err(SyntaxError::MalformedExpression {
                position: spanned.position,
                message: format!("unexpected {} after complete expression", spanned.token),
            });
        }

        Ok(tree)
    }

    fn peek(&self) -> Option<Spanned<'a>> {
        self.tokens.get(self.cursor).copied()
    }

    fn peek_second(&self) -> Option<Spanned<'a>> {
        self.tokens.get(self.cursor + 1).copied()
    }

    fn advance(&mut self) -> Option<Spanned<'a>> {
        let spanned = self.peek()?;
        self.cursor += 1;
        Some(spanned)
    }

    fn keyword_of(&self, token: Token<'a>) -> Option<Keyword> {
        match token {
            Token::Word(text) | Token::Symbol(text) => self.symbols.keyword(text),
            _ => None,
        }
    }

    fn peek_keyword(&self) -> Option<Keyword> {
        self.peek().and_then(|spanned| self.keyword_of(spanned.token))
    }

    fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        if self.peek_keyword() == Some(keyword) {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    fn malformed(&self, spanned: Spanned<'a>, message: String) -> SyntaxError {
        SyntaxError::MalformedExpression {
            position: spanned.position,
            message,
        }
    }

    fn unexpected_end(&self, expected: &str) -> SyntaxError {
        SyntaxError::UnexpectedEnd {
            position: self.end,
            expected: expected.to_string(),
        }
    }

    fn parse_disjunction(&mut self) -> Result<TokenTree, SyntaxError> {
        let mut operands = vec![self.parse_conjunction()?];
        while self.eat_keyword(Keyword::Or) {
            operands.push(self.parse_conjunction()?);
        }
        Ok(TokenTree::chain(Connective::Or, operands))
    }

    fn parse_conjunction(&mut self) -> Result<TokenTree, SyntaxError> {
        let mut operands = vec![self.parse_unary()?];
        while self.eat_keyword(Keyword::And) {
            operands.push(self.parse_unary()?);
        }
        Ok(TokenTree::chain(Connective::And, operands))
    }

    /// Every nesting construct passes through here, so the depth guard
    /// lives here too.
    fn parse_unary(&mut self) -> Result<TokenTree, SyntaxError> {
        if self.depth >= MAX_NESTING {
            return Err(SyntaxError::MalformedExpression {
                position: self.peek().map_or(self.end, |spanned| spanned.position),
                message: format!("expression nested deeper than {} levels", MAX_NESTING),
            });
        }

        self.depth += 1;
        let tree = self.parse_prefixed();
        self.depth -= 1;
        tree
    }

    fn parse_prefixed(&mut self) -> Result<TokenTree, SyntaxError> {
        match self.peek_keyword() {
            Some(Keyword::Not) => {
                self.cursor += 1;
                Ok(TokenTree::Negated(Box::new(self.parse_unary()?)))
            }
            Some(Keyword::Forall) => {
                self.cursor += 1;
                self.parse_restriction(Quantifier::Forall)
            }
            Some(Keyword::Exists) => {
                self.cursor += 1;
                self.parse_restriction(Quantifier::Exists)
            }
            Some(_) => self.parse_primary(),
            None if self.at_bare_restriction() => self.parse_restriction(Quantifier::Forall),
            None => self.parse_primary(),
        }
    }

    /// `role.` with the quantifier omitted.
    fn at_bare_restriction(&self) -> bool {
        matches!(
            (self.peek(), self.peek_second()),
            (
                Some(Spanned { token: Token::Word(text), .. }),
                Some(Spanned { token: Token::Dot, .. })
            ) if is_role_name(text)
        )
    }

    fn parse_restriction(&mut self, quantifier: Quantifier) -> Result<TokenTree, SyntaxError> {
        let spanned = self.advance().ok_or_else(|| self.unexpected_end("role name"))?;
        let role = match spanned.token {
            Token::Word(text) if is_role_name(text) && self.symbols.keyword(text).is_none() => {
                text.to_string()
            }
            other => {
                return Err(self.malformed(
                    spanned,
                    format!("expected role name (lowercase letter followed by letters), found {}", other),
                ));
            }
        };

        let dot = self.advance().ok_or_else(|| self.unexpected_end("'.'"))?;
        if dot.token != Token::Dot {
            return Err(self.malformed(dot, format!("expected '.' after role {}, found {}", role, dot.token)));
        }

        let body = self.parse_unary()?;
        Ok(TokenTree::Restricted {
            quantifier,
            role,
            body: Box::new(body),
        })
    }

    fn parse_primary(&mut self) -> Result<TokenTree, SyntaxError> {
        let spanned = self.advance().ok_or_else(|| self.unexpected_end("concept"))?;

        match spanned.token {
            Token::LParen => {
                let inner = self.parse_disjunction()?;
                let close = self.advance().ok_or_else(|| self.unexpected_end("')'"))?;
                if close.token != Token::RParen {
                    return Err(self.malformed(close, format!("expected ')', found {}", close.token)));
                }
                Ok(inner)
            }
            Token::Word(text) | Token::Symbol(text) => match self.symbols.keyword(text) {
                Some(Keyword::Top) => Ok(TokenTree::Constant(Constant::Top)),
                Some(Keyword::Bottom) => Ok(TokenTree::Constant(Constant::Bottom)),
                Some(keyword) => Err(self.malformed(
                    spanned,
                    format!("unexpected '{}' where a concept was expected", self.symbols.spelling(keyword)),
                )),
                None if is_concept_name(text) => Ok(TokenTree::Identifier(text.to_string())),
                None => Err(self.malformed(
                    spanned,
                    format!(
                        "'{}' is not a concept name (uppercase letter followed by letters)",
                        text
                    ),
                )),
            },
            other => Err(self.malformed(spanned, format!("unexpected {} where a concept was expected", other))),
        }
    }
}
