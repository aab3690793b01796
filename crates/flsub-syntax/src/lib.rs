//! 概念式テキスト構文
//!
//! このクレートは概念式のテキスト表記を提供します:
//! - 記号表 (Symbols) の設定
//! - 字句解析 (Lexer)
//! - 構文解析 (Parser) と構文木 (TokenTree)
//! - 概念式への変換 (Builder) と正規化

pub mod symbols;
pub mod lexer;
pub mod tree;
pub mod parser;
pub mod builder;

// Re-exports
pub use symbols::{Keyword, Symbols};
pub use tree::{Connective, Constant, Quantifier, TokenTree};
pub use builder::build_expression;

use flsub_core::Expression;
use thiserror::Error;
use tracing::trace;

// Error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("Malformed expression at {position}: {message}")]
    MalformedExpression { position: usize, message: String },

    #[error("Unexpected end of input at {position}: expected {expected}")]
    UnexpectedEnd { position: usize, expected: String },

    #[error("Invalid symbols: {0}")]
    InvalidSymbols(String),

    #[error("Config error: {0}")]
    ConfigError(String),
}

/// Parses text such as `Person and exists hasChild.~Female` into
/// expressions.
#[derive(Debug, Clone, Default)]
pub struct TextExpressionParser {
    symbols: Symbols,
}

impl TextExpressionParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parser with a custom symbol table. The table is validated first.
    pub fn with_symbols(symbols: Symbols) -> Result<Self, SyntaxError> {
        symbols.validate()?;
        Ok(Self { symbols })
    }

    pub fn symbols(&self) -> &Symbols {
        &self.symbols
    }

    /// Raw parse tree of `text`.
    pub fn parse_tree(&self, text: &str) -> Result<TokenTree, SyntaxError> {
        let tokens = lexer::tokenize(text)?;
        parser::Parser::new(&tokens, &self.symbols, text.len()).parse()
    }

    /// Expression exactly as written, with no normalization applied.
    pub fn parse_unnormalized(&self, text: &str) -> Result<Expression, SyntaxError> {
        let tree = self.parse_tree(text)?;
        trace!(%tree, "parse tree");
        build_expression(&tree)
    }

    /// Parse one line of text into a normalized expression.
    pub fn parse_line(&self, text: &str) -> Result<Expression, SyntaxError> {
        let expression = self.parse_unnormalized(text)?;
        let normalized = expression.normalize();
        trace!(input = text, parsed = %expression, normalized = %normalized, "parsed expression");
        Ok(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_normalizes() {
        let parser = TextExpressionParser::new();

        assert_eq!(parser.parse_line("~top").unwrap(), Expression::Bottom);
        assert_eq!(
            parser.parse_unnormalized("~top").unwrap(),
            Expression::negation(Expression::Top)
        );
    }

    #[test]
    fn test_custom_symbols() {
        let symbols = Symbols::from_json_str(
            r#"{"and": "&", "or": "|", "negation": ["!"], "forall": "all", "exists": "some"}"#,
        )
        .unwrap();
        let parser = TextExpressionParser::with_symbols(symbols).unwrap();

        assert_eq!(
            parser.parse_line("Cow & all eats.!Meat").unwrap(),
            Expression::conjunction(
                Expression::literal("Cow"),
                Expression::forall("eats", Expression::negated_literal("Meat"))
            )
        );
        // default spellings are no longer keywords
        assert!(parser.parse_line("Cow and Meat").is_err());
    }

    #[test]
    fn test_with_symbols_validates() {
        let symbols = Symbols {
            and: "or".to_string(),
            ..Symbols::default()
        };
        assert!(matches!(
            TextExpressionParser::with_symbols(symbols),
            Err(SyntaxError::InvalidSymbols(_))
        ));
    }

    #[test]
    fn test_error_messages() {
        let parser = TextExpressionParser::new();
        let err = parser.parse_line("Person and").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unexpected end of input at 10: expected concept"
        );
    }
}
