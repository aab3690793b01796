//! トークン表記の設定 (symbol table)

use crate::SyntaxError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Spellings of the grammar's keywords and operators.
///
/// Every field falls back to its default when absent from a JSON config,
/// so `{"and": "&"}` is a complete symbol table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Symbols {
    pub forall: String,
    pub exists: String,
    pub and: String,
    pub or: String,
    /// Any of these prefixes negates the following operand
    pub negation: Vec<String>,
    pub top: String,
    pub bottom: String,
}

impl Default for Symbols {
    fn default() -> Self {
        Self {
            forall: "forall".to_string(),
            exists: "exists".to_string(),
            and: "and".to_string(),
            or: "or".to_string(),
            negation: vec!["~".to_string(), "not".to_string()],
            top: "top".to_string(),
            bottom: "bottom".to_string(),
        }
    }
}

/// Role a symbol plays in the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Forall,
    Exists,
    And,
    Or,
    Not,
    Top,
    Bottom,
}

impl Symbols {
    /// Parse and validate a JSON symbol table.
    pub fn from_json_str(json: &str) -> Result<Self, SyntaxError> {
        let symbols: Symbols = serde_json::from_str(json)
            .map_err(|e| SyntaxError::ConfigError(e.to_string()))?;
        symbols.validate()?;
        Ok(symbols)
    }

    /// Load and validate a JSON symbol table from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SyntaxError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| SyntaxError::ConfigError(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    /// Spellings must be a run of ASCII letters or one punctuation
    /// character other than `(`, `)` and `.`, and must all be distinct.
    pub fn validate(&self) -> Result<(), SyntaxError> {
        if self.negation.is_empty() {
            return Err(SyntaxError::InvalidSymbols(
                "at least one negation symbol is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for (name, spelling) in self.spellings() {
            if !is_valid_spelling(spelling) {
                return Err(SyntaxError::InvalidSymbols(format!(
                    "{} symbol {:?} must be ASCII letters or a single punctuation character",
                    name, spelling
                )));
            }
            if !seen.insert(spelling) {
                return Err(SyntaxError::InvalidSymbols(format!(
                    "symbol {:?} is used more than once",
                    spelling
                )));
            }
        }

        Ok(())
    }

    /// Keyword spelled by `text`, if any.
    pub fn keyword(&self, text: &str) -> Option<Keyword> {
        if text == self.forall {
            Some(Keyword::Forall)
        } else if text == self.exists {
            Some(Keyword::Exists)
        } else if text == self.and {
            Some(Keyword::And)
        } else if text == self.or {
            Some(Keyword::Or)
        } else if text == self.top {
            Some(Keyword::Top)
        } else if text == self.bottom {
            Some(Keyword::Bottom)
        } else if self.negation.iter().any(|symbol| symbol == text) {
            Some(Keyword::Not)
        } else {
            None
        }
    }

    /// Preferred spelling of a keyword, used in error messages.
    pub fn spelling(&self, keyword: Keyword) -> &str {
        match keyword {
            Keyword::Forall => &self.forall,
            Keyword::Exists => &self.exists,
            Keyword::And => &self.and,
            Keyword::Or => &self.or,
            Keyword::Not => self.negation.first().map(String::as_str).unwrap_or("~"),
            Keyword::Top => &self.top,
            Keyword::Bottom => &self.bottom,
        }
    }

    fn spellings(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("forall", self.forall.as_str()),
            ("exists", self.exists.as_str()),
            ("and", self.and.as_str()),
            ("or", self.or.as_str()),
            ("top", self.top.as_str()),
            ("bottom", self.bottom.as_str()),
        ]
        .into_iter()
        .chain(self.negation.iter().map(|symbol| ("negation", symbol.as_str())))
    }
}

fn is_valid_spelling(spelling: &str) -> bool {
    let mut chars = spelling.chars();
    match (chars.next(), chars.next()) {
        (None, _) => false,
        (Some(c), None) if !c.is_ascii_alphabetic() => {
            !c.is_alphanumeric() && !c.is_whitespace() && !matches!(c, '(' | ')' | '.')
        }
        _ => spelling.chars().all(|c| c.is_ascii_alphabetic()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_symbols_are_valid() {
        let symbols = Symbols::default();
        assert!(symbols.validate().is_ok());
        assert_eq!(symbols.keyword("~"), Some(Keyword::Not));
        assert_eq!(symbols.keyword("not"), Some(Keyword::Not));
        assert_eq!(symbols.keyword("forall"), Some(Keyword::Forall));
        assert_eq!(symbols.keyword("Cow"), None);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let symbols = Symbols::from_json_str(r#"{"and": "&", "or": "|"}"#).unwrap();

        assert_eq!(symbols.and, "&");
        assert_eq!(symbols.or, "|");
        assert_eq!(symbols.forall, "forall");
        assert_eq!(symbols.negation, vec!["~".to_string(), "not".to_string()]);
    }

    #[test]
    fn test_rejects_duplicate_spellings() {
        let result = Symbols::from_json_str(r#"{"and": "or"}"#);
        assert!(matches!(result, Err(SyntaxError::InvalidSymbols(_))));
    }

    #[test]
    fn test_rejects_reserved_and_mixed_spellings() {
        for json in [
            r#"{"and": "."}"#,
            r#"{"or": "("}"#,
            r#"{"top": "T1"}"#,
            r#"{"bottom": ""}"#,
            r#"{"and": "&&"}"#,
            r#"{"negation": []}"#,
        ] {
            assert!(
                matches!(Symbols::from_json_str(json), Err(SyntaxError::InvalidSymbols(_))),
                "accepted {}",
                json
            );
        }
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let result = Symbols::from_json_str("{not json");
        assert!(matches!(result, Err(SyntaxError::ConfigError(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("symbols.json");
        std::fs::write(&path, r#"{"negation": ["!"], "top": "thing"}"#).unwrap();

        let symbols = Symbols::from_file(&path).unwrap();
        assert_eq!(symbols.keyword("!"), Some(Keyword::Not));
        assert_eq!(symbols.keyword("~"), None);
        assert_eq!(symbols.spelling(Keyword::Top), "thing");

        let missing = Symbols::from_file(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(SyntaxError::ConfigError(_))));
    }
}
