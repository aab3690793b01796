//! 構文木 (tree builder への入力)

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constant {
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    Forall,
    Exists,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
}

/// Raw parse tree: grouping and operator chains as written, before any
/// expression is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenTree {
    Constant(Constant),

    /// Concept name
    Identifier(String),

    Negated(Box<TokenTree>),

    Restricted {
        quantifier: Quantifier,
        role: String,
        body: Box<TokenTree>,
    },

    /// `a op b op c ...` flattened into one operand list
    Chain {
        connective: Connective,
        operands: Vec<TokenTree>,
    },
}

impl TokenTree {
    /// A chain of one operand is just that operand.
    pub fn chain(connective: Connective, mut operands: Vec<TokenTree>) -> Self {
        if operands.len() == 1 {
            if let Some(single) = operands.pop() {
                return single;
            }
        }
        TokenTree::Chain {
            connective,
            operands,
        }
    }
}

impl fmt::Display for TokenTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenTree::Constant(Constant::Top) => write!(f, "top"),
            TokenTree::Constant(Constant::Bottom) => write!(f, "bottom"),
            TokenTree::Identifier(name) => write!(f, "{}", name),
            TokenTree::Negated(inner) => write!(f, "[~, {}]", inner),
            TokenTree::Restricted {
                quantifier,
                role,
                body,
            } => {
                let quantifier = match quantifier {
                    Quantifier::Forall => "forall",
                    Quantifier::Exists => "exists",
                };
                write!(f, "[[{}, {}], {}]", quantifier, role, body)
            }
            TokenTree::Chain {
                connective,
                operands,
            } => {
                let connective = match connective {
                    Connective::And => ", and, ",
                    Connective::Or => ", or, ",
                };
                let rendered: Vec<String> = operands.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", rendered.join(connective))
            }
        }
    }
}
