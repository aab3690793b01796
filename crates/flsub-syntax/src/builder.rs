//! 構文木から概念式 (未正規化) を構築

use crate::tree::{Connective, Constant, Quantifier, TokenTree};
use crate::SyntaxError;
use flsub_core::Expression;

/// Map a token tree onto an unnormalized `Expression`. Chains are folded
/// left-to-right, so `A and B and C` becomes `((A and B) and C)`.
pub fn build_expression(tree: &TokenTree) -> Result<Expression, SyntaxError> {
    match tree {
        TokenTree::Constant(Constant::Top) => Ok(Expression::Top),
        TokenTree::Constant(Constant::Bottom) => Ok(Expression::Bottom),
        TokenTree::Identifier(name) => Ok(Expression::literal(name.clone())),
        TokenTree::Negated(inner) => Ok(Expression::negation(build_expression(inner)?)),
        TokenTree::Restricted {
            quantifier,
            role,
            body,
        } => {
            let body = build_expression(body)?;
            Ok(match quantifier {
                Quantifier::Forall => Expression::forall(role.clone(), body),
                Quantifier::Exists => Expression::exists(role.clone(), body),
            })
        }
        TokenTree::Chain {
            connective,
            operands,
        } => {
            if operands.len() < 2 {
                return Err(SyntaxError::MalformedExpression {
                    position: 0,
                    message: format!("operator chain needs two or more operands, found {}", operands.len()),
                });
            }

            let operands = operands
                .iter()
                .map(build_expression)
                .collect::<Result<Vec<_>, _>>()?;

            let folded = match connective {
                Connective::And => Expression::conjunction_of(operands),
                Connective::Or => Expression::disjunction_of(operands),
            };

            folded.ok_or_else(|| SyntaxError::MalformedExpression {
                position: 0,
                message: "empty operator chain".to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> TokenTree {
        TokenTree::Identifier(name.to_string())
    }

    #[test]
    fn test_chain_folds_left() {
        let tree = TokenTree::Chain {
            connective: Connective::Or,
            operands: vec![ident("Cow"), ident("Chicken"), TokenTree::Constant(Constant::Bottom)],
        };

        assert_eq!(
            build_expression(&tree).unwrap(),
            Expression::disjunction(
                Expression::disjunction(Expression::literal("Cow"), Expression::literal("Chicken")),
                Expression::Bottom
            )
        );
    }

    #[test]
    fn test_restriction_and_negation() {
        let tree = TokenTree::Restricted {
            quantifier: Quantifier::Exists,
            role: "hasChild".to_string(),
            body: Box::new(TokenTree::Negated(Box::new(ident("Female")))),
        };

        assert_eq!(
            build_expression(&tree).unwrap(),
            Expression::exists("hasChild", Expression::negation(Expression::literal("Female")))
        );
    }

    #[test]
    fn test_short_chain_is_malformed() {
        let tree = TokenTree::Chain {
            connective: Connective::And,
            operands: vec![ident("Cow")],
        };

        assert!(matches!(
            build_expression(&tree),
            Err(SyntaxError::MalformedExpression { .. })
        ));
    }
}
