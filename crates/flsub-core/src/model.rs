//! 記述論理 (DL) 概念式のデータモデルと正規化
//!
//! `Expression` は不変な再帰的代数値です。`negate()` と `normalize()` は
//! どちらも `&self` を受け取り新しい値を返すため、呼び出し側が保持している
//! 部分木が書き換えられることはありません。

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// A concept expression in the FL dialect extended with literal negation,
/// disjunction and existential restrictions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expression {
    /// Universal concept (⊤)
    Top,

    /// Empty concept (⊥)
    Bottom,

    /// Atomic concept, optionally negated
    Literal { name: String, negated: bool },

    /// Intersection: C ⊓ D
    Conjunction {
        left: Box<Expression>,
        right: Box<Expression>,
    },

    /// Union: C ⊔ D
    Disjunction {
        left: Box<Expression>,
        right: Box<Expression>,
    },

    /// Complement: ¬C. Never survives normalization.
    Negation { inner: Box<Expression> },

    /// ∀role.body when `universal`, otherwise ∃role.body
    ValueRestriction {
        role: String,
        body: Box<Expression>,
        universal: bool,
    },
}

impl Expression {
    pub fn literal(name: impl Into<String>) -> Self {
        Expression::Literal {
            name: name.into(),
            negated: false,
        }
    }

    pub fn negated_literal(name: impl Into<String>) -> Self {
        Expression::Literal {
            name: name.into(),
            negated: true,
        }
    }

    pub fn conjunction(left: Expression, right: Expression) -> Self {
        Expression::Conjunction {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn disjunction(left: Expression, right: Expression) -> Self {
        Expression::Disjunction {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn negation(inner: Expression) -> Self {
        Expression::Negation {
            inner: Box::new(inner),
        }
    }

    pub fn forall(role: impl Into<String>, body: Expression) -> Self {
        Expression::ValueRestriction {
            role: role.into(),
            body: Box::new(body),
            universal: true,
        }
    }

    pub fn exists(role: impl Into<String>, body: Expression) -> Self {
        Expression::ValueRestriction {
            role: role.into(),
            body: Box::new(body),
            universal: false,
        }
    }

    /// Folds operands left-to-right into nested conjunctions:
    /// `[A, B, C]` becomes `((A ⊓ B) ⊓ C)`. Returns `None` for no operands.
    pub fn conjunction_of<I>(operands: I) -> Option<Self>
    where
        I: IntoIterator<Item = Expression>,
    {
        operands.into_iter().reduce(Expression::conjunction)
    }

    /// Folds operands left-to-right into nested disjunctions.
    pub fn disjunction_of<I>(operands: I) -> Option<Self>
    where
        I: IntoIterator<Item = Expression>,
    {
        operands.into_iter().reduce(Expression::disjunction)
    }

    pub fn is_top(&self) -> bool {
        matches!(self, Expression::Top)
    }

    pub fn is_bottom(&self) -> bool {
        matches!(self, Expression::Bottom)
    }

    pub fn is_conjunction(&self) -> bool {
        matches!(self, Expression::Conjunction { .. })
    }

    /// True for an existential restriction at the root of this expression.
    pub fn is_existential(&self) -> bool {
        matches!(self, Expression::ValueRestriction { universal: false, .. })
    }

    /// Logical complement of this node, one step deep.
    ///
    /// Children are wrapped in `Negation` rather than negated recursively;
    /// `normalize()` is responsible for pushing the negation further down.
    pub fn negate(&self) -> Expression {
        match self {
            Expression::Top => Expression::Bottom,
            Expression::Bottom => Expression::Top,
            Expression::Literal { name, negated } => Expression::Literal {
                name: name.clone(),
                negated: !negated,
            },
            Expression::Conjunction { left, right } => Expression::disjunction(
                Expression::negation((**left).clone()),
                Expression::negation((**right).clone()),
            ),
            Expression::Disjunction { left, right } => Expression::conjunction(
                Expression::negation((**left).clone()),
                Expression::negation((**right).clone()),
            ),
            Expression::Negation { inner } => (**inner).clone(),
            // ¬∀r.C ≡ ∃r.¬C, ¬∃r.C ≡ ∀r.¬C
            Expression::ValueRestriction {
                role,
                body,
                universal,
            } => Expression::ValueRestriction {
                role: role.clone(),
                body: Box::new(Expression::negation((**body).clone())),
                universal: !universal,
            },
        }
    }

    /// Full complement with negation pushed to the leaves by De Morgan and
    /// quantifier duality. No distribution or absorption is applied, so for a
    /// normalized receiver the result is negation-free but not necessarily
    /// distributed.
    pub fn complement(&self) -> Expression {
        match self {
            Expression::Top => Expression::Bottom,
            Expression::Bottom => Expression::Top,
            Expression::Literal { name, negated } => Expression::Literal {
                name: name.clone(),
                negated: !negated,
            },
            Expression::Conjunction { left, right } => {
                Expression::disjunction(left.complement(), right.complement())
            }
            Expression::Disjunction { left, right } => {
                Expression::conjunction(left.complement(), right.complement())
            }
            Expression::Negation { inner } => (**inner).clone(),
            Expression::ValueRestriction {
                role,
                body,
                universal,
            } => Expression::ValueRestriction {
                role: role.clone(),
                body: Box::new(body.complement()),
                universal: !universal,
            },
        }
    }

    /// Canonical form: negation pushed to literals and restriction
    /// quantifiers, disjunction distributed over conjunction, constants
    /// absorbed at every binary node.
    pub fn normalize(&self) -> Expression {
        match self {
            Expression::Top | Expression::Bottom | Expression::Literal { .. } => self.clone(),
            Expression::Negation { inner } => inner.negate().normalize(),
            Expression::ValueRestriction {
                role,
                body,
                universal,
            } => Expression::ValueRestriction {
                role: role.clone(),
                body: Box::new(body.normalize()),
                universal: *universal,
            },
            Expression::Conjunction { left, right } => {
                Junction::Conjunction.collapse(left.normalize(), right.normalize())
            }
            Expression::Disjunction { left, right } => {
                if let Some(distributed) = distribute(left, right) {
                    return distributed.normalize();
                }

                let left = left.normalize();
                let right = right.normalize();

                // A child may only turn into a conjunction once normalized,
                // e.g. A ⊔ ¬(B ⊔ C).
                match distribute(&left, &right) {
                    Some(distributed) => distributed.normalize(),
                    None => Junction::Disjunction.collapse(left, right),
                }
            }
        }
    }

    /// No `Negation` node anywhere in the tree.
    pub fn is_negation_free(&self) -> bool {
        match self {
            Expression::Top | Expression::Bottom | Expression::Literal { .. } => true,
            Expression::Negation { .. } => false,
            Expression::Conjunction { left, right } | Expression::Disjunction { left, right } => {
                left.is_negation_free() && right.is_negation_free()
            }
            Expression::ValueRestriction { body, .. } => body.is_negation_free(),
        }
    }

    /// No `Disjunction` node anywhere in the tree has a `Conjunction` child.
    pub fn is_distributed(&self) -> bool {
        match self {
            Expression::Top | Expression::Bottom | Expression::Literal { .. } => true,
            Expression::Disjunction { left, right } => {
                !left.is_conjunction()
                    && !right.is_conjunction()
                    && left.is_distributed()
                    && right.is_distributed()
            }
            Expression::Conjunction { left, right } => {
                left.is_distributed() && right.is_distributed()
            }
            Expression::Negation { inner } => inner.is_distributed(),
            Expression::ValueRestriction { body, .. } => body.is_distributed(),
        }
    }

    /// Shape postconditions of `normalize()`.
    pub fn is_normal_form(&self) -> bool {
        self.is_negation_free() && self.is_distributed()
    }
}

/// A ⊔ (B ⊓ C) → (A ⊔ B) ⊓ (A ⊔ C), and symmetrically for a conjunction
/// on the left. `None` when neither side is a conjunction.
fn distribute(left: &Expression, right: &Expression) -> Option<Expression> {
    if let Expression::Conjunction { left: b, right: c } = right {
        return Some(Expression::conjunction(
            Expression::disjunction(left.clone(), (**b).clone()),
            Expression::disjunction(left.clone(), (**c).clone()),
        ));
    }
    if let Expression::Conjunction { left: b, right: c } = left {
        return Some(Expression::conjunction(
            Expression::disjunction(right.clone(), (**b).clone()),
            Expression::disjunction(right.clone(), (**c).clone()),
        ));
    }
    None
}

/// The two binary connectives share one collapse ladder with the
/// constants swapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Junction {
    Conjunction,
    Disjunction,
}

impl Junction {
    /// Result of `X op ¬X`, and of `X op absorbing`.
    fn absorbing(self) -> Expression {
        match self {
            Junction::Conjunction => Expression::Bottom,
            Junction::Disjunction => Expression::Top,
        }
    }

    /// `X op identity = X`
    fn identity(self) -> Expression {
        match self {
            Junction::Conjunction => Expression::Top,
            Junction::Disjunction => Expression::Bottom,
        }
    }

    fn build(self, left: Expression, right: Expression) -> Expression {
        match self {
            Junction::Conjunction => Expression::conjunction(left, right),
            Junction::Disjunction => Expression::disjunction(left, right),
        }
    }

    /// Both operands must already be normalized. Never calls back into
    /// `normalize`.
    fn collapse(self, left: Expression, right: Expression) -> Expression {
        if left == right {
            trace!(junction = ?self, "reflexive collapse");
            return left;
        }

        if left == right.complement() {
            trace!(junction = ?self, "complementary operands");
            return self.absorbing();
        }

        let absorbing = self.absorbing();
        if left == absorbing || right == absorbing {
            return absorbing;
        }

        let identity = self.identity();
        if left == identity {
            return right;
        }
        if right == identity {
            return left;
        }

        self.build(left, right)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Top => write!(f, "top"),
            Expression::Bottom => write!(f, "bottom"),
            Expression::Literal { name, negated } => {
                write!(f, "{}{}", if *negated { "~" } else { "" }, name)
            }
            Expression::Conjunction { left, right } => write!(f, "({} and {})", left, right),
            Expression::Disjunction { left, right } => write!(f, "({} or {})", left, right),
            Expression::Negation { inner } => write!(f, "~({})", inner),
            Expression::ValueRestriction {
                role,
                body,
                universal,
            } => write!(
                f,
                "({} {}.{})",
                if *universal { "forall" } else { "exists" },
                role,
                body
            ),
        }
    }
}
