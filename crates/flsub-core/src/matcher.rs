//! 構造的包摂アルゴリズム (FL + リテラル否定)

use crate::model::Expression;
use crate::ReasonerError;
use tracing::trace;

/// A decision procedure for `sub ⊑ sup` over normalized expressions.
///
/// Implementations must report constructs they cannot decide as
/// `ReasonerError::UnsupportedConstruct` rather than answering `false`.
pub trait Subsumption {
    /// Short identifier used in logs and reports.
    fn name(&self) -> &str;

    fn subsumed_by(&self, sub: &Expression, sup: &Expression) -> Result<bool, ReasonerError>;
}

/// Structural subsumption: both sides are flattened into clause sets and
/// every clause of the subsumer must be covered by the subsumee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StructuralSubsumption;

impl StructuralSubsumption {
    pub fn new() -> Self {
        Self
    }
}

/// Terminal conjuncts of a normalized expression, split by kind.
#[derive(Debug, Default)]
struct Clauses<'a> {
    literals: Vec<&'a Expression>,
    /// (role, body) of each universal restriction
    restrictions: Vec<(&'a str, &'a Expression)>,
}

impl<'a> Clauses<'a> {
    fn render(expression: &'a Expression) -> Result<Self, ReasonerError> {
        let mut terminals = Vec::new();
        flatten(expression, &mut terminals)?;

        let mut clauses = Clauses::default();
        for clause in terminals {
            match clause {
                Expression::Literal { .. } => clauses.literals.push(clause),
                Expression::ValueRestriction { .. } if clause.is_existential() => {
                    return Err(ReasonerError::unsupported(
                        clause,
                        "existential restrictions are not decided by structural subsumption",
                    ));
                }
                Expression::ValueRestriction { role, body, .. } => {
                    clauses.restrictions.push((role.as_str(), body.as_ref()))
                }
                _ => {
                    return Err(ReasonerError::unsupported(
                        clause,
                        "constants inside a conjunction; normalize the expression first",
                    ));
                }
            }
        }

        Ok(clauses)
    }
}

fn flatten<'a>(expression: &'a Expression, out: &mut Vec<&'a Expression>) -> Result<(), ReasonerError> {
    match expression {
        Expression::Conjunction { left, right } => {
            flatten(left, out)?;
            flatten(right, out)
        }
        Expression::Literal { .. }
        | Expression::ValueRestriction { .. }
        | Expression::Top
        | Expression::Bottom => {
            out.push(expression);
            Ok(())
        }
        Expression::Disjunction { .. } => Err(ReasonerError::unsupported(
            expression,
            "disjunctive clauses are outside the FL fragment",
        )),
        Expression::Negation { .. } => Err(ReasonerError::unsupported(
            expression,
            "negation must be pushed to literals by normalization",
        )),
    }
}

impl Subsumption for StructuralSubsumption {
    fn name(&self) -> &str {
        "structural"
    }

    fn subsumed_by(&self, sub: &Expression, sup: &Expression) -> Result<bool, ReasonerError> {
        if sub == sup || sup.is_top() || sub.is_bottom() {
            trace!(%sub, %sup, "trivially subsumed");
            return Ok(true);
        }

        if sup.is_bottom() || sub.is_top() {
            trace!(%sub, %sup, "trivially not subsumed");
            return Ok(false);
        }

        // ∀r.C ⊑ ∀s.D iff r = s and C ⊑ D
        if let (
            Expression::ValueRestriction {
                role: sub_role,
                body: sub_body,
                universal: true,
            },
            Expression::ValueRestriction {
                role: sup_role,
                body: sup_body,
                universal: true,
            },
        ) = (sub, sup)
        {
            return Ok(sub_role == sup_role && self.subsumed_by(sub_body, sup_body)?);
        }

        let subsumer = Clauses::render(sup)?;
        let subsumed = Clauses::render(sub)?;

        for literal in &subsumer.literals {
            if !subsumed.literals.contains(literal) {
                trace!(%sub, %sup, missing = %literal, "concept name not covered");
                return Ok(false);
            }
        }

        for (role, body) in &subsumer.restrictions {
            let mut covered = false;
            for (sub_role, sub_body) in &subsumed.restrictions {
                if sub_role == role && self.subsumed_by(sub_body, body)? {
                    covered = true;
                    break;
                }
            }

            if !covered {
                trace!(%sub, %sup, role, "value restriction not covered");
                return Ok(false);
            }
        }

        Ok(true)
    }
}
