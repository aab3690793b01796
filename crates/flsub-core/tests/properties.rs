// Property tests for normalization and structural subsumption

use flsub_core::{Expression, ReasonerError, StructuralSubsumption, Subsumption, SubsumptionQueryProcessor};
use proptest::prelude::*;

const CONCEPTS: &[&str] = &["Cow", "Person", "Meat"];
const ROLES: &[&str] = &["hasFood", "hasChild"];

fn leaf() -> impl Strategy<Value = Expression> {
    prop_oneof![
        Just(Expression::Top),
        Just(Expression::Bottom),
        (prop::sample::select(CONCEPTS), any::<bool>()).prop_map(|(name, negated)| Expression::Literal {
            name: name.to_string(),
            negated,
        }),
    ]
}

/// Any constructible expression, including disjunction, negation and
/// existential restrictions.
fn any_expression() -> impl Strategy<Value = Expression> {
    leaf().prop_recursive(6, 32, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Expression::conjunction(l, r)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Expression::disjunction(l, r)),
            inner.clone().prop_map(Expression::negation),
            (prop::sample::select(ROLES), inner, any::<bool>()).prop_map(|(role, body, universal)| {
                Expression::ValueRestriction {
                    role: role.to_string(),
                    body: Box::new(body),
                    universal,
                }
            }),
        ]
    })
}

/// Conjunction of two disjunctive clauses, the shape distribution produces.
fn clause_pair() -> impl Strategy<Value = Expression> {
    let operand = || leaf().prop_recursive(3, 8, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Expression::conjunction(l, r)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Expression::disjunction(l, r)),
            inner.clone().prop_map(Expression::negation),
            (prop::sample::select(ROLES), inner).prop_map(|(role, body)| Expression::forall(role, body)),
        ]
    });
    let clause = (operand(), operand()).prop_map(|(l, r)| Expression::disjunction(l, r));
    (clause.clone(), clause).prop_map(|(l, r)| Expression::conjunction(l, r))
}

/// Expressions that stay inside FL with literal negation after
/// normalization: no disjunction, no existential, no general negation.
fn fl_expression() -> impl Strategy<Value = Expression> {
    leaf().prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Expression::conjunction(l, r)),
            (prop::sample::select(ROLES), inner).prop_map(|(role, body)| Expression::forall(role, body)),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn prop_normalize_is_idempotent(expr in any_expression()) {
        let once = expr.normalize();
        prop_assert_eq!(once.normalize(), once);
    }

    #[test]
    fn prop_normal_form_has_no_negation(expr in any_expression()) {
        prop_assert!(expr.normalize().is_negation_free());
    }

    #[test]
    fn prop_normal_form_has_no_conjunction_under_disjunction(expr in any_expression()) {
        prop_assert!(expr.normalize().is_distributed());
    }

    #[test]
    fn prop_normalize_leaves_input_untouched(expr in any_expression()) {
        let before = expr.clone();
        let _ = expr.normalize();
        let _ = Expression::conjunction(expr.clone(), Expression::negation(expr.clone())).normalize();
        prop_assert_eq!(expr, before);
    }

    #[test]
    fn prop_subsumption_is_reflexive(expr in any_expression()) {
        let normalized = expr.normalize();
        prop_assert_eq!(StructuralSubsumption.subsumed_by(&normalized, &normalized), Ok(true));
    }

    #[test]
    fn prop_top_and_bottom_bound_everything(expr in any_expression()) {
        let normalized = expr.normalize();
        prop_assert_eq!(StructuralSubsumption.subsumed_by(&normalized, &Expression::Top), Ok(true));
        prop_assert_eq!(StructuralSubsumption.subsumed_by(&Expression::Bottom, &normalized), Ok(true));
    }

    #[test]
    fn prop_mutual_subsumption_is_equivalence(a in any_expression(), b in any_expression()) {
        let qp = SubsumptionQueryProcessor::default();
        let (a, b) = (a.normalize(), b.normalize());

        if let (Ok(true), Ok(true)) = (qp.subsumed_by(&a, &b), qp.subsumed_by(&b, &a)) {
            prop_assert_eq!(qp.equivalent(&a, &b), Ok(true));
        }
    }

    #[test]
    fn prop_fl_queries_are_always_decided(a in fl_expression(), b in fl_expression()) {
        let (a, b) = (a.normalize(), b.normalize());
        let result: Result<bool, ReasonerError> = StructuralSubsumption.subsumed_by(&a, &b);
        prop_assert!(result.is_ok(), "undecided: {} vs {}: {:?}", a, b, result);
    }

    #[test]
    fn prop_conjunction_is_subsumed_by_its_operand(a in fl_expression(), b in fl_expression()) {
        let both = Expression::conjunction(a.clone(), b).normalize();
        prop_assert_eq!(StructuralSubsumption.subsumed_by(&both, &a.normalize()), Ok(true));
    }

    #[test]
    fn prop_negated_clause_pair_normalizes(clauses in clause_pair(), other in any_expression()) {
        let negated = Expression::negation(clauses.clone()).normalize();
        prop_assert!(negated.is_normal_form());
        prop_assert_eq!(negated.normalize(), negated.clone());

        let nested = Expression::conjunction(other, clauses.clone()).normalize();
        prop_assert!(nested.is_normal_form());
        prop_assert_eq!(nested.normalize(), nested);
    }

    #[test]
    fn prop_disjoint_is_symmetric(a in any_expression(), b in clause_pair()) {
        let qp = SubsumptionQueryProcessor::default();
        let (a, b) = (a.normalize(), b.normalize());
        prop_assert_eq!(qp.disjoint(&a, &b), qp.disjoint(&b, &a));
    }
}
