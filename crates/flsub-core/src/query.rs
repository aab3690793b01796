//! 包摂クエリプロセッサ
//!
//! 任意の `Subsumption` 実装を注入し、同値性・素性・充足可能性と
//! 全ペア包摂 (推移閉包付き) を組み立てます。

use crate::matcher::{StructuralSubsumption, Subsumption};
use crate::model::Expression;
use crate::ReasonerError;
use itertools::Itertools;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Subsumption pairs `(sub, sup)` keyed by concept key.
pub type SubsumptionPairs<K> = BTreeSet<(K, K)>;

/// Query layer over an injected subsumption algorithm.
#[derive(Debug, Clone)]
pub struct SubsumptionQueryProcessor<M = StructuralSubsumption> {
    matcher: M,
}

impl Default for SubsumptionQueryProcessor<StructuralSubsumption> {
    fn default() -> Self {
        Self::new(StructuralSubsumption)
    }
}

impl<M: Subsumption> SubsumptionQueryProcessor<M> {
    pub fn new(matcher: M) -> Self {
        Self { matcher }
    }

    pub fn matcher(&self) -> &M {
        &self.matcher
    }

    /// Is `sub` subsumed by `sup`? Both must be normalized.
    pub fn subsumed_by(&self, sub: &Expression, sup: &Expression) -> Result<bool, ReasonerError> {
        self.matcher.subsumed_by(sub, sup)
    }

    pub fn equivalent(&self, a: &Expression, b: &Expression) -> Result<bool, ReasonerError> {
        Ok(self.matcher.subsumed_by(a, b)? && self.matcher.subsumed_by(b, a)?)
    }

    pub fn satisfiable(&self, expression: &Expression) -> Result<bool, ReasonerError> {
        Ok(!self.matcher.subsumed_by(expression, &Expression::Bottom)?)
    }

    /// `a ⊓ b` is unsatisfiable. The caller's expressions are cloned into
    /// the temporary conjunction, never moved or modified.
    pub fn disjoint(&self, a: &Expression, b: &Expression) -> Result<bool, ReasonerError> {
        let intersection = Expression::conjunction(a.clone(), b.clone()).normalize();
        Ok(!self.satisfiable(&intersection)?)
    }

    /// Every non-reflexive pair `(k0, k1)` with `concepts[k0] ⊑ concepts[k1]`
    /// decided by a single matcher call, without closure.
    ///
    /// Pass a map's `iter()` to key by name, or `iter().enumerate()` over a
    /// slice to key by index.
    pub fn all_direct_subsumption<'a, K, I>(&self, concepts: I) -> Result<SubsumptionPairs<K>, ReasonerError>
    where
        I: IntoIterator<Item = (K, &'a Expression)>,
        K: Ord + Clone,
    {
        let concepts: Vec<(K, &'a Expression)> = concepts.into_iter().collect();
        let mut direct = BTreeSet::new();

        for ((k0, v0), (k1, v1)) in concepts.iter().cartesian_product(concepts.iter()) {
            if k0 != k1 && self.matcher.subsumed_by(v0, v1)? {
                direct.insert((k0.clone(), k1.clone()));
            }
        }

        debug!(
            matcher = self.matcher.name(),
            concepts = concepts.len(),
            direct = direct.len(),
            "collected direct subsumption pairs"
        );

        Ok(direct)
    }

    /// All non-reflexive subsumption pairs, closed under transitivity.
    pub fn all_subsumption<'a, K, I>(&self, concepts: I) -> Result<SubsumptionPairs<K>, ReasonerError>
    where
        I: IntoIterator<Item = (K, &'a Expression)>,
        K: Ord + Clone,
    {
        let direct = self.all_direct_subsumption(concepts)?;
        let direct_count = direct.len();
        let closure = transitive_closure(direct);

        debug!(
            direct = direct_count,
            inferred = closure.len() - direct_count,
            "closed subsumption pairs"
        );

        Ok(closure)
    }

    /// Same relation as `all_subsumption`, reported as expression pairs.
    /// Keys carrying equal expressions each contribute their own pair.
    pub fn all_subsumption_values<'a, K, I>(
        &self,
        concepts: I,
    ) -> Result<Vec<(&'a Expression, &'a Expression)>, ReasonerError>
    where
        I: IntoIterator<Item = (K, &'a Expression)>,
        K: Ord + Clone,
    {
        let concepts: BTreeMap<K, &'a Expression> = concepts.into_iter().collect();
        let pairs = self.all_subsumption(concepts.iter().map(|(key, value)| (key.clone(), *value)))?;

        Ok(pairs
            .iter()
            .map(|(sub, sup)| (concepts[sub], concepts[sup]))
            .collect())
    }

    /// Subsumers of every concept plus groups of mutually subsuming keys.
    pub fn classify<'a, K, I>(&self, concepts: I) -> Result<Classification<K>, ReasonerError>
    where
        I: IntoIterator<Item = (K, &'a Expression)>,
        K: Ord + Clone,
    {
        let concepts: Vec<(K, &'a Expression)> = concepts.into_iter().collect();
        let pairs = self.all_subsumption(concepts.iter().map(|(key, value)| (key.clone(), *value)))?;

        let mut subsumers: BTreeMap<K, BTreeSet<K>> = concepts
            .iter()
            .map(|(key, _)| (key.clone(), BTreeSet::new()))
            .collect();
        for (sub, sup) in &pairs {
            subsumers.entry(sub.clone()).or_default().insert(sup.clone());
        }

        let mut equivalences: Vec<BTreeSet<K>> = Vec::new();
        for (key, supers) in &subsumers {
            if equivalences.iter().any(|group| group.contains(key)) {
                continue;
            }

            let group: BTreeSet<K> = std::iter::once(key.clone())
                .chain(
                    supers
                        .iter()
                        .filter(|sup| pairs.contains(&((*sup).clone(), key.clone())))
                        .cloned(),
                )
                .collect();

            if group.len() > 1 {
                equivalences.push(group);
            }
        }

        Ok(Classification {
            pairs,
            subsumers,
            equivalences,
        })
    }
}

/// Result of `SubsumptionQueryProcessor::classify`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification<K: Ord> {
    /// Transitively closed `(sub, sup)` pairs
    pub pairs: SubsumptionPairs<K>,

    /// Every key mapped to the other keys that subsume it
    pub subsumers: BTreeMap<K, BTreeSet<K>>,

    /// Keys that subsume each other, two or more per group
    pub equivalences: Vec<BTreeSet<K>>,
}

/// Fixed-point transitive closure: keep adding `(x, w)` for every
/// `(x, y)`, `(y, w)` until nothing changes. Reflexive pairs are never
/// produced, and any present in the input are dropped.
pub fn transitive_closure<K: Ord + Clone>(pairs: SubsumptionPairs<K>) -> SubsumptionPairs<K> {
    let mut closure = pairs;
    closure.retain(|(sub, sup)| sub != sup);

    loop {
        let hops: Vec<(K, K)> = closure
            .iter()
            .cartesian_product(closure.iter())
            .filter(|((_, y), (q, _))| y == q)
            .filter(|((x, _), (_, w))| x != w)
            .map(|((x, _), (_, w))| (x.clone(), w.clone()))
            .collect();

        let before = closure.len();
        closure.extend(hops);
        if closure.len() == before {
            break;
        }
    }

    closure
}
