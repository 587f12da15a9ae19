//! Factors over discrete random variables and their algebra.
//!
//! A [`Factor`] maps every joint assignment of its scope variables to a
//! non-negative weight. The table is stored densely in row-major order
//! over a canonical scope: variables sorted by id, each variable's values
//! in declared domain order, last variable fastest. Two implementations
//! given identical factors therefore produce bit-identical table order.
//!
//! Factors are immutable. Product, reduction, and summing-out all return
//! new factors; inputs are never touched.

use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::errors::PgmError;
use crate::prob::variable::{Outcome, RandomVariable};

/// Table size from which the product fill switches to rayon.
///
/// Below this the parallel dispatch overhead dominates; above it the fill
/// is embarrassingly parallel over output indices. Both paths compute the
/// same table in the same order.
const PAR_FILL_THRESHOLD: usize = 1 << 12;

/// A non-negative weight function over assignments to a set of random
/// variables.
///
/// Scope identity is order-independent (a set of variables); the stored
/// scope is the canonical id-sorted ordering used for all arithmetic.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Factor {
    scope: Vec<RandomVariable>,
    weights: Vec<f64>,
}

/// Row-major strides for the given cardinalities (last index fastest).
fn strides(cards: &[usize]) -> Vec<usize> {
    let mut s = vec![1usize; cards.len()];
    for i in (0..cards.len().saturating_sub(1)).rev() {
        s[i] = s[i + 1] * cards[i + 1];
    }
    s
}

/// Decodes a flat row-major index into per-variable domain indices.
fn decode(mut index: usize, strides: &[usize], out: &mut [usize]) {
    for (i, s) in strides.iter().enumerate() {
        out[i] = index / s;
        index %= s;
    }
}

/// Number of joint assignments of a scope, or `InvalidFactor` when the
/// cardinality product does not fit in `usize`.
fn table_len(scope: &[RandomVariable]) -> Result<usize, PgmError> {
    scope.iter().try_fold(1usize, |acc, v| {
        acc.checked_mul(v.cardinality()).ok_or_else(|| {
            PgmError::InvalidFactor(format!(
                "joint assignment count of a {}-variable scope overflows usize",
                scope.len()
            ))
        })
    })
}

impl Factor {
    /// Creates a factor from a scope and a weight table.
    ///
    /// `weights` is interpreted row-major over `scope` *as given* (last
    /// variable fastest); if the scope is not already id-sorted, both the
    /// scope and the table are permuted into canonical order.
    ///
    /// # Errors
    ///
    /// Returns [`PgmError::InvalidFactor`] if the scope repeats a variable
    /// id, the table length does not match the product of the domain
    /// sizes, or any weight is negative, NaN, or infinite.
    pub fn new(scope: Vec<RandomVariable>, weights: Vec<f64>) -> Result<Self, PgmError> {
        for (i, v) in scope.iter().enumerate() {
            if scope[i + 1..].iter().any(|w| w.id() == v.id()) {
                return Err(PgmError::InvalidFactor(format!(
                    "scope repeats variable '{}'",
                    v.id()
                )));
            }
        }
        let expected = table_len(&scope)?;
        if weights.len() != expected {
            return Err(PgmError::InvalidFactor(format!(
                "table has {} weights, scope requires {}",
                weights.len(),
                expected
            )));
        }
        for w in &weights {
            if !w.is_finite() || *w < 0.0 {
                return Err(PgmError::InvalidFactor(format!(
                    "weight {} is not a finite non-negative number",
                    w
                )));
            }
        }
        Ok(Self::canonicalize(scope, weights))
    }

    /// Sorts the scope by variable id and permutes the table to match.
    fn canonicalize(scope: Vec<RandomVariable>, weights: Vec<f64>) -> Self {
        let mut order: Vec<usize> = (0..scope.len()).collect();
        order.sort_by(|&a, &b| scope[a].id().cmp(scope[b].id()));
        if order.iter().enumerate().all(|(i, &o)| i == o) {
            return Self { scope, weights };
        }
        let orig_cards: Vec<usize> = scope.iter().map(RandomVariable::cardinality).collect();
        let orig_strides = strides(&orig_cards);
        let sorted_scope: Vec<RandomVariable> =
            order.iter().map(|&o| scope[o].clone()).collect();
        let sorted_cards: Vec<usize> = sorted_scope
            .iter()
            .map(RandomVariable::cardinality)
            .collect();
        let sorted_strides = strides(&sorted_cards);
        let mut permuted = vec![0.0; weights.len()];
        let mut digits = vec![0usize; sorted_scope.len()];
        for (new_index, slot) in permuted.iter_mut().enumerate() {
            decode(new_index, &sorted_strides, &mut digits);
            let orig_index: usize = digits
                .iter()
                .zip(order.iter())
                .map(|(&d, &o)| d * orig_strides[o])
                .sum();
            *slot = weights[orig_index];
        }
        Self {
            scope: sorted_scope,
            weights: permuted,
        }
    }

    /// Tabulates a factor from a weight function.
    ///
    /// The function is called once per joint assignment, in lexicographic
    /// enumeration order, with `(variable id, outcome)` pairs in canonical
    /// scope order.
    ///
    /// # Errors
    ///
    /// Fails like [`Factor::new`] on an invalid scope or if the function
    /// produces a negative or non-finite weight.
    pub fn from_fn<F>(scope: Vec<RandomVariable>, f: F) -> Result<Self, PgmError>
    where
        F: Fn(&[(&str, &Outcome)]) -> f64,
    {
        let mut sorted = scope;
        sorted.sort_by(|a, b| a.id().cmp(b.id()));
        let len = table_len(&sorted)?;
        let cards: Vec<usize> = sorted.iter().map(RandomVariable::cardinality).collect();
        let strides = strides(&cards);
        let mut weights = Vec::with_capacity(len);
        let mut digits = vec![0usize; sorted.len()];
        for index in 0..len {
            decode(index, &strides, &mut digits);
            let assignment: Vec<(&str, &Outcome)> = sorted
                .iter()
                .zip(digits.iter())
                .map(|(v, &d)| (v.id(), &v.domain()[d]))
                .collect();
            weights.push(f(&assignment));
        }
        Self::new(sorted, weights)
    }

    /// The multiplicative identity: weight 1.0 on the empty scope.
    pub fn unit() -> Self {
        Self {
            scope: Vec::new(),
            weights: vec![1.0],
        }
    }

    /// The canonical (id-sorted) scope.
    pub fn scope(&self) -> &[RandomVariable] {
        &self.scope
    }

    /// The weight table in canonical row-major order.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Number of joint assignments (table length). Never zero for a
    /// constructed factor; the empty scope has one assignment.
    pub fn table_len(&self) -> usize {
        self.weights.len()
    }

    /// Whether the scope is empty (a constant factor).
    pub fn is_empty_scope(&self) -> bool {
        self.scope.is_empty()
    }

    /// Whether a variable id is in scope.
    pub fn in_scope(&self, var_id: &str) -> bool {
        self.scope.iter().any(|v| v.id() == var_id)
    }

    fn scope_position(&self, var_id: &str) -> Option<usize> {
        self.scope.iter().position(|v| v.id() == var_id)
    }

    fn cards(&self) -> Vec<usize> {
        self.scope.iter().map(RandomVariable::cardinality).collect()
    }

    /// Flat table index of a full assignment.
    ///
    /// Entries for variables outside the scope are ignored (assignment
    /// restriction); every scope variable must be assigned an outcome from
    /// its domain.
    fn index_of(&self, assignment: &[(&str, Outcome)]) -> Result<usize, PgmError> {
        let by_id: FxHashMap<&str, &Outcome> =
            assignment.iter().map(|(id, o)| (*id, o)).collect();
        let st = strides(&self.cards());
        let mut index = 0usize;
        for (i, v) in self.scope.iter().enumerate() {
            let outcome = by_id.get(v.id()).ok_or_else(|| {
                PgmError::InvalidFactor(format!(
                    "assignment is missing scope variable '{}'",
                    v.id()
                ))
            })?;
            let d = v.index_of(outcome).ok_or_else(|| {
                PgmError::InvalidFactor(format!(
                    "outcome '{}' is not in the domain of '{}'",
                    outcome,
                    v.id()
                ))
            })?;
            index += d * st[i];
        }
        Ok(index)
    }

    /// The weight of a full assignment over the scope.
    ///
    /// # Errors
    ///
    /// Returns [`PgmError::InvalidFactor`] if a scope variable is missing
    /// from the assignment or assigned an out-of-domain outcome.
    pub fn phi(&self, assignment: &[(&str, Outcome)]) -> Result<f64, PgmError> {
        Ok(self.weights[self.index_of(assignment)?])
    }

    /// The partition value: the sum of all weights.
    pub fn z(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// The weight of an assignment divided by the partition value.
    pub fn phi_normal(&self, assignment: &[(&str, Outcome)]) -> Result<f64, PgmError> {
        let z = self.z();
        if z == 0.0 {
            return Err(PgmError::InvalidFactor(
                "partition value is zero; factor cannot be normalized".to_string(),
            ));
        }
        Ok(self.phi(assignment)? / z)
    }

    /// A copy of this factor with weights scaled to sum to one.
    ///
    /// # Errors
    ///
    /// Returns [`PgmError::InvalidFactor`] if the partition value is zero.
    pub fn normalized(&self) -> Result<Factor, PgmError> {
        let z = self.z();
        if z == 0.0 {
            return Err(PgmError::InvalidFactor(
                "partition value is zero; factor cannot be normalized".to_string(),
            ));
        }
        Ok(Factor {
            scope: self.scope.clone(),
            weights: self.weights.iter().map(|w| w / z).collect(),
        })
    }

    /// Factor product: the pointwise product over the union of the scopes.
    ///
    /// For every joint assignment `a` of the combined scope,
    /// `result[a] = self[a restricted to scope(self)] *
    /// other[a restricted to scope(other)]`.
    ///
    /// The table size is the product of the combined domain sizes —
    /// exponential in scope size, which is inherent to exact inference.
    /// Large tables are filled in parallel; the output ordering is
    /// index-driven and identical either way.
    ///
    /// # Errors
    ///
    /// Returns [`PgmError::InvalidFactor`] if the two scopes share a
    /// variable id with different domains, or the combined table would not
    /// fit in memory.
    pub fn product(&self, other: &Factor) -> Result<Factor, PgmError> {
        let merged = merge_scopes(&self.scope, &other.scope)?;
        let len = table_len(&merged)?;
        let merged_cards: Vec<usize> =
            merged.iter().map(RandomVariable::cardinality).collect();
        let merged_strides = strides(&merged_cards);

        // Per-operand stride of each merged variable (0 when absent, so an
        // absent variable's digit does not move the operand index).
        let self_strides = operand_strides(&merged, self);
        let other_strides = operand_strides(&merged, other);

        let weight_at = |index: usize| -> f64 {
            let mut rest = index;
            let mut ia = 0usize;
            let mut ib = 0usize;
            for (i, s) in merged_strides.iter().enumerate() {
                let d = rest / s;
                rest %= s;
                ia += d * self_strides[i];
                ib += d * other_strides[i];
            }
            self.weights[ia] * other.weights[ib]
        };

        let weights: Vec<f64> = if len >= PAR_FILL_THRESHOLD {
            (0..len).into_par_iter().map(weight_at).collect()
        } else {
            (0..len).map(weight_at).collect()
        };

        Ok(Factor {
            scope: merged,
            weights,
        })
    }

    /// Reduces the factor by fixing one variable to a value (evidence
    /// conditioning). The result's scope excludes the fixed variable.
    ///
    /// # Errors
    ///
    /// Returns [`PgmError::InvalidFactor`] if the variable is not in scope
    /// or the outcome is not in its domain.
    pub fn reduce(&self, var_id: &str, outcome: &Outcome) -> Result<Factor, PgmError> {
        let pos = self.scope_position(var_id).ok_or_else(|| {
            PgmError::InvalidFactor(format!("variable '{}' is not in scope", var_id))
        })?;
        let fixed = self.scope[pos].index_of(outcome).ok_or_else(|| {
            PgmError::InvalidFactor(format!(
                "outcome '{}' is not in the domain of '{}'",
                outcome, var_id
            ))
        })?;
        let old_strides = strides(&self.cards());
        let mut new_scope = self.scope.clone();
        new_scope.remove(pos);
        let new_cards: Vec<usize> = new_scope.iter().map(RandomVariable::cardinality).collect();
        let new_strides = strides(&new_cards);
        let len: usize = new_cards.iter().product();
        let mut weights = Vec::with_capacity(len);
        let mut digits = vec![0usize; new_scope.len()];
        for index in 0..len {
            decode(index, &new_strides, &mut digits);
            let mut old_index = fixed * old_strides[pos];
            for (i, &d) in digits.iter().enumerate() {
                let old_pos = if i < pos { i } else { i + 1 };
                old_index += d * old_strides[old_pos];
            }
            weights.push(self.weights[old_index]);
        }
        Ok(Factor {
            scope: new_scope,
            weights,
        })
    }

    /// Sums a variable out of the factor, marginalizing it away. The
    /// result's scope excludes the variable.
    ///
    /// # Errors
    ///
    /// Returns [`PgmError::InvalidFactor`] if the variable is not in scope.
    pub fn sum_out(&self, var_id: &str) -> Result<Factor, PgmError> {
        let pos = self.scope_position(var_id).ok_or_else(|| {
            PgmError::InvalidFactor(format!("variable '{}' is not in scope", var_id))
        })?;
        let card = self.scope[pos].cardinality();
        let old_strides = strides(&self.cards());
        let mut new_scope = self.scope.clone();
        new_scope.remove(pos);
        let new_cards: Vec<usize> = new_scope.iter().map(RandomVariable::cardinality).collect();
        let new_strides = strides(&new_cards);
        let len: usize = new_cards.iter().product();
        let mut weights = Vec::with_capacity(len);
        let mut digits = vec![0usize; new_scope.len()];
        for index in 0..len {
            decode(index, &new_strides, &mut digits);
            let mut base = 0usize;
            for (i, &d) in digits.iter().enumerate() {
                let old_pos = if i < pos { i } else { i + 1 };
                base += d * old_strides[old_pos];
            }
            let sum: f64 = (0..card)
                .map(|v| self.weights[base + v * old_strides[pos]])
                .sum();
            weights.push(sum);
        }
        Ok(Factor {
            scope: new_scope,
            weights,
        })
    }

    /// Maxes a variable out of the factor: each surviving entry keeps the
    /// largest weight over the eliminated variable's outcomes. The
    /// max-product counterpart of [`sum_out`](Factor::sum_out).
    ///
    /// # Errors
    ///
    /// Returns [`PgmError::InvalidFactor`] if the variable is not in scope.
    pub fn max_out(&self, var_id: &str) -> Result<Factor, PgmError> {
        let pos = self.scope_position(var_id).ok_or_else(|| {
            PgmError::InvalidFactor(format!("variable '{}' is not in scope", var_id))
        })?;
        let card = self.scope[pos].cardinality();
        let old_strides = strides(&self.cards());
        let mut new_scope = self.scope.clone();
        new_scope.remove(pos);
        let new_cards: Vec<usize> = new_scope.iter().map(RandomVariable::cardinality).collect();
        let new_strides = strides(&new_cards);
        let len: usize = new_cards.iter().product();
        let mut weights = Vec::with_capacity(len);
        let mut digits = vec![0usize; new_scope.len()];
        for index in 0..len {
            decode(index, &new_strides, &mut digits);
            let mut base = 0usize;
            for (i, &d) in digits.iter().enumerate() {
                let old_pos = if i < pos { i } else { i + 1 };
                base += d * old_strides[old_pos];
            }
            let best = (0..card)
                .map(|v| self.weights[base + v * old_strides[pos]])
                .fold(0.0_f64, f64::max);
            weights.push(best);
        }
        Ok(Factor {
            scope: new_scope,
            weights,
        })
    }

    /// Enumerates all joint assignments in lexicographic table order, each
    /// as `(variable id, outcome)` pairs in canonical scope order.
    pub fn assignments(&self) -> impl Iterator<Item = Vec<(&str, &Outcome)>> + '_ {
        let st = strides(&self.cards());
        let n = self.scope.len();
        (0..self.weights.len()).map(move |index| {
            let mut digits = vec![0usize; n];
            decode(index, &st, &mut digits);
            self.scope
                .iter()
                .zip(digits.iter())
                .map(|(v, &d)| (v.id(), &v.domain()[d]))
                .collect()
        })
    }
}

/// Merges two canonical scopes by id, checking domain consistency on
/// shared variables.
fn merge_scopes(
    a: &[RandomVariable],
    b: &[RandomVariable],
) -> Result<Vec<RandomVariable>, PgmError> {
    let mut merged = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0usize, 0usize);
    while i < a.len() && j < b.len() {
        match a[i].id().cmp(b[j].id()) {
            std::cmp::Ordering::Less => {
                merged.push(a[i].clone());
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                merged.push(b[j].clone());
                j += 1;
            }
            std::cmp::Ordering::Equal => {
                if a[i].domain() != b[j].domain() {
                    return Err(PgmError::InvalidFactor(format!(
                        "scope mismatch: variable '{}' has different domains in the two factors",
                        a[i].id()
                    )));
                }
                merged.push(a[i].clone());
                i += 1;
                j += 1;
            }
        }
    }
    merged.extend(a[i..].iter().cloned());
    merged.extend(b[j..].iter().cloned());
    Ok(merged)
}

/// For each merged-scope variable, the operand's stride for that variable,
/// or 0 when the operand's scope does not contain it.
fn operand_strides(merged: &[RandomVariable], f: &Factor) -> Vec<usize> {
    let own_strides = strides(&f.cards());
    merged
        .iter()
        .map(|v| {
            f.scope_position(v.id())
                .map(|p| own_strides[p])
                .unwrap_or(0)
        })
        .collect()
}
