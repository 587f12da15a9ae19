//! Probabilistic graphical models: a graph of random variables plus the
//! factors defined over them, with sum-product variable elimination.
//!
//! The elimination machinery follows the classical sum-product scheme:
//! to eliminate a variable, multiply together exactly the factors whose
//! scope contains it, sum the variable out of the product, and put the
//! marginal back into the pool. A conditional query reduces every factor
//! by the evidence first, eliminates all non-query variables in a greedy
//! min-neighbours order, and normalizes the final product. The
//! max-product path mirrors the sum-product one with a pointwise max per
//! step and an argmax traceback recovering the MAP assignment.

use rustc_hash::FxHashSet;

use crate::errors::PgmError;
use crate::graph::graph::Graph;
use crate::prob::factor::Factor;
use crate::prob::variable::Outcome;

/// A probabilistic graphical model: structure graph + factors.
///
/// The graph's variable-labeled vertices declare the model's random
/// variables; every factor scope must agree with those declarations.
/// Construction validates the agreement once, so queries can trust it.
#[derive(Debug, Clone)]
pub struct PgModel {
    graph: Graph,
    factors: Vec<Factor>,
}

impl PgModel {
    /// Creates a model from a structure graph and its factors.
    ///
    /// # Errors
    ///
    /// Returns [`PgmError::InvalidFactor`] if a factor scope variable has
    /// no matching vertex in the graph, the vertex carries no random
    /// variable, or the declared domains differ.
    pub fn new(graph: Graph, factors: Vec<Factor>) -> Result<Self, PgmError> {
        for f in &factors {
            for sv in f.scope() {
                let vertex = graph.vertex(sv.id()).ok_or_else(|| {
                    PgmError::InvalidFactor(format!(
                        "factor scope variable '{}' has no vertex in graph '{}'",
                        sv.id(),
                        graph.id()
                    ))
                })?;
                match vertex.variable() {
                    Some(v) if v == sv => {}
                    Some(_) => {
                        return Err(PgmError::InvalidFactor(format!(
                            "factor scope variable '{}' disagrees with the vertex declaration",
                            sv.id()
                        )))
                    }
                    None => {
                        return Err(PgmError::InvalidFactor(format!(
                            "vertex '{}' carries no random variable",
                            sv.id()
                        )))
                    }
                }
            }
        }
        Ok(Self { graph, factors })
    }

    /// The structure graph.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// The model's factors.
    pub fn factors(&self) -> &[Factor] {
        &self.factors
    }

    /// Ids of the random variables declared by the graph, in vertex
    /// insertion order.
    pub fn variable_ids(&self) -> Vec<String> {
        self.graph
            .vertices()
            .filter(|v| v.variable().is_some())
            .map(|v| v.id().to_string())
            .collect()
    }

    /// The product of all model factors.
    ///
    /// The table is exponential in the number of model variables; prefer
    /// [`sum_product_elimination`](PgModel::sum_product_elimination) for
    /// anything beyond small models.
    pub fn factor_product(&self) -> Result<Factor, PgmError> {
        let mut acc = Factor::unit();
        for f in &self.factors {
            acc = acc.product(f)?;
        }
        Ok(acc)
    }

    /// Splits a factor pool into the factors whose scope contains
    /// `var_id` and the rest, preserving order.
    pub fn factors_touching(factors: Vec<Factor>, var_id: &str) -> (Vec<Factor>, Vec<Factor>) {
        factors.into_iter().partition(|f| f.in_scope(var_id))
    }

    /// One sum-product elimination step: multiply the factors touching
    /// `var_id`, sum the variable out, and return the remaining pool with
    /// the marginal appended.
    ///
    /// A variable no factor touches is a no-op (the pool is returned
    /// unchanged).
    pub fn sum_prod_eliminate_var(
        factors: Vec<Factor>,
        var_id: &str,
    ) -> Result<Vec<Factor>, PgmError> {
        let (touching, mut rest) = Self::factors_touching(factors, var_id);
        if touching.is_empty() {
            return Ok(rest);
        }
        let mut prod = Factor::unit();
        for f in &touching {
            prod = prod.product(f)?;
        }
        rest.push(prod.sum_out(var_id)?);
        Ok(rest)
    }

    /// Sum-product variable elimination over the model's factors.
    ///
    /// Eliminates the given variables in order and returns the product of
    /// whatever factors remain (a factor over the un-eliminated
    /// variables).
    pub fn sum_product_elimination(&self, elim_order: &[&str]) -> Result<Factor, PgmError> {
        let mut pool = self.factors.clone();
        for var in elim_order {
            pool = Self::sum_prod_eliminate_var(pool, var)?;
        }
        let mut acc = Factor::unit();
        for f in &pool {
            acc = acc.product(f)?;
        }
        Ok(acc)
    }

    /// One max-product elimination step: multiply the factors touching
    /// `var_id`, max the variable out, and return the remaining pool with
    /// the max-marginal appended, plus the step's product factor (needed
    /// later for the MAP traceback).
    ///
    /// A variable no factor touches leaves the pool unchanged and yields
    /// the unit factor.
    pub fn max_prod_eliminate_var(
        factors: Vec<Factor>,
        var_id: &str,
    ) -> Result<(Vec<Factor>, Factor), PgmError> {
        let (touching, mut rest) = Self::factors_touching(factors, var_id);
        if touching.is_empty() {
            return Ok((rest, Factor::unit()));
        }
        let mut prod = Factor::unit();
        for f in &touching {
            prod = prod.product(f)?;
        }
        rest.push(prod.max_out(var_id)?);
        Ok((rest, prod))
    }

    /// Max-product variable elimination: the most likely joint assignment
    /// of the eliminated variables and its unnormalized weight (Koller &
    /// Friedman 2009, p. 557).
    ///
    /// Eliminates the variables in order, keeping each step's product
    /// factor, then traces back in reverse: with every later-eliminated
    /// variable already fixed, each step factor collapses to its own
    /// variable and the argmax entry extends the assignment. Ties pick the
    /// earliest domain outcome. Variables no factor touches are
    /// unconstrained and omitted from the result.
    pub fn max_product_elimination(
        &self,
        elim_order: &[&str],
    ) -> Result<(Vec<(String, Outcome)>, f64), PgmError> {
        let mut pool = self.factors.clone();
        let mut steps: Vec<(&str, Factor)> = Vec::with_capacity(elim_order.len());
        for var in elim_order {
            let (rest, prod) = Self::max_prod_eliminate_var(pool, var)?;
            pool = rest;
            steps.push((*var, prod));
        }

        let mut assignment: Vec<(String, Outcome)> = Vec::new();
        for (var, prod) in steps.iter().rev() {
            let mut f = prod.clone();
            for (v, o) in &assignment {
                if f.in_scope(v) {
                    f = f.reduce(v, o)?;
                }
            }
            if !f.in_scope(var) {
                continue;
            }
            let others: Vec<String> = f
                .scope()
                .iter()
                .filter(|s| s.id() != *var)
                .map(|s| s.id().to_string())
                .collect();
            for o in &others {
                f = f.max_out(o)?;
            }
            let mut best = 0usize;
            for (i, w) in f.weights().iter().enumerate() {
                if *w > f.weights()[best] {
                    best = i;
                }
            }
            let outcome = f.scope()[0].domain()[best].clone();
            assignment.push((var.to_string(), outcome));
        }
        assignment.reverse();

        let mut acc = Factor::unit();
        for f in &pool {
            acc = acc.product(f)?;
        }
        let value = acc.weights().iter().fold(0.0_f64, |m, &w| m.max(w));
        Ok((assignment, value))
    }

    /// Reduces every factor by the evidence entries that fall inside its
    /// scope. Factors untouched by the evidence pass through unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`PgmError::InvalidFactor`] if an evidence outcome is not
    /// in the domain of its variable.
    pub fn reduce_factors_with_evidence(
        &self,
        evidence: &[(&str, Outcome)],
    ) -> Result<Vec<Factor>, PgmError> {
        let mut reduced = Vec::with_capacity(self.factors.len());
        for f in &self.factors {
            let mut r = f.clone();
            for (var, outcome) in evidence {
                if r.in_scope(var) {
                    r = r.reduce(var, outcome)?;
                }
            }
            reduced.push(r);
        }
        Ok(reduced)
    }

    /// A greedy elimination ordering: the given variables sorted by
    /// ascending neighbour count in the structure graph, ties broken by
    /// the order given. A cheap stand-in for treewidth-optimal orderings.
    ///
    /// # Errors
    ///
    /// Returns [`PgmError::VertexNotFound`] if a variable has no vertex.
    pub fn min_neighbours_order(&self, var_ids: &[&str]) -> Result<Vec<String>, PgmError> {
        let mut scored: Vec<(usize, usize, &str)> = Vec::with_capacity(var_ids.len());
        for (pos, var) in var_ids.iter().enumerate() {
            let n = self.graph.neighbours_of(var)?.len();
            scored.push((n, pos, var));
        }
        scored.sort();
        Ok(scored.into_iter().map(|(_, _, v)| v.to_string()).collect())
    }

    /// Conditional query: the normalized distribution over `targets`
    /// given the evidence.
    ///
    /// Reduces all factors by the evidence, eliminates every remaining
    /// non-target variable in greedy min-neighbours order, multiplies the
    /// surviving factors, and normalizes.
    ///
    /// # Errors
    ///
    /// Propagates factor errors; returns [`PgmError::InvalidFactor`] if
    /// the evidence zeroes out the distribution entirely.
    pub fn query(
        &self,
        targets: &[&str],
        evidence: &[(&str, Outcome)],
    ) -> Result<Factor, PgmError> {
        let fixed: FxHashSet<&str> = evidence.iter().map(|(v, _)| *v).collect();
        let keep: FxHashSet<&str> = targets.iter().copied().collect();
        let all = self.variable_ids();
        let to_eliminate: Vec<&str> = all
            .iter()
            .map(String::as_str)
            .filter(|v| !keep.contains(v) && !fixed.contains(v))
            .collect();
        let order = self.min_neighbours_order(&to_eliminate)?;

        let mut pool = self.reduce_factors_with_evidence(evidence)?;
        for var in &order {
            pool = Self::sum_prod_eliminate_var(pool, var)?;
        }
        let mut acc = Factor::unit();
        for f in &pool {
            acc = acc.product(f)?;
        }
        acc.normalized()
    }

    /// The Markov blanket of a vertex: its neighbours in the structure
    /// graph, ignoring edge direction.
    ///
    /// # Errors
    ///
    /// Returns [`PgmError::VertexNotFound`] if the vertex is absent.
    pub fn markov_blanket(&self, vertex_id: &str) -> Result<Vec<String>, PgmError> {
        Ok(self
            .graph
            .neighbours_of(vertex_id)?
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    /// The closure of a vertex: its Markov blanket together with the
    /// vertex itself (Murphy 2012, p. 662).
    pub fn closure_of(&self, vertex_id: &str) -> Result<Vec<String>, PgmError> {
        let mut c = self.markov_blanket(vertex_id)?;
        c.push(vertex_id.to_string());
        Ok(c)
    }

    /// Whether `x` is conditionally independent of `y` given `x`'s Markov
    /// blanket: true exactly when `y` lies outside the closure of `x`.
    ///
    /// # Errors
    ///
    /// Returns [`PgmError::VertexNotFound`] if either vertex is absent.
    pub fn is_conditionally_independent_of(&self, x: &str, y: &str) -> Result<bool, PgmError> {
        if !self.graph.has_vertex(y) {
            return Err(PgmError::VertexNotFound {
                vertex: y.to_string(),
                graph: self.graph.id().to_string(),
            });
        }
        Ok(!self.closure_of(x)?.iter().any(|v| v == y))
    }
}
