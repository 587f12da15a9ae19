//! Discrete random variables and their outcome domains.

use std::fmt;

use crate::errors::PgmError;

/// A single outcome in the domain of a [`RandomVariable`].
///
/// Domains in practice mix booleans (`{true, false}`), small integers
/// (`{0, 1}`, dice faces) and symbolic labels (`{"sunny", "rainy"}`), so
/// the outcome is a small tagged value rather than a generic parameter.
///
/// `Ord` is derived for use in sorted containers; the order that matters
/// for factor arithmetic is always the *declared* domain order of the
/// owning variable, never the `Ord` order of the values themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    /// A boolean outcome.
    Bool(bool),
    /// An integer outcome.
    Int(i64),
    /// A symbolic outcome.
    Label(String),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Bool(b) => write!(f, "{}", b),
            Outcome::Int(i) => write!(f, "{}", i),
            Outcome::Label(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for Outcome {
    fn from(b: bool) -> Self {
        Outcome::Bool(b)
    }
}

impl From<i64> for Outcome {
    fn from(i: i64) -> Self {
        Outcome::Int(i)
    }
}

impl From<&str> for Outcome {
    fn from(s: &str) -> Self {
        Outcome::Label(s.to_string())
    }
}

/// A discrete random variable: an id plus a finite, ordered outcome domain.
///
/// The domain order is the order outcomes were declared in and is fixed for
/// the lifetime of the variable. Factor tables enumerate assignments in
/// declared domain order, so two variables with the same outcomes in a
/// different order are *not* interchangeable.
///
/// Immutable once created; all accessors are read-only.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RandomVariable {
    id: String,
    domain: Vec<Outcome>,
}

impl RandomVariable {
    /// Creates a random variable over the given domain.
    ///
    /// # Errors
    ///
    /// Returns [`PgmError::InvalidFactor`] if the domain is empty or
    /// contains a duplicate outcome.
    pub fn new(id: impl Into<String>, domain: Vec<Outcome>) -> Result<Self, PgmError> {
        let id = id.into();
        if domain.is_empty() {
            return Err(PgmError::InvalidFactor(format!(
                "variable '{}' has an empty domain",
                id
            )));
        }
        for (i, a) in domain.iter().enumerate() {
            if domain[i + 1..].contains(a) {
                return Err(PgmError::InvalidFactor(format!(
                    "variable '{}' declares outcome '{}' more than once",
                    id, a
                )));
            }
        }
        Ok(Self { id, domain })
    }

    /// Convenience constructor for a boolean variable with domain
    /// `[true, false]`.
    pub fn binary(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            domain: vec![Outcome::Bool(true), Outcome::Bool(false)],
        }
    }

    /// The variable id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The outcome domain in declared order.
    pub fn domain(&self) -> &[Outcome] {
        &self.domain
    }

    /// Number of outcomes in the domain.
    pub fn cardinality(&self) -> usize {
        self.domain.len()
    }

    /// Position of an outcome in the declared domain order, if present.
    pub fn index_of(&self, outcome: &Outcome) -> Option<usize> {
        self.domain.iter().position(|o| o == outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_accepts_ordered_domain() {
        let v = RandomVariable::new("x", vec![Outcome::Int(0), Outcome::Int(1)]).unwrap();
        assert_eq!(v.id(), "x");
        assert_eq!(v.cardinality(), 2);
        assert_eq!(v.index_of(&Outcome::Int(1)), Some(1));
    }

    #[test]
    fn new_rejects_empty_domain() {
        let r = RandomVariable::new("x", vec![]);
        assert!(matches!(r, Err(PgmError::InvalidFactor(_))));
    }

    #[test]
    fn new_rejects_duplicate_outcome() {
        let r = RandomVariable::new("x", vec![Outcome::Int(1), Outcome::Int(1)]);
        assert!(matches!(r, Err(PgmError::InvalidFactor(_))));
    }

    #[test]
    fn binary_domain_order_is_true_then_false() {
        let v = RandomVariable::binary("b");
        assert_eq!(v.domain(), &[Outcome::Bool(true), Outcome::Bool(false)]);
    }

    #[test]
    fn index_of_missing_outcome_is_none() {
        let v = RandomVariable::binary("b");
        assert_eq!(v.index_of(&Outcome::Int(3)), None);
    }
}
