//! The probability engine: random variables, factors, and models.
//!
//! - **variable**: discrete outcomes and random variables
//! - **factor**: the factor table and its algebra (product, reduce,
//!   sum-out)
//! - **model**: graphical models and sum-product variable elimination

pub mod factor;
pub mod model;
pub mod variable;

pub use factor::Factor;
pub use model::PgModel;
pub use variable::{Outcome, RandomVariable};
