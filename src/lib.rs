//! # gmodels — probabilistic graphical models
//!
//! A library for constructing and analyzing probabilistic graphical
//! models: Bayesian networks (directed), Markov networks (undirected),
//! and LWF chain graphs (mixed directed/undirected).
//!
//! ## Architecture
//!
//! - **graph**: the set-algebraic graph ADT, connectivity analysis, and
//!   chain-graph decomposition
//! - **prob**: random variables, factor algebra, and sum-product variable
//!   elimination over a [`PgModel`]
//! - **errors**: the [`PgmError`] enum shared by both engines
//!
//! ## Usage
//!
//! ```rust
//! use gmodels::{Edge, Graph, LwfChainGraph, Vertex};
//!
//! let mut g = Graph::new("g");
//! for v in ["A", "B", "C", "D"] {
//!     g.add_vertex(Vertex::new(v)).unwrap();
//! }
//! g.add_edge(Edge::undirected("AB", "A", "B")).unwrap();
//! g.add_edge(Edge::undirected("CD", "C", "D")).unwrap();
//! g.add_edge(Edge::directed("BC", "B", "C")).unwrap();
//!
//! let chain = LwfChainGraph::new(g).unwrap();
//! assert_eq!(chain.chain_components().len(), 2);
//! assert_eq!(chain.chain_dag().edge_count(), 1);
//! ```
//!
//! All graph algebra and factor operations are pure: they return new
//! values and never mutate their inputs, so finalized graphs and factors
//! can be shared freely across threads.

#![forbid(unsafe_code)]

pub mod errors;
pub mod graph;
pub mod prob;

// Re-export commonly used types
pub use errors::PgmError;
pub use graph::{Edge, EdgeType, Graph, LwfChainGraph, Vertex};
pub use prob::{Factor, Outcome, PgModel, RandomVariable};
