//! The graph engine: objects, the graph ADT, connectivity analysis, and
//! chain-graph decomposition.
//!
//! - **object**: vertex/edge data with direction flags
//! - **graph**: the set-algebraic graph ADT
//! - **analysis**: connected components and their materialization
//! - **chain**: LWF chain graphs (chain components + chain DAG)

pub mod analysis;
pub mod chain;
pub mod graph;
pub mod object;

pub use chain::LwfChainGraph;
pub use graph::Graph;
pub use object::{Edge, EdgeType, Vertex};
