//! Error types for graph and factor operations.

use thiserror::Error;

/// Errors surfaced by graph construction, graph algebra, chain-graph
/// decomposition, and factor arithmetic.
///
/// Every variant is a caller-correctable usage error: this crate performs
/// pure computation and has no transient or retryable failures. Structural
/// invariant violations are reported immediately and never silently
/// repaired; a failing operation leaves its inputs unchanged.
///
/// The enum is `#[non_exhaustive]` to allow adding new error variants
/// without breaking changes.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum PgmError {
    /// A referenced vertex is absent from the graph.
    #[error("vertex '{vertex}' not found in graph '{graph}'")]
    VertexNotFound {
        /// Id of the missing vertex.
        vertex: String,
        /// Id of the graph that was queried.
        graph: String,
    },

    /// An edge references a vertex that is not a member of the graph.
    #[error("edge '{edge}' references vertex '{vertex}' not present in graph '{graph}'")]
    EdgeEndpoint {
        /// Id of the offending edge.
        edge: String,
        /// Id of the missing endpoint vertex.
        vertex: String,
        /// Id of the graph the edge was added to.
        graph: String,
    },

    /// An operation would violate the edge-endpoint invariant or another
    /// structural precondition of the graph.
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    /// Chain-graph decomposition detected an inconsistency: either a
    /// directed edge inside a chain component, or a cycle in the
    /// component-contracted DAG.
    #[error("invalid chain graph: {0}")]
    InvalidChainGraph(String),

    /// A factor is malformed (negative or non-finite weight, empty or
    /// duplicated domain, table size mismatch) or two factors disagree on
    /// a shared scope variable.
    #[error("invalid factor: {0}")]
    InvalidFactor(String),
}
