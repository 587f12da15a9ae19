//! Vertex and edge objects shared across graphs.
//!
//! Instead of a polymorphic "graph object" class hierarchy, both kinds of
//! object are plain data: a unique string id plus whatever payload the
//! object kind carries (an optional random variable for vertices, two
//! endpoint ids and a direction flag for edges). Behavior lives in methods
//! over the concrete types.
//!
//! Identity and set-operation equality are by id. Two edges between the
//! same endpoint pair under different ids are distinct objects (parallel
//! edges); self-loops are permitted the same way.

use std::collections::BTreeSet;
use std::fmt;

use crate::errors::PgmError;
use crate::prob::RandomVariable;

/// Directionality flag of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EdgeType {
    /// Ordered edge from start to end.
    Directed,
    /// Unordered edge; start/end carry no orientation meaning.
    Undirected,
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeType::Directed => write!(f, "directed"),
            EdgeType::Undirected => write!(f, "undirected"),
        }
    }
}

/// A vertex: a unique id, optionally labeled with a random variable.
///
/// Vertices carrying a [`RandomVariable`] are the atoms of probabilistic
/// models; unlabeled vertices participate in the graph algebra only.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vertex {
    id: String,
    variable: Option<RandomVariable>,
}

impl Vertex {
    /// Creates an unlabeled vertex.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            variable: None,
        }
    }

    /// Creates a vertex carrying a random variable. The vertex id is the
    /// variable id.
    pub fn from_variable(variable: RandomVariable) -> Self {
        Self {
            id: variable.id().to_string(),
            variable: Some(variable),
        }
    }

    /// The vertex id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The attached random variable, if any.
    pub fn variable(&self) -> Option<&RandomVariable> {
        self.variable.as_ref()
    }
}

/// An edge: a unique id, two endpoint vertex ids, and a direction flag.
///
/// The edge stores endpoint *ids* rather than vertex values; the owning
/// [`Graph`](crate::graph::Graph) enforces that both endpoints are members
/// of its vertex set.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    id: String,
    start: String,
    end: String,
    etype: EdgeType,
}

impl Edge {
    /// Creates a directed edge `start -> end`.
    pub fn directed(
        id: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            start: start.into(),
            end: end.into(),
            etype: EdgeType::Directed,
        }
    }

    /// Creates an undirected edge between `start` and `end`.
    pub fn undirected(
        id: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            start: start.into(),
            end: end.into(),
            etype: EdgeType::Undirected,
        }
    }

    /// The edge id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The start endpoint id. For undirected edges the start/end split is
    /// storage order only.
    pub fn start(&self) -> &str {
        &self.start
    }

    /// The end endpoint id.
    pub fn end(&self) -> &str {
        &self.end
    }

    /// The direction flag.
    pub fn edge_type(&self) -> EdgeType {
        self.etype
    }

    /// Whether this edge is directed.
    pub fn is_directed(&self) -> bool {
        self.etype == EdgeType::Directed
    }

    /// The set of endpoint ids. A self-loop yields a single-element set.
    pub fn node_ids(&self) -> BTreeSet<&str> {
        let mut ids = BTreeSet::new();
        ids.insert(self.start.as_str());
        ids.insert(self.end.as_str());
        ids
    }

    /// Whether the given vertex id is one of this edge's endpoints.
    pub fn is_endpoint(&self, vertex_id: &str) -> bool {
        self.start == vertex_id || self.end == vertex_id
    }

    /// The endpoint opposite to `vertex_id`.
    ///
    /// For a self-loop the opposite endpoint is the vertex itself.
    ///
    /// # Errors
    ///
    /// Returns [`PgmError::VertexNotFound`] if `vertex_id` is not an
    /// endpoint of this edge.
    pub fn other(&self, vertex_id: &str) -> Result<&str, PgmError> {
        if !self.is_endpoint(vertex_id) {
            return Err(PgmError::VertexNotFound {
                vertex: vertex_id.to_string(),
                graph: format!("edge '{}'", self.id),
            });
        }
        if self.start == vertex_id {
            Ok(&self.end)
        } else {
            Ok(&self.start)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prob::RandomVariable;

    #[test]
    fn vertex_from_variable_uses_variable_id() {
        let v = Vertex::from_variable(RandomVariable::binary("rain"));
        assert_eq!(v.id(), "rain");
        assert!(v.variable().is_some());
    }

    #[test]
    fn edge_endpoints_and_other() {
        let e = Edge::directed("ab", "a", "b");
        assert!(e.is_endpoint("a"));
        assert!(e.is_endpoint("b"));
        assert!(!e.is_endpoint("c"));
        assert_eq!(e.other("a").unwrap(), "b");
        assert_eq!(e.other("b").unwrap(), "a");
        assert!(e.other("c").is_err());
    }

    #[test]
    fn self_loop_node_ids_is_singleton() {
        let e = Edge::undirected("aa", "a", "a");
        assert_eq!(e.node_ids().len(), 1);
        assert_eq!(e.other("a").unwrap(), "a");
    }
}
