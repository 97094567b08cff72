//! Validated genome graphs.
//!
//! A [`NeatGraph`] is an ordered sequence of [`NeatNode`]s whose edges refer to
//! other nodes by index. The graph is a general directed multigraph: parallel
//! edges, self-loops and longer cycles are all allowed. Every edge target is
//! checked once, when the graph is built, so downstream code can index nodes
//! without re-validating.

use serde::{Deserialize, Serialize};

use crate::error::{PackError, Result};
use crate::gene::NeatNode;
use crate::texture::INVALID_TARGET;
use crate::topology::GraphTopology;

/// A single genome: nodes addressed by their position.
///
/// Node indices are stable for the lifetime of the graph, and the node count
/// cannot change after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<NeatNode>", into = "Vec<NeatNode>")]
pub struct NeatGraph {
    nodes: Vec<NeatNode>,
}

impl NeatGraph {
    /// Build a graph, validating every edge target.
    ///
    /// A graph without nodes is accepted here; the encoder decides whether it
    /// can be packed.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::InvalidReference`] for the first edge whose target
    /// is not less than the node count, and [`PackError::CapacityExceeded`]
    /// if the node count collides with the reserved padding marker.
    pub fn new(nodes: Vec<NeatNode>) -> Result<Self> {
        let node_count = nodes.len();
        if u32::try_from(node_count).map_or(true, |n| n >= INVALID_TARGET) {
            return Err(PackError::CapacityExceeded { node_count });
        }

        for (node_idx, node) in nodes.iter().enumerate() {
            for (edge_idx, edge) in node.edges.iter().enumerate() {
                // node_count < u32::MAX, so the widening comparison is exact
                if edge.target as usize >= node_count {
                    return Err(PackError::InvalidReference {
                        node: node_idx,
                        edge: edge_idx,
                        target: edge.target,
                        node_count,
                    });
                }
            }
        }

        Ok(Self { nodes })
    }

    /// Number of nodes.
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total number of edges across all nodes.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(NeatNode::out_degree).sum()
    }

    /// Largest outgoing-edge count of any node (0 for an empty graph).
    #[must_use]
    pub fn max_out_degree(&self) -> usize {
        self.nodes
            .iter()
            .map(NeatNode::out_degree)
            .max()
            .unwrap_or(0)
    }

    /// All nodes in index order.
    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &[NeatNode] {
        &self.nodes
    }

    /// The node at `index`, if any.
    #[inline]
    #[must_use]
    pub fn node(&self, index: usize) -> Option<&NeatNode> {
        self.nodes.get(index)
    }

    /// Iterate over nodes in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, NeatNode> {
        self.nodes.iter()
    }

    /// CSR snapshot of this graph's connectivity.
    #[must_use]
    pub fn topology(&self) -> GraphTopology {
        GraphTopology::from_graph(self)
    }

    /// Whether the graph contains any cycle, self-loops included.
    ///
    /// Recurrent graphs need tick-based relaxation rather than a single
    /// topological pass.
    #[must_use]
    pub fn is_recurrent(&self) -> bool {
        self.topology().has_cycle()
    }

    /// Consume the graph, returning its nodes.
    #[must_use]
    pub fn into_nodes(self) -> Vec<NeatNode> {
        self.nodes
    }
}

impl TryFrom<Vec<NeatNode>> for NeatGraph {
    type Error = PackError;

    fn try_from(nodes: Vec<NeatNode>) -> Result<Self> {
        Self::new(nodes)
    }
}

impl From<NeatGraph> for Vec<NeatNode> {
    fn from(graph: NeatGraph) -> Self {
        graph.nodes
    }
}

impl<'a> IntoIterator for &'a NeatGraph {
    type Item = &'a NeatNode;
    type IntoIter = std::slice::Iter<'a, NeatNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::UafActivation;
    use crate::gene::NeatEdge;

    fn act() -> UafActivation {
        UafActivation::new(1.0, 1.0, 1.0, 1.0, 100.0)
    }

    fn chain(len: u32) -> NeatGraph {
        let nodes = (0..len)
            .map(|i| {
                let edges = if i + 1 < len {
                    vec![NeatEdge::new(1.0, i + 1)]
                } else {
                    Vec::new()
                };
                NeatNode::new(act(), edges)
            })
            .collect();
        NeatGraph::new(nodes).unwrap()
    }

    #[test]
    fn test_graph_counts() {
        let graph = NeatGraph::new(vec![
            NeatNode::new(act(), vec![NeatEdge::new(1.0, 0), NeatEdge::new(0.5, 1)]),
            NeatNode::new(act(), vec![NeatEdge::new(1.0, 1)]),
        ])
        .unwrap();

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.max_out_degree(), 2);
        assert_eq!(graph.node(1).map(NeatNode::out_degree), Some(1));
        assert!(graph.node(2).is_none());
    }

    #[test]
    fn test_invalid_reference_rejected() {
        let err = NeatGraph::new(vec![
            NeatNode::new(act(), vec![NeatEdge::new(1.0, 0)]),
            NeatNode::new(act(), vec![NeatEdge::new(1.0, 1), NeatEdge::new(1.0, 2)]),
        ])
        .unwrap_err();

        assert_eq!(
            err,
            PackError::InvalidReference {
                node: 1,
                edge: 1,
                target: 2,
                node_count: 2,
            }
        );
    }

    #[test]
    fn test_empty_graph_is_constructible() {
        let graph = NeatGraph::new(Vec::new()).unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph.max_out_degree(), 0);
        assert!(!graph.is_recurrent());
    }

    #[test]
    fn test_recurrence_detection() {
        assert!(!chain(4).is_recurrent());

        let self_loop =
            NeatGraph::new(vec![NeatNode::new(act(), vec![NeatEdge::new(1.0, 0)])]).unwrap();
        assert!(self_loop.is_recurrent());

        let cycle = NeatGraph::new(vec![
            NeatNode::new(act(), vec![NeatEdge::new(1.0, 1)]),
            NeatNode::new(act(), vec![NeatEdge::new(1.0, 2)]),
            NeatNode::new(act(), vec![NeatEdge::new(-1.0, 0)]),
        ])
        .unwrap();
        assert!(cycle.is_recurrent());
    }

    #[test]
    fn test_deserialize_validates_targets() {
        let graph = chain(3);
        let json = serde_json::to_string(&graph).expect("Serialization failed");
        let restored: NeatGraph = serde_json::from_str(&json).expect("Deserialization failed");
        assert_eq!(graph, restored);

        let bad = r#"[{"activation":{"a":1.0,"b":0.0,"c":0.0,"d":1.0,"e":0.0},"edges":[{"weight":1.0,"target":5}]}]"#;
        assert!(serde_json::from_str::<NeatGraph>(bad).is_err());
    }
}
