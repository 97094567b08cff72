//! Gene types for packed NEAT genomes.
//!
//! This module defines the fundamental building blocks of a genome:
//! - [`NeatEdge`]: a weighted connection to another node, by index
//! - [`NeatNode`]: a neuron with its activation and outgoing edges

use serde::{Deserialize, Serialize};

use crate::activation::UafActivation;

/// A directed, weighted connection to a target node in the same graph.
///
/// Targets are plain indices rather than handles, so recurrent links and
/// self-loops need no special representation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeatEdge {
    /// The connection weight.
    pub weight: f32,
    /// Index of the target node within the owning graph.
    ///
    /// Validated against the node count when the graph is built.
    pub target: u32,
}

impl NeatEdge {
    /// Create a new edge.
    #[must_use]
    pub const fn new(weight: f32, target: u32) -> Self {
        Self { weight, target }
    }
}

/// A neuron: its activation plus its outgoing edges, in order.
///
/// A node's identity is its position in the owning graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeatNode {
    /// The activation applied to this node's input sum.
    pub activation: UafActivation,
    /// Outgoing edges. Order is preserved through encoding.
    pub edges: Vec<NeatEdge>,
}

impl NeatNode {
    /// Create a node with the given outgoing edges.
    #[must_use]
    pub fn new(activation: UafActivation, edges: Vec<NeatEdge>) -> Self {
        Self { activation, edges }
    }

    /// Create a node with no outgoing edges.
    #[must_use]
    pub fn isolated(activation: UafActivation) -> Self {
        Self {
            activation,
            edges: Vec::new(),
        }
    }

    /// Number of outgoing edges.
    #[inline]
    #[must_use]
    pub fn out_degree(&self) -> usize {
        self.edges.len()
    }
}
