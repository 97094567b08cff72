//! Error types for graph construction, encoding and decoding.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PackError>;

/// Validation failures raised while building graphs or packing/unpacking textures.
///
/// All variants are deterministic input errors. Nothing is clamped or coerced:
/// the caller must fix the offending input and try again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackError {
    /// An edge targets a node index that does not exist in its own graph.
    #[error(
        "edge {edge} of node {node} targets node {target}, but the graph only has {node_count} nodes"
    )]
    InvalidReference {
        /// Index of the node owning the edge.
        node: usize,
        /// Position of the edge in the node's outgoing list.
        edge: usize,
        /// The offending target index.
        target: u32,
        /// Node count of the owning graph.
        node_count: usize,
    },

    /// A graph has no nodes and cannot be evaluated.
    #[error("graph {graph} has no nodes")]
    DegenerateGraph {
        /// Index of the graph within the population.
        graph: usize,
    },

    /// The population holds no graphs.
    #[error("population is empty")]
    EmptyPopulation,

    /// A graph has too many nodes to be addressed with a `u32` target.
    #[error("graph with {node_count} nodes exceeds the addressable node range")]
    CapacityExceeded {
        /// Node count of the rejected graph.
        node_count: usize,
    },

    /// A raw buffer does not match the capacity implied by its shape.
    #[error("{buffer} buffer holds {actual} slots, shape requires {expected}")]
    ShapeMismatch {
        /// Which buffer (`"node"` or `"edge"`).
        buffer: &'static str,
        /// Capacity derived from the shape.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },

    /// A texture shape whose buffer capacities do not fit in `usize`.
    #[error(
        "shape of {graph_count} graphs x {max_nodes} nodes x {max_out_edges} edges overflows the address space"
    )]
    ShapeOverflow {
        /// Graph count of the rejected shape.
        graph_count: usize,
        /// Node slots per graph of the rejected shape.
        max_nodes: usize,
        /// Edge slots per node of the rejected shape.
        max_out_edges: usize,
    },

    /// A texture violates the padding layout and cannot be decoded.
    #[error("corrupt texture at graph {graph}, node slot {node}: {reason}")]
    CorruptTexture {
        /// Graph index of the offending slot.
        graph: usize,
        /// Node slot of the offending slot.
        node: usize,
        /// What was wrong.
        reason: &'static str,
    },
}
