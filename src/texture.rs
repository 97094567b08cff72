//! Fixed-stride texture layout.
//!
//! A population is packed into two flat buffers:
//!
//! - the **node buffer**, one [`NodeTexel`] per `(graph, node)` slot,
//!   `graph_count × max_nodes` slots in total;
//! - the **edge buffer**, one [`EdgeTexel`] per `(graph, node, edge)` slot,
//!   `graph_count × max_nodes × max_out_edges` slots in total.
//!
//! Slot addresses are pure arithmetic on the [`TextureShape`]:
//!
//! ```text
//! node slot = graph · max_nodes + node
//! edge slot = node slot · max_out_edges + edge
//! ```
//!
//! Each graph owns one contiguous range in each buffer, so no two graphs ever
//! share a slot. Slots without a real node or edge hold padding:
//! nodes with `valid == 0` and zeroed parameters, edges with weight `0.0` and
//! target [`INVALID_TARGET`]. An evaluator must treat both as no-ops.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::activation::{UafActivation, UAF_PARAM_COUNT};
use crate::error::{PackError, Result};
use crate::gene::NeatEdge;
use crate::layout::AtlasLayout;
use crate::population::PopulationStats;

/// Reserved edge target marking a padding edge slot.
///
/// Real targets are always smaller, since graphs are limited to fewer than
/// `u32::MAX` nodes.
pub const INVALID_TARGET: u32 = u32::MAX;

/// One node slot: activation coefficients plus a validity flag.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct NodeTexel {
    /// UAF coefficients in `[a, b, c, d, e]` order.
    pub params: [f32; UAF_PARAM_COUNT],
    /// 1 for a real node, 0 for padding.
    pub valid: u32,
}

impl NodeTexel {
    /// The padding value: zeroed coefficients, `valid == 0`.
    pub const PADDING: Self = Self {
        params: [0.0; UAF_PARAM_COUNT],
        valid: 0,
    };

    /// Texel for a real node.
    #[must_use]
    pub const fn real(activation: &UafActivation) -> Self {
        Self {
            params: activation.params(),
            valid: 1,
        }
    }

    /// Whether this slot holds a real node.
    #[inline]
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.valid != 0
    }

    /// The activation stored in this slot, `None` for padding.
    #[must_use]
    pub fn activation(&self) -> Option<UafActivation> {
        self.is_valid()
            .then(|| UafActivation::from_params(self.params))
    }
}

/// One edge slot: weight plus target node slot within the same graph.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct EdgeTexel {
    /// Connection weight, `0.0` for padding.
    pub weight: f32,
    /// Target node index, [`INVALID_TARGET`] for padding.
    pub target: u32,
}

impl EdgeTexel {
    /// The padding value: zero weight, reserved target.
    pub const PADDING: Self = Self {
        weight: 0.0,
        target: INVALID_TARGET,
    };

    /// Texel for a real edge. Targets are copied verbatim.
    #[must_use]
    pub const fn real(edge: &NeatEdge) -> Self {
        Self {
            weight: edge.weight,
            target: edge.target,
        }
    }

    /// Whether this slot holds a real edge.
    #[inline]
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.target != INVALID_TARGET
    }

    /// The edge stored in this slot, `None` for padding.
    #[must_use]
    pub fn edge(&self) -> Option<NeatEdge> {
        self.is_valid()
            .then(|| NeatEdge::new(self.weight, self.target))
    }
}

/// Dimensions of a packed population.
///
/// Derived from aggregate maxima only, so it does not depend on graph order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureShape {
    /// Number of graphs.
    pub graph_count: usize,
    /// Node slots per graph.
    pub max_nodes: usize,
    /// Edge slots per node.
    pub max_out_edges: usize,
}

impl TextureShape {
    /// Create a shape from explicit dimensions.
    #[must_use]
    pub const fn new(graph_count: usize, max_nodes: usize, max_out_edges: usize) -> Self {
        Self {
            graph_count,
            max_nodes,
            max_out_edges,
        }
    }

    /// Shape implied by a population's aggregate figures.
    #[must_use]
    pub const fn from_stats(stats: &PopulationStats) -> Self {
        Self::new(stats.graph_count, stats.max_nodes, stats.max_out_edges)
    }

    /// Node slots reserved for each graph.
    #[inline]
    #[must_use]
    pub const fn nodes_per_graph(&self) -> usize {
        self.max_nodes
    }

    /// Edge slots reserved for each graph. Saturates at `usize::MAX`.
    #[inline]
    #[must_use]
    pub const fn edges_per_graph(&self) -> usize {
        self.max_nodes.saturating_mul(self.max_out_edges)
    }

    /// Total node slots: `graph_count × max_nodes`. Saturates at `usize::MAX`.
    #[inline]
    #[must_use]
    pub const fn node_capacity(&self) -> usize {
        self.graph_count.saturating_mul(self.max_nodes)
    }

    /// Total edge slots: `graph_count × max_nodes × max_out_edges`.
    /// Saturates at `usize::MAX`.
    #[inline]
    #[must_use]
    pub const fn edge_capacity(&self) -> usize {
        self.graph_count.saturating_mul(self.edges_per_graph())
    }

    /// Node and edge capacities, checked for overflow.
    ///
    /// Every index helper on a shape that passes this check stays in range of
    /// `usize`, so textures are only ever built from checked shapes.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::ShapeOverflow`] if either capacity does not fit
    /// in `usize`.
    pub fn checked_capacities(&self) -> Result<(usize, usize)> {
        let overflow = PackError::ShapeOverflow {
            graph_count: self.graph_count,
            max_nodes: self.max_nodes,
            max_out_edges: self.max_out_edges,
        };
        let Some(nodes) = self.graph_count.checked_mul(self.max_nodes) else {
            return Err(overflow);
        };
        let Some(per_graph) = self.max_nodes.checked_mul(self.max_out_edges) else {
            return Err(overflow);
        };
        let Some(edges) = self.graph_count.checked_mul(per_graph) else {
            return Err(overflow);
        };
        Ok((nodes, edges))
    }

    /// Flat node-buffer index of `(graph, node)`, `None` if out of range.
    #[inline]
    #[must_use]
    pub const fn node_index(&self, graph: usize, node: usize) -> Option<usize> {
        if graph < self.graph_count && node < self.max_nodes {
            Some(graph * self.max_nodes + node)
        } else {
            None
        }
    }

    /// Flat edge-buffer index of `(graph, node, slot)`, `None` if out of range.
    #[inline]
    #[must_use]
    pub const fn edge_index(&self, graph: usize, node: usize, slot: usize) -> Option<usize> {
        match self.node_index(graph, node) {
            Some(node_slot) if slot < self.max_out_edges => {
                Some(node_slot * self.max_out_edges + slot)
            }
            _ => None,
        }
    }

    /// 2D atlas placement of this shape for image-backed textures.
    #[must_use]
    pub fn atlas(&self) -> AtlasLayout {
        AtlasLayout::new(self)
    }
}

/// The encoder's output: node and edge buffers plus their shape.
#[derive(Debug, Clone, PartialEq)]
pub struct NeatTextures {
    shape: TextureShape,
    nodes: Vec<NodeTexel>,
    edges: Vec<EdgeTexel>,
}

impl NeatTextures {
    /// Buffers filled entirely with padding.
    pub(crate) fn padded(shape: TextureShape) -> Result<Self> {
        let (node_capacity, edge_capacity) = shape.checked_capacities()?;
        Ok(Self {
            shape,
            nodes: vec![NodeTexel::PADDING; node_capacity],
            edges: vec![EdgeTexel::PADDING; edge_capacity],
        })
    }

    /// Mutable access to both buffers, for the encoder's per-graph writes.
    pub(crate) fn buffers_mut(&mut self) -> (&mut [NodeTexel], &mut [EdgeTexel]) {
        (&mut self.nodes, &mut self.edges)
    }

    /// Reassemble textures from raw buffers, e.g. after a GPU readback.
    ///
    /// # Errors
    ///
    /// - [`PackError::ShapeOverflow`] if the capacities of `shape` overflow;
    /// - [`PackError::ShapeMismatch`] if either buffer length disagrees with
    ///   the capacity implied by `shape`.
    pub fn from_parts(
        shape: TextureShape,
        nodes: Vec<NodeTexel>,
        edges: Vec<EdgeTexel>,
    ) -> Result<Self> {
        let (node_capacity, edge_capacity) = shape.checked_capacities()?;
        if nodes.len() != node_capacity {
            return Err(PackError::ShapeMismatch {
                buffer: "node",
                expected: node_capacity,
                actual: nodes.len(),
            });
        }
        if edges.len() != edge_capacity {
            return Err(PackError::ShapeMismatch {
                buffer: "edge",
                expected: edge_capacity,
                actual: edges.len(),
            });
        }
        Ok(Self {
            shape,
            nodes,
            edges,
        })
    }

    /// Split into shape and raw buffers.
    #[must_use]
    pub fn into_parts(self) -> (TextureShape, Vec<NodeTexel>, Vec<EdgeTexel>) {
        (self.shape, self.nodes, self.edges)
    }

    /// Shape the buffers were laid out with.
    #[inline]
    #[must_use]
    pub const fn shape(&self) -> TextureShape {
        self.shape
    }

    /// The whole node buffer, indexed by [`TextureShape::node_index`].
    #[inline]
    #[must_use]
    pub fn node_data(&self) -> &[NodeTexel] {
        &self.nodes
    }

    /// The whole edge buffer, indexed by [`TextureShape::edge_index`].
    #[inline]
    #[must_use]
    pub fn edge_data(&self) -> &[EdgeTexel] {
        &self.edges
    }

    /// Node buffer as raw bytes, ready for upload (24 bytes per slot).
    #[must_use]
    pub fn node_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.nodes)
    }

    /// Edge buffer as raw bytes, ready for upload (8 bytes per slot).
    #[must_use]
    pub fn edge_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.edges)
    }

    /// The slot for `(graph, node)`.
    #[must_use]
    pub fn node(&self, graph: usize, node: usize) -> Option<&NodeTexel> {
        self.shape
            .node_index(graph, node)
            .map(|idx| &self.nodes[idx])
    }

    /// The slot for `(graph, node, slot)`.
    #[must_use]
    pub fn edge(&self, graph: usize, node: usize, slot: usize) -> Option<&EdgeTexel> {
        self.shape
            .edge_index(graph, node, slot)
            .map(|idx| &self.edges[idx])
    }

    /// All node slots of one graph, padding included.
    #[must_use]
    pub fn graph_nodes(&self, graph: usize) -> Option<&[NodeTexel]> {
        (graph < self.shape.graph_count).then(|| {
            let start = graph * self.shape.nodes_per_graph();
            &self.nodes[start..start + self.shape.nodes_per_graph()]
        })
    }

    /// All edge slots of one node slot, padding included.
    #[must_use]
    pub fn node_edges(&self, graph: usize, node: usize) -> Option<&[EdgeTexel]> {
        self.shape.node_index(graph, node).map(|node_slot| {
            let start = node_slot * self.shape.max_out_edges;
            &self.edges[start..start + self.shape.max_out_edges]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texel_sizes() {
        assert_eq!(std::mem::size_of::<NodeTexel>(), 24);
        assert_eq!(std::mem::size_of::<EdgeTexel>(), 8);
    }

    #[test]
    fn test_padding_is_recognised() {
        assert!(!NodeTexel::PADDING.is_valid());
        assert!(NodeTexel::PADDING.activation().is_none());
        assert!(!EdgeTexel::PADDING.is_valid());
        assert!(EdgeTexel::PADDING.edge().is_none());

        // A zero-weight self-loop is a real edge, distinct from padding.
        let real = EdgeTexel::real(&NeatEdge::new(0.0, 0));
        assert!(real.is_valid());
        assert_ne!(real, EdgeTexel::PADDING);
    }

    #[test]
    fn test_address_arithmetic() {
        let shape = TextureShape::new(3, 4, 2);
        assert_eq!(shape.node_capacity(), 12);
        assert_eq!(shape.edge_capacity(), 24);

        assert_eq!(shape.node_index(0, 0), Some(0));
        assert_eq!(shape.node_index(2, 3), Some(11));
        assert_eq!(shape.node_index(3, 0), None);
        assert_eq!(shape.node_index(0, 4), None);

        assert_eq!(shape.edge_index(1, 2, 1), Some((4 + 2) * 2 + 1));
        assert_eq!(shape.edge_index(1, 2, 2), None);
    }

    #[test]
    fn test_graph_ranges_are_disjoint() {
        let shape = TextureShape::new(5, 3, 2);
        let mut seen = vec![false; shape.edge_capacity()];
        for g in 0..shape.graph_count {
            for n in 0..shape.max_nodes {
                for k in 0..shape.max_out_edges {
                    let idx = shape.edge_index(g, n, k).unwrap();
                    assert!(!seen[idx], "slot {idx} aliased");
                    seen[idx] = true;
                    let lo = g * shape.edges_per_graph();
                    assert!((lo..lo + shape.edges_per_graph()).contains(&idx));
                }
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_from_parts_checks_lengths() {
        let shape = TextureShape::new(2, 2, 1);
        let ok = NeatTextures::from_parts(
            shape,
            vec![NodeTexel::PADDING; 4],
            vec![EdgeTexel::PADDING; 4],
        );
        assert!(ok.is_ok());

        let err = NeatTextures::from_parts(
            shape,
            vec![NodeTexel::PADDING; 4],
            vec![EdgeTexel::PADDING; 3],
        )
        .unwrap_err();
        assert_eq!(
            err,
            PackError::ShapeMismatch {
                buffer: "edge",
                expected: 4,
                actual: 3,
            }
        );
    }

    #[test]
    fn test_overflowing_shape_is_rejected() {
        let shape = TextureShape::new(1 << (usize::BITS - 1), 2, 1);
        let expected = PackError::ShapeOverflow {
            graph_count: 1 << (usize::BITS - 1),
            max_nodes: 2,
            max_out_edges: 1,
        };
        assert_eq!(shape.checked_capacities().unwrap_err(), expected);
        assert_eq!(
            NeatTextures::from_parts(shape, Vec::new(), Vec::new()).unwrap_err(),
            expected
        );

        // edge slots per graph overflow even when there are no graphs
        let empty = TextureShape::new(0, usize::MAX, 2);
        assert!(matches!(
            NeatTextures::from_parts(empty, Vec::new(), Vec::new()),
            Err(PackError::ShapeOverflow { .. })
        ));

        assert_eq!(shape.node_capacity(), usize::MAX);
        assert_eq!(TextureShape::new(3, 4, 2).checked_capacities(), Ok((12, 24)));
    }

    #[test]
    fn test_byte_views() {
        let textures = NeatTextures::padded(TextureShape::new(2, 3, 2)).unwrap();
        assert_eq!(textures.node_bytes().len(), 6 * 24);
        assert_eq!(textures.edge_bytes().len(), 12 * 8);
        assert!(textures.graph_nodes(1).is_some_and(|n| n.len() == 3));
        assert!(textures.graph_nodes(2).is_none());
        assert!(textures.node_edges(1, 2).is_some_and(|e| e.len() == 2));
    }
}
