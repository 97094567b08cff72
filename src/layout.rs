//! 2D atlas placement for image-backed textures.
//!
//! GPU images are two-dimensional and limited in width, so a long linear node
//! buffer is folded into a near-square atlas: the population is laid out as a
//! grid of per-graph *fields*, and each field holds one graph's node slots in
//! row-major order. Edge slot `k` of every node lives in layer `k` of a layered
//! image at the same `(x, y)` as its node.

use crate::texture::{EdgeTexel, NeatTextures, NodeTexel, TextureShape};

/// Fold `elements` cells into a near-square `(width, height)` rectangle.
///
/// Starts from the smallest square that fits and removes whole rows that
/// would stay empty. `pack_2d(0)` is `(0, 0)`.
#[must_use]
pub fn pack_2d(elements: usize) -> (usize, usize) {
    let side = ceil_sqrt(elements);
    if side == 0 {
        return (0, 0);
    }
    let excess = side * side - elements;
    let rows_to_remove = excess / side;
    (side, side - rows_to_remove)
}

/// Smallest `s` with `s * s >= n`.
fn ceil_sqrt(n: usize) -> usize {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let mut s = (n as f64).sqrt() as usize;
    // correct for float rounding in either direction
    while s > 0 && (s - 1).saturating_mul(s - 1) >= n {
        s -= 1;
    }
    while s.saturating_mul(s) < n {
        s += 1;
    }
    s
}

/// Where each `(graph, node)` slot lands in a 2D atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasLayout {
    /// Fields per atlas row.
    pub population_width: usize,
    /// Field rows.
    pub population_height: usize,
    /// Node cells per field row.
    pub field_width: usize,
    /// Node cell rows per field.
    pub field_height: usize,
    /// Edge layers (one per edge slot).
    pub layers: usize,
    shape: TextureShape,
}

impl AtlasLayout {
    /// Layout for a texture shape.
    #[must_use]
    pub fn new(shape: &TextureShape) -> Self {
        let (population_width, population_height) = pack_2d(shape.graph_count);
        let (field_width, field_height) = pack_2d(shape.max_nodes);
        Self {
            population_width,
            population_height,
            field_width,
            field_height,
            layers: shape.max_out_edges,
            shape: *shape,
        }
    }

    /// Atlas size in cells: `(width, height)`.
    #[must_use]
    pub const fn extent(&self) -> (usize, usize) {
        (
            self.population_width * self.field_width,
            self.population_height * self.field_height,
        )
    }

    /// Atlas cell of `(graph, node)`, `None` if out of range.
    #[must_use]
    pub fn node_coords(&self, graph: usize, node: usize) -> Option<(usize, usize)> {
        self.shape.node_index(graph, node)?;
        let field_x = (graph % self.population_width) * self.field_width;
        let field_y = (graph / self.population_width) * self.field_height;
        Some((
            field_x + node % self.field_width,
            field_y + node / self.field_width,
        ))
    }

    /// Atlas cell and layer of `(graph, node, slot)`, `None` if out of range.
    #[must_use]
    pub fn edge_coords(&self, graph: usize, node: usize, slot: usize) -> Option<(usize, usize, usize)> {
        self.shape.edge_index(graph, node, slot)?;
        let (x, y) = self.node_coords(graph, node)?;
        Some((x, y, slot))
    }

    /// Node buffer rearranged into row-major atlas order.
    ///
    /// Cells not covered by any slot hold [`NodeTexel::PADDING`].
    #[must_use]
    pub fn arrange_nodes(&self, textures: &NeatTextures) -> Vec<NodeTexel> {
        let (width, height) = self.extent();
        let mut cells = vec![NodeTexel::PADDING; width * height];
        for graph in 0..self.shape.graph_count {
            for node in 0..self.shape.max_nodes {
                if let (Some((x, y)), Some(texel)) =
                    (self.node_coords(graph, node), textures.node(graph, node))
                {
                    cells[y * width + x] = *texel;
                }
            }
        }
        cells
    }

    /// Edge buffer rearranged into layer-major atlas order.
    ///
    /// Layer `k` is a full atlas image holding edge slot `k` of every node.
    #[must_use]
    pub fn arrange_edges(&self, textures: &NeatTextures) -> Vec<EdgeTexel> {
        let (width, height) = self.extent();
        let layer_size = width * height;
        let mut cells = vec![EdgeTexel::PADDING; layer_size * self.layers];
        for graph in 0..self.shape.graph_count {
            for node in 0..self.shape.max_nodes {
                for slot in 0..self.layers {
                    if let (Some((x, y, layer)), Some(texel)) = (
                        self.edge_coords(graph, node, slot),
                        textures.edge(graph, node, slot),
                    ) {
                        cells[layer * layer_size + y * width + x] = *texel;
                    }
                }
            }
        }
        cells
    }
}
