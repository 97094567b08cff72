//! Texture → population decoding.
//!
//! Decoding scans each graph's slot range, keeps real slots and drops padding.
//! Because the encoder never translates indices, the recovered nodes and edges
//! are bit-identical to the ones that were packed.
//!
//! The decoder also checks the padding layout. Real nodes must fill a prefix
//! of the graph's node slots, real edges a prefix of the node's edge slots,
//! and padding node slots may only carry padding edges. Anything else means
//! the buffers were not produced by the encoder (or were damaged on the way
//! back from the device) and is reported as [`PackError::CorruptTexture`].

use crate::error::{PackError, Result};
use crate::gene::{NeatEdge, NeatNode};
use crate::graph::NeatGraph;
use crate::population::NeatPopulation;
use crate::texture::{EdgeTexel, NeatTextures, NodeTexel};

/// Rebuild the population a texture was packed from.
///
/// # Errors
///
/// - [`PackError::EmptyPopulation`] if the texture holds no graphs;
/// - [`PackError::DegenerateGraph`] if a graph has no real node;
/// - [`PackError::CorruptTexture`] if padding and real slots are interleaved;
/// - [`PackError::InvalidReference`] if a real edge targets a missing node.
pub fn textures_to_population(textures: &NeatTextures) -> Result<NeatPopulation> {
    let shape = textures.shape();
    if shape.graph_count == 0 {
        return Err(PackError::EmptyPopulation);
    }

    (0..shape.graph_count)
        .map(|graph| decode_graph(textures, graph))
        .collect::<Result<Vec<_>>>()
        .map(NeatPopulation::new)
}

fn decode_graph(textures: &NeatTextures, graph: usize) -> Result<NeatGraph> {
    let node_slots = textures
        .graph_nodes(graph)
        .ok_or(PackError::DegenerateGraph { graph })?;

    let node_count = node_slots
        .iter()
        .position(|texel| !texel.is_valid())
        .unwrap_or(node_slots.len());
    if node_count == 0 {
        return Err(PackError::DegenerateGraph { graph });
    }

    let mut nodes = Vec::with_capacity(node_count);
    for (node, texel) in node_slots.iter().enumerate() {
        let edge_slots = textures.node_edges(graph, node).unwrap_or(&[]);

        if node < node_count {
            nodes.push(decode_node(texel, edge_slots, graph, node)?);
        } else if texel.is_valid() {
            return Err(corrupt(graph, node, "real node slot after padding"));
        } else if edge_slots.iter().any(EdgeTexel::is_valid) {
            return Err(corrupt(graph, node, "padding node carries a real edge"));
        }
    }

    NeatGraph::new(nodes)
}

fn decode_node(
    texel: &NodeTexel,
    edge_slots: &[EdgeTexel],
    graph: usize,
    node: usize,
) -> Result<NeatNode> {
    let activation = texel
        .activation()
        .ok_or_else(|| corrupt(graph, node, "expected a real node"))?;

    let edge_count = edge_slots
        .iter()
        .position(|texel| !texel.is_valid())
        .unwrap_or(edge_slots.len());

    if edge_slots[edge_count..].iter().any(EdgeTexel::is_valid) {
        return Err(corrupt(graph, node, "real edge slot after padding"));
    }

    let edges: Vec<NeatEdge> = edge_slots[..edge_count]
        .iter()
        .filter_map(EdgeTexel::edge)
        .collect();

    Ok(NeatNode::new(activation, edges))
}

fn corrupt(graph: usize, node: usize, reason: &'static str) -> PackError {
    PackError::CorruptTexture {
        graph,
        node,
        reason,
    }
}
