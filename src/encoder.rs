//! Population → texture encoding.
//!
//! [`TextureEncoder`] turns a [`NeatPopulation`] into [`NeatTextures`]:
//!
//! 1. compute `max_nodes`, `max_out_edges` and `graph_count`;
//! 2. allocate padding-filled node and edge buffers of the implied capacity;
//! 3. write every graph into its own slot range, node `i` at node slot `i`
//!    and its edges in their original order.
//!
//! Indices are never translated, so an edge's target is already a valid node
//! slot within the same graph's range. Graph ranges are disjoint, which lets
//! the parallel path hand each graph's chunk to a separate rayon task
//! without any locking.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::{PackError, Result};
use crate::graph::NeatGraph;
use crate::population::NeatPopulation;
use crate::texture::{EdgeTexel, NeatTextures, NodeTexel, TextureShape};

/// Encoder configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackConfig {
    /// Whether to write graphs in parallel.
    pub parallel: bool,
    /// Minimum number of graphs before the parallel path is taken.
    pub parallel_threshold: usize,
    /// Fraction of padding slots above which a warning is logged.
    pub padding_warn_ratio: f32,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_threshold: 64,
            padding_warn_ratio: 0.9,
        }
    }
}

impl PackConfig {
    /// Always encode on the calling thread.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Default::default()
        }
    }

    /// Always encode in parallel, regardless of population size.
    #[must_use]
    pub fn parallel() -> Self {
        Self {
            parallel: true,
            parallel_threshold: 0,
            ..Default::default()
        }
    }
}

/// Packs populations into fixed-stride textures.
///
/// Stateless apart from its configuration: encoding the same population twice
/// yields bit-identical buffers, whichever path is taken.
#[derive(Debug, Clone, Default)]
pub struct TextureEncoder {
    config: PackConfig,
}

impl TextureEncoder {
    /// Create an encoder with the given configuration.
    #[must_use]
    pub fn new(config: PackConfig) -> Self {
        Self { config }
    }

    /// Configuration this encoder packs with.
    #[must_use]
    pub fn config(&self) -> &PackConfig {
        &self.config
    }

    /// Encode a population.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::EmptyPopulation`] if the population has no graphs,
    /// [`PackError::DegenerateGraph`] for the first graph without nodes, and
    /// [`PackError::ShapeOverflow`] if the padded buffers cannot be addressed.
    pub fn encode(&self, population: &NeatPopulation) -> Result<NeatTextures> {
        if population.is_empty() {
            return Err(PackError::EmptyPopulation);
        }
        if let Some(graph) = population.iter().position(NeatGraph::is_empty) {
            return Err(PackError::DegenerateGraph { graph });
        }

        let stats = population.stats();
        let shape = TextureShape::from_stats(&stats);
        debug!(
            graphs = shape.graph_count,
            max_nodes = shape.max_nodes,
            max_out_edges = shape.max_out_edges,
            recurrent = stats.recurrent_graphs,
            "packing population"
        );

        let (node_capacity, _) = shape.checked_capacities()?;
        #[allow(clippy::cast_precision_loss)]
        let padding_ratio = 1.0 - stats.total_nodes as f32 / node_capacity as f32;
        if padding_ratio > self.config.padding_warn_ratio {
            warn!(
                padding_ratio,
                total_nodes = stats.total_nodes,
                node_capacity,
                "node texture is mostly padding; one oversized graph dominates the shape"
            );
        }

        let mut textures = NeatTextures::padded(shape)?;
        let (nodes, edges) = textures.buffers_mut();
        let graphs = population.graphs();

        let node_chunk = shape.nodes_per_graph();
        let edge_chunk = shape.edges_per_graph();

        if self.config.parallel && graphs.len() >= self.config.parallel_threshold {
            trace!("writing graphs in parallel");
            if edge_chunk == 0 {
                nodes
                    .par_chunks_mut(node_chunk)
                    .zip(graphs.par_iter())
                    .for_each(|(node_slots, graph)| {
                        write_graph(graph, &shape, node_slots, &mut []);
                    });
            } else {
                nodes
                    .par_chunks_mut(node_chunk)
                    .zip(edges.par_chunks_mut(edge_chunk))
                    .zip(graphs.par_iter())
                    .for_each(|((node_slots, edge_slots), graph)| {
                        write_graph(graph, &shape, node_slots, edge_slots);
                    });
            }
        } else {
            for (index, graph) in graphs.iter().enumerate() {
                let node_slots = &mut nodes[index * node_chunk..(index + 1) * node_chunk];
                let edge_slots = &mut edges[index * edge_chunk..(index + 1) * edge_chunk];
                write_graph(graph, &shape, node_slots, edge_slots);
            }
        }

        Ok(textures)
    }
}

/// Pack a population with the default configuration.
///
/// # Errors
///
/// See [`TextureEncoder::encode`].
pub fn population_to_textures(population: &NeatPopulation) -> Result<NeatTextures> {
    TextureEncoder::default().encode(population)
}

/// Write one graph into its own, padding-initialised slot range.
///
/// `node_slots` holds `max_nodes` slots and `edge_slots` holds
/// `max_nodes × max_out_edges` slots; both belong to this graph only.
fn write_graph(
    graph: &NeatGraph,
    shape: &TextureShape,
    node_slots: &mut [NodeTexel],
    edge_slots: &mut [EdgeTexel],
) {
    for (index, node) in graph.iter().enumerate() {
        node_slots[index] = NodeTexel::real(&node.activation);

        let base = index * shape.max_out_edges;
        for (slot, edge) in node.edges.iter().enumerate() {
            edge_slots[base + slot] = EdgeTexel::real(edge);
        }
    }
    trace!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "graph packed"
    );
}
