//! Population container.
//!
//! A [`NeatPopulation`] is one generation's snapshot of genomes. It exposes no
//! mutable access: the evolutionary loop builds a new population for every
//! generation and hands it to the encoder by shared reference.

use serde::{Deserialize, Serialize};

use crate::graph::NeatGraph;

/// Ordered, immutable collection of graphs of possibly different shapes.
///
/// An empty population is a valid container; the encoder rejects it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NeatPopulation {
    graphs: Vec<NeatGraph>,
}

/// Aggregate shape figures of a population.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationStats {
    /// Number of graphs.
    pub graph_count: usize,
    /// Largest node count of any graph.
    pub max_nodes: usize,
    /// Largest outgoing-edge count of any node in any graph.
    pub max_out_edges: usize,
    /// Nodes summed over all graphs.
    pub total_nodes: usize,
    /// Edges summed over all graphs.
    pub total_edges: usize,
    /// Graphs containing at least one cycle.
    pub recurrent_graphs: usize,
}

impl NeatPopulation {
    /// Wrap a list of graphs.
    #[must_use]
    pub fn new(graphs: Vec<NeatGraph>) -> Self {
        Self { graphs }
    }

    /// Number of graphs.
    #[inline]
    #[must_use]
    pub fn graph_count(&self) -> usize {
        self.graphs.len()
    }

    /// Whether the population holds no graphs.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    /// The graph at `index`, if any.
    #[inline]
    #[must_use]
    pub fn graph(&self, index: usize) -> Option<&NeatGraph> {
        self.graphs.get(index)
    }

    /// All graphs in order.
    #[inline]
    #[must_use]
    pub fn graphs(&self) -> &[NeatGraph] {
        &self.graphs
    }

    /// Iterate over graphs in order.
    pub fn iter(&self) -> std::slice::Iter<'_, NeatGraph> {
        self.graphs.iter()
    }

    /// Compute aggregate maxima and totals in a single pass.
    ///
    /// Recurrence detection builds a topology per graph, so this is O(N + E).
    #[must_use]
    pub fn stats(&self) -> PopulationStats {
        self.graphs
            .iter()
            .fold(
                PopulationStats {
                    graph_count: self.graphs.len(),
                    ..PopulationStats::default()
                },
                |mut stats, graph| {
                    stats.max_nodes = stats.max_nodes.max(graph.node_count());
                    stats.max_out_edges = stats.max_out_edges.max(graph.max_out_degree());
                    stats.total_nodes += graph.node_count();
                    stats.total_edges += graph.edge_count();
                    if graph.is_recurrent() {
                        stats.recurrent_graphs += 1;
                    }
                    stats
                },
            )
    }
}

impl From<Vec<NeatGraph>> for NeatPopulation {
    fn from(graphs: Vec<NeatGraph>) -> Self {
        Self::new(graphs)
    }
}

impl FromIterator<NeatGraph> for NeatPopulation {
    fn from_iter<I: IntoIterator<Item = NeatGraph>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a NeatPopulation {
    type Item = &'a NeatGraph;
    type IntoIter = std::slice::Iter<'a, NeatGraph>;

    fn into_iter(self) -> Self::IntoIter {
        self.graphs.iter()
    }
}
