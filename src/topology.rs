//! Graph topology analysis using CSR format.
//!
//! [`GraphTopology`] snapshots a graph's edges into Compressed Sparse Row
//! arrays, forward (outgoing) and reverse (incoming), so structural queries run
//! over contiguous memory instead of per-node `Vec`s.
//!
//! Edges keep the order in which they appear in the graph (node order, then
//! edge order within a node), so every query is deterministic.

use std::collections::VecDeque;

use crate::graph::NeatGraph;

/// CSR-format snapshot of a graph's connectivity.
///
/// Parallel edges appear once per edge; self-loops appear in both the forward
/// and reverse lists of their node.
#[derive(Debug, Clone)]
pub struct GraphTopology {
    /// Number of nodes in the graph.
    node_count: usize,
    /// CSR offsets for forward edges (outgoing). Length = node_count + 1.
    fwd_offsets: Vec<usize>,
    /// fwd_targets[fwd_offsets[i]..fwd_offsets[i+1]] are successors of node i.
    fwd_targets: Vec<usize>,
    /// CSR offsets for reverse edges (incoming). Length = node_count + 1.
    rev_offsets: Vec<usize>,
    /// rev_sources[rev_offsets[i]..rev_offsets[i+1]] are predecessors of node i.
    rev_sources: Vec<usize>,
}

impl GraphTopology {
    /// Build the topology of a validated graph.
    #[must_use]
    pub fn from_graph(graph: &NeatGraph) -> Self {
        let node_count = graph.node_count();

        // Outgoing edges are already grouped by source, so forward offsets
        // are a prefix sum of out-degrees.
        let mut fwd_offsets = Vec::with_capacity(node_count + 1);
        fwd_offsets.push(0);
        let mut fwd_targets = Vec::with_capacity(graph.edge_count());
        let mut rev_counts = vec![0usize; node_count];

        for node in graph {
            for edge in &node.edges {
                let to = edge.target as usize;
                fwd_targets.push(to);
                rev_counts[to] += 1;
            }
            fwd_offsets.push(fwd_targets.len());
        }

        let mut rev_offsets = Vec::with_capacity(node_count + 1);
        rev_offsets.push(0);
        let mut running = 0;
        for &count in &rev_counts {
            running += count;
            rev_offsets.push(running);
        }

        let mut rev_sources = vec![0usize; fwd_targets.len()];
        let mut rev_write_pos = rev_offsets[..node_count].to_vec();

        for from in 0..node_count {
            for &to in &fwd_targets[fwd_offsets[from]..fwd_offsets[from + 1]] {
                rev_sources[rev_write_pos[to]] = from;
                rev_write_pos[to] += 1;
            }
        }

        Self {
            node_count,
            fwd_offsets,
            fwd_targets,
            rev_offsets,
            rev_sources,
        }
    }

    /// Number of nodes in the topology.
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Number of edges in the topology.
    #[inline]
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.fwd_targets.len()
    }

    /// Iterate over successors of a node (forward edges).
    ///
    /// # Panics
    ///
    /// Panics if `idx >= node_count()`.
    #[inline]
    pub fn successors(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        let start = self.fwd_offsets[idx];
        let end = self.fwd_offsets[idx + 1];
        self.fwd_targets[start..end].iter().copied()
    }

    /// Iterate over predecessors of a node (reverse edges).
    ///
    /// # Panics
    ///
    /// Panics if `idx >= node_count()`.
    #[inline]
    pub fn predecessors(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        let start = self.rev_offsets[idx];
        let end = self.rev_offsets[idx + 1];
        self.rev_sources[start..end].iter().copied()
    }

    /// Number of incoming edges of a node.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= node_count()`.
    #[inline]
    #[must_use]
    pub fn in_degree(&self, idx: usize) -> usize {
        self.rev_offsets[idx + 1] - self.rev_offsets[idx]
    }

    /// Detect if the graph contains any cycle using Kahn's algorithm.
    ///
    /// Self-loops count as cycles.
    #[must_use]
    pub fn has_cycle(&self) -> bool {
        self.topological_order().is_none()
    }

    /// Node indices in topological order, or `None` if the graph has cycles.
    ///
    /// Ties are broken by node index, so the order is deterministic.
    #[must_use]
    pub fn topological_order(&self) -> Option<Vec<usize>> {
        let mut in_degree: Vec<usize> = (0..self.node_count).map(|i| self.in_degree(i)).collect();

        let mut queue: VecDeque<usize> = in_degree
            .iter()
            .enumerate()
            .filter(|&(_, &deg)| deg == 0)
            .map(|(idx, _)| idx)
            .collect();

        let mut order = Vec::with_capacity(self.node_count);
        while let Some(u) = queue.pop_front() {
            order.push(u);
            for v in self.successors(u) {
                in_degree[v] -= 1;
                if in_degree[v] == 0 {
                    queue.push_back(v);
                }
            }
        }

        if order.len() == self.node_count {
            Some(order)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::UafActivation;
    use crate::gene::{NeatEdge, NeatNode};

    fn node(targets: &[u32]) -> NeatNode {
        NeatNode::new(
            UafActivation::new(1.0, 0.0, 0.0, 0.0, 0.0),
            targets.iter().map(|&t| NeatEdge::new(1.0, t)).collect(),
        )
    }

    #[test]
    fn test_topology_basic() {
        // 0 -> 1, 0 -> 2, 1 -> 2, 1 -> 2 (parallel)
        let graph =
            NeatGraph::new(vec![node(&[1, 2]), node(&[2, 2]), node(&[])]).unwrap();
        let topo = GraphTopology::from_graph(&graph);

        assert_eq!(topo.node_count(), 3);
        assert_eq!(topo.edge_count(), 4);
        assert_eq!(topo.successors(0).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(topo.predecessors(2).collect::<Vec<_>>(), vec![0, 1, 1]);
        assert_eq!(topo.in_degree(0), 0);
        assert_eq!(topo.in_degree(2), 3);
        assert!(!topo.has_cycle());
    }

    #[test]
    fn test_topological_order() {
        // 2 -> 0 -> 1
        let graph = NeatGraph::new(vec![node(&[1]), node(&[]), node(&[0])]).unwrap();
        let order = graph.topology().topological_order().expect("acyclic");
        assert_eq!(order, vec![2, 0, 1]);
    }

    #[test]
    fn test_cycles_detected() {
        let self_loop = NeatGraph::new(vec![node(&[0])]).unwrap();
        assert!(self_loop.topology().has_cycle());
        assert!(self_loop.topology().topological_order().is_none());

        let ring = NeatGraph::new(vec![node(&[1]), node(&[2]), node(&[0])]).unwrap();
        assert!(ring.topology().has_cycle());
        assert_eq!(ring.topology().predecessors(0).collect::<Vec<_>>(), vec![2]);
    }
}
