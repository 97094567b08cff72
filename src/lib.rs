//! # Symbios Texture
//!
//! Packs a population of topology-evolving neural networks into fixed-stride
//! buffers ("textures") for uniform, massively parallel evaluation.
//!
//! Every genome in a NEAT population has its own shape: different node counts,
//! different fan-out, recurrent links. Parallel hardware wants the opposite:
//! one stride, index arithmetic, no pointers. This crate reconciles the two
//! without losing a single bit of node or edge data.
//!
//! ## Features
//!
//! - **Universal Activation**: every node carries the five coefficients of a
//!   parametric activation, so all nodes pack to the same size
//! - **Index-Based Graphs**: edges reference nodes by position, so cycles and
//!   self-loops need no special handling
//! - **Padded Texture Layout**: per-graph slot ranges sized by the population's
//!   maxima, with unambiguous no-op padding
//! - **Lock-Free Parallel Packing**: graphs write to disjoint chunks via rayon
//! - **Exact Decoding**: textures unpack back into the original population
//!
//! ## Quick Start
//!
//! ```rust
//! use symbios_texture::{
//!     population_to_textures, NeatEdge, NeatGraph, NeatNode, NeatPopulation, UafActivation,
//! };
//!
//! let act = UafActivation::new(1.0, 1.0, 1.0, 1.0, 100.0);
//! let population = NeatPopulation::new(vec![
//!     NeatGraph::new(vec![
//!         NeatNode::new(act, vec![NeatEdge::new(1.0, 0)]),
//!         NeatNode::new(act, vec![NeatEdge::new(1.0, 1)]),
//!     ])?,
//!     NeatGraph::new(vec![NeatNode::new(act, vec![NeatEdge::new(1.0, 0)])])?,
//! ]);
//!
//! let textures = population_to_textures(&population)?;
//! assert_eq!(textures.shape().max_nodes, 2);
//! assert_eq!(textures.node_data().len(), 2 * 2);
//! assert!(!textures.node(1, 1).unwrap().is_valid()); // padding
//! # Ok::<(), symbios_texture::PackError>(())
//! ```
//!
//! ## Layout
//!
//! For a population of `G` graphs with at most `N` nodes per graph and at most
//! `E` outgoing edges per node:
//!
//! - node buffer: `G × N` [`NodeTexel`]s, slot `g·N + n`
//! - edge buffer: `G × N × E` [`EdgeTexel`]s, slot `(g·N + n)·E + k`
//!
//! Node slot `n` is always the node's original index, so edge targets are
//! copied verbatim. Padding nodes have `valid == 0`; padding edges have weight
//! `0.0` and target [`INVALID_TARGET`].

pub mod activation;
pub mod decode;
pub mod encoder;
pub mod error;
pub mod gene;
pub mod graph;
pub mod layout;
pub mod lookup;
pub mod population;
pub mod texture;
pub mod topology;

// Re-exports for convenience
pub use activation::{UafActivation, UAF_PARAM_COUNT};
pub use decode::textures_to_population;
pub use encoder::{population_to_textures, PackConfig, TextureEncoder};
pub use error::{PackError, Result};
pub use gene::{NeatEdge, NeatNode};
pub use graph::NeatGraph;
pub use layout::{pack_2d, AtlasLayout};
pub use lookup::{ActivationTable, NamedActivation, TableRow};
pub use population::{NeatPopulation, PopulationStats};
pub use texture::{EdgeTexel, NeatTextures, NodeTexel, TextureShape, INVALID_TARGET};
pub use topology::GraphTopology;
