//! Integration tests for symbios-texture.

use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use symbios_texture::{
    population_to_textures, textures_to_population, EdgeTexel, NeatEdge, NeatGraph, NeatNode,
    NeatPopulation, NeatTextures, NodeTexel, PackConfig, PackError, TextureEncoder, TextureShape,
    UafActivation, INVALID_TARGET,
};

/// A random population with recurrent links, parallel edges and edge-free nodes.
fn random_population(rng: &mut ChaCha8Rng, graphs: usize) -> NeatPopulation {
    (0..graphs)
        .map(|_| {
            let node_count = rng.random_range(1..=12u32);
            let nodes = (0..node_count)
                .map(|_| {
                    let activation = UafActivation::from_params(std::array::from_fn(|_| {
                        rng.random_range(-4.0..4.0)
                    }));
                    let edges = (0..rng.random_range(0..=5))
                        .map(|_| {
                            NeatEdge::new(rng.random_range(-2.0..2.0), rng.random_range(0..node_count))
                        })
                        .collect();
                    NeatNode::new(activation, edges)
                })
                .collect();
            NeatGraph::new(nodes).expect("targets drawn below node_count")
        })
        .collect()
}

fn assert_bit_identical(a: &NeatPopulation, b: &NeatPopulation) {
    assert_eq!(a.graph_count(), b.graph_count());
    for (ga, gb) in a.iter().zip(b.iter()) {
        assert_eq!(ga.node_count(), gb.node_count());
        for (na, nb) in ga.iter().zip(gb.iter()) {
            assert_eq!(
                na.activation.params().map(f32::to_bits),
                nb.activation.params().map(f32::to_bits)
            );
            assert_eq!(na.edges.len(), nb.edges.len());
            for (ea, eb) in na.edges.iter().zip(&nb.edges) {
                assert_eq!(ea.weight.to_bits(), eb.weight.to_bits());
                assert_eq!(ea.target, eb.target);
            }
        }
    }
}

#[test]
fn test_two_graph_scenario() {
    let act = UafActivation::new(1.0, 1.0, 1.0, 1.0, 100.0);
    let population = NeatPopulation::new(vec![
        NeatGraph::new(vec![
            NeatNode::new(act, vec![NeatEdge::new(1.0, 0)]),
            NeatNode::new(act, vec![NeatEdge::new(1.0, 1)]),
        ])
        .unwrap(),
        NeatGraph::new(vec![NeatNode::new(act, vec![NeatEdge::new(1.0, 0)])]).unwrap(),
    ]);

    let textures = population_to_textures(&population).unwrap();
    let shape = textures.shape();
    assert_eq!(shape.graph_count, 2);
    assert_eq!(shape.max_nodes, 2);
    assert_eq!(shape.max_out_edges, 1);
    assert_eq!(textures.node_data().len(), 2 * 2);
    assert_eq!(textures.edge_data().len(), 2 * 2 * 1);

    assert!(textures.node(1, 0).unwrap().is_valid());
    assert_eq!(*textures.node(1, 1).unwrap(), NodeTexel::PADDING);
    assert_eq!(*textures.edge(1, 1, 0).unwrap(), EdgeTexel::PADDING);
    assert_eq!(textures.edge(1, 1, 0).unwrap().target, INVALID_TARGET);
}

#[test]
fn test_rejections() {
    let act = UafActivation::new(0.0, 0.0, 0.0, 0.0, 0.0);

    assert_eq!(
        population_to_textures(&NeatPopulation::new(Vec::new())).unwrap_err(),
        PackError::EmptyPopulation
    );

    let degenerate = NeatPopulation::new(vec![NeatGraph::new(Vec::new()).unwrap()]);
    assert_eq!(
        population_to_textures(&degenerate).unwrap_err(),
        PackError::DegenerateGraph { graph: 0 }
    );

    let err = NeatGraph::new(vec![NeatNode::new(act, vec![NeatEdge::new(1.0, 1)])]).unwrap_err();
    assert!(matches!(
        err,
        PackError::InvalidReference {
            target: 1,
            node_count: 1,
            ..
        }
    ));
}

#[test]
fn test_shape_ignores_graph_order() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let population = random_population(&mut rng, 16);
    let reversed: NeatPopulation = population.iter().rev().cloned().collect();

    let a = population_to_textures(&population).unwrap();
    let b = population_to_textures(&reversed).unwrap();
    assert_eq!(a.shape(), b.shape());

    // graph g of one texture is graph (n - 1 - g) of the other
    let n = population.graph_count();
    let max_nodes = a.shape().max_nodes;
    for g in 0..n {
        assert_eq!(a.graph_nodes(g), b.graph_nodes(n - 1 - g));
        for node in 0..max_nodes {
            assert_eq!(a.node_edges(g, node), b.node_edges(n - 1 - g, node));
        }
    }
}

#[test]
fn test_padding_isolation() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let population = random_population(&mut rng, 24);
    let textures = population_to_textures(&population).unwrap();
    let (shape, mut nodes, mut edges) = textures.clone().into_parts();

    // Scribble over every padding slot without touching the markers.
    for texel in nodes.iter_mut().filter(|t| !t.is_valid()) {
        texel.params = [f32::NAN, 1.0e9, -3.0, 42.0, f32::INFINITY];
    }
    for texel in edges.iter_mut().filter(|t| !t.is_valid()) {
        texel.weight = 123.0;
    }

    let scribbled = NeatTextures::from_parts(shape, nodes, edges).unwrap();
    for (original, touched) in textures.node_data().iter().zip(scribbled.node_data()) {
        if original.is_valid() {
            assert_eq!(original, touched);
        }
    }
    let restored = textures_to_population(&scribbled).unwrap();
    assert_bit_identical(&population, &restored);
}

#[test]
fn test_large_population_parallel_matches_sequential() {
    let mut rng = ChaCha8Rng::seed_from_u64(1234);
    let population = random_population(&mut rng, 500);

    let sequential = TextureEncoder::new(PackConfig::sequential())
        .encode(&population)
        .unwrap();
    let parallel = TextureEncoder::new(PackConfig::parallel())
        .encode(&population)
        .unwrap();

    assert_eq!(sequential.node_bytes(), parallel.node_bytes());
    assert_eq!(sequential.edge_bytes(), parallel.edge_bytes());
}

#[test]
fn test_byte_layout() {
    let act = UafActivation::new(1.5, -2.0, 0.25, 3.0, -0.5);
    let population = NeatPopulation::new(vec![NeatGraph::new(vec![NeatNode::new(
        act,
        vec![NeatEdge::new(0.75, 0)],
    )])
    .unwrap()]);
    let textures = population_to_textures(&population).unwrap();

    let node_bytes = textures.node_bytes();
    assert_eq!(node_bytes.len(), 24);
    assert_eq!(&node_bytes[0..4], &1.5_f32.to_ne_bytes());
    assert_eq!(&node_bytes[16..20], &(-0.5_f32).to_ne_bytes());
    assert_eq!(&node_bytes[20..24], &1_u32.to_ne_bytes());

    let edge_bytes = textures.edge_bytes();
    assert_eq!(&edge_bytes[0..4], &0.75_f32.to_ne_bytes());
    assert_eq!(&edge_bytes[4..8], &0_u32.to_ne_bytes());
}

#[test]
fn test_atlas_places_every_real_node() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let population = random_population(&mut rng, 10);
    let textures = population_to_textures(&population).unwrap();
    let atlas = textures.shape().atlas();
    let (width, height) = atlas.extent();

    let cells = atlas.arrange_nodes(&textures);
    assert_eq!(cells.len(), width * height);

    let real_nodes: usize = population.iter().map(NeatGraph::node_count).sum();
    assert_eq!(cells.iter().filter(|c| c.is_valid()).count(), real_nodes);

    let layers = atlas.arrange_edges(&textures);
    let real_edges: usize = population.iter().map(NeatGraph::edge_count).sum();
    assert_eq!(layers.len(), width * height * textures.shape().max_out_edges);
    assert_eq!(layers.iter().filter(|c| c.is_valid()).count(), real_edges);
}

fn arb_population() -> impl Strategy<Value = NeatPopulation> {
    let graph = (1..8u32).prop_flat_map(|node_count| {
        let edge = (any::<f32>(), 0..node_count).prop_map(|(w, t)| NeatEdge::new(w, t));
        let node = (
            prop::array::uniform5(-10.0f32..10.0),
            prop::collection::vec(edge, 0..4),
        )
            .prop_map(|(params, edges)| NeatNode::new(UafActivation::from_params(params), edges));
        prop::collection::vec(node, node_count as usize)
            .prop_map(|nodes| NeatGraph::new(nodes).expect("targets drawn below node_count"))
    });
    prop::collection::vec(graph, 1..12).prop_map(NeatPopulation::new)
}

proptest! {
    #[test]
    fn prop_roundtrip_is_bit_exact(population in arb_population()) {
        let textures = population_to_textures(&population).unwrap();
        let restored = textures_to_population(&textures).unwrap();
        assert_bit_identical(&population, &restored);
    }

    #[test]
    fn prop_encoding_is_deterministic(population in arb_population()) {
        let a = population_to_textures(&population).unwrap();
        let b = TextureEncoder::new(PackConfig::parallel()).encode(&population).unwrap();
        prop_assert_eq!(a.node_bytes(), b.node_bytes());
        prop_assert_eq!(a.edge_bytes(), b.edge_bytes());
    }

    #[test]
    fn prop_capacities_follow_maxima(population in arb_population()) {
        let textures = population_to_textures(&population).unwrap();
        let max_nodes = population.iter().map(NeatGraph::node_count).max().unwrap();
        let max_out = population.iter().map(NeatGraph::max_out_degree).max().unwrap();
        let expected = TextureShape::new(population.graph_count(), max_nodes, max_out);

        prop_assert_eq!(textures.shape(), expected);
        prop_assert_eq!(textures.node_data().len(), population.graph_count() * max_nodes);
        prop_assert_eq!(
            textures.edge_data().len(),
            population.graph_count() * max_nodes * max_out
        );
    }
}
