//! Packs a small population and prints the resulting textures.
//!
//! Run with: `cargo run --example pack_population`

use symbios_texture::{
    population_to_textures, textures_to_population, ActivationTable, NeatEdge, NeatGraph,
    NeatNode, NeatPopulation, PackError, UafActivation,
};

fn node(params: [f32; 5], edges: &[(f32, u32)]) -> NeatNode {
    NeatNode::new(
        UafActivation::from_params(params),
        edges.iter().map(|&(w, t)| NeatEdge::new(w, t)).collect(),
    )
}

fn main() -> Result<(), PackError> {
    println!("Texture Packing Example");
    println!("=======================\n");

    let population = NeatPopulation::new(vec![
        NeatGraph::new(vec![
            node([0.5, 0.0, 0.5, 1.0, 0.0], &[(1.0, 1)]),
            node([1.0, 0.0, 0.0, 1.0, 0.0], &[(1.0, 1)]),
            node([0.0, 1.0, 0.0, 1.0, 0.0], &[(1.0, 2), (-0.5, 0)]),
            node([1.0, 1.0, 0.0, 1.0, 0.0], &[(1.0, 3)]),
        ])?,
        NeatGraph::new(vec![
            node([0.0, 0.0, 1.0, 1.0, 0.0], &[(1.0, 0)]),
            node([1.0, 1.0, 1.0, 0.5, 0.0], &[(1.0, 0)]),
        ])?,
    ]);

    let stats = population.stats();
    println!(
        "{} graphs, {} nodes, {} edges, {} recurrent",
        stats.graph_count, stats.total_nodes, stats.total_edges, stats.recurrent_graphs
    );

    let textures = population_to_textures(&population)?;
    let shape = textures.shape();
    println!(
        "shape: {} graphs x {} node slots x {} edge slots",
        shape.graph_count, shape.max_nodes, shape.max_out_edges
    );

    for graph in 0..shape.graph_count {
        println!("\ngraph {graph}:");
        for n in 0..shape.max_nodes {
            let Some(texel) = textures.node(graph, n) else {
                continue;
            };
            match texel.activation() {
                Some(act) => {
                    let edges: Vec<String> = textures
                        .node_edges(graph, n)
                        .unwrap_or(&[])
                        .iter()
                        .filter_map(|e| e.edge())
                        .map(|e| format!("{:+.2}->{}", e.weight, e.target))
                        .collect();
                    println!("  node {n}: {:?} [{}]", act.params(), edges.join(", "));
                }
                None => println!("  node {n}: padding"),
            }
        }
    }

    let atlas = shape.atlas();
    let (width, height) = atlas.extent();
    println!(
        "\natlas: {width}x{height} cells, {} edge layers, {} node bytes, {} edge bytes",
        atlas.layers,
        textures.node_bytes().len(),
        textures.edge_bytes().len()
    );

    let restored = textures_to_population(&textures)?;
    println!("round trip exact: {}", restored == population);

    let table = ActivationTable::generate(ActivationTable::DEFAULT_RESOLUTION);
    println!(
        "activation table: {} rows x {} samples ({} bytes)",
        table.rows().len(),
        table.resolution(),
        table.to_unorm_bytes().len()
    );

    Ok(())
}
