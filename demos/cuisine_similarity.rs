use std::path::PathBuf;

use palate::matrix::shared_ingredients;
use palate::{Linkage, Pipeline, PipelineConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Sample records -> dendrogram -> pruned similarity graph.
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/sample_recipes.tsv");

    for linkage in [Linkage::Complete, Linkage::Average] {
        let config = PipelineConfig::default()
            .with_linkage(linkage)
            .with_clusters(3);
        let analysis = Pipeline::new(config)?.run_file(&path)?;

        println!("{linkage} linkage");
        for (id, members) in analysis.assignment.groups().iter().enumerate() {
            println!("  cluster {id}: {}", members.join(", "));
        }
        println!("  newick: {}", analysis.newick()?);
    }

    let analysis = Pipeline::new(PipelineConfig::default())?.run_file(&path)?;
    let graph = &analysis.graph;
    println!(
        "n_nodes={} n_edges={} threshold={:.4}",
        graph.node_count(),
        graph.edge_count(),
        graph.threshold()
    );
    for (name, weight) in graph.neighbors("korean")? {
        let shared = shared_ingredients(&analysis.features, "korean", name)?;
        println!("  korean ~ {name} ({weight:.4}): {}", shared.join(" "));
    }

    Ok(())
}
