//! Quantile-pruned similarity graph between cuisines.

use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::quantile::quantile;
use crate::cluster::{ClusterAssignment, DissimilarityMatrix};
use crate::error::{Error, Result};

/// Node payload: a cuisine and its cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuisineNode {
    /// Row index in the matrices (0-based).
    pub id: usize,
    /// Cuisine label.
    pub name: String,
    /// Cluster id from the dendrogram cut.
    pub cluster: usize,
}

/// One undirected edge in the export, `source < target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphLink {
    /// Lower node id.
    pub source: usize,
    /// Higher node id.
    pub target: usize,
    /// Raw dissimilarity between the two cuisines.
    pub weight: f64,
}

/// Node/link lists as consumed by force-directed renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphExport {
    /// Nodes in row order.
    pub nodes: Vec<CuisineNode>,
    /// Edges sorted by `(source, target)`.
    pub links: Vec<GraphLink>,
}

/// Undirected graph keeping only the closest cuisine pairs.
///
/// Node index `i` is matrix row `i`. Edge weights are distances, so a
/// smaller weight means a stronger relationship.
#[derive(Debug, Clone)]
pub struct SimilarityGraph {
    graph: UnGraph<CuisineNode, f64>,
    threshold: f64,
}

impl SimilarityGraph {
    /// Keep every pair whose distance is strictly below the `prune_quantile`
    /// quantile of all pairwise distances.
    ///
    /// `prune_quantile = 0.4` keeps roughly the closest 40% of pairs;
    /// `0.0` keeps none. A disconnected result is normal.
    pub fn build(
        distances: &DissimilarityMatrix,
        assignment: &ClusterAssignment,
        prune_quantile: f64,
    ) -> Result<Self> {
        let n = distances.n();
        if assignment.labels().len() != n {
            return Err(Error::InvalidParameter {
                name: "assignment",
                message: "needs one cluster id per cuisine",
            });
        }

        let threshold = quantile(&distances.condensed(), prune_quantile)?;

        let mut graph = UnGraph::<CuisineNode, f64>::with_capacity(n, 0);
        for (id, (name, &cluster)) in distances
            .labels()
            .iter()
            .zip(assignment.labels())
            .enumerate()
        {
            graph.add_node(CuisineNode {
                id,
                name: name.clone(),
                cluster,
            });
        }

        for (i, j, d) in distances.pairs() {
            if d < threshold {
                graph.add_edge(NodeIndex::new(i), NodeIndex::new(j), d);
            }
        }

        let out = Self { graph, threshold };
        debug!(
            nodes = n,
            edges = out.edge_count(),
            threshold,
            components = out.components(),
            "built similarity graph"
        );
        if out.edge_count() == 0 && prune_quantile > 0.0 {
            warn!(prune_quantile, "similarity graph has no edges");
        }
        Ok(out)
    }

    /// Underlying petgraph graph.
    pub fn graph(&self) -> &UnGraph<CuisineNode, f64> {
        &self.graph
    }

    /// Distance cutoff used for pruning (edges are strictly below it).
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Number of cuisines.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of kept pairs.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of connected components.
    pub fn components(&self) -> usize {
        connected_components(&self.graph)
    }

    /// Adjacent cuisines of `name`, closest first.
    pub fn neighbors(&self, name: &str) -> Result<Vec<(&str, f64)>> {
        let idx = self
            .graph
            .node_indices()
            .find(|&i| self.graph[i].name == name)
            .ok_or_else(|| Error::UnknownCuisine(name.to_owned()))?;

        let mut out: Vec<(&str, f64)> = self
            .graph
            .edges(idx)
            .map(|e| {
                let other = if e.source() == idx {
                    e.target()
                } else {
                    e.source()
                };
                (self.graph[other].name.as_str(), *e.weight())
            })
            .collect();
        out.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        Ok(out)
    }

    /// Node and link lists for rendering.
    pub fn export(&self) -> GraphExport {
        let nodes = self.graph.node_weights().cloned().collect();
        let mut links: Vec<GraphLink> = self
            .graph
            .edge_references()
            .map(|e| {
                let (a, b) = (e.source().index(), e.target().index());
                GraphLink {
                    source: a.min(b),
                    target: a.max(b),
                    weight: *e.weight(),
                }
            })
            .collect();
        links.sort_by_key(|l| (l.source, l.target));
        GraphExport { nodes, links }
    }

    /// Export as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.export())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn fixture() -> (DissimilarityMatrix, ClusterAssignment) {
        let labels: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        let d = DissimilarityMatrix::from_values(
            labels.clone(),
            array![
                [0.0, 0.1, 0.8, 0.9],
                [0.1, 0.0, 0.7, 0.85],
                [0.8, 0.7, 0.0, 0.2],
                [0.9, 0.85, 0.2, 0.0],
            ],
        )
        .unwrap();
        (d, ClusterAssignment::new(labels, vec![0, 0, 1, 1]))
    }

    #[test]
    fn test_prunes_far_pairs() {
        let (d, a) = fixture();
        // Sorted pair distances: 0.1 0.2 0.7 0.8 0.85 0.9; 40% quantile = 0.7.
        let g = SimilarityGraph::build(&d, &a, 0.4).unwrap();
        assert!((g.threshold() - 0.7).abs() < 1e-12);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.components(), 2);

        let export = g.export();
        let pairs: Vec<_> = export.links.iter().map(|l| (l.source, l.target)).collect();
        assert_eq!(pairs, vec![(0, 1), (2, 3)]);
        assert_eq!(export.nodes[2].cluster, 1);
    }

    #[test]
    fn test_zero_quantile_has_no_edges() {
        let (d, a) = fixture();
        let g = SimilarityGraph::build(&d, &a, 0.0).unwrap();
        assert_eq!(g.edge_count(), 0);
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.components(), 4);
    }

    #[test]
    fn test_full_quantile_drops_only_the_farthest() {
        let (d, a) = fixture();
        let g = SimilarityGraph::build(&d, &a, 1.0).unwrap();
        assert_eq!(g.edge_count(), 5);
        assert_eq!(g.components(), 1);
    }

    #[test]
    fn test_neighbors_sorted_by_distance() {
        let (d, a) = fixture();
        let g = SimilarityGraph::build(&d, &a, 1.0).unwrap();
        let near: Vec<_> = g.neighbors("c").unwrap().into_iter().map(|(n, _)| n).collect();
        assert_eq!(near, vec!["d", "b", "a"]);
        assert!(g.neighbors("zz").is_err());
    }

    #[test]
    fn test_invalid_quantile() {
        let (d, a) = fixture();
        assert!(matches!(
            SimilarityGraph::build(&d, &a, 1.2),
            Err(Error::InvalidParameter { name: "prune_quantile", .. })
        ));
    }

    #[test]
    fn test_json_shape() {
        let (d, a) = fixture();
        let json = SimilarityGraph::build(&d, &a, 0.4).unwrap().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["nodes"].as_array().unwrap().len(), 4);
        assert_eq!(value["links"][0]["source"], 0);
        assert_eq!(value["links"][0]["target"], 1);
        assert_eq!(value["nodes"][3]["name"], "d");
    }
}
