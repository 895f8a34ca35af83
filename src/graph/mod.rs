//! Similarity graph between cuisines.
//!
//! The dissimilarity matrix is a complete graph: every pair of cuisines has
//! a distance. Drawing all of it shows nothing, so the graph keeps only the
//! pairs below a distance **quantile** and drops the rest:
//!
//! ```text
//! distances ──► quantile(q) = t ──► edges { (i, j) : d(i, j) < t }
//! ```
//!
//! With `q = 0.4` about the closest 40% of pairs survive. Clusters from the
//! dendrogram cut are attached to the nodes, so a renderer can color them and
//! see whether graph communities agree with the tree.
//!
//! Layout (charge strength, link distance as a function of weight) belongs to
//! the renderer and is not modelled here.

mod quantile;
mod similarity;

pub use quantile::quantile;
pub use similarity::{CuisineNode, GraphExport, GraphLink, SimilarityGraph};
