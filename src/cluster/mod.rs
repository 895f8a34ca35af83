//! Distances and hierarchical clustering of cuisines.
//!
//! Each cuisine is a row of ingredient proportions. Two cuisines are close
//! when they use the same ingredients in similar shares.
//!
//! ## Distance Step
//!
//! [`DissimilarityMatrix::compute`] evaluates a [`DistanceMetric`] on every
//! pair of rows (Euclidean by default). O(n² · v) time, O(n²) space.
//!
//! ## Hierarchical (Agglomerative) Clustering
//!
//! Bottom-up: start with each cuisine as its own cluster, repeatedly merge
//! the two closest clusters until one remains. The merge history forms a
//! **dendrogram**: a binary tree you can cut to get k clusters.
//!
//! **Linkage methods** determine "distance between clusters":
//!
//! | Linkage | Distance | Effect |
//! |---------|----------|--------|
//! | Single | min(pairwise) | Chaining; elongated clusters |
//! | Complete | max(pairwise) | Compact, spherical clusters |
//! | Average | mean(pairwise) | Balanced compromise |
//! | Ward | Variance increase | Minimizes within-cluster variance |
//!
//! ## Usage
//!
//! ```rust
//! use ndarray::array;
//! use palate::cluster::{Clustering, DissimilarityMatrix, HierarchicalClustering, Linkage};
//!
//! let labels = vec!["a".to_string(), "b".to_string(), "c".to_string()];
//! let d = DissimilarityMatrix::from_values(
//!     labels,
//!     array![[0.0, 0.1, 0.9], [0.1, 0.0, 0.8], [0.9, 0.8, 0.0]],
//! )
//! .unwrap();
//!
//! let clusters = HierarchicalClustering::new(2)
//!     .with_linkage(Linkage::Complete)
//!     .fit_predict(&d)
//!     .unwrap();
//! assert_eq!(clusters, vec![0, 0, 1]);
//! ```

mod assignment;
mod distance;
mod hierarchical;
mod traits;

pub use assignment::ClusterAssignment;
pub use distance::{DissimilarityMatrix, DistanceMetric};
pub use hierarchical::{AgglomerationState, Agglomerator, Backend, HierarchicalClustering, Linkage};
pub use traits::Clustering;
