//! Merge trees from agglomerative clustering.
//!
//! ## [`Dendrogram`] - Agglomerative Clustering
//!
//! Records complete merge history from hierarchical clustering:
//!
//! ```text
//!         6 (height=1.0)
//!        / \
//!       4   5 (height=0.7)
//!      / \ / \
//!     0  1 2  3 (leaves)
//! ```
//!
//! Key property: "cut" the tree to get any number of clusters. Cutting into
//! k clusters undoes the k - 1 highest merges:
//!
//! ```text
//! k = 1: {0 1 2 3}
//! k = 2: {0 1} {2 3}
//! k = 3: {0 1} {2} {3}
//! ```
//!
//! For drawing, [`Dendrogram::leaf_order`] gives the left-to-right leaf
//! sequence and [`Dendrogram::to_newick`] a plain-text tree most dendrogram
//! renderers accept.

mod dendrogram;
mod union_find;

pub use dendrogram::{Dendrogram, Merge};
