//! Clustering traits.

use super::distance::DissimilarityMatrix;
use crate::error::Result;

/// Trait for hard clustering over a precomputed dissimilarity matrix.
pub trait Clustering {
    /// Fit the model and return cluster assignments.
    ///
    /// Returns a vector of cluster labels, one per matrix row.
    fn fit_predict(&self, distances: &DissimilarityMatrix) -> Result<Vec<usize>>;

    /// Get the number of clusters.
    fn n_clusters(&self) -> usize;
}
