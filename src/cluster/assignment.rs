//! Flat cluster membership per cuisine.

use serde::Serialize;

/// Cluster id for every cuisine, from cutting a dendrogram.
///
/// Ids are `0..n_clusters()`, numbered by first appearance in row order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterAssignment {
    cuisines: Vec<String>,
    labels: Vec<usize>,
}

impl ClusterAssignment {
    /// Pair row labels with cluster ids. Both must have the same length.
    pub fn new(cuisines: Vec<String>, labels: Vec<usize>) -> Self {
        debug_assert_eq!(cuisines.len(), labels.len());
        Self { cuisines, labels }
    }

    /// Cuisines in row order.
    pub fn cuisines(&self) -> &[String] {
        &self.cuisines
    }

    /// Cluster id per row.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Cluster id of a row.
    pub fn cluster_of_row(&self, row: usize) -> Option<usize> {
        self.labels.get(row).copied()
    }

    /// Cluster id of a cuisine.
    pub fn cluster_of(&self, cuisine: &str) -> Option<usize> {
        self.cuisines
            .iter()
            .position(|c| c == cuisine)
            .map(|i| self.labels[i])
    }

    /// Number of distinct clusters.
    pub fn n_clusters(&self) -> usize {
        self.labels.iter().max().map_or(0, |&m| m + 1)
    }

    /// Cuisines in a cluster, in row order.
    pub fn members(&self, cluster: usize) -> Vec<&str> {
        self.cuisines
            .iter()
            .zip(&self.labels)
            .filter(|&(_, &l)| l == cluster)
            .map(|(c, _)| c.as_str())
            .collect()
    }

    /// Every cluster's members, indexed by cluster id.
    pub fn groups(&self) -> Vec<Vec<&str>> {
        (0..self.n_clusters()).map(|c| self.members(c)).collect()
    }
}
