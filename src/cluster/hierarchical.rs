//! Hierarchical (agglomerative) clustering.
//!
//! Bottom-up clustering that builds a **dendrogram** by iteratively
//! merging the closest clusters. Cut the tree to get any number of groups.
//!
//! # Linkage Methods
//!
//! The key choice: how do we define "distance between clusters"?
//!
//! | Linkage | Formula | Effect |
//! |---------|---------|--------|
//! | Single | min(d(a,b)) for a∈A, b∈B | Chaining; elongated clusters |
//! | Complete | max(d(a,b)) | Compact, spherical clusters |
//! | Average | mean(d(a,b)) | Balanced compromise |
//! | Ward | Δ variance | Minimizes within-cluster variance |
//!
//! Complete linkage is the default. Different linkages give different trees
//! from the same distance matrix, so the choice is always explicit in
//! [`PipelineConfig`](crate::PipelineConfig).
//!
//! ## Lance-Williams Updates
//!
//! After merging clusters I and J into IJ, the distance to every other
//! cluster K is derived from the old distances only:
//!
//! ```text
//! single:    d(IJ,K) = min(d(I,K), d(J,K))
//! complete:  d(IJ,K) = max(d(I,K), d(J,K))
//! average:   d(IJ,K) = (|I| d(I,K) + |J| d(J,K)) / (|I| + |J|)
//! ward:      d(IJ,K) = sqrt(((|I|+|K|) d(I,K)² + (|J|+|K|) d(J,K)² - |K| d(I,J)²)
//!                           / (|I| + |J| + |K|))
//! ```
//!
//! All four are monotone: merge heights never decrease.
//!
//! # Complexity
//!
//! The native engine is the straightforward O(n³) scan, which is plenty for
//! tens of cuisines. The [`Backend::Kodama`] path uses `kodama` (BurntSushi)
//! and its O(n²) algorithms for larger inputs.

use std::fmt;
use std::str::FromStr;

use kodama::{linkage as kodama_linkage, Method as KodamaMethod};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::assignment::ClusterAssignment;
use super::distance::DissimilarityMatrix;
use super::traits::Clustering;
use crate::error::{Error, Result};
use crate::hierarchy::{Dendrogram, Merge};

/// Linkage method for hierarchical clustering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Linkage {
    /// Single linkage: minimum distance between clusters.
    Single,
    /// Complete linkage: maximum distance between clusters.
    #[default]
    Complete,
    /// Average linkage (UPGMA): mean distance between clusters.
    Average,
    /// Ward's method: minimize within-cluster variance.
    Ward,
}

impl Linkage {
    /// Distance from the merge of `I` and `J` to another cluster `K`.
    fn update(self, d_ik: f64, d_jk: f64, d_ij: f64, n_i: usize, n_j: usize, n_k: usize) -> f64 {
        match self {
            Linkage::Single => d_ik.min(d_jk),
            Linkage::Complete => d_ik.max(d_jk),
            Linkage::Average => {
                let (ni, nj) = (n_i as f64, n_j as f64);
                (ni * d_ik + nj * d_jk) / (ni + nj)
            }
            Linkage::Ward => {
                let (ni, nj, nk) = (n_i as f64, n_j as f64, n_k as f64);
                let num = (ni + nk) * d_ik * d_ik + (nj + nk) * d_jk * d_jk - nk * d_ij * d_ij;
                (num / (ni + nj + nk)).max(0.0).sqrt()
            }
        }
    }
}

impl fmt::Display for Linkage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Linkage::Single => "single",
            Linkage::Complete => "complete",
            Linkage::Average => "average",
            Linkage::Ward => "ward",
        };
        f.write_str(name)
    }
}

impl FromStr for Linkage {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "single" => Ok(Linkage::Single),
            "complete" => Ok(Linkage::Complete),
            "average" | "upgma" => Ok(Linkage::Average),
            "ward" => Ok(Linkage::Ward),
            other => Err(format!("unknown linkage: {other}")),
        }
    }
}

/// Which implementation builds the dendrogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// In-crate engine with lowest-index tie-breaking.
    #[default]
    Native,
    /// `kodama` crate. Same heights; tied merges may come in another order.
    Kodama,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "native" => Ok(Backend::Native),
            "kodama" => Ok(Backend::Kodama),
            other => Err(format!("unknown clustering backend: {other}")),
        }
    }
}

/// Progress of an [`Agglomerator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgglomerationState {
    /// Every item is its own cluster; nothing merged yet.
    Initialized,
    /// Some, but not all, merges have been performed.
    Merging,
    /// A single root remains.
    Complete,
}

/// Step-by-step agglomerative clustering over a dissimilarity matrix.
///
/// Clusters live in "slots": slot `i` starts as item `i`, and a merge of
/// slots `i < j` keeps the result in slot `i` and retires slot `j`. The
/// closest pair is found by scanning slots in row-major order and keeping
/// the first minimum, so ties go to the lowest `(i, j)`.
#[derive(Debug, Clone)]
pub struct Agglomerator {
    linkage: Linkage,
    n: usize,
    /// Linkage distances between slots, row-major `n x n`.
    dist: Vec<f64>,
    active: Vec<bool>,
    /// Dendrogram node currently held by each slot.
    node: Vec<usize>,
    size: Vec<usize>,
    dendrogram: Dendrogram,
}

impl Agglomerator {
    /// Start with one singleton cluster per row of `distances`.
    pub fn new(distances: &DissimilarityMatrix, linkage: Linkage) -> Self {
        let n = distances.n();
        Self {
            linkage,
            n,
            dist: distances.values().iter().copied().collect(),
            active: vec![true; n],
            node: (0..n).collect(),
            size: vec![1; n],
            dendrogram: Dendrogram::new(n),
        }
    }

    /// Current state.
    pub fn state(&self) -> AgglomerationState {
        match self.dendrogram.n_merges() {
            m if m + 1 >= self.n => AgglomerationState::Complete,
            0 => AgglomerationState::Initialized,
            _ => AgglomerationState::Merging,
        }
    }

    /// Merges performed so far.
    pub fn dendrogram(&self) -> &Dendrogram {
        &self.dendrogram
    }

    /// Perform one merge. Returns `None` once complete.
    pub fn step(&mut self) -> Option<Merge> {
        if self.state() == AgglomerationState::Complete {
            return None;
        }

        let (i, j, d_ij) = self.closest_pair()?;
        let (n_i, n_j) = (self.size[i], self.size[j]);

        for k in 0..self.n {
            if !self.active[k] || k == i || k == j {
                continue;
            }
            let d = self.linkage.update(
                self.dist[i * self.n + k],
                self.dist[j * self.n + k],
                d_ij,
                n_i,
                n_j,
                self.size[k],
            );
            self.dist[i * self.n + k] = d;
            self.dist[k * self.n + i] = d;
        }

        let (a, b) = (self.node[i].min(self.node[j]), self.node[i].max(self.node[j]));
        let merge = Merge {
            cluster_a: a,
            cluster_b: b,
            height: d_ij,
            size: n_i + n_j,
        };
        self.dendrogram.push_merge(a, b, d_ij, n_i + n_j);
        trace!(a, b, height = d_ij, "merged clusters");

        self.active[j] = false;
        self.node[i] = self.n + self.dendrogram.n_merges() - 1;
        self.size[i] = n_i + n_j;

        Some(merge)
    }

    /// Merge until a single cluster remains and return the tree.
    pub fn run(mut self) -> Dendrogram {
        while self.step().is_some() {}
        self.dendrogram
    }

    fn closest_pair(&self) -> Option<(usize, usize, f64)> {
        let mut best: Option<(usize, usize, f64)> = None;
        for i in (0..self.n).filter(|&i| self.active[i]) {
            for j in ((i + 1)..self.n).filter(|&j| self.active[j]) {
                let d = self.dist[i * self.n + j];
                if best.map_or(true, |(_, _, b)| d.total_cmp(&b).is_lt()) {
                    best = Some((i, j, d));
                }
            }
        }
        best
    }
}

/// Hierarchical (agglomerative) clustering.
#[derive(Debug, Clone)]
pub struct HierarchicalClustering {
    /// Number of clusters to produce.
    n_clusters: usize,
    /// Linkage method.
    linkage: Linkage,
    /// Implementation.
    backend: Backend,
}

impl HierarchicalClustering {
    /// Create a new hierarchical clusterer (complete linkage, native engine).
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            linkage: Linkage::default(),
            backend: Backend::default(),
        }
    }

    /// Set linkage method.
    pub fn with_linkage(mut self, linkage: Linkage) -> Self {
        self.linkage = linkage;
        self
    }

    /// Set backend.
    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Configured linkage.
    pub fn linkage(&self) -> Linkage {
        self.linkage
    }

    /// Build the full dendrogram.
    pub fn fit_dendrogram(&self, distances: &DissimilarityMatrix) -> Result<Dendrogram> {
        let n = distances.n();
        if n < 2 {
            return Err(Error::TooFewCuisines { found: n });
        }

        let dendro = match self.backend {
            Backend::Native => Agglomerator::new(distances, self.linkage).run(),
            Backend::Kodama => self.fit_kodama(distances)?,
        };
        debug!(
            n,
            linkage = %self.linkage,
            backend = ?self.backend,
            "built dendrogram"
        );
        Ok(dendro)
    }

    fn fit_kodama(&self, distances: &DissimilarityMatrix) -> Result<Dendrogram> {
        let n = distances.n();
        let mut condensed = distances.condensed();

        let method = match self.linkage {
            Linkage::Single => KodamaMethod::Single,
            Linkage::Complete => KodamaMethod::Complete,
            Linkage::Average => KodamaMethod::Average,
            Linkage::Ward => KodamaMethod::Ward,
        };

        // kodama uses the same labels: leaves 0..n-1, merge i creates n+i.
        let dend = kodama_linkage(&mut condensed, n, method);

        let mut dendro = Dendrogram::new(n);
        for step in dend.steps() {
            let (a, b) = (
                step.cluster1.min(step.cluster2),
                step.cluster1.max(step.cluster2),
            );
            dendro.add_merge(a, b, step.dissimilarity, step.size)?;
        }
        Ok(dendro)
    }

    /// Build the dendrogram and cut it into the configured number of clusters.
    pub fn fit_assign(
        &self,
        distances: &DissimilarityMatrix,
    ) -> Result<(Dendrogram, ClusterAssignment)> {
        if self.n_clusters == 0 || self.n_clusters > distances.n() {
            return Err(Error::InvalidClusterCount {
                requested: self.n_clusters,
                n_items: distances.n(),
            });
        }
        let dendro = self.fit_dendrogram(distances)?;
        let labels = dendro.cut_to_k(self.n_clusters)?;
        let assignment = ClusterAssignment::new(distances.labels().to_vec(), labels);
        Ok((dendro, assignment))
    }
}

impl Clustering for HierarchicalClustering {
    fn fit_predict(&self, distances: &DissimilarityMatrix) -> Result<Vec<usize>> {
        let (_, assignment) = self.fit_assign(distances)?;
        Ok(assignment.labels().to_vec())
    }

    fn n_clusters(&self) -> usize {
        self.n_clusters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn matrix(points: &[f64]) -> DissimilarityMatrix {
        let n = points.len();
        let values = Array2::from_shape_fn((n, n), |(i, j)| (points[i] - points[j]).abs());
        let labels = (0..n).map(|i| format!("c{i}")).collect();
        DissimilarityMatrix::from_values(labels, values).unwrap()
    }

    #[test]
    fn test_hierarchical_basic() {
        let d = matrix(&[0.0, 0.1, 10.0, 10.1]);
        let labels = HierarchicalClustering::new(2).fit_predict(&d).unwrap();

        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[2], labels[3]);
        assert_ne!(labels[0], labels[2]);
    }

    #[test]
    fn test_dendrogram() {
        let d = matrix(&[0.0, 1.0, 10.0]);
        let dendro = HierarchicalClustering::new(2).fit_dendrogram(&d).unwrap();

        assert_eq!(dendro.n_items(), 3);
        assert_eq!(dendro.n_merges(), 2);
        assert_eq!(dendro.heights(), vec![1.0, 10.0]);
    }

    #[test]
    fn test_linkage_heights() {
        let d = matrix(&[0.0, 1.0, 10.0]);
        let height = |linkage| {
            HierarchicalClustering::new(1)
                .with_linkage(linkage)
                .fit_dendrogram(&d)
                .unwrap()
                .heights()[1]
        };
        assert_eq!(height(Linkage::Single), 9.0);
        assert_eq!(height(Linkage::Complete), 10.0);
        assert_eq!(height(Linkage::Average), 9.5);
    }

    #[test]
    fn test_ward_update() {
        // {0, 1} against {10}: d(I,K) = 10, d(J,K) = 9, d(I,J) = 1.
        let d = matrix(&[0.0, 1.0, 10.0]);
        let dendro = HierarchicalClustering::new(1)
            .with_linkage(Linkage::Ward)
            .fit_dendrogram(&d)
            .unwrap();
        let expected = ((2.0 * 100.0 + 2.0 * 81.0 - 1.0) / 3.0f64).sqrt();
        assert!((dendro.heights()[1] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_state_machine() {
        let d = matrix(&[0.0, 1.0, 3.0, 7.0]);
        let mut agg = Agglomerator::new(&d, Linkage::Complete);
        assert_eq!(agg.state(), AgglomerationState::Initialized);

        let first = agg.step().unwrap();
        assert_eq!((first.cluster_a, first.cluster_b), (0, 1));
        assert_eq!(agg.state(), AgglomerationState::Merging);

        agg.step().unwrap();
        agg.step().unwrap();
        assert_eq!(agg.state(), AgglomerationState::Complete);
        assert!(agg.step().is_none());
        assert!(agg.dendrogram().is_complete());
    }

    #[test]
    fn test_ties_break_on_lowest_pair() {
        let d = matrix(&[0.0, 0.0, 0.0]);
        let dendro = Agglomerator::new(&d, Linkage::Complete).run();
        let merges: Vec<_> = dendro.merges().map(|m| (m.cluster_a, m.cluster_b)).collect();
        assert_eq!(merges, vec![(0, 1), (2, 3)]);
        assert_eq!(dendro.heights(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_kodama_backend_agrees_on_heights() {
        let d = matrix(&[0.0, 0.4, 1.1, 5.0, 5.3, 9.0]);
        for linkage in [
            Linkage::Single,
            Linkage::Complete,
            Linkage::Average,
            Linkage::Ward,
        ] {
            let native = HierarchicalClustering::new(2)
                .with_linkage(linkage)
                .fit_dendrogram(&d)
                .unwrap();
            let kodama = HierarchicalClustering::new(2)
                .with_linkage(linkage)
                .with_backend(Backend::Kodama)
                .fit_dendrogram(&d)
                .unwrap();
            for (a, b) in native.heights().iter().zip(kodama.heights()) {
                assert!((a - b).abs() < 1e-9, "{linkage}: {a} vs {b}");
            }
            assert_eq!(native.cut_to_k(2).unwrap(), kodama.cut_to_k(2).unwrap());
        }
    }

    #[test]
    fn test_invalid_cluster_count() {
        let d = matrix(&[0.0, 1.0]);
        assert!(matches!(
            HierarchicalClustering::new(3).fit_assign(&d),
            Err(Error::InvalidClusterCount { requested: 3, n_items: 2 })
        ));
        assert!(HierarchicalClustering::new(0).fit_assign(&d).is_err());
    }

    #[test]
    fn test_linkage_parse() {
        assert_eq!("Complete".parse::<Linkage>(), Ok(Linkage::Complete));
        assert_eq!("upgma".parse::<Linkage>(), Ok(Linkage::Average));
        assert!("centroid".parse::<Linkage>().is_err());
    }
}
