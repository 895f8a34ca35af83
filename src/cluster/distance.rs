//! Pairwise dissimilarity between normalized cuisine rows.
//!
//! | Metric | Formula | Notes |
//! |--------|---------|-------|
//! | Euclidean | sqrt(Σ (x - y)²) | Default |
//! | Manhattan | Σ \|x - y\| | Less dominated by staple ingredients |
//! | Maximum | max \|x - y\| | Chebyshev |
//! | Canberra | Σ \|x - y\| / (\|x\| + \|y\|) | Terms with x = y = 0 are skipped |
//!
//! Only the upper triangle is computed; the lower one is mirrored, so the
//! matrix is exactly symmetric with a zero diagonal.

use std::fmt;
use std::str::FromStr;

use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::matrix::NormalizedMatrix;

/// Distance function between two proportion rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// L2 distance.
    #[default]
    Euclidean,
    /// L1 distance.
    Manhattan,
    /// L∞ distance.
    Maximum,
    /// Weighted L1 distance.
    Canberra,
}

impl DistanceMetric {
    /// Distance between two equal-length rows.
    pub fn distance(self, a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
        debug_assert_eq!(a.len(), b.len());
        let pairs = a.iter().zip(b.iter());
        match self {
            DistanceMetric::Euclidean => pairs
                .map(|(x, y)| {
                    let d = x - y;
                    d * d
                })
                .sum::<f64>()
                .sqrt(),
            DistanceMetric::Manhattan => pairs.map(|(x, y)| (x - y).abs()).sum(),
            DistanceMetric::Maximum => pairs.map(|(x, y)| (x - y).abs()).fold(0.0, f64::max),
            DistanceMetric::Canberra => pairs
                .filter_map(|(x, y)| {
                    let denom = x.abs() + y.abs();
                    (denom > 0.0).then(|| (x - y).abs() / denom)
                })
                .sum(),
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DistanceMetric::Euclidean => "euclidean",
            DistanceMetric::Manhattan => "manhattan",
            DistanceMetric::Maximum => "maximum",
            DistanceMetric::Canberra => "canberra",
        };
        f.write_str(name)
    }
}

impl FromStr for DistanceMetric {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "euclidean" => Ok(DistanceMetric::Euclidean),
            "manhattan" => Ok(DistanceMetric::Manhattan),
            "maximum" | "chebyshev" => Ok(DistanceMetric::Maximum),
            "canberra" => Ok(DistanceMetric::Canberra),
            other => Err(format!("unknown distance metric: {other}")),
        }
    }
}

/// Square, symmetric cuisine x cuisine distance matrix with zero diagonal.
#[derive(Debug, Clone, PartialEq)]
pub struct DissimilarityMatrix {
    values: Array2<f64>,
    labels: Vec<String>,
}

impl DissimilarityMatrix {
    /// Compute all pairwise distances between normalized rows.
    pub fn compute(normalized: &NormalizedMatrix, metric: DistanceMetric) -> Result<Self> {
        let n = normalized.n_rows();
        if n < 2 {
            return Err(Error::TooFewCuisines { found: n });
        }

        let upper = upper_triangle(normalized, metric);
        let mut values = Array2::<f64>::zeros((n, n));
        for (i, row) in upper.into_iter().enumerate() {
            for (offset, d) in row.into_iter().enumerate() {
                let j = i + 1 + offset;
                values[[i, j]] = d;
                values[[j, i]] = d;
            }
        }
        debug!(n, %metric, "computed dissimilarity matrix");

        Ok(Self {
            values,
            labels: normalized.cuisines().to_vec(),
        })
    }

    /// Wrap precomputed distances, checking the matrix invariants.
    pub fn from_values(labels: Vec<String>, values: Array2<f64>) -> Result<Self> {
        let n = labels.len();
        if n < 2 {
            return Err(Error::TooFewCuisines { found: n });
        }
        if values.dim() != (n, n) {
            return Err(Error::InvalidParameter {
                name: "distances",
                message: "matrix must be square and match the labels",
            });
        }
        for i in 0..n {
            if values[[i, i]] != 0.0 {
                return Err(Error::InvalidParameter {
                    name: "distances",
                    message: "diagonal must be zero",
                });
            }
            for j in (i + 1)..n {
                let d = values[[i, j]];
                if !(d.is_finite() && d >= 0.0) {
                    return Err(Error::InvalidParameter {
                        name: "distances",
                        message: "entries must be finite and non-negative",
                    });
                }
                if d != values[[j, i]] {
                    return Err(Error::InvalidParameter {
                        name: "distances",
                        message: "matrix must be symmetric",
                    });
                }
            }
        }
        Ok(Self { values, labels })
    }

    /// Full matrix.
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Cuisine labels, in row order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of cuisines.
    pub fn n(&self) -> usize {
        self.labels.len()
    }

    /// Distance between cuisines `i` and `j`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[[i, j]]
    }

    /// Upper triangle, row-major: `d(0,1), d(0,2), .., d(1,2), ..`.
    ///
    /// Length is N-choose-2.
    pub fn condensed(&self) -> Vec<f64> {
        self.pairs().map(|(_, _, d)| d).collect()
    }

    /// Every unordered pair `(i, j, d)` with `i < j`, row-major.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        let n = self.n();
        (0..n).flat_map(move |i| ((i + 1)..n).map(move |j| (i, j, self.values[[i, j]])))
    }
}

/// Distances `d(i, j)` for `j > i`, one vector per row `i`.
fn upper_triangle(normalized: &NormalizedMatrix, metric: DistanceMetric) -> Vec<Vec<f64>> {
    let n = normalized.n_rows();
    let row_distances = |i: usize| -> Vec<f64> {
        ((i + 1)..n)
            .map(|j| metric.distance(normalized.row(i), normalized.row(j)))
            .collect()
    };

    #[cfg(feature = "parallel")]
    {
        (0..n).into_par_iter().map(row_distances).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        (0..n).map(row_distances).collect()
    }
}
