//! Row normalization to relative ingredient proportions.

use ndarray::{Array2, ArrayView1};
use tracing::debug;

use super::features::FeatureMatrix;
use crate::error::{Error, Result};

/// Feature matrix with every row rescaled to sum to one.
///
/// Removes the bias from cuisines with many more recipes than others.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedMatrix {
    values: Array2<f64>,
    cuisines: Vec<String>,
    vocabulary: Vec<String>,
}

impl NormalizedMatrix {
    /// Divide each row by its total. Fails on a cuisine with no mentions.
    pub fn from_features(features: &FeatureMatrix) -> Result<Self> {
        let sums = features.row_sums();
        if let Some(i) = sums.iter().position(|&s| s == 0) {
            return Err(Error::ZeroRow {
                cuisine: features.cuisines()[i].clone(),
            });
        }

        let mut values = features.counts().mapv(f64::from);
        for (mut row, &sum) in values.outer_iter_mut().zip(sums.iter()) {
            let sum = sum as f64;
            row.mapv_inplace(|v| v / sum);
        }
        debug!(rows = values.nrows(), "normalized rows");

        Ok(Self {
            values,
            cuisines: features.cuisines().to_vec(),
            vocabulary: features.vocabulary().to_vec(),
        })
    }

    /// Proportions, `[cuisine, ingredient]`.
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Row labels.
    pub fn cuisines(&self) -> &[String] {
        &self.cuisines
    }

    /// Column labels.
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Row view by index.
    pub fn row(&self, i: usize) -> ArrayView1<'_, f64> {
        self.values.row(i)
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }
}
