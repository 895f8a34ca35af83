//! Cuisine x ingredient count matrix.

use std::collections::{BTreeSet, HashMap};

use ndarray::{Array1, Array2, ArrayView1, Axis};
use tracing::debug;

use crate::corpus::Corpus;
use crate::error::{Error, Result};

/// Document-term matrix over the cuisine corpus.
///
/// Rows follow corpus order (first appearance). Columns are the sorted
/// vocabulary of every ingredient observed, so no column is all zeros.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    counts: Array2<u32>,
    cuisines: Vec<String>,
    vocabulary: Vec<String>,
}

impl FeatureMatrix {
    /// Count ingredient occurrences for every cuisine document.
    pub fn from_corpus(corpus: &Corpus) -> Self {
        let vocab: BTreeSet<&str> = corpus
            .documents()
            .iter()
            .flat_map(|doc| doc.tokens())
            .collect();
        let vocabulary: Vec<String> = vocab.into_iter().map(str::to_owned).collect();
        let column: HashMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(j, t)| (t.as_str(), j))
            .collect();

        let mut counts = Array2::<u32>::zeros((corpus.len(), vocabulary.len()));
        for (i, doc) in corpus.documents().iter().enumerate() {
            for token in doc.tokens() {
                // Every token is in the vocabulary by construction.
                if let Some(&j) = column.get(token) {
                    counts[[i, j]] += 1;
                }
            }
        }

        let cuisines: Vec<String> = corpus.labels().map(str::to_owned).collect();
        debug!(
            cuisines = cuisines.len(),
            ingredients = vocabulary.len(),
            "built feature matrix"
        );

        Self {
            counts,
            cuisines,
            vocabulary,
        }
    }

    /// Assemble a matrix from precomputed counts.
    ///
    /// Labels must match the shape and be unique; every column must be used
    /// by at least one cuisine.
    pub fn with_counts(
        counts: Array2<u32>,
        cuisines: Vec<String>,
        vocabulary: Vec<String>,
    ) -> Result<Self> {
        if counts.dim() != (cuisines.len(), vocabulary.len()) {
            return Err(Error::InvalidParameter {
                name: "counts",
                message: "shape does not match the row and column labels",
            });
        }
        if cuisines.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        let distinct_rows: BTreeSet<&String> = cuisines.iter().collect();
        let distinct_cols: BTreeSet<&String> = vocabulary.iter().collect();
        if distinct_rows.len() != cuisines.len() || distinct_cols.len() != vocabulary.len() {
            return Err(Error::InvalidParameter {
                name: "counts",
                message: "row and column labels must be unique",
            });
        }
        if counts.axis_iter(Axis(1)).any(|col| col.iter().all(|&c| c == 0)) {
            return Err(Error::InvalidParameter {
                name: "counts",
                message: "every ingredient column needs at least one occurrence",
            });
        }

        Ok(Self {
            counts,
            cuisines,
            vocabulary,
        })
    }

    /// Raw counts, `[cuisine, ingredient]`.
    pub fn counts(&self) -> &Array2<u32> {
        &self.counts
    }

    /// Row labels.
    pub fn cuisines(&self) -> &[String] {
        &self.cuisines
    }

    /// Column labels, lexicographically sorted.
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Number of rows.
    pub fn n_cuisines(&self) -> usize {
        self.cuisines.len()
    }

    /// Number of columns.
    pub fn n_ingredients(&self) -> usize {
        self.vocabulary.len()
    }

    /// Row index of a cuisine.
    pub fn row_index(&self, cuisine: &str) -> Option<usize> {
        self.cuisines.iter().position(|c| c == cuisine)
    }

    /// Column index of an ingredient.
    pub fn column_index(&self, ingredient: &str) -> Option<usize> {
        self.vocabulary
            .binary_search_by(|v| v.as_str().cmp(ingredient))
            .ok()
    }

    /// Count row of a cuisine.
    pub fn row(&self, cuisine: &str) -> Result<ArrayView1<'_, u32>> {
        let i = self
            .row_index(cuisine)
            .ok_or_else(|| Error::UnknownCuisine(cuisine.to_owned()))?;
        Ok(self.counts.row(i))
    }

    /// Occurrences of `ingredient` in `cuisine`; 0 for unseen ingredients.
    pub fn count(&self, cuisine: &str, ingredient: &str) -> Result<u32> {
        let row = self.row(cuisine)?;
        Ok(self.column_index(ingredient).map_or(0, |j| row[j]))
    }

    /// Total ingredient mentions per cuisine.
    pub fn row_sums(&self) -> Array1<u64> {
        self.counts
            .map_axis(Axis(1), |row| row.iter().map(|&c| u64::from(c)).sum())
    }

    /// Corpus-wide mentions per ingredient, in vocabulary order.
    pub fn ingredient_totals(&self) -> Array1<u64> {
        self.counts
            .map_axis(Axis(0), |col| col.iter().map(|&c| u64::from(c)).sum())
    }
}
