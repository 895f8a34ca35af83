//! Read-only presentation views over a [`FeatureMatrix`].
//!
//! Nothing here feeds back into the pipeline; these tables back the
//! "top ingredients" and "ingredient variety" figures.

use serde::Serialize;

use super::features::FeatureMatrix;
use crate::error::Result;

/// One ingredient of a cuisine with its popularity rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedIngredient {
    /// Ingredient token.
    pub ingredient: String,
    /// Occurrences within the cuisine.
    pub count: u32,
    /// Competition rank (1 = most used, ties share the lowest rank).
    pub rank: usize,
}

/// Popularity ranking of every ingredient for one cuisine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CuisineRanking {
    /// Cuisine label.
    pub cuisine: String,
    /// Entries sorted by rank, then ingredient name.
    pub entries: Vec<RankedIngredient>,
}

impl CuisineRanking {
    /// Ingredients actually used by the cuisine with `rank <= n`.
    ///
    /// Ties at the boundary are all kept, so this can return more than `n`.
    pub fn top(&self, n: usize) -> Vec<&RankedIngredient> {
        self.entries
            .iter()
            .take_while(|e| e.rank <= n)
            .filter(|e| e.count > 0)
            .collect()
    }

    /// Rank of an ingredient in this cuisine.
    pub fn rank_of(&self, ingredient: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|e| e.ingredient == ingredient)
            .map(|e| e.rank)
    }
}

/// Rank ingredients per cuisine by descending count ("min" ranking).
///
/// For counts `[5, 3, 3, 1]` the ranks are `[1, 2, 2, 4]`.
pub fn popularity_ranks(features: &FeatureMatrix) -> Vec<CuisineRanking> {
    let vocab = features.vocabulary();
    features
        .cuisines()
        .iter()
        .zip(features.counts().outer_iter())
        .map(|(cuisine, row)| {
            let mut order: Vec<usize> = (0..row.len()).collect();
            // Vocabulary is sorted, so a stable sort keeps names ordered within ties.
            order.sort_by(|&a, &b| row[b].cmp(&row[a]));

            let mut entries = Vec::with_capacity(order.len());
            let mut rank = 0;
            let mut prev = None;
            for (pos, &j) in order.iter().enumerate() {
                if prev != Some(row[j]) {
                    rank = pos + 1;
                    prev = Some(row[j]);
                }
                entries.push(RankedIngredient {
                    ingredient: vocab[j].clone(),
                    count: row[j],
                    rank,
                });
            }

            CuisineRanking {
                cuisine: cuisine.clone(),
                entries,
            }
        })
        .collect()
}

/// Number of distinct ingredients per cuisine, largest first.
///
/// Ties keep matrix row order.
pub fn unique_ingredient_counts(features: &FeatureMatrix) -> Vec<(String, usize)> {
    let mut out: Vec<(String, usize)> = features
        .cuisines()
        .iter()
        .zip(features.counts().outer_iter())
        .map(|(c, row)| (c.clone(), row.iter().filter(|&&v| v > 0).count()))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out
}

/// Ingredients used by both cuisines, in vocabulary order.
pub fn shared_ingredients(features: &FeatureMatrix, a: &str, b: &str) -> Result<Vec<String>> {
    let ra = features.row(a)?;
    let rb = features.row(b)?;
    Ok(features
        .vocabulary()
        .iter()
        .enumerate()
        .filter(|&(j, _)| ra[j] > 0 && rb[j] > 0)
        .map(|(_, name)| name.clone())
        .collect())
}
