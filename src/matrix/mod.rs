//! Bag-of-words matrices over the cuisine corpus.
//!
//! A cuisine is represented by how often each ingredient shows up across all
//! of its recipes, a **document-term matrix** with cuisines as rows:
//!
//! ```text
//!            garlic  ginger  olive_oil  soy_sauce
//! italian      412       3        388          0
//! japanese      97     140          2        301
//! ```
//!
//! Raw counts mostly reflect how many recipes a cuisine has. Before comparing
//! cuisines each row is rescaled to proportions ([`NormalizedMatrix`]), so a
//! cuisine is a distribution over ingredients.
//!
//! The [`summary`] views (popularity ranks, ingredient variety) are read-only
//! tables for figures and do not feed the clustering.

mod features;
mod normalize;
pub mod summary;

pub use features::FeatureMatrix;
pub use normalize::NormalizedMatrix;
pub use summary::{
    popularity_ranks, shared_ingredients, unique_ingredient_counts, CuisineRanking,
    RankedIngredient,
};
