use std::path::PathBuf;

use thiserror::Error;

/// Result alias for `palate`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the cuisine-similarity pipeline.
///
/// Every variant aborts the run: downstream stages rely on whole-matrix
/// invariants, so there are no partial results.
#[derive(Debug, Error)]
pub enum Error {
    /// A record line could not be split into a label and at least one ingredient.
    #[error("loader: malformed record on line {line}: {reason}")]
    MalformedRecord {
        /// 1-based line number in the input.
        line: usize,
        /// Which part of the record was missing.
        reason: &'static str,
    },

    /// No cuisine was observed in the input.
    #[error("aggregator: corpus is empty, no cuisines observed")]
    EmptyCorpus,

    /// A cuisine has no ingredient mentions, so its row cannot be normalized.
    #[error("normalizer: cuisine {cuisine:?} has a zero ingredient total")]
    ZeroRow {
        /// Offending cuisine label.
        cuisine: String,
    },

    /// Distances and clustering need at least two cuisines.
    #[error("distance: need at least 2 cuisines, found {found}")]
    TooFewCuisines {
        /// Number of cuisines present.
        found: usize,
    },

    /// Invalid number of clusters requested.
    #[error("clustering: cannot create {requested} clusters from {n_items} cuisines")]
    InvalidClusterCount {
        /// Requested count.
        requested: usize,
        /// Number of items.
        n_items: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },

    /// A cuisine label that is not part of the corpus.
    #[error("unknown cuisine {0:?}")]
    UnknownCuisine(String),

    /// Reading the record file failed.
    #[error("loader: cannot read {}: {source}", path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("config: {0}")]
    Config(#[from] toml::de::Error),

    /// Export serialization failed.
    #[error("export: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Name of the pipeline stage that produced this error.
    pub fn stage(&self) -> &'static str {
        match self {
            Error::MalformedRecord { .. } | Error::Io { .. } => "loader",
            Error::EmptyCorpus => "aggregator",
            Error::ZeroRow { .. } => "normalizer",
            Error::TooFewCuisines { .. } => "distance",
            Error::InvalidClusterCount { .. } => "clustering",
            Error::InvalidParameter { name, .. } => match *name {
                "prune_quantile" => "graph",
                "clusters" | "merge" => "clustering",
                _ => "config",
            },
            Error::UnknownCuisine(_) => "summary",
            Error::Config(_) => "config",
            Error::Json(_) => "export",
        }
    }
}
