//! # palate
//!
//! Cuisine similarity from recipe records: a bag-of-words feature matrix,
//! agglomerative clustering into a dendrogram, and a quantile-pruned
//! similarity graph for force-directed rendering.
//!
//! ```text
//! records.tsv ─► Corpus ─► FeatureMatrix ─┬─► summary views (ranks, variety)
//!                                         └─► NormalizedMatrix ─► DissimilarityMatrix
//!                                               ─► Dendrogram ─► ClusterAssignment
//!                                               ─► SimilarityGraph
//! ```
//!
//! Every stage is a pure function of its inputs; the only I/O is reading the
//! record file.
//!
//! ```rust
//! use palate::{Corpus, Pipeline, PipelineConfig, RecordReader};
//! use std::io::Cursor;
//!
//! let input = "a\tx\ty\nb\tx\ty\tz\nc\tp\tq\n";
//! let corpus = Corpus::from_records(RecordReader::new(Cursor::new(input))).unwrap();
//! let analysis = Pipeline::new(PipelineConfig::default().with_clusters(2))
//!     .unwrap()
//!     .run(corpus)
//!     .unwrap();
//! assert_eq!(analysis.assignment.labels(), &[0, 0, 1]);
//! ```

#![forbid(unsafe_code)]

pub mod cluster;
pub mod config;
pub mod corpus;
/// Error types used across `palate`.
pub mod error;
pub mod graph;
pub mod hierarchy;
pub mod matrix;
pub mod pipeline;

pub use cluster::{
    ClusterAssignment, Clustering, DissimilarityMatrix, DistanceMetric, HierarchicalClustering,
    Linkage,
};
pub use config::{FigureConfig, PipelineConfig};
pub use corpus::{Corpus, CuisineDocument, Record, RecordReader};
pub use error::{Error, Result};
pub use graph::{GraphExport, SimilarityGraph};
pub use hierarchy::Dendrogram;
pub use matrix::{FeatureMatrix, NormalizedMatrix};
pub use pipeline::{Analysis, Pipeline, RunSummary};
