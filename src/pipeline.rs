//! End-to-end run: records to similarity graph.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::cluster::{ClusterAssignment, DissimilarityMatrix, HierarchicalClustering};
use crate::config::PipelineConfig;
use crate::corpus::{Corpus, RecordReader};
use crate::error::Result;
use crate::graph::SimilarityGraph;
use crate::hierarchy::Dendrogram;
use crate::matrix::{
    popularity_ranks, unique_ingredient_counts, CuisineRanking, FeatureMatrix, NormalizedMatrix,
};

/// Runs every stage with one configuration.
///
/// Holds no state between runs; each [`Pipeline::run`] owns its outputs.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

/// Every intermediate product of a run.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Configuration the run used.
    pub config: PipelineConfig,
    /// One document per cuisine.
    pub corpus: Corpus,
    /// Ingredient counts.
    pub features: FeatureMatrix,
    /// Row proportions.
    pub normalized: NormalizedMatrix,
    /// Pairwise distances.
    pub distances: DissimilarityMatrix,
    /// Merge tree.
    pub dendrogram: Dendrogram,
    /// Flat clusters.
    pub assignment: ClusterAssignment,
    /// Pruned graph.
    pub graph: SimilarityGraph,
}

/// Headline numbers of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Records read from the input.
    pub records: usize,
    /// Distinct cuisines (matrix rows).
    pub cuisines: usize,
    /// Vocabulary size (matrix columns).
    pub ingredients: usize,
    /// Flat clusters after the cut.
    pub clusters: usize,
    /// Edges kept in the similarity graph.
    pub edges: usize,
    /// Connected components of the similarity graph.
    pub components: usize,
    /// Distance cutoff for graph edges.
    pub threshold: f64,
}

impl Pipeline {
    /// Create a pipeline after validating the configuration.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration in use.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Load a record file and run every stage.
    pub fn run_file(&self, path: impl AsRef<Path>) -> Result<Analysis> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading records");
        let corpus = Corpus::from_records(RecordReader::open(path)?)?;
        self.run(corpus)
    }

    /// Run every stage after aggregation.
    pub fn run(&self, corpus: Corpus) -> Result<Analysis> {
        let features = FeatureMatrix::from_corpus(&corpus);
        let normalized = NormalizedMatrix::from_features(&features)?;
        let distances = DissimilarityMatrix::compute(&normalized, self.config.metric)?;

        let (dendrogram, assignment) = HierarchicalClustering::new(self.config.clusters)
            .with_linkage(self.config.linkage)
            .with_backend(self.config.backend)
            .fit_assign(&distances)?;

        let graph = SimilarityGraph::build(&distances, &assignment, self.config.prune_quantile)?;

        let analysis = Analysis {
            config: self.config.clone(),
            corpus,
            features,
            normalized,
            distances,
            dendrogram,
            assignment,
            graph,
        };
        let summary = analysis.summary();
        info!(
            cuisines = summary.cuisines,
            ingredients = summary.ingredients,
            clusters = summary.clusters,
            edges = summary.edges,
            "pipeline complete"
        );
        Ok(analysis)
    }
}

impl Analysis {
    /// Headline numbers.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            records: self.corpus.n_records(),
            cuisines: self.features.n_cuisines(),
            ingredients: self.features.n_ingredients(),
            clusters: self.assignment.n_clusters(),
            edges: self.graph.edge_count(),
            components: self.graph.components(),
            threshold: self.graph.threshold(),
        }
    }

    /// Popularity rank of every ingredient, per cuisine.
    pub fn rankings(&self) -> Vec<CuisineRanking> {
        popularity_ranks(&self.features)
    }

    /// Distinct ingredients per cuisine, largest first.
    pub fn unique_counts(&self) -> Vec<(String, usize)> {
        unique_ingredient_counts(&self.features)
    }

    /// Newick text of the dendrogram with cuisine labels.
    pub fn newick(&self) -> Result<String> {
        self.dendrogram.to_newick(self.features.cuisines())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const RECIPES: &str = "\
italian\tgarlic\tolive_oil\ttomato\tbasil
greek\tolive_oil\tfeta\tlemon\toregano
italian\tgarlic\tparmesan\tolive_oil
japanese\tsoy_sauce\trice\tmirin
korean\tsoy_sauce\tgarlic\tsesame_oil\trice
greek\tlemon\tolive_oil\tgarlic
";

    fn corpus() -> Corpus {
        Corpus::from_records(RecordReader::new(Cursor::new(RECIPES))).unwrap()
    }

    #[test]
    fn test_run_groups_regions() {
        let pipeline = Pipeline::new(PipelineConfig::default().with_clusters(2)).unwrap();
        let analysis = pipeline.run(corpus()).unwrap();

        let a = &analysis.assignment;
        assert_eq!(a.cluster_of("italian"), a.cluster_of("greek"));
        assert_eq!(a.cluster_of("japanese"), a.cluster_of("korean"));
        assert_ne!(a.cluster_of("italian"), a.cluster_of("japanese"));

        let summary = analysis.summary();
        assert_eq!(summary.records, 6);
        assert_eq!(summary.cuisines, 4);
        assert_eq!(summary.clusters, 2);
    }

    #[test]
    fn test_run_is_deterministic() {
        let pipeline = Pipeline::new(PipelineConfig::default().with_clusters(3)).unwrap();
        let a = pipeline.run(corpus()).unwrap();
        let b = pipeline.run(corpus()).unwrap();
        assert_eq!(a.features, b.features);
        assert_eq!(a.distances, b.distances);
        assert_eq!(a.dendrogram, b.dendrogram);
        assert_eq!(a.graph.export(), b.graph.export());
        assert_eq!(a.newick().unwrap(), b.newick().unwrap());
    }

    #[test]
    fn test_too_many_clusters() {
        let pipeline = Pipeline::new(PipelineConfig::default().with_clusters(9)).unwrap();
        let err = pipeline.run(corpus()).unwrap_err();
        assert_eq!(err.stage(), "clustering");
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(Pipeline::new(PipelineConfig::default().with_clusters(0)).is_err());
    }
}
