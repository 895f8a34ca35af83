//! Pipeline and figure configuration.
//!
//! Resolution order (highest priority first):
//! 1. CLI flags (applied via [`PipelineConfig::apply_overrides`])
//! 2. Config file (`--config palate.toml`)
//! 3. Compiled defaults
//!
//! ```toml
//! metric = "euclidean"
//! linkage = "complete"
//! backend = "native"
//! clusters = 4
//! prune_quantile = 0.4
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cluster::{Backend, DistanceMetric, Linkage};
use crate::error::{Error, Result};

/// Tunable choices of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Distance between normalized rows.
    pub metric: DistanceMetric,
    /// Cluster-to-cluster distance for the dendrogram.
    pub linkage: Linkage,
    /// Dendrogram implementation.
    pub backend: Backend,
    /// Number of flat clusters to cut the dendrogram into.
    pub clusters: usize,
    /// Distance quantile below which graph edges are kept.
    pub prune_quantile: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            metric: DistanceMetric::Euclidean,
            linkage: Linkage::Complete,
            backend: Backend::Native,
            clusters: 4,
            prune_quantile: 0.4,
        }
    }
}

/// Values given on the command line; `None` keeps the file/default value.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    /// `--metric`.
    pub metric: Option<DistanceMetric>,
    /// `--linkage`.
    pub linkage: Option<Linkage>,
    /// `--backend`.
    pub backend: Option<Backend>,
    /// `--clusters` / `-k`.
    pub clusters: Option<usize>,
    /// `--quantile` / `-q`.
    pub prune_quantile: Option<f64>,
}

impl PipelineConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Set the distance metric.
    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Set the linkage method.
    pub fn with_linkage(mut self, linkage: Linkage) -> Self {
        self.linkage = linkage;
        self
    }

    /// Set the dendrogram backend.
    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Set the number of flat clusters.
    pub fn with_clusters(mut self, clusters: usize) -> Self {
        self.clusters = clusters;
        self
    }

    /// Set the graph pruning quantile.
    pub fn with_prune_quantile(mut self, q: f64) -> Self {
        self.prune_quantile = q;
        self
    }

    /// Apply command-line values on top of this config.
    pub fn apply_overrides(&mut self, cli: &CliOverrides) {
        if let Some(metric) = cli.metric {
            self.metric = metric;
        }
        if let Some(linkage) = cli.linkage {
            self.linkage = linkage;
        }
        if let Some(backend) = cli.backend {
            self.backend = backend;
        }
        if let Some(clusters) = cli.clusters {
            self.clusters = clusters;
        }
        if let Some(q) = cli.prune_quantile {
            self.prune_quantile = q;
        }
    }

    /// Check values that do not depend on the data.
    ///
    /// The upper bound on `clusters` is the number of cuisines and is checked
    /// when the dendrogram is cut.
    pub fn validate(&self) -> Result<()> {
        if self.clusters == 0 {
            return Err(Error::InvalidParameter {
                name: "clusters",
                message: "must be at least 1",
            });
        }
        if !(0.0..=1.0).contains(&self.prune_quantile) {
            return Err(Error::InvalidParameter {
                name: "prune_quantile",
                message: "must be within [0, 1]",
            });
        }
        Ok(())
    }
}

/// Where a rendered post's figures go.
///
/// Figures of one source document share a directory named after the
/// document's file stem, both on disk and under the base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FigureConfig {
    /// Source document the figures belong to.
    pub source: PathBuf,
    /// Root directory for generated files.
    pub output_dir: PathBuf,
    /// Public URL prefix of `output_dir`.
    pub base_url: String,
}

impl FigureConfig {
    /// Create a figure config.
    pub fn new(
        source: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            output_dir: output_dir.into(),
            base_url: base_url.into(),
        }
    }

    fn stem(&self) -> String {
        self.source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "figures".to_string())
    }

    /// Directory holding this document's figures.
    pub fn figure_dir(&self) -> PathBuf {
        self.output_dir.join(self.stem())
    }

    /// File path of a named figure.
    pub fn figure_path(&self, name: &str) -> PathBuf {
        self.figure_dir().join(name)
    }

    /// Public URL of a named figure.
    pub fn figure_url(&self, name: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.stem(),
            name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.metric, DistanceMetric::Euclidean);
        assert_eq!(config.linkage, Linkage::Complete);
        assert_eq!(config.clusters, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config = PipelineConfig::from_toml_str("linkage = \"ward\"\nclusters = 3\n").unwrap();
        assert_eq!(config.linkage, Linkage::Ward);
        assert_eq!(config.clusters, 3);
        assert_eq!(config.prune_quantile, 0.4);
    }

    #[test]
    fn test_bad_toml() {
        let err = PipelineConfig::from_toml_str("linkage = \"centroid\"").unwrap_err();
        assert_eq!(err.stage(), "config");
        assert!(PipelineConfig::from_toml_str("colour = 1").is_err());
    }

    #[test]
    fn test_validation() {
        assert!(PipelineConfig::from_toml_str("clusters = 0").is_err());
        assert!(PipelineConfig::default()
            .with_prune_quantile(-0.1)
            .validate()
            .is_err());
    }

    #[test]
    fn test_cli_overrides_win() {
        let mut config = PipelineConfig::from_toml_str("clusters = 3").unwrap();
        config.apply_overrides(&CliOverrides {
            clusters: Some(5),
            metric: Some(DistanceMetric::Manhattan),
            ..Default::default()
        });
        assert_eq!(config.clusters, 5);
        assert_eq!(config.metric, DistanceMetric::Manhattan);
        assert_eq!(config.linkage, Linkage::Complete);
    }

    #[test]
    fn test_figure_paths() {
        let figures = FigureConfig::new("posts/cuisines.md", "public/figure", "/figure/");
        assert_eq!(
            figures.figure_path("graph.json"),
            PathBuf::from("public/figure/cuisines/graph.json")
        );
        assert_eq!(
            figures.figure_url("graph.json"),
            "/figure/cuisines/graph.json"
        );
    }
}
