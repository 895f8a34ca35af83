//! palate CLI: cuisine similarity from a tab-separated recipe file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use palate::cluster::Backend;
use palate::config::CliOverrides;
use palate::matrix::{popularity_ranks, unique_ingredient_counts, CuisineRanking};
use palate::{Corpus, DistanceMetric, FeatureMatrix, FigureConfig, Linkage, PipelineConfig};
use palate::{Pipeline, RecordReader, RunSummary};

#[derive(Parser)]
#[command(name = "palate")]
#[command(about = "Cluster cuisines by the ingredients their recipes use")]
#[command(version)]
struct Cli {
    /// More log output (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline and write graph, dendrogram and summary files
    Analyze {
        /// Recipe file (label<TAB>ingredient<TAB>...)
        records: PathBuf,

        /// TOML pipeline configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Distance metric (euclidean, manhattan, maximum, canberra)
        #[arg(long)]
        metric: Option<DistanceMetric>,

        /// Linkage (single, complete, average, ward)
        #[arg(long)]
        linkage: Option<Linkage>,

        /// Dendrogram backend (native, kodama)
        #[arg(long)]
        backend: Option<Backend>,

        /// Number of flat clusters
        #[arg(short = 'k', long)]
        clusters: Option<usize>,

        /// Keep graph edges below this distance quantile
        #[arg(short, long)]
        quantile: Option<f64>,

        /// Output root for generated files
        #[arg(short, long, default_value = "figure")]
        output: PathBuf,

        /// Public URL prefix of the output root
        #[arg(long, default_value = "/figure")]
        base_url: String,

        /// Document the figures belong to (defaults to the recipe file)
        #[arg(long)]
        source: Option<PathBuf>,
    },

    /// Print the most used ingredients of every cuisine
    Top {
        /// Recipe file
        records: PathBuf,

        /// Ranks to show
        #[arg(short, default_value = "10")]
        n: usize,
    },

    /// Print how many distinct ingredients each cuisine uses
    Unique {
        /// Recipe file
        records: PathBuf,
    },
}

#[derive(Serialize)]
struct SummaryFile<'a> {
    run: RunSummary,
    config: &'a PipelineConfig,
    clusters: Vec<Vec<&'a str>>,
    unique_ingredients: Vec<(String, usize)>,
    top_ingredients: Vec<TopEntry<'a>>,
    leaf_order: Vec<&'a str>,
}

#[derive(Serialize)]
struct TopEntry<'a> {
    cuisine: &'a str,
    ingredients: Vec<(&'a str, u32, usize)>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Analyze {
            records,
            config,
            metric,
            linkage,
            backend,
            clusters,
            quantile,
            output,
            base_url,
            source,
        } => {
            let overrides = CliOverrides {
                metric,
                linkage,
                backend,
                clusters,
                prune_quantile: quantile,
            };
            let source = source.unwrap_or_else(|| records.clone());
            let figures = FigureConfig::new(source, output, base_url);
            cmd_analyze(&records, config.as_deref(), &overrides, &figures)
        }
        Commands::Top { records, n } => cmd_top(&records, n),
        Commands::Unique { records } => cmd_unique(&records),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("palate={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_features(records: &Path) -> Result<FeatureMatrix> {
    let reader = RecordReader::open(records)?;
    let corpus = Corpus::from_records(reader)
        .with_context(|| format!("failed to aggregate {}", records.display()))?;
    Ok(FeatureMatrix::from_corpus(&corpus))
}

fn cmd_analyze(
    records: &Path,
    config_path: Option<&Path>,
    overrides: &CliOverrides,
    figures: &FigureConfig,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    config.apply_overrides(overrides);

    let analysis = Pipeline::new(config)?
        .run_file(records)
        .with_context(|| format!("analysis of {} failed", records.display()))?;

    let dir = figures.figure_dir();
    fs::create_dir_all(&dir).with_context(|| format!("cannot create {}", dir.display()))?;

    let rankings = analysis.rankings();
    let cuisines = analysis.features.cuisines();
    let summary = SummaryFile {
        run: analysis.summary(),
        config: &analysis.config,
        clusters: analysis.assignment.groups(),
        unique_ingredients: analysis.unique_counts(),
        top_ingredients: top_entries(&rankings, 10),
        leaf_order: analysis
            .dendrogram
            .leaf_order()
            .into_iter()
            .map(|i| cuisines[i].as_str())
            .collect(),
    };

    write_file(figures, "graph.json", &analysis.graph.to_json()?)?;
    write_file(figures, "dendrogram.nwk", &analysis.newick()?)?;
    write_file(figures, "summary.json", &serde_json::to_string_pretty(&summary)?)?;

    let run = &summary.run;
    println!("Cuisine similarity");
    println!("==================");
    println!("Records:      {}", run.records);
    println!("Cuisines:     {}", run.cuisines);
    println!("Ingredients:  {}", run.ingredients);
    println!(
        "Clustering:   {} linkage, {} distance, k = {}",
        analysis.config.linkage, analysis.config.metric, run.clusters
    );
    for (id, members) in summary.clusters.iter().enumerate() {
        println!("  cluster {id}: {}", members.join(", "));
    }
    println!(
        "Graph:        {} edges below {:.4} ({} components)",
        run.edges, run.threshold, run.components
    );
    println!("Graph URL:    {}", figures.figure_url("graph.json"));
    Ok(())
}

fn top_entries(rankings: &[CuisineRanking], n: usize) -> Vec<TopEntry<'_>> {
    rankings
        .iter()
        .map(|r| TopEntry {
            cuisine: &r.cuisine,
            ingredients: r
                .top(n)
                .into_iter()
                .map(|e| (e.ingredient.as_str(), e.count, e.rank))
                .collect(),
        })
        .collect()
}

fn write_file(figures: &FigureConfig, name: &str, contents: &str) -> Result<()> {
    let path = figures.figure_path(name);
    fs::write(&path, contents).with_context(|| format!("cannot write {}", path.display()))?;
    info!(path = %path.display(), "wrote");
    Ok(())
}

fn cmd_top(records: &Path, n: usize) -> Result<()> {
    let features = load_features(records)?;
    let rankings = popularity_ranks(&features);
    for entry in top_entries(&rankings, n) {
        println!("{}", entry.cuisine);
        for (ingredient, count, rank) in entry.ingredients {
            println!("  {rank:>3}. {ingredient} ({count})");
        }
    }
    Ok(())
}

fn cmd_unique(records: &Path) -> Result<()> {
    let features = load_features(records)?;
    for (cuisine, count) in unique_ingredient_counts(&features) {
        println!("{count:>6}  {cuisine}");
    }
    Ok(())
}
