use std::io::Cursor;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use palate::cluster::{DissimilarityMatrix, DistanceMetric, HierarchicalClustering, Linkage};
use palate::{Corpus, FeatureMatrix, NormalizedMatrix, Pipeline, PipelineConfig, RecordReader};

/// Synthetic records: `n_cuisines` labels drawing from a shared pool of
/// ingredients with a per-cuisine bias, deterministic without an RNG.
fn synthetic_records(n_cuisines: usize, recipes_each: usize, pool: usize) -> String {
    let mut out = String::new();
    for r in 0..recipes_each {
        for c in 0..n_cuisines {
            out.push_str(&format!("cuisine_{c}"));
            for k in 0..8 {
                let ingredient = (c * 7 + r * 3 + k * k) % pool;
                out.push_str(&format!("\ting_{ingredient}"));
            }
            out.push('\n');
        }
    }
    out
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");

    let records = synthetic_records(40, 50, 300);
    let corpus = Corpus::from_records(RecordReader::new(Cursor::new(records.as_str()))).unwrap();
    let features = FeatureMatrix::from_corpus(&corpus);
    let normalized = NormalizedMatrix::from_features(&features).unwrap();
    let distances = DissimilarityMatrix::compute(&normalized, DistanceMetric::Euclidean).unwrap();

    group.bench_function("aggregate_c40_r2000", |b| {
        b.iter(|| {
            let reader = RecordReader::new(Cursor::new(black_box(records.as_str())));
            Corpus::from_records(reader).unwrap();
        })
    });

    group.bench_function("distances_c40_v300", |b| {
        b.iter(|| {
            DissimilarityMatrix::compute(black_box(&normalized), DistanceMetric::Euclidean).unwrap()
        })
    });

    for linkage in [Linkage::Complete, Linkage::Ward] {
        group.bench_function(format!("dendrogram_{linkage}_c40"), |b| {
            b.iter(|| {
                HierarchicalClustering::new(4)
                    .with_linkage(linkage)
                    .fit_dendrogram(black_box(&distances))
                    .unwrap()
            })
        });
    }

    group.bench_function("end_to_end_c40", |b| {
        let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
        b.iter(|| pipeline.run(black_box(corpus.clone())).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
