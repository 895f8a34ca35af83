use ndarray::Array2;
use palate::cluster::{DissimilarityMatrix, DistanceMetric, HierarchicalClustering, Linkage};
use palate::matrix::{popularity_ranks, FeatureMatrix, NormalizedMatrix};
use proptest::prelude::*;

/// Count matrices where every row and every column has at least one hit.
fn count_matrix() -> impl Strategy<Value = FeatureMatrix> {
    (2usize..8, 1usize..6)
        .prop_flat_map(|(rows, cols)| {
            (
                Just(rows),
                Just(cols),
                prop::collection::vec(0u32..5, rows * cols),
            )
        })
        .prop_map(|(rows, cols, cells)| {
            let mut counts = Array2::from_shape_vec((rows, cols), cells).unwrap();
            for i in 0..rows {
                counts[[i, i % cols]] += 1;
            }
            for j in 0..cols {
                counts[[j % rows, j]] += 1;
            }
            let cuisines = (0..rows).map(|i| format!("c{i}")).collect();
            let vocabulary = (0..cols).map(|j| format!("i{j}")).collect();
            FeatureMatrix::with_counts(counts, cuisines, vocabulary).unwrap()
        })
}

fn metric() -> impl Strategy<Value = DistanceMetric> {
    prop_oneof![
        Just(DistanceMetric::Euclidean),
        Just(DistanceMetric::Manhattan),
        Just(DistanceMetric::Maximum),
        Just(DistanceMetric::Canberra),
    ]
}

fn linkage() -> impl Strategy<Value = Linkage> {
    prop_oneof![
        Just(Linkage::Single),
        Just(Linkage::Complete),
        Just(Linkage::Average),
        Just(Linkage::Ward),
    ]
}

proptest! {
    #[test]
    fn prop_rows_sum_to_one(features in count_matrix()) {
        let normalized = NormalizedMatrix::from_features(&features).unwrap();
        for i in 0..normalized.n_rows() {
            let row = normalized.row(i);
            prop_assert!((row.sum() - 1.0).abs() < 1e-12);
            prop_assert!(row.iter().all(|&v| (0.0..=1.0).contains(&v)));
        }
    }

    #[test]
    fn prop_distances_symmetric(features in count_matrix(), metric in metric()) {
        let normalized = NormalizedMatrix::from_features(&features).unwrap();
        let d = DissimilarityMatrix::compute(&normalized, metric).unwrap();
        for i in 0..d.n() {
            prop_assert_eq!(d.get(i, i), 0.0);
            for j in 0..d.n() {
                prop_assert_eq!(d.get(i, j), d.get(j, i));
                prop_assert!(d.get(i, j) >= 0.0);
            }
        }
    }

    #[test]
    fn prop_cut_gives_exactly_k(features in count_matrix(), linkage in linkage()) {
        let normalized = NormalizedMatrix::from_features(&features).unwrap();
        let d = DissimilarityMatrix::compute(&normalized, DistanceMetric::Euclidean).unwrap();
        let n = d.n();
        let dendrogram = HierarchicalClustering::new(1)
            .with_linkage(linkage)
            .fit_dendrogram(&d)
            .unwrap();
        prop_assert_eq!(dendrogram.n_merges(), n - 1);

        for k in 1..=n {
            let labels = dendrogram.cut_to_k(k).unwrap();
            prop_assert_eq!(labels.len(), n);
            let mut distinct = labels.clone();
            distinct.sort_unstable();
            distinct.dedup();
            prop_assert_eq!(distinct, (0..k).collect::<Vec<_>>());
        }
    }

    #[test]
    fn prop_reducible_heights_monotone(features in count_matrix()) {
        let normalized = NormalizedMatrix::from_features(&features).unwrap();
        let d = DissimilarityMatrix::compute(&normalized, DistanceMetric::Euclidean).unwrap();
        for linkage in [Linkage::Single, Linkage::Complete] {
            let heights = HierarchicalClustering::new(1)
                .with_linkage(linkage)
                .fit_dendrogram(&d)
                .unwrap()
                .heights();
            prop_assert!(heights.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn prop_ranks_follow_counts(features in count_matrix()) {
        for ranking in popularity_ranks(&features) {
            prop_assert_eq!(ranking.entries.len(), features.n_ingredients());
            prop_assert_eq!(ranking.entries[0].rank, 1);
            for pair in ranking.entries.windows(2) {
                prop_assert!(pair[0].count >= pair[1].count);
                if pair[0].count == pair[1].count {
                    prop_assert_eq!(pair[0].rank, pair[1].rank);
                } else {
                    prop_assert!(pair[0].rank < pair[1].rank);
                }
            }
        }
    }

    #[test]
    fn prop_clustering_deterministic(features in count_matrix(), linkage in linkage()) {
        let normalized = NormalizedMatrix::from_features(&features).unwrap();
        let d = DissimilarityMatrix::compute(&normalized, DistanceMetric::Euclidean).unwrap();
        let model = HierarchicalClustering::new(2).with_linkage(linkage);
        let first = model.fit_assign(&d).unwrap();
        let second = model.fit_assign(&d).unwrap();
        prop_assert_eq!(first, second);
    }
}
