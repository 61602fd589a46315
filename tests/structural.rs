//! Distance-binned structural consensus, end to end.

use nalgebra::DMatrix;
use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use netconsensus::{
    hemispheres_from_labels, struct_consensus, struct_consensus_detailed, ConsensusError,
    EdgeCategory, Hemisphere, StructuralConfig,
};

fn symmetric(n: usize, entries: &[((usize, usize), f64)]) -> DMatrix<f64> {
    let mut m = DMatrix::zeros(n, n);
    for &((i, j), w) in entries {
        m[(i, j)] = w;
        m[(j, i)] = w;
    }
    m
}

/// Distances with a distinct value for every pair: `1 + i + 10 * j`.
fn distinct_distances(n: usize) -> DMatrix<f64> {
    DMatrix::from_fn(n, n, |i, j| {
        if i == j {
            0.0
        } else {
            let (a, b) = (i.min(j), i.max(j));
            1.0 + a as f64 + 10.0 * b as f64
        }
    })
}

/// Route library logs to the test harness; `RUST_LOG=netconsensus=trace`.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn scenario_b_identical_subjects_reproduce_shared_matrix() {
    init_tracing();
    let hemis = hemispheres_from_labels(&[0, 0, 1, 1]).unwrap();
    let shared = symmetric(4, &[((0, 1), 0.7), ((1, 2), 0.4)]);
    let data = vec![shared.clone(), shared.clone()];

    let consensus = struct_consensus(&data, &distinct_distances(4), &hemis).unwrap();

    let expected = shared.map(|w| u8::from(w > 0.0));
    assert_eq!(consensus, expected);
}

#[test]
fn scenario_d_masked_category_is_empty_without_error() {
    init_tracing();
    let hemis = hemispheres_from_labels(&[0, 0, 1, 1]).unwrap();
    // Inter-hemisphere distances are all zero, so no inter edge is eligible.
    let mut distance = distinct_distances(4);
    for i in 0..2 {
        for j in 2..4 {
            distance[(i, j)] = 0.0;
            distance[(j, i)] = 0.0;
        }
    }
    let subject = symmetric(4, &[((0, 1), 1.0), ((0, 2), 1.0), ((1, 3), 1.0)]);

    let result = struct_consensus_detailed(
        &[subject.clone(), subject],
        &distance,
        &hemis,
        &StructuralConfig::default(),
    )
    .unwrap();

    let inter = result.category(EdgeCategory::Inter).unwrap();
    assert_eq!(inter.pool_size, 0);
    assert_eq!(inter.selected_edges, 0);
    for i in 0..2 {
        for j in 2..4 {
            assert_eq!(result.matrix[(i, j)], 0);
        }
    }
    assert_eq!(result.matrix[(0, 1)], 1);
}

#[test]
fn all_zero_weights_yield_empty_matrix() {
    let hemis = hemispheres_from_labels(&[0, 1, 0, 1]).unwrap();
    let data = vec![DMatrix::zeros(4, 4); 3];

    let result = struct_consensus_detailed(
        &data,
        &distinct_distances(4),
        &hemis,
        &StructuralConfig::default(),
    )
    .unwrap();

    assert_eq!(result.matrix, DMatrix::<u8>::zeros(4, 4));
    assert!(result.categories.iter().all(|c| c.bins == 0));
}

#[test]
fn most_consistent_edge_wins_its_bin() {
    // All intra distances equal: one bin holds every candidate.
    let hemis = vec![Hemisphere::Left; 3];
    let distance = DMatrix::from_fn(3, 3, |i, j| if i == j { 0.0 } else { 5.0 });
    let s1 = symmetric(3, &[((0, 1), 0.9), ((1, 2), 0.2)]);
    let s2 = symmetric(3, &[((1, 2), 0.3)]);

    let consensus = struct_consensus(&[s1, s2], &distance, &hemis).unwrap();

    // (1, 2) appears in both subjects, (0, 1) only in one.
    assert_eq!(consensus[(1, 2)], 1);
    assert_eq!(consensus[(0, 1)], 0);
}

#[test]
fn ties_break_on_weight_then_index() {
    let hemis = vec![Hemisphere::Right; 3];
    let distance = DMatrix::from_fn(3, 3, |i, j| if i == j { 0.0 } else { 2.0 });

    let heavier = symmetric(3, &[((0, 1), 0.1), ((1, 2), 0.8)]);
    let consensus = struct_consensus(&[heavier], &distance, &hemis).unwrap();
    assert_eq!(consensus[(1, 2)], 1);
    assert_eq!(consensus[(0, 1)], 0);

    let even = symmetric(3, &[((0, 2), 0.5), ((1, 2), 0.5)]);
    let consensus = struct_consensus(&[even], &distance, &hemis).unwrap();
    assert_eq!(consensus[(0, 2)], 1);
    assert_eq!(consensus[(1, 2)], 0);
}

#[test]
fn integer_target_with_distinct_lengths_reuses_shortest_bin() {
    // Three intra edges with distinct lengths, identical in both subjects:
    // target 3, rescaled CDF [0, 1, 2, 3]. Bins 1 and 2 both cover the
    // shortest length, bin 3 the middle one; the longest falls past the
    // last bin.
    let hemis = vec![Hemisphere::Left; 3];
    let distance = distinct_distances(3);
    let subject = symmetric(3, &[((0, 1), 1.0), ((0, 2), 1.0), ((1, 2), 1.0)]);

    let result = struct_consensus_detailed(
        &[subject.clone(), subject],
        &distance,
        &hemis,
        &StructuralConfig::default(),
    )
    .unwrap();

    let intra = result.category(EdgeCategory::Intra).unwrap();
    assert_eq!(intra.bins, 3);
    assert_eq!(intra.selected_edges, 2);
    // d(0,1) = 11, d(0,2) = 21, d(1,2) = 22
    assert_eq!(result.matrix[(0, 1)], 1);
    assert_eq!(result.matrix[(0, 2)], 1);
    assert_eq!(result.matrix[(1, 2)], 0);
}

#[test]
fn bad_hemisphere_label_rejected() {
    let err = hemispheres_from_labels(&[0, 1, 3]).unwrap_err();
    assert!(matches!(err, ConsensusError::InvalidArgument { name: "hemiid", .. }));
}

#[test]
fn label_count_must_match_nodes() {
    let hemis = hemispheres_from_labels(&[0, 1, 1]).unwrap();
    let err =
        struct_consensus(&[DMatrix::zeros(4, 4)], &distinct_distances(4), &hemis).unwrap_err();
    assert!(matches!(err, ConsensusError::DimensionMismatch { .. }));
}

#[test]
fn worker_count_does_not_change_result() {
    let (data, distance, hemis) = random_inputs(7, 4, 99);
    let serial = StructuralConfig::new().threads(1);
    let pooled = StructuralConfig::new().threads(4);
    let one = struct_consensus_detailed(&data, &distance, &hemis, &serial).unwrap();
    let four = struct_consensus_detailed(&data, &distance, &hemis, &pooled).unwrap();
    assert_eq!(one.matrix, four.matrix);
    assert_eq!(one.categories, four.categories);
}

fn random_inputs(
    nodes: usize,
    subjects: usize,
    seed: u64,
) -> (Vec<DMatrix<f64>>, DMatrix<f64>, Vec<Hemisphere>) {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);

    let labels: Vec<u8> = (0..nodes).map(|_| rng.random_range(0..2)).collect();
    let hemis = hemispheres_from_labels(&labels).unwrap();

    let mut distance = DMatrix::zeros(nodes, nodes);
    for i in 0..nodes {
        for j in (i + 1)..nodes {
            // Coarse grid so some lengths repeat.
            let d = f64::from(rng.random_range(1..8u32)) * 2.5;
            distance[(i, j)] = d;
            distance[(j, i)] = d;
        }
    }

    let data = (0..subjects)
        .map(|_| {
            let mut w = DMatrix::zeros(nodes, nodes);
            for i in 0..nodes {
                for j in (i + 1)..nodes {
                    if rng.random_bool(0.5) {
                        let v = rng.random_range(0.05..1.0);
                        w[(i, j)] = v;
                        w[(j, i)] = v;
                    }
                }
            }
            w
        })
        .collect();

    (data, distance, hemis)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn output_is_binary_symmetric_and_within_budget(
        nodes in 2usize..9,
        subjects in 1usize..5,
        seed in any::<u64>(),
    ) {
        let (data, distance, hemis) = random_inputs(nodes, subjects, seed);
        let config = StructuralConfig::default();
        let result = struct_consensus_detailed(&data, &distance, &hemis, &config).unwrap();
        let m = &result.matrix;

        prop_assert_eq!(m.shape(), (nodes, nodes));
        prop_assert_eq!(m, &m.transpose());
        for i in 0..nodes {
            prop_assert_eq!(m[(i, i)], 0);
        }
        prop_assert!(m.iter().all(|&v| v <= 1));

        for kind in EdgeCategory::ALL {
            let report = result.category(kind).unwrap();
            prop_assert!(report.selected_edges <= report.bins);
            prop_assert!(report.bins as f64 <= report.target_edges);

            // Every output edge of this category was selected for it.
            let in_matrix = (0..nodes)
                .flat_map(|i| ((i + 1)..nodes).map(move |j| (i, j)))
                .filter(|&(i, j)| kind.admits(hemis[i], hemis[j]) && m[(i, j)] == 1)
                .count();
            prop_assert_eq!(in_matrix, report.selected_edges);
        }
    }
}
