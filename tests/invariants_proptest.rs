mod common;

use common::RecordBuilder;
use geoweave::config::{CoordRange, PipelineConfig};
use geoweave::models::EngagementRecord;
use geoweave::services::similarity::neighbor_proposals;
use geoweave::services::{CoordinateNormalizer, Pipeline};
use ndarray::Array2;
use proptest::prelude::*;

fn arb_record() -> impl Strategy<Value = EngagementRecord> {
    (
        0usize..8,
        0.0f64..50_000.0,
        0.0f64..2_000.0,
        0.0f64..5_000.0,
        0u8..24,
    )
        .prop_map(|(loc, reach, rts, likes, hour)| {
            RecordBuilder::new(format!("loc{loc}"))
                .engagement(reach, rts, likes)
                .at("Monday", hour)
                .build()
        })
}

fn distinct_locations(records: &[EngagementRecord]) -> usize {
    let mut ids: Vec<&str> = records
        .iter()
        .filter_map(|r| r.location_id.as_deref())
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids.len()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_pipeline_outputs_stay_in_bounds(
        records in proptest::collection::vec(arb_record(), 2..40),
    ) {
        prop_assume!(distinct_locations(&records) >= 2);
        let config = PipelineConfig::default();
        let threshold = config.similarity.weight_threshold;
        let k = config.similarity.k_neighbors;
        let output = Pipeline::new(config).unwrap().run(&records).unwrap();
        let n = output.graph.node_count();

        for edge in output.graph.edges() {
            prop_assert!(edge.source < edge.target);
            prop_assert!(edge.weight > threshold && edge.weight <= 1.0);
        }
        prop_assert!(output.graph.edge_count() <= n * k.min(n - 1));

        prop_assert_eq!(output.partition.len(), n);
        let ids = output.partition.community_ids();
        prop_assert_eq!(ids, (0..output.partition.community_count()).collect::<Vec<_>>());

        for p in &output.positions {
            for c in p {
                prop_assert!((-10.0..=10.0).contains(c));
            }
        }

        for edge in &output.communities.edges {
            prop_assert!(edge.community_a < edge.community_b);
            prop_assert!(edge.crossing_count > 0);
        }
    }

    #[test]
    fn prop_normalization_touches_both_bounds(
        points in proptest::collection::vec(
            (-1e3f64..1e3, -1e3f64..1e3, -1e3f64..1e3),
            2..30,
        ),
    ) {
        let mut positions: Vec<[f64; 3]> = points.iter().map(|&(x, y, z)| [x, y, z]).collect();
        let original = positions.clone();
        let range = CoordRange::new(-10.0, 10.0).unwrap();
        CoordinateNormalizer::new(range).normalize(&mut positions);

        for axis in 0..3 {
            let column: Vec<f64> = positions.iter().map(|p| p[axis]).collect();
            prop_assert!(column.iter().all(|c| (range.min..=range.max).contains(c)));
            prop_assert!(column.contains(&range.min));

            let spread = original.iter().any(|p| p[axis] != original[0][axis]);
            if spread {
                prop_assert!(column.contains(&range.max));
            }
        }
    }

    #[test]
    fn prop_proposals_never_exceed_k(
        n in 2usize..12,
        k in 1usize..20,
        values in proptest::collection::vec(-1.0f64..1.0, 144),
    ) {
        let sim = Array2::from_shape_fn((n, n), |(i, j)| {
            if i == j { 1.0 } else { values[i.min(j) * 12 + i.max(j)] }
        });
        for i in 0..n {
            let proposals = neighbor_proposals(&sim, i, k.min(n - 1), 0.3);
            prop_assert!(proposals.len() <= k.min(n - 1));
            prop_assert!(proposals.iter().all(|&(j, w)| j != i && w > 0.3));
        }
    }
}
