//! Neighbor-search equivalence tests
//!
//! The cell-index pass must interact exactly the pairs a brute-force
//! all-pairs scan finds within neighbor range - no misses near cell
//! borders, no duplicates from the half stencil.

use glam::DVec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use silo_sim::{Grain, SpatialGrid};
use std::collections::BTreeSet;

const WIDTH: f64 = 0.2;
const HEIGHT: f64 = 0.7;
const NEIGHBOR_RADIUS: f64 = 0.001;
const MAX_RADIUS: f64 = 0.011;

fn random_grains(rng: &mut StdRng, count: usize) -> Vec<Grain> {
    (0..count)
        .map(|id| {
            let radius = rng.gen_range(0.009..=MAX_RADIUS);
            let position = DVec2::new(rng.gen::<f64>() * WIDTH, rng.gen::<f64>() * HEIGHT);
            Grain::new(id, position, radius)
        })
        .collect()
}

fn brute_force_pairs(grains: &[Grain]) -> BTreeSet<(usize, usize)> {
    let mut pairs = BTreeSet::new();
    for (k, a) in grains.iter().enumerate() {
        for b in &grains[k + 1..] {
            if a.surface_gap(b) <= NEIGHBOR_RADIUS {
                pairs.insert((a.id, b.id));
            }
        }
    }
    pairs
}

#[test]
fn cell_index_matches_brute_force() {
    let mut rng = StdRng::seed_from_u64(42);
    for trial in 0..5 {
        let grains = random_grains(&mut rng, 150);
        let mut grid = SpatialGrid::new(WIDTH, HEIGHT, NEIGHBOR_RADIUS, MAX_RADIUS);
        grid.rebuild(&grains);

        let mut found = BTreeSet::new();
        grid.for_each_candidate_pair(|a, b| {
            if grains[a].surface_gap(&grains[b]) <= NEIGHBOR_RADIUS {
                let fresh = found.insert((a.min(b), a.max(b)));
                assert!(fresh, "trial {trial}: pair ({a},{b}) interacted twice");
            }
        });

        let expected = brute_force_pairs(&grains);
        assert_eq!(
            found, expected,
            "trial {trial}: cell-index pairs diverge from brute force"
        );
    }
}

#[test]
fn dense_cluster_in_one_cell_is_fully_paired() {
    // Several grains piled into a single cell: every unordered pair must
    // surface exactly once through the same-cell enumeration.
    let grains: Vec<Grain> = (0..6)
        .map(|id| {
            Grain::new(
                id,
                DVec2::new(0.05 + id as f64 * 1e-4, 0.05 + id as f64 * 1e-4),
                0.01,
            )
        })
        .collect();
    let mut grid = SpatialGrid::new(WIDTH, HEIGHT, NEIGHBOR_RADIUS, MAX_RADIUS);
    grid.rebuild(&grains);

    let mut count = 0;
    grid.for_each_candidate_pair(|a, b| {
        if grains[a].surface_gap(&grains[b]) <= NEIGHBOR_RADIUS {
            count += 1;
        }
    });
    assert_eq!(count, 6 * 5 / 2, "all 15 pairs of the cluster must interact");
}
