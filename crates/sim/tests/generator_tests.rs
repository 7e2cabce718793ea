//! Packing generator properties

use rand::rngs::StdRng;
use rand::SeedableRng;
use silo_sim::{generate, Grain};

const WIDTH: f64 = 0.2;
const HEIGHT: f64 = 0.7;
const R_MIN: f64 = 0.009;
const R_MAX: f64 = 0.011;

#[test]
fn packing_has_no_overlaps_and_stays_in_bounds() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut grains: Vec<Grain> = Vec::new();
    let report = generate(200, &mut rng, WIDTH, HEIGHT, R_MIN, R_MAX, |g| grains.push(g));

    assert_eq!(report.requested, 200);
    assert_eq!(report.placed, grains.len());
    assert_eq!(report.placed + report.failed, report.requested);
    assert!(report.placed > 0, "a 4% fill must place grains");

    for (k, a) in grains.iter().enumerate() {
        assert_eq!(a.id, k, "ids must be dense in placement order");
        assert!(a.radius >= R_MIN && a.radius <= R_MAX);
        assert!(
            a.position.x >= a.radius && a.position.x <= WIDTH - a.radius,
            "grain {k} leaks through a side wall: {:?}",
            a.position
        );
        assert!(
            a.position.y >= a.radius && a.position.y <= HEIGHT - a.radius,
            "grain {k} leaks through floor or ceiling: {:?}",
            a.position
        );
        for b in &grains[k + 1..] {
            let dist = a.position.distance(b.position);
            assert!(
                dist >= a.radius + b.radius - 1e-12,
                "grains {} and {} overlap: dist {dist}",
                a.id,
                b.id
            );
        }
    }
}

#[test]
fn seeded_packings_are_reproducible() {
    let run = || {
        let mut rng = StdRng::seed_from_u64(1234);
        let mut grains: Vec<(f64, f64, f64)> = Vec::new();
        generate(50, &mut rng, WIDTH, HEIGHT, R_MIN, R_MAX, |g| {
            grains.push((g.position.x, g.position.y, g.radius))
        });
        grains
    };
    assert_eq!(run(), run(), "the same seed must reproduce the same packing");
}

#[test]
fn overfull_domain_reports_failures_without_holes_in_ids() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut grains: Vec<Grain> = Vec::new();
    // A 5 cm box cannot hold 50 disks of ~1 cm radius.
    let report = generate(50, &mut rng, 0.05, 0.05, R_MIN, R_MAX, |g| grains.push(g));

    assert!(report.failed > 0, "an overfull domain must report skipped disks");
    assert_eq!(report.placed, grains.len());
    assert_eq!(report.placed + report.failed, 50);
    for (k, g) in grains.iter().enumerate() {
        assert_eq!(g.id, k, "failures must not leave holes in the id space");
    }
}
