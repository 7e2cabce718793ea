//! Initial packing: non-overlapping disks placed through a spatial hash
//!
//! Candidate centers are drawn uniformly inside the radius-inset domain
//! and tested for circle-circle overlap against the candidate's own hash
//! cell plus its 8 neighbors. Cells are `2 * r_max` wide, so any disk that
//! could overlap the candidate lives in that neighborhood. A disk that
//! finds no collision-free slot within the retry budget is skipped and
//! reported; there is no backtracking or relaxation, so the placed count
//! can fall short of the request.

use crate::particle::Grain;
use glam::DVec2;
use rand::Rng;
use rustc_hash::FxHashMap;

/// Random candidate draws per disk before giving up on it.
const MAX_ATTEMPTS: usize = 2000;

/// Own cell plus the 8 surrounding cells.
const NEIGHBORHOOD: [(i64, i64); 9] = [
    (0, 0),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Outcome of a packing run. `placed + failed == requested`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PackingReport {
    pub requested: usize,
    pub placed: usize,
    pub failed: usize,
}

/// Unbounded spatial hash of already-placed disks, keyed by cell.
struct PackingHash {
    cell_size: f64,
    cells: FxHashMap<(i64, i64), Vec<(DVec2, f64)>>,
}

impl PackingHash {
    fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            cells: FxHashMap::default(),
        }
    }

    fn key(&self, center: DVec2) -> (i64, i64) {
        (
            (center.x / self.cell_size).floor() as i64,
            (center.y / self.cell_size).floor() as i64,
        )
    }

    /// Does a disk at `center` with `radius` overlap any placed disk?
    fn collides(&self, center: DVec2, radius: f64) -> bool {
        let (ci, cj) = self.key(center);
        for (di, dj) in NEIGHBORHOOD {
            let Some(disks) = self.cells.get(&(ci + di, cj + dj)) else {
                continue;
            };
            for &(other, other_radius) in disks {
                let min_dist = radius + other_radius;
                if center.distance_squared(other) < min_dist * min_dist {
                    return true;
                }
            }
        }
        false
    }

    fn insert(&mut self, center: DVec2, radius: f64) {
        self.cells
            .entry(self.key(center))
            .or_default()
            .push((center, radius));
    }
}

/// Pack up to `count` disks with radii uniform in `[r_min, r_max]` into a
/// `width x height` domain without overlap, handing each accepted grain to
/// `sink`. Ids are assigned densely in placement order, so failures leave
/// no holes in the id space.
pub fn generate(
    count: usize,
    rng: &mut impl Rng,
    width: f64,
    height: f64,
    r_min: f64,
    r_max: f64,
    mut sink: impl FnMut(Grain),
) -> PackingReport {
    let mut hash = PackingHash::new(2.0 * r_max);
    let mut placed = 0;
    let mut failed = 0;

    for i in 0..count {
        let mut accepted = false;
        for _ in 0..MAX_ATTEMPTS {
            let radius = rng.gen_range(r_min..=r_max);
            let center = DVec2::new(
                rng.gen::<f64>() * (width - 2.0 * radius) + radius,
                rng.gen::<f64>() * (height - 2.0 * radius) + radius,
            );
            if !hash.collides(center, radius) {
                hash.insert(center, radius);
                sink(Grain::new(placed, center, radius));
                placed += 1;
                accepted = true;
                break;
            }
        }
        if !accepted {
            failed += 1;
            log::warn!("no collision-free slot for disk {i} after {MAX_ATTEMPTS} attempts");
        }
    }

    log::info!("packing finished: requested={count} placed={placed} failed={failed}");
    PackingReport {
        requested: count,
        placed,
        failed,
    }
}
