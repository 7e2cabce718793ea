//! Grain entities for the silo simulation
//!
//! Grains are frictional point-mass disks: position, velocity, radius.
//! No angular state - contacts apply tangential friction but never torque.
//!
//! Grains are never destroyed. A grain that leaves through the opening is
//! recycled (repositioned) by the silo, so its id stays a valid dense index
//! into the per-step force arrays for the whole run.

use glam::DVec2;

/// A rigid circular grain.
#[derive(Clone, Debug)]
pub struct Grain {
    /// Dense index (0..N-1), stable for the lifetime of the run.
    /// Used directly to index per-step force arrays, no lookup table.
    pub id: usize,
    pub position: DVec2,
    pub velocity: DVec2,
    /// Immutable after creation.
    pub radius: f64,
    /// Pair-contact force accumulated this step, reset every force assembly.
    pub contact_force: DVec2,
    /// Ids of grains within neighbor range this step (diagnostic only).
    pub neighbors: Vec<usize>,
}

impl Grain {
    pub fn new(id: usize, position: DVec2, radius: f64) -> Self {
        Self {
            id,
            position,
            velocity: DVec2::ZERO,
            radius,
            contact_force: DVec2::ZERO,
            neighbors: Vec::new(),
        }
    }

    /// Surface-to-surface gap: center distance minus both radii.
    /// Negative when the disks overlap.
    #[inline]
    pub fn surface_gap(&self, other: &Grain) -> f64 {
        self.position.distance(other.position) - self.radius - other.radius
    }

    /// Clear the per-step accumulators before a new force assembly.
    pub fn reset_contact(&mut self) {
        self.contact_force = DVec2::ZERO;
        self.neighbors.clear();
    }
}

/// Fixed pseudo-particle marking one lip of the silo opening.
///
/// Zero radius, zero velocity, never integrated: its x is fixed at
/// construction and its y tracks the oscillating base offset. Grains
/// collide with it through the ordinary pairwise contact law, which is
/// what makes the opening edge geometrically "hard".
#[derive(Clone, Copy, Debug)]
pub struct EdgeDisk {
    pub x: f64,
    pub y: f64,
}

impl EdgeDisk {
    pub const RADIUS: f64 = 0.0;

    pub fn new(x: f64) -> Self {
        Self { x, y: 0.0 }
    }

    #[inline]
    pub fn position(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_gap_is_negative_on_overlap() {
        let a = Grain::new(0, DVec2::new(0.0, 0.0), 1.0);
        let b = Grain::new(1, DVec2::new(1.5, 0.0), 1.0);
        assert!(a.surface_gap(&b) < 0.0, "overlapping disks should report a negative gap");
        assert_eq!(a.surface_gap(&b), b.surface_gap(&a));
    }

    #[test]
    fn reset_clears_force_and_neighbors() {
        let mut g = Grain::new(0, DVec2::ZERO, 1.0);
        g.contact_force = DVec2::new(3.0, -2.0);
        g.neighbors.push(7);
        g.reset_contact();
        assert_eq!(g.contact_force, DVec2::ZERO);
        assert!(g.neighbors.is_empty());
    }
}
