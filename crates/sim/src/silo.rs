//! Vibrating silo container: force assembly and base kinematics
//!
//! The silo owns the grain population, the neighbor grid, the oscillating
//! base state and the two fixed opening-edge disks. One call to
//! [`Silo::compute_forces`] performs a full force assembly: pairwise
//! contacts via the cell-index pass, then gravity, walls, floor and
//! opening-edge terms per grain.
//!
//! Grains that fall far enough below the base are recycled back into the
//! bulk instead of being removed. The population stays fixed while the
//! cumulative discharge counter measures flow - the steady-state
//! "infinite reservoir" abstraction used for discharge-rate statistics.

use crate::contact::{contact_force, pair_force, ContactParams, Wall};
use crate::grid::SpatialGrid;
use crate::particle::{EdgeDisk, Grain};
use glam::DVec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

/// Silo geometry, base oscillation and contact-law configuration.
///
/// Defaults carry the reference run: a 0.2 m x 0.7 m silo of 1 g grains
/// with radii up to 1.1 cm.
#[derive(Clone, Copy, Debug)]
pub struct SiloParams {
    /// Domain width (m).
    pub width: f64,
    /// Domain height (m).
    pub height: f64,
    /// Opening width (m), centered on the floor.
    pub opening: f64,
    /// Base oscillation angular frequency (rad/s).
    pub frequency: f64,
    /// Base oscillation amplitude (m).
    pub amplitude: f64,
    /// Normal spring stiffness (N/m).
    pub kn: f64,
    /// Normal viscous damping coefficient.
    pub gamma: f64,
    /// Kinetic friction coefficient.
    pub mu: f64,
    /// Gravitational acceleration magnitude (m/s^2).
    pub gravity: f64,
    /// Grain mass (kg), uniform across the population.
    pub mass: f64,
    /// Extra surface-to-surface range of the neighbor search (m).
    pub neighbor_radius: f64,
    /// Smallest grain radius the generator may draw (m).
    pub min_radius: f64,
    /// Largest grain radius (m); also sizes the neighbor-grid cells.
    pub max_radius: f64,
}

impl Default for SiloParams {
    fn default() -> Self {
        Self {
            width: 0.2,
            height: 0.7,
            opening: 0.03,
            frequency: 20.0,
            amplitude: 0.0015,
            kn: 250.0,
            gamma: 0.1,
            mu: 0.5,
            gravity: 9.8,
            mass: 0.001,
            neighbor_radius: 0.001,
            min_radius: 0.009,
            max_radius: 0.011,
        }
    }
}

#[derive(Debug, Error)]
pub enum SiloError {
    #[error("domain extents must be positive (width={width}, height={height})")]
    BadExtents { width: f64, height: f64 },
    #[error("opening ({opening}) must fit inside the domain width ({width})")]
    OpeningTooWide { opening: f64, width: f64 },
    #[error("radius bounds must satisfy 0 < min ({min}) <= max ({max})")]
    BadRadii { min: f64, max: f64 },
}

/// The silo container. See the module docs for the ownership picture.
pub struct Silo {
    params: SiloParams,
    contact: ContactParams,
    grains: Vec<Grain>,
    grid: SpatialGrid,
    left_edge: EdgeDisk,
    right_edge: EdgeDisk,
    /// Current vertical offset of the oscillating base.
    ys: f64,
    current_time: f64,
    /// Cumulative count of discharged (recycled) grains. Never decreases.
    total_flow: u64,
    rng: StdRng,
}

impl Silo {
    /// Validates the parameter set and builds an empty silo. `seed` feeds
    /// the recycling draws, so runs are reproducible given the seed.
    pub fn new(params: SiloParams, seed: u64) -> Result<Self, SiloError> {
        if params.width <= 0.0 || params.height <= 0.0 {
            return Err(SiloError::BadExtents {
                width: params.width,
                height: params.height,
            });
        }
        if params.opening < 0.0 || params.opening >= params.width {
            return Err(SiloError::OpeningTooWide {
                opening: params.opening,
                width: params.width,
            });
        }
        if params.min_radius <= 0.0 || params.min_radius > params.max_radius {
            return Err(SiloError::BadRadii {
                min: params.min_radius,
                max: params.max_radius,
            });
        }
        let grid = SpatialGrid::new(
            params.width,
            params.height,
            params.neighbor_radius,
            params.max_radius,
        );
        let left_lip = (params.width - params.opening) / 2.0;
        let right_lip = params.width - left_lip;
        Ok(Self {
            params,
            contact: ContactParams::new(params.kn, params.gamma, params.mu),
            grains: Vec::new(),
            grid,
            left_edge: EdgeDisk::new(left_lip),
            right_edge: EdgeDisk::new(right_lip),
            ys: 0.0,
            current_time: 0.0,
            total_flow: 0,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Insert a grain. Ids must arrive dense and in order; they double as
    /// indices into the per-step force arrays.
    pub fn add_grain(&mut self, grain: Grain) {
        debug_assert_eq!(grain.id, self.grains.len(), "grain ids must be dense and in order");
        self.grains.push(grain);
    }

    pub fn grain_count(&self) -> usize {
        self.grains.len()
    }

    pub fn grains(&self) -> &[Grain] {
        &self.grains
    }

    pub(crate) fn grains_mut(&mut self) -> &mut [Grain] {
        &mut self.grains
    }

    pub fn params(&self) -> &SiloParams {
        &self.params
    }

    pub fn total_flow(&self) -> u64 {
        self.total_flow
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Current vertical offset of the oscillating base.
    pub fn base_offset(&self) -> f64 {
        self.ys
    }

    /// Advance the base clock: move the floor plane and the opening-edge
    /// disks to `ys = A sin(w t)`, then recycle every grain that has
    /// fallen a tenth of the silo height below the base. A recycled grain
    /// reappears in the upper bulk with zero velocity and bumps the
    /// discharge counter; the population size never changes.
    pub fn update_base(&mut self, dt: f64) {
        self.current_time += dt;
        self.ys = self.params.amplitude * (self.params.frequency * self.current_time).sin();
        self.left_edge.y = self.ys;
        self.right_edge.y = self.ys;

        let width = self.params.width;
        let height = self.params.height;
        let max_radius = self.params.max_radius;
        for grain in &mut self.grains {
            if grain.position.y - self.ys <= -height / 10.0 {
                grain.position.y = (0.4 + 0.3 * self.rng.gen::<f64>()) * height;
                grain.position.x =
                    (self.rng.gen::<f64>() * width).clamp(max_radius, width - max_radius);
                grain.velocity = DVec2::ZERO;
                self.total_flow += 1;
            }
        }
    }

    /// Full force assembly at the current state. Returns a dense array
    /// indexed by grain id.
    pub fn compute_forces(&mut self) -> Vec<DVec2> {
        for grain in &mut self.grains {
            grain.reset_contact();
        }
        self.grid.rebuild(&self.grains);
        self.accumulate_pair_contacts();

        let left_lip = self.left_edge.x;
        let right_lip = self.right_edge.x;
        let gravity = DVec2::new(0.0, -self.params.gravity * self.params.mass);
        let width = self.params.width;

        let mut forces = vec![DVec2::ZERO; self.grains.len()];
        for grain in &self.grains {
            let mut force = gravity + grain.contact_force;

            if grain.position.x - grain.radius < 0.0 {
                let (en, et) = Wall::Left.versors();
                let xi = grain.position.x - grain.radius;
                force += contact_force(xi, grain.velocity, en, et, &self.contact);
            } else if grain.position.x + grain.radius > width {
                let (en, et) = Wall::Right.versors();
                let xi = (width - grain.position.x) - grain.radius;
                force += contact_force(xi, grain.velocity, en, et, &self.contact);
            }

            // The grain's vertical span straddles the base plane: either
            // the floor band or, inside the half-open opening span, the
            // two edge disks.
            if grain.position.y - grain.radius < self.ys && grain.position.y + grain.radius > self.ys
            {
                if grain.position.x < left_lip || grain.position.x >= right_lip {
                    let (en, et) = Wall::Down.versors();
                    let xi = (grain.position.y - self.ys) - grain.radius;
                    force += contact_force(xi, grain.velocity, en, et, &self.contact);
                } else {
                    force += pair_force(
                        grain.position,
                        grain.velocity,
                        grain.radius,
                        self.left_edge.position(),
                        DVec2::ZERO,
                        EdgeDisk::RADIUS,
                        &self.contact,
                    );
                    force += pair_force(
                        grain.position,
                        grain.velocity,
                        grain.radius,
                        self.right_edge.position(),
                        DVec2::ZERO,
                        EdgeDisk::RADIUS,
                        &self.contact,
                    );
                }
            }

            forces[grain.id] = force;
        }
        forces
    }

    /// Cell-index pass: apply the pairwise law to every candidate pair
    /// within neighbor range, once per unordered pair, with the exact
    /// negation on the second body.
    fn accumulate_pair_contacts(&mut self) {
        let Self {
            grid,
            grains,
            contact,
            params,
            ..
        } = self;
        let neighbor_radius = params.neighbor_radius;
        grid.for_each_candidate_pair(|a, b| {
            let ga = &grains[a];
            let gb = &grains[b];
            if ga.surface_gap(gb) <= neighbor_radius {
                let force = pair_force(
                    ga.position,
                    ga.velocity,
                    ga.radius,
                    gb.position,
                    gb.velocity,
                    gb.radius,
                    contact,
                );
                grains[a].contact_force += force;
                grains[b].contact_force -= force;
                grains[a].neighbors.push(b);
                grains[b].neighbors.push(a);
            }
        });
    }
}
