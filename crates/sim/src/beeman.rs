//! Beeman predictor-corrector time integration
//!
//! Third-order positions, better velocity accuracy than plain Verlet, at
//! the cost of carrying the previous step's force field and re-evaluating
//! forces once at the predicted state.
//!
//! Per step, with force samples F(t) and F(t-dt):
//!
//! ```text
//! x(t+dt)      = x + v dt + (2/3) dt^2 F(t)/m - (1/6) dt^2 F(t-dt)/m
//! v_pred(t+dt) = v + (3/2) dt F(t)/m - (1/2) dt F(t-dt)/m
//! F(t+dt)      = forces at the predicted state
//! v(t+dt)      = v + (1/3) dt F(t+dt)/m + (5/6) dt F(t)/m - (1/6) dt F(t-dt)/m
//! ```
//!
//! The previous-force history is bootstrapped by reusing F(0) as F(-dt);
//! only the accuracy of the very first step is affected.

use crate::particle::Grain;
use crate::silo::Silo;
use glam::DVec2;

/// One integration step's output.
///
/// `grains` borrows live state: positions and velocities keep mutating on
/// the next [`Beeman::advance`] call, which the borrow checker enforces.
/// Copy eagerly if the data must outlive the step.
pub struct Snapshot<'a> {
    pub time: f64,
    pub total_flow: u64,
    pub grains: &'a [Grain],
}

/// Drives the simulation clock over a silo it owns. The step sequence is
/// finite and not restartable: construct a fresh integrator to run again.
pub struct Beeman {
    silo: Silo,
    dt: f64,
    max_time: f64,
    mass: f64,
    time: f64,
    /// F(t-dt), indexed by grain id. Must survive until the corrector of
    /// the same step has consumed it.
    prev_forces: Vec<DVec2>,
    /// v(t) saved before the predictor commits, consumed by the corrector.
    saved_velocities: Vec<DVec2>,
}

impl Beeman {
    pub fn new(mut silo: Silo, dt: f64, max_time: f64, mass: f64) -> Self {
        let prev_forces = silo.compute_forces();
        let count = silo.grain_count();
        Self {
            silo,
            dt,
            max_time,
            mass,
            time: 0.0,
            prev_forces,
            saved_velocities: vec![DVec2::ZERO; count],
        }
    }

    pub fn silo(&self) -> &Silo {
        &self.silo
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Advance one step and return its snapshot, or `None` once the
    /// simulated time has passed `max_time`.
    pub fn advance(&mut self) -> Option<Snapshot<'_>> {
        if self.time > self.max_time {
            return None;
        }
        let dt = self.dt;
        let dt2 = dt * dt;
        let m = self.mass;

        self.silo.update_base(dt);
        let forces = self.silo.compute_forces();

        // Predict: commit x(t+dt) and v_pred so the next force evaluation
        // sees the predicted state.
        for grain in self.silo.grains_mut() {
            let f = forces[grain.id];
            let fp = self.prev_forces[grain.id];
            self.saved_velocities[grain.id] = grain.velocity;
            grain.position +=
                grain.velocity * dt + dt2 * (2.0 / 3.0) * f / m - dt2 * fp / (6.0 * m);
            grain.velocity += 1.5 * dt * f / m - 0.5 * dt * fp / m;
        }

        let next_forces = self.silo.compute_forces();

        // Correct the velocity from the saved v(t), not the prediction.
        for grain in self.silo.grains_mut() {
            let v = self.saved_velocities[grain.id];
            grain.velocity = v
                + dt * next_forces[grain.id] / (3.0 * m)
                + 5.0 * dt * forces[grain.id] / (6.0 * m)
                - dt * self.prev_forces[grain.id] / (6.0 * m);
        }

        self.time += dt;
        self.prev_forces = forces;
        Some(Snapshot {
            time: self.time,
            total_flow: self.silo.total_flow(),
            grains: self.silo.grains(),
        })
    }
}
