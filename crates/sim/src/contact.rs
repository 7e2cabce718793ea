//! Spring-dashpot contact model with Coulomb-capped kinetic friction
//!
//! Normal force: linear spring on the overlap plus viscous damping along
//! the contact normal. Tangential force: kinetic Coulomb friction capped
//! by the normal magnitude - no static-friction regime, so a grain at the
//! sticking threshold simply sees the friction sign flip with the sliding
//! direction.
//!
//! Reference: Cundall & Strack 1979 "A discrete numerical model for
//! granular assemblies"

use glam::DVec2;

/// Contact-law coefficients shared by grain-grain and grain-wall contacts.
#[derive(Clone, Copy, Debug)]
pub struct ContactParams {
    /// Normal spring stiffness (N/m).
    pub kn: f64,
    /// Shear stiffness, fixed at 2*kn. Not consumed by the normal law;
    /// kept because downstream analysis reads it from the parameter set.
    pub ky: f64,
    /// Viscous damping coefficient along the normal.
    pub gamma: f64,
    /// Kinetic Coulomb friction coefficient.
    pub mu: f64,
}

impl ContactParams {
    pub fn new(kn: f64, gamma: f64, mu: f64) -> Self {
        Self {
            kn,
            ky: 2.0 * kn,
            gamma,
            mu,
        }
    }
}

/// Silo walls with fixed unit normal/tangent versors.
///
/// Normals point into the domain, so a positive spring coefficient pushes
/// the grain back inside.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wall {
    Left,
    Right,
    Down,
}

impl Wall {
    /// (normal, tangent) unit-vector pair for this wall.
    #[inline]
    pub fn versors(self) -> (DVec2, DVec2) {
        match self {
            Wall::Left => (DVec2::new(1.0, 0.0), DVec2::new(0.0, 1.0)),
            Wall::Right => (DVec2::new(-1.0, 0.0), DVec2::new(0.0, -1.0)),
            Wall::Down => (DVec2::new(0.0, 1.0), DVec2::new(-1.0, 0.0)),
        }
    }
}

/// Core contact law: normal spring-dashpot plus Coulomb friction along
/// the versor pair (en, et).
///
/// `xi` is the signed spring elongation along `en` (the spring term is
/// `-kn * xi`) and `dv` the relative velocity seen by the body the force
/// applies to. Callers decide when contact geometrically exists; this
/// function does not gate on the sign of `xi` because wall contacts feed
/// it a negative elongation.
#[inline]
pub fn contact_force(xi: f64, dv: DVec2, en: DVec2, et: DVec2, params: &ContactParams) -> DVec2 {
    let fn_coeff = -params.kn * xi - params.gamma * dv.dot(en);
    let fn_vec = fn_coeff * en;
    let slide = dv.dot(et);
    if slide == 0.0 {
        // f64::signum(0.0) is 1.0; a contact that is not sliding must not
        // see any friction.
        return fn_vec;
    }
    let ft_coeff = -params.mu * fn_vec.length() * slide.signum();
    fn_vec + ft_coeff * et
}

/// Contact force between two disks, applied to the first body.
///
/// Overlap `xi = r1 + r2 - dr`; zero force when the surfaces do not
/// penetrate. Newton's third law is the caller's job: add the result to
/// body 1 and subtract it from body 2.
pub fn pair_force(
    pos1: DVec2,
    vel1: DVec2,
    r1: f64,
    pos2: DVec2,
    vel2: DVec2,
    r2: f64,
    params: &ContactParams,
) -> DVec2 {
    let delta = pos2 - pos1;
    let dr = delta.length();
    let xi = r1 + r2 - dr;
    if xi <= 0.0 || dr <= 0.0 {
        return DVec2::ZERO;
    }
    let en = delta / dr;
    let et = DVec2::new(-en.y, en.x);
    contact_force(xi, vel2 - vel1, en, et, params)
}
