//! Granular silo discharge simulation - DEM engine
//!
//! Discrete-element simulation of grains flowing through a vibrating
//! silo: short-range spring-dashpot contacts with Coulomb friction, a
//! cell-index neighbor search, a sinusoidally oscillating base that
//! recycles discharged grains, and a Beeman predictor-corrector
//! integrator.
//!
//! The pipeline is strictly sequential and pull-driven: the caller asks
//! the integrator for one step at a time and stops consuming to cancel.
//!
//! This crate is interface-agnostic - it simulates only. The `silo-cli`
//! crate handles configuration and output recording.

pub mod beeman;
pub mod contact;
pub mod generator;
pub mod grid;
pub mod particle;
pub mod silo;

pub use beeman::{Beeman, Snapshot};
pub use contact::{contact_force, pair_force, ContactParams, Wall};
pub use generator::{generate, PackingReport};
pub use grid::SpatialGrid;
pub use particle::{EdgeDisk, Grain};
pub use silo::{Silo, SiloError, SiloParams};
