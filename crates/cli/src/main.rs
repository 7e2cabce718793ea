//! silo - granular flow through a vibrating silo (DEM)
//!
//! Packs an initial bed of grains, integrates with the Beeman
//! predictor-corrector, and records every sampled snapshot to a
//! line-oriented output file for the downstream analysis tooling.

mod recorder;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use recorder::Recorder;
use silo_sim::{generate, Beeman, Silo, SiloParams};
use std::path::PathBuf;

/// Samples per simulated time unit. One snapshot is recorded every
/// `1 / (SMOOTHING_FACTOR * dt)` integration steps.
const SMOOTHING_FACTOR: f64 = 10.0;

#[derive(Parser)]
#[command(name = "silo")]
#[command(about = "Granular flow through a vibrating silo (DEM)", long_about = None)]
struct Cli {
    /// Base oscillation angular frequency (rad/s)
    #[arg(short = 'w', long)]
    frequency: f64,

    /// Opening width (m)
    #[arg(short = 'd', long)]
    opening: f64,

    /// Output file path
    #[arg(long, default_value = "output.txt")]
    out: PathBuf,

    /// Number of grains to pack initially
    #[arg(long, default_value_t = 200)]
    grains: usize,

    /// Seed for packing and recycling draws; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Integration time step (s)
    #[arg(long, default_value_t = 1e-4)]
    dt: f64,

    /// Simulated time to run (s)
    #[arg(long, default_value_t = 1000.0)]
    max_time: f64,
}

/// Integration steps between recorded snapshots.
fn sample_stride(dt: f64) -> u64 {
    ((1.0 / (SMOOTHING_FACTOR * dt)).round() as u64).max(1)
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let seed = cli.seed.unwrap_or_else(rand::random);
    log::info!("seed = {seed}");

    let params = SiloParams {
        frequency: cli.frequency,
        opening: cli.opening,
        ..SiloParams::default()
    };
    let mut silo = Silo::new(params, seed)?;

    let mut rng = StdRng::seed_from_u64(seed);
    let report = generate(
        cli.grains,
        &mut rng,
        params.width,
        params.height,
        params.min_radius,
        params.max_radius,
        |grain| silo.add_grain(grain),
    );
    log::info!("packed {} of {} grains", report.placed, report.requested);

    let stride = sample_stride(cli.dt);
    let mut recorder = Recorder::create(&cli.out)?;
    let mut integrator = Beeman::new(silo, cli.dt, cli.max_time, params.mass);
    let mut step: u64 = 0;
    while let Some(snapshot) = integrator.advance() {
        if step % stride == 0 {
            recorder.record(&snapshot)?;
            println!("{:.4}", snapshot.time);
        }
        step += 1;
    }
    recorder.finish()?;
    Ok(())
}
