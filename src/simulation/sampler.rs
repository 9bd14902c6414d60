//! Initial condition sampling
//!
//! Places tracers on a ring of radius R0, either exactly (uniform angle
//! spacing, circular velocity) or with Gaussian scatter in radius and radial
//! velocity. Sampling is driven by a seeded `ChaChaRng` so a given seed and
//! parameter set always gives the same tracers.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;
use rand_distr::{Distribution, Normal};
use std::f64::consts::TAU;

use crate::configuration::config::InitialConfig;
use crate::error::{SimError, SimResult};
use crate::simulation::params::{Parameters, PhysicalConstants};
use crate::simulation::states::{PolarTracer, System, Tracer};

/// Tracers evenly spaced in angle at exactly `r0`, moving at `v_c`
///
/// Angles are 2π i / n for i in 0..n, so none is repeated at 2π.
pub fn sample_ring(n: usize, r0: f64, v_c: f64) -> SimResult<Vec<PolarTracer>> {
    check_ring(n, r0)?;

    Ok((0..n)
        .map(|i| PolarTracer {
            r: r0,
            theta: TAU * i as f64 / n as f64,
            v_r: 0.0,
            v_theta: v_c,
        })
        .collect())
}

/// Tracers scattered around `r0`
///
/// - R = r0 + N(0, sigma_r), redrawn while R <= 0
/// - θ ~ U(0, 2π)
/// - v_R ~ N(0, sigma_v)
/// - v_θ = v_c sqrt(r0 / R), the near-circular speed for the displaced radius
///
/// All radii are drawn first, then all angles, then all radial velocities.
pub fn sample_noisy_ring(
    rng: &mut ChaChaRng,
    n: usize,
    r0: f64,
    v_c: f64,
    sigma_r: f64,
    sigma_v: f64,
) -> SimResult<Vec<PolarTracer>> {
    check_ring(n, r0)?;

    let radius_dist = Normal::new(r0, sigma_r)
        .map_err(|e| SimError::invalid("sigma_r", e.to_string()))?;
    let v_r_dist = Normal::new(0.0, sigma_v)
        .map_err(|e| SimError::invalid("sigma_v", e.to_string()))?;

    let radii: Vec<f64> = (0..n)
        .map(|_| loop {
            let r = radius_dist.sample(rng);
            if r > 0.0 {
                break r;
            }
        })
        .collect();
    let angles: Vec<f64> = (0..n).map(|_| rng.random_range(0.0..TAU)).collect();
    let v_rs: Vec<f64> = (0..n).map(|_| v_r_dist.sample(rng)).collect();

    Ok(radii
        .into_iter()
        .zip(angles)
        .zip(v_rs)
        .map(|((r, theta), v_r)| PolarTracer {
            r,
            theta,
            v_r,
            v_theta: v_c * (r0 / r).sqrt(),
        })
        .collect())
}

/// Sample the initial system for a run
pub fn sample_system(
    initial: InitialConfig,
    params: &Parameters,
    constants: &PhysicalConstants,
) -> SimResult<System> {
    let polar = match initial {
        InitialConfig::Ring => sample_ring(params.n_particles, params.r0, constants.v_c)?,
        InitialConfig::NoisyRing => {
            let mut rng = ChaChaRng::seed_from_u64(params.seed);
            sample_noisy_ring(
                &mut rng,
                params.n_particles,
                params.r0,
                constants.v_c,
                params.sigma_r,
                params.sigma_v,
            )?
        }
    };

    let tracers: Vec<Tracer> = polar.iter().map(PolarTracer::to_cartesian).collect();
    Ok(System::new(tracers))
}

fn check_ring(n: usize, r0: f64) -> SimResult<()> {
    if n == 0 {
        return Err(SimError::invalid("n_particles", "at least one tracer is required"));
    }
    if !(r0.is_finite() && r0 > 0.0) {
        return Err(SimError::invalid("r0", format!("must be finite and > 0, got {r0}")));
    }
    Ok(())
}
