use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaChaRng;

use crate::simulation::forces::{AccelSet, LogarithmicHalo};
use crate::simulation::params::{Parameters, PhysicalConstants};
use crate::simulation::integrator::{verlet_integrator, verlet_polar};
use crate::simulation::sampler::sample_noisy_ring;
use crate::simulation::states::{PolarTracer, System};
use crate::simulation::diagnostics::{energies, max_abs_change};

/// Helper to build a noisy M31-like ring of size `n`
fn make_system(n: usize, constants: &PhysicalConstants) -> System {
    let mut rng = ChaChaRng::seed_from_u64(42);
    let polar = sample_noisy_ring(&mut rng, n, 9.0, constants.v_c, 0.3, constants.kms(8.0))
        .expect("benchmark ring inputs are valid");
    System::new(polar.iter().map(PolarTracer::to_cartesian).collect())
}

fn make_params(n: usize, h0: f64) -> Parameters {
    Parameters {
        n_particles: n,
        r0: 9.0,
        sigma_r: 0.3,
        sigma_v: PhysicalConstants::from_kms(220.0).kms(8.0),
        t_end: 1.0,
        h0,
        save_interval: 1000,
        seed: 42,
        eps2: 1e-8,
    }
}

/// Time per step of both integrators for a range of n
/// Paste output directly into a spreadsheet to graph
pub fn bench_step() {
    let constants = PhysicalConstants::from_kms(220.0);
    let forces = AccelSet::new().with(LogarithmicHalo::new(constants.v_c, 1e-8));
    let steps = 200;

    println!("N,cartesian_us,polar_us");

    for n in [500, 1000, 2000, 4000, 8000, 16000, 32000] {
        let params = make_params(n, 0.001);

        let mut sys = make_system(n, &constants);
        // Warm-up
        verlet_integrator(&mut sys, &forces, &params);

        let t0 = Instant::now();
        for _ in 0..steps {
            verlet_integrator(&mut sys, &forces, &params);
        }
        let cartesian = t0.elapsed().as_secs_f64() * 1e6 / steps as f64;

        let mut polar = make_system(n, &constants).to_polar();
        verlet_polar(&mut polar, &forces, &params);

        let t1 = Instant::now();
        for _ in 0..steps {
            verlet_polar(&mut polar, &forces, &params);
        }
        let polar_us = t1.elapsed().as_secs_f64() * 1e6 / steps as f64;

        println!("{},{:.3},{:.3}", n, cartesian, polar_us);
    }
}

/// Max energy error after 1 Gyr against step size
/// Halving dt should cut the error by about 4 for a second order scheme
pub fn bench_energy_curve() {
    let constants = PhysicalConstants::from_kms(220.0);
    let forces = AccelSet::new().with(LogarithmicHalo::new(constants.v_c, 1e-8));
    let n = 100;

    println!("dt,max_abs_dE,ratio");

    let mut previous: Option<f64> = None;
    for h0 in [4e-3, 2e-3, 1e-3, 5e-4, 2.5e-4, 1.25e-4] {
        let params = make_params(n, h0);
        let mut sys = make_system(n, &constants);
        let e0 = energies(&sys.tracers, &forces);

        for _ in 0..params.n_steps() {
            verlet_integrator(&mut sys, &forces, &params);
        }
        let err = max_abs_change(&e0, &energies(&sys.tracers, &forces));

        let ratio = previous.map_or(f64::NAN, |p| p / err);
        println!("{},{:.6e},{:.3}", h0, err, ratio);
        previous = Some(err);
    }
}
