//! Fixed-step time integrators for the tracer system
//!
//! Provides a Cartesian velocity-Verlet step and its polar counterpart,
//! both driven by the same `AccelSet` and `Parameters`. Tracers never
//! interact, so each one is advanced independently.

use std::f64::consts::PI;

use super::forces::AccelSet;
use super::params::Parameters;
use super::states::{wrap_angle, NVec2, PolarSystem, PolarTracer, System};
use crate::error::{SimError, SimResult};

/// Advance the system by one step using velocity-Verlet (kick-drift-kick)
/// Uses two force evaluations per step and updates positions, velocities,
/// and `sys.t` in-place based on `params.h0`
pub fn verlet_integrator(sys: &mut System, forces: &AccelSet, params: &Parameters) {
    let n = sys.tracers.len();
    if n == 0 { // no tracers, return
        return;
    }

    let dt = params.h0; // time step dt
    let half_dt = 0.5 * dt; // half step dt/2, half update for verlet

    // a_old[i] holds a_n for tracer i at the current time t = sys.t
    let mut a_old = vec![NVec2::zeros(); n];
    forces.accumulate_accels(&*sys, &mut a_old);

    // Kick: v_n+1/2 = v_n + (1/2 * dt) * a_n
    for (b, a) in sys.tracers.iter_mut().zip(a_old.iter()) {
        b.v += half_dt * *a;
    }

    // Drift: x_n+1 = x_n + dt v_n+1/2
    for b in sys.tracers.iter_mut() {
        b.x += dt * b.v;
    }

    sys.t += dt;

    // a_n+1 from x_n+1
    let mut a_new = vec![NVec2::zeros(); n];
    forces.accumulate_accels(&*sys, &mut a_new);

    // Second kick: v_n+1 = v_n+1/2 + 0.5 dt a_n+1
    for (b, a) in sys.tracers.iter_mut().zip(a_new.iter()) {
        b.v += half_dt * *a;
    }
}

// =========================================================================================
// polar stuff below
// =========================================================================================

/// Advance the polar system by one step
///
/// The radial coordinate gets the same kick-drift-kick as the Cartesian
/// scheme, using the effective radial acceleration L²/R³ + a_r(R) where
/// L = R v_θ is conserved by the central force. The angle is advanced with
/// θ += (v_θ / R) dt after the drift, with v_θ = L / R at the new radius.
pub fn verlet_polar(sys: &mut PolarSystem, forces: &AccelSet, params: &Parameters) {
    let dt = params.h0;
    let half_dt = 0.5 * dt;

    for p in sys.tracers.iter_mut() {
        let l = p.r * p.v_theta;

        // Kick
        p.v_r += half_dt * effective_radial_acceleration(forces, l, p.r);

        // Drift
        p.r += dt * p.v_r;
        if p.r < 0.0 {
            // passed through the origin: same point seen from the opposite side
            p.r = -p.r;
            p.theta += PI;
            p.v_r = -p.v_r;
        }
        if p.r > 0.0 {
            p.v_theta = l / p.r;
            p.theta = wrap_angle(p.theta + p.v_theta / p.r * dt);
        }

        // Second kick
        p.v_r += half_dt * effective_radial_acceleration(forces, l, p.r);
    }

    sys.t += dt;
}

/// Radial acceleration felt in the rotating frame: centrifugal + potential
fn effective_radial_acceleration(forces: &AccelSet, l: f64, r: f64) -> f64 {
    let centrifugal = if l == 0.0 { 0.0 } else { l * l / (r * r * r) };
    centrifugal + forces.radial_acceleration(r)
}

/// Fail with the first tracer whose state is no longer finite
pub fn check_finite(sys: &System, step: usize) -> SimResult<()> {
    match sys.tracers.iter().position(|b| !b.is_finite()) {
        Some(index) => Err(SimError::NumericalInstability { step, index, t: sys.t }),
        None => Ok(()),
    }
}

/// Polar counterpart of [`check_finite`]
pub fn check_finite_polar(sys: &PolarSystem, step: usize) -> SimResult<()> {
    match sys.tracers.iter().position(|p: &PolarTracer| !p.is_finite()) {
        Some(index) => Err(SimError::NumericalInstability { step, index, t: sys.t }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::forces::LogarithmicHalo;
    use crate::simulation::states::Tracer;
    use approx::assert_relative_eq;

    fn params(h0: f64) -> Parameters {
        Parameters {
            n_particles: 1,
            r0: 1.0,
            sigma_r: 0.0,
            sigma_v: 0.0,
            t_end: 1.0,
            h0,
            save_interval: 1,
            seed: 0,
            eps2: 1e-8,
        }
    }

    #[test]
    fn single_step_matches_hand_computation() {
        let forces = AccelSet::new().with(LogarithmicHalo::new(1.0, 0.0));
        let p = params(0.1);
        let mut sys = System::new(vec![Tracer {
            x: NVec2::new(1.0, 0.0),
            v: NVec2::new(0.0, 1.0),
        }]);

        verlet_integrator(&mut sys, &forces, &p);

        // half kick: v = (-0.05, 1), drift: x = (0.995, 0.1)
        let x = NVec2::new(0.995, 0.1);
        let a = -x / x.norm_squared();
        let v = NVec2::new(-0.05, 1.0) + 0.05 * a;
        assert_relative_eq!(sys.tracers[0].x, x, epsilon = 1e-14);
        assert_relative_eq!(sys.tracers[0].v, v, epsilon = 1e-14);
        assert_relative_eq!(sys.t, 0.1);
    }

    #[test]
    fn empty_system_is_untouched() {
        let forces = AccelSet::new().with(LogarithmicHalo::new(1.0, 1e-8));
        let mut sys = System::new(Vec::new());
        verlet_integrator(&mut sys, &forces, &params(0.1));
        assert_eq!(sys.t, 0.0);
    }

    #[test]
    fn polar_circular_orbit_keeps_radius() {
        let forces = AccelSet::new().with(LogarithmicHalo::new(200.0, 1e-8));
        let p = params(1e-3);
        let mut sys = PolarSystem {
            tracers: vec![PolarTracer { r: 8.0, theta: 0.0, v_r: 0.0, v_theta: 200.0 }],
            t: 0.0,
        };
        for _ in 0..1000 {
            verlet_polar(&mut sys, &forces, &p);
        }
        let tracer = sys.tracers[0];
        assert_relative_eq!(tracer.r, 8.0, max_relative = 1e-9);
        assert_relative_eq!(tracer.v_theta, 200.0, max_relative = 1e-9);
        assert_relative_eq!(sys.t, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn polar_radial_plunge_passes_origin() {
        let forces = AccelSet::new().with(LogarithmicHalo::new(1.0, 1e-8));
        let p = params(0.01);
        let mut sys = PolarSystem {
            tracers: vec![PolarTracer { r: 0.005, theta: 0.0, v_r: -1.0, v_theta: 0.0 }],
            t: 0.0,
        };
        verlet_polar(&mut sys, &forces, &p);
        let tracer = sys.tracers[0];
        assert!(tracer.is_finite());
        assert!(tracer.r > 0.0);
        assert_relative_eq!(tracer.theta, PI, epsilon = 1e-12);
        assert!(tracer.v_r > 0.0);
    }

    #[test]
    fn non_finite_state_is_reported() {
        let mut sys = System::new(vec![
            Tracer { x: NVec2::new(1.0, 0.0), v: NVec2::zeros() },
            Tracer { x: NVec2::new(f64::NAN, 0.0), v: NVec2::zeros() },
        ]);
        sys.t = 0.5;
        assert_eq!(
            check_finite(&sys, 7),
            Err(SimError::NumericalInstability { step: 7, index: 1, t: 0.5 })
        );
        sys.tracers[1].x.x = 2.0;
        assert!(check_finite(&sys, 7).is_ok());

        let mut polar = sys.to_polar();
        polar.tracers[0].v_r = f64::INFINITY;
        assert!(matches!(
            check_finite_polar(&polar, 3),
            Err(SimError::NumericalInstability { step: 3, index: 0, .. })
        ));
    }
}
