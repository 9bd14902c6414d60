//! Closed-form rotation of a noiseless ring
//!
//! In a flat rotation curve every tracer on a circular orbit of radius R0
//! turns at Ω = v_c / R0, so the ring after time t is the initial ring
//! rotated rigidly by Ω t. The numerical ring run is checked against this,
//! and the rotated ring can be rendered in place of a run.

use crate::simulation::history::TrajectoryHistory;
use crate::simulation::states::{angle_difference, PolarSystem, PolarTracer, System, Tracer};

/// Angular speed of a circular orbit at radius `r0` [rad/Gyr]
pub fn angular_speed(v_c: f64, r0: f64) -> f64 {
    v_c / r0
}

/// Rotate every tracer rigidly about the origin by Ω t, Ω = v_c / r0
pub fn rigid_rotation(tracers: &[PolarTracer], v_c: f64, r0: f64, t: f64) -> Vec<PolarTracer> {
    let delta = angular_speed(v_c, r0) * t;
    tracers
        .iter()
        .map(|p| PolarTracer { theta: p.theta + delta, ..*p })
        .collect()
}

/// Two snapshots: `initial` and its rigid rotation `t` later
///
/// The second snapshot carries `steps`, the step count of a numerical run
/// over the same interval.
pub fn rigid_rotation_history(initial: &System, v_c: f64, r0: f64, t: f64, steps: usize) -> TrajectoryHistory {
    let turned = PolarSystem {
        tracers: rigid_rotation(&initial.to_polar().tracers, v_c, r0, t),
        t: initial.t + t,
    };

    let mut history = TrajectoryHistory::with_capacity(2);
    history.record(0, initial);
    history.record(steps.max(1), &turned.to_cartesian());
    history
}

/// Largest angular deviation of `evolved` from the rigid rotation of `initial`
///
/// Both slices describe the same tracers in the same order.
pub fn max_phase_error(initial: &[Tracer], evolved: &[Tracer], v_c: f64, r0: f64, t: f64) -> f64 {
    let delta = angular_speed(v_c, r0) * t;
    initial
        .iter()
        .zip(evolved)
        .map(|(a, b)| angle_difference(b.angle(), a.angle() + delta).abs())
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::sampler::sample_ring;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn quarter_turn() {
        // Ω = 10 / 5 = 2 rad/Gyr, so t = π/4 Gyr is a quarter turn
        let ring = sample_ring(4, 5.0, 10.0).unwrap();
        let turned = rigid_rotation(&ring, 10.0, 5.0, PI / 4.0);

        let before: Vec<Tracer> = ring.iter().map(PolarTracer::to_cartesian).collect();
        let after: Vec<Tracer> = turned.iter().map(PolarTracer::to_cartesian).collect();

        // tracer i lands where tracer i+1 started
        for i in 0..4 {
            assert_relative_eq!(after[i].x, before[(i + 1) % 4].x, epsilon = 1e-12);
            assert_relative_eq!(after[i].v, before[(i + 1) % 4].v, epsilon = 1e-12);
        }
        assert!(max_phase_error(&before, &after, 10.0, 5.0, PI / 4.0) < 1e-12);
    }

    #[test]
    fn history_holds_start_and_rotated_ring() {
        let ring = sample_ring(6, 5.0, 10.0).unwrap();
        let sys = PolarSystem { tracers: ring, t: 0.0 }.to_cartesian();
        let history = rigid_rotation_history(&sys, 10.0, 5.0, PI / 2.0, 500);

        assert_eq!(history.len(), 2);
        let (first, last) = (history.first().unwrap(), history.last().unwrap());
        assert_eq!(first.tracers, sys.tracers);
        assert_eq!((last.step, last.t), (500, PI / 2.0));

        // half a turn: every tracer sits opposite its start
        for (a, b) in first.tracers.iter().zip(&last.tracers) {
            assert_relative_eq!(b.x, -a.x, epsilon = 1e-12);
            assert_relative_eq!(b.radius(), 5.0, epsilon = 1e-12);
        }
    }
}
