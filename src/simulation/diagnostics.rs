//! Conserved quantities and radius statistics
//!
//! Used to log how well a run kept the orbits intact, and by the tests that
//! check the integrator's energy and angular momentum behaviour.

use crate::simulation::forces::AccelSet;
use crate::simulation::history::Snapshot;
use crate::simulation::states::Tracer;

/// Specific energy E = ½ v² + Φ(x)
pub fn specific_energy(b: &Tracer, forces: &AccelSet) -> f64 {
    0.5 * b.v.norm_squared() + forces.potential_at(&b.x)
}

pub fn energies(tracers: &[Tracer], forces: &AccelSet) -> Vec<f64> {
    tracers.iter().map(|b| specific_energy(b, forces)).collect()
}

pub fn angular_momenta(tracers: &[Tracer]) -> Vec<f64> {
    tracers.iter().map(Tracer::angular_momentum).collect()
}

/// Largest per-tracer |after - before|
pub fn max_abs_change(before: &[f64], after: &[f64]) -> f64 {
    before
        .iter()
        .zip(after)
        .map(|(a, b)| (b - a).abs())
        .fold(0.0, f64::max)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl RadiusStats {
    pub fn from_tracers(tracers: &[Tracer]) -> Option<Self> {
        if tracers.is_empty() {
            return None;
        }
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for r in tracers.iter().map(Tracer::radius) {
            min = min.min(r);
            max = max.max(r);
            sum += r;
        }
        Some(Self { min, max, mean: sum / tracers.len() as f64 })
    }
}

/// Comparison of two snapshots of the same tracers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub energy_drift: f64, // max |ΔE| over tracers
    pub angular_momentum_drift: f64, // max |ΔL| over tracers
    pub initial_radii: RadiusStats,
    pub final_radii: RadiusStats,
}

impl RunSummary {
    pub fn compare(initial: &Snapshot, last: &Snapshot, forces: &AccelSet) -> Option<Self> {
        let e0 = energies(&initial.tracers, forces);
        let e1 = energies(&last.tracers, forces);
        let l0 = angular_momenta(&initial.tracers);
        let l1 = angular_momenta(&last.tracers);

        Some(Self {
            energy_drift: max_abs_change(&e0, &e1),
            angular_momentum_drift: max_abs_change(&l0, &l1),
            initial_radii: RadiusStats::from_tracers(&initial.tracers)?,
            final_radii: RadiusStats::from_tracers(&last.tracers)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::forces::LogarithmicHalo;
    use crate::simulation::states::NVec2;
    use approx::assert_relative_eq;

    #[test]
    fn energy_of_circular_orbit() {
        let forces = AccelSet::new().with(LogarithmicHalo::new(2.0, 0.0));
        let b = Tracer { x: NVec2::new(0.0, 3.0), v: NVec2::new(-2.0, 0.0) };
        // ½ v_c² + ½ v_c² ln(r²)
        assert_relative_eq!(specific_energy(&b, &forces), 2.0 + 2.0 * 9.0_f64.ln(), epsilon = 1e-12);
        assert_relative_eq!(b.angular_momentum(), 6.0);
    }

    #[test]
    fn radius_stats_and_drift() {
        let tracers = vec![
            Tracer { x: NVec2::new(1.0, 0.0), v: NVec2::zeros() },
            Tracer { x: NVec2::new(0.0, -3.0), v: NVec2::zeros() },
        ];
        let stats = RadiusStats::from_tracers(&tracers).unwrap();
        assert_eq!(stats, RadiusStats { min: 1.0, max: 3.0, mean: 2.0 });
        assert!(RadiusStats::from_tracers(&[]).is_none());

        assert_eq!(max_abs_change(&[1.0, 2.0], &[1.5, 0.0]), 2.0);
    }
}
