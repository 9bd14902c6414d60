//! Acceleration contributors for the tracer integrator
//!
//! Tracers are massless, so every term is an external, axisymmetric
//! potential. A term only has to give the factor k(r²) with a = k · x;
//! the Cartesian acceleration, the polar radial acceleration and the
//! potential energy are all derived from the same term, so both
//! integrators share one law.

use crate::simulation::states::{System, NVec2};

/// An external central potential Φ(r)
///
/// `factor(r2)` returns k such that the acceleration at position `x` is
/// `k * x`. `potential(r2)` must be the matching Φ, i.e. ∇Φ = -k x.
pub trait CentralPotential {
    fn factor(&self, r2: f64) -> f64;
    fn potential(&self, r2: f64) -> f64;

    /// Radial component a_r at radius `r` (negative means inward)
    fn radial_acceleration(&self, r: f64) -> f64 {
        self.factor(r * r) * r
    }
}

/// Logarithmic potential with a flat rotation curve and softening
///
/// a = -v_c² x / (r² + eps2)
/// Φ = ½ v_c² ln(r² + eps2)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogarithmicHalo {
    pub v_c2: f64, // circular velocity squared [kpc^2/Gyr^2]
    pub eps2: f64, // softening [kpc^2]
}

impl LogarithmicHalo {
    pub fn new(v_c: f64, eps2: f64) -> Self {
        Self { v_c2: v_c * v_c, eps2 }
    }

    /// Upper bound on |a| anywhere: the factor peaks at r² = eps2 with
    /// |a| = v_c² / (2 sqrt(eps2)), so v_c² / sqrt(eps2) bounds it
    pub fn max_acceleration(&self) -> f64 {
        self.v_c2 / self.eps2.sqrt()
    }
}

impl CentralPotential for LogarithmicHalo {
    fn factor(&self, r2: f64) -> f64 {
        -self.v_c2 / (r2 + self.eps2)
    }

    fn potential(&self, r2: f64) -> f64 {
        0.5 * self.v_c2 * (r2 + self.eps2).ln()
    }
}

/// Collection of central potential terms
/// Each term implements [`CentralPotential`] and their contributions are
/// summed into a single acceleration per tracer
pub struct AccelSet {
    terms: Vec<Box<dyn CentralPotential + Send + Sync>>,
}

impl Default for AccelSet {
    fn default() -> Self {
        Self::new()
    }
}

impl AccelSet {
    /// Create an empty acceleration set
    pub fn new() -> Self {
        Self {
            terms: Vec::new()
        }
    }

    /// Add a potential term
    pub fn with<T>(mut self, term: T) -> Self
    where
        T: CentralPotential + Send + Sync + 'static,
    {
        self.terms.push(Box::new(term));
        self
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Summed factor k(r²) of all terms
    pub fn factor(&self, r2: f64) -> f64 {
        self.terms.iter().map(|term| term.factor(r2)).sum()
    }

    /// Acceleration at a single position
    pub fn acceleration_at(&self, x: &NVec2) -> NVec2 {
        x * self.factor(x.norm_squared())
    }

    /// Summed radial acceleration at radius `r`
    pub fn radial_acceleration(&self, r: f64) -> f64 {
        self.terms.iter().map(|term| term.radial_acceleration(r)).sum()
    }

    /// Summed potential at a position
    pub fn potential_at(&self, x: &NVec2) -> f64 {
        let r2 = x.norm_squared();
        self.terms.iter().map(|term| term.potential(r2)).sum()
    }

    /// Compute total accelerations for all tracers in `sys`
    /// - `out[i]` will be set to the sum of contributions from all terms
    pub fn accumulate_accels(&self, sys: &System, out: &mut [NVec2]) {
        debug_assert_eq!(sys.tracers.len(), out.len());
        // Tracers never interact, each entry only depends on its own position
        for (a, b) in out.iter_mut().zip(sys.tracers.iter()) {
            *a = self.acceleration_at(&b.x);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn circular_speed_is_flat() {
        // v_circ² = r |a_r|, independent of r for r² >> eps2
        let halo = LogarithmicHalo::new(200.0, 1e-8);
        for r in [1.0, 5.0, 20.0, 100.0] {
            let v2 = -r * halo.radial_acceleration(r);
            assert_relative_eq!(v2, 200.0 * 200.0, max_relative = 1e-6);
        }
    }

    #[test]
    fn potential_gradient_matches_acceleration() {
        let halo = LogarithmicHalo::new(150.0, 0.01);
        let set = AccelSet::new().with(halo);
        let x = NVec2::new(2.0, -1.5);
        let h = 1e-6;

        let dx = NVec2::new(h, 0.0);
        let dy = NVec2::new(0.0, h);
        let grad = NVec2::new(
            (set.potential_at(&(x + dx)) - set.potential_at(&(x - dx))) / (2.0 * h),
            (set.potential_at(&(x + dy)) - set.potential_at(&(x - dy))) / (2.0 * h),
        );

        assert_relative_eq!(-grad, set.acceleration_at(&x), max_relative = 1e-6);
    }

    #[test]
    fn terms_add_up() {
        let a = LogarithmicHalo::new(100.0, 1e-8);
        let set = AccelSet::new().with(a).with(a);
        let x = NVec2::new(3.0, 4.0);
        assert_eq!(set.len(), 2);
        assert_relative_eq!(set.acceleration_at(&x), 2.0 * a.factor(25.0) * x);
        assert_relative_eq!(set.radial_acceleration(5.0), 2.0 * a.radial_acceleration(5.0));
    }
}
