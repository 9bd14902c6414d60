//! Core state types for the tracer simulation.
//!
//! Defines the Cartesian and polar forms of a tracer particle:
//! - `Tracer` / `System` using `NVec2` (canonical representation)
//! - `PolarTracer` (radius, angle, radial and tangential velocity)
//!
//! The system holds the list of tracers and the current simulation time `t`.
//! Conversions between the two forms are explicit so the integrators can
//! share one acceleration law.

use nalgebra::Vector2;
use std::f64::consts::{PI, TAU};

pub type NVec2 = Vector2<f64>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tracer {
    pub x: NVec2, // position [kpc]
    pub v: NVec2, // velocity [kpc/Gyr]
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarTracer {
    pub r: f64,       // radius [kpc]
    pub theta: f64,   // angle [rad]
    pub v_r: f64,     // radial velocity [kpc/Gyr]
    pub v_theta: f64, // tangential velocity [kpc/Gyr]
}

#[derive(Debug, Clone, PartialEq)]
pub struct System {
    pub tracers: Vec<Tracer>, // collection of tracers
    pub t: f64,               // time [Gyr]
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolarSystem {
    pub tracers: Vec<PolarTracer>, // collection of tracers in polar form
    pub t: f64,                    // time [Gyr]
}

impl Tracer {
    /// Radius of the tracer
    pub fn radius(&self) -> f64 {
        self.x.norm()
    }

    /// Polar angle in (-pi, pi]
    pub fn angle(&self) -> f64 {
        self.x.y.atan2(self.x.x)
    }

    /// Specific angular momentum L_z = x v_y - y v_x
    pub fn angular_momentum(&self) -> f64 {
        self.x.x * self.v.y - self.x.y * self.v.x
    }

    /// Convert to polar form
    ///
    /// At r = 0 the angle is taken along the velocity, so all motion is
    /// radial and the angular momentum stays zero.
    pub fn to_polar(&self) -> PolarTracer {
        let r = self.radius();
        if r == 0.0 {
            return PolarTracer {
                r: 0.0,
                theta: self.v.y.atan2(self.v.x),
                v_r: self.v.norm(),
                v_theta: 0.0,
            };
        }

        PolarTracer {
            r,
            theta: self.angle(),
            v_r: self.x.dot(&self.v) / r,
            v_theta: self.angular_momentum() / r,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.iter().chain(self.v.iter()).all(|c| c.is_finite())
    }
}

impl PolarTracer {
    /// Convert to Cartesian form
    ///
    /// x = R cos θ, y = R sin θ
    /// vx = v_R cos θ - v_θ sin θ, vy = v_R sin θ + v_θ cos θ
    pub fn to_cartesian(&self) -> Tracer {
        let (sin, cos) = self.theta.sin_cos();
        Tracer {
            x: NVec2::new(self.r * cos, self.r * sin),
            v: NVec2::new(
                self.v_r * cos - self.v_theta * sin,
                self.v_r * sin + self.v_theta * cos,
            ),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.theta.is_finite() && self.v_r.is_finite() && self.v_theta.is_finite()
    }
}

impl System {
    pub fn new(tracers: Vec<Tracer>) -> Self {
        Self { tracers, t: 0.0 }
    }

    pub fn len(&self) -> usize {
        self.tracers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracers.is_empty()
    }

    pub fn radii(&self) -> Vec<f64> {
        self.tracers.iter().map(Tracer::radius).collect()
    }

    pub fn to_polar(&self) -> PolarSystem {
        PolarSystem {
            tracers: self.tracers.iter().map(Tracer::to_polar).collect(),
            t: self.t,
        }
    }

    /// Overwrite the tracers and time from their polar form
    pub fn set_from_polar(&mut self, polar: &PolarSystem) {
        debug_assert_eq!(polar.tracers.len(), self.tracers.len());
        for (b, p) in self.tracers.iter_mut().zip(polar.tracers.iter()) {
            *b = p.to_cartesian();
        }
        self.t = polar.t;
    }
}

impl PolarSystem {
    pub fn to_cartesian(&self) -> System {
        System {
            tracers: self.tracers.iter().map(PolarTracer::to_cartesian).collect(),
            t: self.t,
        }
    }
}

/// Wrap an angle into [0, 2pi)
pub fn wrap_angle(theta: f64) -> f64 {
    let w = theta.rem_euclid(TAU);
    // rem_euclid can return exactly TAU for tiny negative inputs
    if w >= TAU { 0.0 } else { w }
}

/// Signed smallest difference a - b, in (-pi, pi]
pub fn angle_difference(a: f64, b: f64) -> f64 {
    let d = wrap_angle(a - b);
    if d > PI { d - TAU } else { d }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn polar_round_trip_recovers_state() {
        let b = Tracer {
            x: NVec2::new(3.0, -4.0),
            v: NVec2::new(12.5, 80.0),
        };
        let back = b.to_polar().to_cartesian();
        assert_relative_eq!(back.x, b.x, epsilon = 1e-12);
        assert_relative_eq!(back.v, b.v, epsilon = 1e-12);
    }

    #[test]
    fn polar_components_on_axis() {
        let b = Tracer {
            x: NVec2::new(0.0, 2.0),
            v: NVec2::new(-5.0, 1.0),
        };
        let p = b.to_polar();
        assert_relative_eq!(p.r, 2.0);
        assert_relative_eq!(p.theta, PI / 2.0);
        assert_relative_eq!(p.v_r, 1.0);
        // moving in -x at +y is counter-clockwise
        assert_relative_eq!(p.v_theta, 5.0);
    }

    #[test]
    fn origin_converts_without_nan() {
        let b = Tracer {
            x: NVec2::zeros(),
            v: NVec2::new(1.0, 2.0),
        };
        let p = b.to_polar();
        assert!(p.is_finite());
        assert_eq!(p.v_theta, 0.0);
        let back = p.to_cartesian();
        assert_eq!(back.x, NVec2::zeros());
        assert_relative_eq!(back.v, b.v, epsilon = 1e-12);

        let still = Tracer { x: NVec2::zeros(), v: NVec2::zeros() }.to_polar();
        assert!(still.is_finite());
    }

    #[test]
    fn system_polar_round_trip_keeps_time() {
        let mut sys = System::new(vec![
            Tracer { x: NVec2::new(1.0, 0.0), v: NVec2::new(0.0, 2.0) },
            Tracer { x: NVec2::new(-2.0, 2.0), v: NVec2::new(0.5, 0.5) },
        ]);
        sys.t = 0.25;
        let mut polar = sys.to_polar();
        polar.t = 0.5;
        sys.set_from_polar(&polar);
        assert_eq!(sys.t, 0.5);
        assert_relative_eq!(sys.tracers[1].x, NVec2::new(-2.0, 2.0), epsilon = 1e-12);
        assert_eq!(polar.to_cartesian().len(), 2);
    }

    #[test]
    fn angle_helpers_wrap() {
        assert_relative_eq!(wrap_angle(-PI / 2.0), 1.5 * PI);
        assert_relative_eq!(wrap_angle(5.0 * PI), PI, epsilon = 1e-12);
        assert_relative_eq!(angle_difference(0.1, TAU - 0.1), 0.2, epsilon = 1e-12);
        assert_relative_eq!(angle_difference(TAU - 0.1, 0.1), -0.2, epsilon = 1e-12);
    }
}
