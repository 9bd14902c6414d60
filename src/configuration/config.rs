//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! tracer run. A scenario consists of:
//!
//! - [`EngineConfig`]     – coordinate system and initial condition mode
//! - [`ParametersConfig`] – numerical parameters and physical constants
//! - [`OutputConfig`]     – where and how the PNG is drawn
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! Every field has a default, so an empty file gives the M31 outskirts run.
//!
//! # YAML format
//!
//! ```yaml
//! engine:
//!   coordinates: "cartesian"  # or "polar"
//!   initial: "noisy_ring"     # or "ring"
//!
//! parameters:
//!   n_particles: 500
//!   r0: 9.0                   # ring radius [kpc]
//!   v_c_kms: 220.0            # circular velocity [km/s]
//!   t_end: 1.0                # total time [Gyr]
//!   h0: 0.001                 # fixed step [Gyr]
//!   save_interval: 1000       # steps between snapshots
//!   seed: 42
//!   sigma_r: 0.3              # radius scatter [kpc]
//!   sigma_v_kms: 8.0          # radial velocity scatter [km/s]
//!   eps2: 1.0e-8              # softening [kpc^2]
//!
//! output:
//!   path: "m31_tracer_simulation.png"
//!   trails: true
//!   extent: 12.0              # half-width of the frame [kpc]
//!   size: 1000                # image side [px]
//! ```
//!
//! The scenario builder maps this into the runtime `Parameters` and
//! `PhysicalConstants`, converting km/s to kpc/Gyr on the way.

use serde::Deserialize;

use crate::error::{SimError, SimResult};
use crate::simulation::params::{positive, Parameters, PhysicalConstants};

/// Which coordinates the integrator steps in
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinatesConfig {
    #[default]
    #[serde(rename = "cartesian")] // x, y kick-drift-kick
    Cartesian,

    #[serde(rename = "polar")] // radial kick-drift-kick, angle from v_θ / R
    Polar,
}

/// How the initial tracers are placed
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitialConfig {
    #[serde(rename = "ring")] // evenly spaced, exactly circular
    Ring,

    #[default]
    #[serde(rename = "noisy_ring")] // Gaussian scatter in radius and radial velocity
    NoisyRing,
}

/// High-level engine configuration
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub coordinates: CoordinatesConfig,
    pub initial: InitialConfig,
}

/// Global numerical and physical parameters for a scenario
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ParametersConfig {
    pub n_particles: usize, // number of tracers
    pub r0: f64,            // reference ring radius [kpc]
    pub v_c_kms: f64,       // circular velocity [km/s]
    pub t_end: f64,         // time end [Gyr]
    pub h0: f64,            // time step size [Gyr]
    pub save_interval: usize, // steps between recorded snapshots
    pub seed: u64,          // deterministic seed to make runs reproducible
    pub sigma_r: f64,       // radius dispersion [kpc]
    pub sigma_v_kms: f64,   // radial velocity dispersion [km/s]
    pub eps2: f64,          // softening - keeps the force finite at r = 0
}

impl Default for ParametersConfig {
    fn default() -> Self {
        Self {
            n_particles: 500,
            r0: 9.0,
            v_c_kms: 220.0,
            t_end: 1.0,
            h0: 0.001,
            save_interval: 1000,
            seed: 42,
            sigma_r: 0.3,
            sigma_v_kms: 8.0,
            eps2: 1e-8,
        }
    }
}

impl ParametersConfig {
    pub fn constants(&self) -> PhysicalConstants {
        PhysicalConstants::from_kms(self.v_c_kms)
    }

    /// Runtime parameters with velocities in kpc/Gyr
    pub fn to_parameters(&self) -> Parameters {
        let constants = self.constants();
        Parameters {
            n_particles: self.n_particles,
            r0: self.r0,
            sigma_r: self.sigma_r,
            sigma_v: constants.kms(self.sigma_v_kms),
            t_end: self.t_end,
            h0: self.h0,
            save_interval: self.save_interval,
            seed: self.seed,
            eps2: self.eps2,
        }
    }
}

/// Image output settings
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub path: String, // PNG file to write
    pub trails: bool, // draw each tracer's path through the snapshots
    pub extent: f64,  // frame spans [-extent, extent] kpc on both axes
    pub size: u32,    // image width and height in pixels
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "m31_tracer_simulation.png".to_string(),
            trails: true,
            extent: 12.0,
            size: 1000,
        }
    }
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct ScenarioConfig {
    pub engine: EngineConfig,         // coordinates and initial condition mode
    pub parameters: ParametersConfig, // numerical and physical parameters
    pub output: OutputConfig,         // image settings
}

impl OutputConfig {
    /// Reject frames the renderer cannot map onto pixels
    pub fn validate(&self) -> SimResult<()> {
        positive("extent", self.extent)?;
        if self.size < 2 {
            return Err(SimError::invalid("size", format!("image needs at least 2 pixels, got {}", self.size)));
        }
        Ok(())
    }
}

impl ScenarioConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        // an empty document deserializes as unit, not as an empty mapping
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let cfg = ScenarioConfig::from_yaml_str("").unwrap();
        assert_eq!(cfg, ScenarioConfig::default());
        let cfg = ScenarioConfig::from_yaml_str("{}").unwrap();
        assert_eq!(cfg.parameters.n_particles, 500);
        assert_eq!(cfg.engine.initial, InitialConfig::NoisyRing);
        assert_eq!(cfg.engine.coordinates, CoordinatesConfig::Cartesian);
    }

    #[test]
    fn partial_document_overrides_fields() {
        let text = r#"
engine:
  coordinates: "polar"
  initial: "ring"
parameters:
  n_particles: 64
  v_c_kms: 250.0
output:
  trails: false
"#;
        let cfg = ScenarioConfig::from_yaml_str(text).unwrap();
        assert_eq!(cfg.engine.coordinates, CoordinatesConfig::Polar);
        assert_eq!(cfg.engine.initial, InitialConfig::Ring);
        assert_eq!(cfg.parameters.n_particles, 64);
        assert_eq!(cfg.parameters.r0, 9.0);
        assert!(!cfg.output.trails);
        assert_eq!(cfg.output.extent, 12.0);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(ScenarioConfig::from_yaml_str("engine:\n  coordinates: \"spherical\"\n").is_err());
    }

    #[test]
    fn output_frame_is_validated() {
        assert!(OutputConfig::default().validate().is_ok());

        for extent in [0.0, -12.0, f64::NAN, f64::INFINITY] {
            let output = OutputConfig { extent, ..OutputConfig::default() };
            assert!(matches!(
                output.validate(),
                Err(SimError::ParameterValidation { name: "extent", .. })
            ));
        }

        let output = OutputConfig { size: 1, ..OutputConfig::default() };
        assert!(matches!(
            output.validate(),
            Err(SimError::ParameterValidation { name: "size", .. })
        ));
    }

    #[test]
    fn dispersion_converted_to_kpc_per_gyr() {
        let p = ParametersConfig::default().to_parameters();
        assert!((p.sigma_v - 8.0 * 1.022712165).abs() < 1e-12);
        assert_eq!(p.n_steps(), 1000);
        assert_eq!(p.n_snapshots(), 2);
    }
}
