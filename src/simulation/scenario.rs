//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a runtime bundle
//! containing:
//! - engine settings (`Engine`)
//! - numerical parameters (`Parameters`) and constants (`PhysicalConstants`)
//! - system state (`System` with sampled tracers at t = 0)
//! - active force set (`AccelSet`)
//!
//! Everything a run needs lives in the bundle; nothing is shared between
//! runs.

use log::info;

use crate::configuration::config::{InitialConfig, ScenarioConfig};
use crate::error::SimResult;
use crate::simulation::analytic::{max_phase_error, rigid_rotation_history};
use crate::simulation::diagnostics::RunSummary;
use crate::simulation::engine::Engine;
use crate::simulation::forces::{AccelSet, LogarithmicHalo};
use crate::simulation::history::TrajectoryHistory;
use crate::simulation::params::{Parameters, PhysicalConstants};
use crate::simulation::sampler::sample_system;
use crate::simulation::states::System;

/// A fully-initialized tracer run
///
/// This is the main "runtime bundle" constructed from a [`ScenarioConfig`]:
/// it contains the engine settings, parameters, current system state, and
/// the set of active potentials
pub struct Scenario {
    pub engine: Engine,
    pub parameters: Parameters,
    pub constants: PhysicalConstants,
    pub system: System,
    pub forces: AccelSet,
}

impl Scenario {
    /// Validate the configuration and sample the initial tracers
    pub fn build_scenario(cfg: &ScenarioConfig) -> SimResult<Self> {
        // Parameters (runtime) from ParametersConfig, velocities in kpc/Gyr
        let parameters = cfg.parameters.to_parameters();
        let constants = cfg.parameters.constants();
        parameters.validate()?;
        constants.validate()?;
        cfg.output.validate()?;

        // Engine (runtime) from EngineConfig
        let engine = Engine {
            coordinates: cfg.engine.coordinates,
            initial: cfg.engine.initial,
        };

        let system = sample_system(engine.initial, &parameters, &constants)?;

        // Forces: flat rotation curve halo
        let forces = AccelSet::new().with(LogarithmicHalo::new(constants.v_c, parameters.eps2));

        info!(
            "built {:?} scenario: {} tracers at r0 = {} kpc, v_c = {:.3} kpc/Gyr, seed {}",
            engine.initial,
            system.len(),
            parameters.r0,
            constants.v_c,
            parameters.seed
        );

        Ok(Self {
            engine,
            parameters,
            constants,
            system,
            forces,
        })
    }

    /// Integrate to `t_end`, leaving `self.system` at the final state
    pub fn run(&mut self) -> SimResult<TrajectoryHistory> {
        let Scenario {
            engine,
            parameters,
            system,
            forces,
            ..
        } = &mut *self;

        let history = engine.run(system, forces, parameters)?;

        if let Some(summary) = self.summary(&history) {
            info!(
                "done at t = {:.4} Gyr: max |dE| = {:.3e}, max |dL| = {:.3e}, radii {:.3}..{:.3} kpc (started {:.3}..{:.3})",
                self.system.t,
                summary.energy_drift,
                summary.angular_momentum_drift,
                summary.final_radii.min,
                summary.final_radii.max,
                summary.initial_radii.min,
                summary.initial_radii.max
            );
        }

        if self.engine.initial == InitialConfig::Ring {
            if let Some(phase) = self.ring_phase_error(&history) {
                info!("ring phase error against rigid rotation: {phase:.3e} rad");
            }
        }

        Ok(history)
    }

    /// Closed-form counterpart of `run`: the current tracers and their rigid
    /// rotation by Ω t_end, Ω = v_c / r0. Leaves `self.system` untouched.
    pub fn analytic_history(&self) -> TrajectoryHistory {
        let history = rigid_rotation_history(
            &self.system,
            self.constants.v_c,
            self.parameters.r0,
            self.parameters.t_end,
            self.parameters.n_steps(),
        );
        info!(
            "analytic rotation of {} tracers by {:.4} rad",
            self.system.len(),
            self.constants.v_c / self.parameters.r0 * self.parameters.t_end
        );
        history
    }

    /// Largest angular lag of the last snapshot behind the rigid rotation
    /// Ω = v_c / r0 of the first one; only meaningful for ring runs
    pub fn ring_phase_error(&self, history: &TrajectoryHistory) -> Option<f64> {
        let (first, last) = (history.first()?, history.last()?);
        Some(max_phase_error(
            &first.tracers,
            &last.tracers,
            self.constants.v_c,
            self.parameters.r0,
            last.t - first.t,
        ))
    }

    /// Conservation and radius summary between the first and last snapshot
    pub fn summary(&self, history: &TrajectoryHistory) -> Option<RunSummary> {
        RunSummary::compare(history.first()?, history.last()?, &self.forces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;

    #[test]
    fn builds_requested_tracer_count() {
        let mut cfg = ScenarioConfig::default();
        cfg.parameters.n_particles = 37;
        let scenario = Scenario::build_scenario(&cfg).unwrap();
        assert_eq!(scenario.system.len(), 37);
        assert_eq!(scenario.system.t, 0.0);
        assert_eq!(scenario.forces.len(), 1);
    }

    #[test]
    fn ring_mode_ignores_seed() {
        let mut cfg = ScenarioConfig::default();
        cfg.engine.initial = InitialConfig::Ring;
        cfg.parameters.n_particles = 12;
        let a = Scenario::build_scenario(&cfg).unwrap();
        cfg.parameters.seed = 99;
        let b = Scenario::build_scenario(&cfg).unwrap();
        assert_eq!(a.system, b.system);
    }

    #[test]
    fn rejects_bad_configuration() {
        let mut cfg = ScenarioConfig::default();
        cfg.parameters.r0 = -9.0;
        assert!(matches!(
            Scenario::build_scenario(&cfg),
            Err(SimError::ParameterValidation { name: "r0", .. })
        ));

        let mut cfg = ScenarioConfig::default();
        cfg.parameters.v_c_kms = 0.0;
        assert!(matches!(
            Scenario::build_scenario(&cfg),
            Err(SimError::ParameterValidation { name: "v_c", .. })
        ));

        let mut cfg = ScenarioConfig::default();
        cfg.output.extent = 0.0;
        assert!(matches!(
            Scenario::build_scenario(&cfg),
            Err(SimError::ParameterValidation { name: "extent", .. })
        ));
    }
}
