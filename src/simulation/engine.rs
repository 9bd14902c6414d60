//! High-level runtime engine settings and the step loop
//!
//! Selects the coordinate system the integrator works in and the initial
//! condition mode, then drives a fixed number of steps while recording
//! snapshots into a `TrajectoryHistory`.

use log::{debug, info};

use crate::configuration::config::{CoordinatesConfig, InitialConfig};
use crate::error::SimResult;
use crate::simulation::forces::AccelSet;
use crate::simulation::history::TrajectoryHistory;
use crate::simulation::integrator::{check_finite, check_finite_polar, verlet_integrator, verlet_polar};
use crate::simulation::params::Parameters;
use crate::simulation::states::System;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Engine {
    pub coordinates: CoordinatesConfig, // cartesian or polar stepping
    pub initial: InitialConfig, // ring or noisy ring
}

impl Engine {
    /// Integrate `sys` for `params.n_steps()` steps
    ///
    /// Records the initial state and then every `save_interval` steps, so
    /// the history holds floor(n_steps / save_interval) + 1 snapshots.
    /// `sys` is left at the final state, which is only in the history when
    /// `save_interval` divides the step count.
    pub fn run(&self, sys: &mut System, forces: &AccelSet, params: &Parameters) -> SimResult<TrajectoryHistory> {
        params.validate()?;

        let n_steps = params.n_steps();
        let every = params.save_interval;
        let mut history = TrajectoryHistory::with_capacity(params.n_snapshots());

        info!(
            "integrating {} tracers for {} steps (dt = {} Gyr, {:?} coordinates)",
            sys.len(),
            n_steps,
            params.h0,
            self.coordinates
        );

        check_finite(sys, 0)?;
        history.record(0, sys);

        match self.coordinates {
            CoordinatesConfig::Cartesian => {
                for step in 1..=n_steps {
                    verlet_integrator(sys, forces, params);
                    check_finite(sys, step)?;

                    if step % every == 0 {
                        debug!("snapshot at step {step}, t = {:.4} Gyr", sys.t);
                        history.record(step, sys);
                    }
                }
            }
            CoordinatesConfig::Polar => {
                let mut polar = sys.to_polar();
                for step in 1..=n_steps {
                    verlet_polar(&mut polar, forces, params);
                    check_finite_polar(&polar, step)?;

                    if step % every == 0 {
                        debug!("snapshot at step {step}, t = {:.4} Gyr", polar.t);
                        sys.set_from_polar(&polar);
                        history.record(step, sys);
                    }
                }
                sys.set_from_polar(&polar);
            }
        }

        Ok(history)
    }
}
