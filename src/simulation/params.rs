//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - sampling inputs (particle count, ring radius, dispersions, seed),
//! - integration step size, end time and snapshot cadence,
//! - softening `eps2`
//!
//! `PhysicalConstants` holds the circular velocity already converted to
//! kpc/Gyr. Neither is mutated once a run starts.

use crate::error::{SimError, SimResult};

/// 1 km/s expressed in kpc/Gyr
pub const KMS_TO_KPC_PER_GYR: f64 = 1.022712165;

/// Relative guard used when turning t_end / dt into a step count
const STEP_COUNT_GUARD: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalConstants {
    pub v_c: f64, // circular velocity [kpc/Gyr]
    pub kms_to_kpc_per_gyr: f64, // unit conversion factor
}

impl PhysicalConstants {
    /// Build from a circular velocity given in km/s
    pub fn from_kms(v_c_kms: f64) -> Self {
        Self {
            v_c: v_c_kms * KMS_TO_KPC_PER_GYR,
            kms_to_kpc_per_gyr: KMS_TO_KPC_PER_GYR,
        }
    }

    pub fn v_c2(&self) -> f64 {
        self.v_c * self.v_c
    }

    /// Convert a velocity in km/s to kpc/Gyr
    pub fn kms(&self, v: f64) -> f64 {
        v * self.kms_to_kpc_per_gyr
    }

    pub fn validate(&self) -> SimResult<()> {
        positive("v_c", self.v_c)?;
        positive("kms_to_kpc_per_gyr", self.kms_to_kpc_per_gyr)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub n_particles: usize, // number of tracers
    pub r0: f64, // reference ring radius [kpc]
    pub sigma_r: f64, // radius dispersion [kpc]
    pub sigma_v: f64, // radial velocity dispersion [kpc/Gyr]
    pub t_end: f64, // time end [Gyr]
    pub h0: f64, // step size [Gyr]
    pub save_interval: usize, // steps between snapshots
    pub seed: u64, // deterministic seed
    pub eps2: f64, // softening [kpc^2]
}

impl Parameters {
    /// Reject parameters the sampler or integrator cannot work with
    pub fn validate(&self) -> SimResult<()> {
        if self.n_particles == 0 {
            return Err(SimError::invalid("n_particles", "at least one tracer is required"));
        }
        positive("r0", self.r0)?;
        non_negative("sigma_r", self.sigma_r)?;
        non_negative("sigma_v", self.sigma_v)?;
        positive("t_end", self.t_end)?;
        positive("h0", self.h0)?;
        if self.save_interval == 0 {
            return Err(SimError::invalid("save_interval", "must be at least one step"));
        }
        positive("eps2", self.eps2)?;
        Ok(())
    }

    /// Number of fixed steps: ceil(t_end / h0)
    ///
    /// The ratio is nudged down by a relative 1e-9 first so a quotient like
    /// 1.1 / 0.1 = 11.000000000000002 does not become 12 steps.
    pub fn n_steps(&self) -> usize {
        let ratio = self.t_end / self.h0;
        (ratio * (1.0 - STEP_COUNT_GUARD)).ceil().max(0.0) as usize
    }

    /// Number of snapshots recorded over a full run, initial state included
    pub fn n_snapshots(&self) -> usize {
        self.n_steps() / self.save_interval + 1
    }
}

pub(crate) fn positive(name: &'static str, value: f64) -> SimResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::invalid(name, format!("must be finite and > 0, got {value}")))
    }
}

fn non_negative(name: &'static str, value: f64) -> SimResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimError::invalid(name, format!("must be finite and >= 0, got {value}")))
    }
}
