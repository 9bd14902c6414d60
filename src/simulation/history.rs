//! Recorded snapshots of a run
//!
//! `TrajectoryHistory` is append-only: the engine pushes the initial state
//! and then one snapshot every `save_interval` steps. The renderer reads it
//! once integration has finished.

use crate::simulation::states::{System, Tracer};

/// Full tracer state at one recorded step
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub step: usize, // step index, 0 for the initial state
    pub t: f64, // time [Gyr]
    pub tracers: Vec<Tracer>, // Cartesian state of every tracer
}

impl Snapshot {
    pub fn from_system(step: usize, sys: &System) -> Self {
        Self {
            step,
            t: sys.t,
            tracers: sys.tracers.clone(),
        }
    }

    pub fn xs(&self) -> Vec<f64> {
        self.tracers.iter().map(|b| b.x.x).collect()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.tracers.iter().map(|b| b.x.y).collect()
    }

    pub fn radii(&self) -> Vec<f64> {
        self.tracers.iter().map(Tracer::radius).collect()
    }

    pub fn angles(&self) -> Vec<f64> {
        self.tracers.iter().map(Tracer::angle).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrajectoryHistory {
    snapshots: Vec<Snapshot>,
}

impl TrajectoryHistory {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            snapshots: Vec::with_capacity(n),
        }
    }

    pub fn record(&mut self, step: usize, sys: &System) {
        debug_assert!(self.snapshots.last().map_or(true, |s| s.step < step));
        self.snapshots.push(Snapshot::from_system(step, sys));
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn first(&self) -> Option<&Snapshot> {
        self.snapshots.first()
    }

    pub fn last(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    /// Number of tracers per snapshot
    pub fn n_tracers(&self) -> usize {
        self.first().map_or(0, |s| s.tracers.len())
    }

    /// Positions of one tracer across all snapshots, empty for an unknown index
    pub fn track(&self, index: usize) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.snapshots
            .iter()
            .filter_map(move |s| s.tracers.get(index))
            .map(|b| (b.x.x, b.x.y))
    }
}
