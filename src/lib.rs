pub mod error;
pub mod simulation;
pub mod configuration;
pub mod visualization;
pub mod benchmark;

pub use error::{SimError, SimResult};

pub use simulation::states::{Tracer, PolarTracer, System, PolarSystem, NVec2};
pub use simulation::params::{Parameters, PhysicalConstants, KMS_TO_KPC_PER_GYR};
pub use simulation::forces::{AccelSet, CentralPotential, LogarithmicHalo};
pub use simulation::integrator::{verlet_integrator, verlet_polar};
pub use simulation::engine::Engine;
pub use simulation::history::{Snapshot, TrajectoryHistory};
pub use simulation::scenario::Scenario;

pub use configuration::config::{CoordinatesConfig, InitialConfig, EngineConfig, ParametersConfig, OutputConfig, ScenarioConfig};

pub use visualization::render2d::{render_image, render_png};

pub use benchmark::benchmark::{bench_step, bench_energy_curve};
