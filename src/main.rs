use tracersim::{ScenarioConfig, Scenario, CoordinatesConfig, InitialConfig};
use tracersim::render_png;
use tracersim::{bench_step, bench_energy_curve};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use std::fs;
use std::path::PathBuf;

/// Tracer particles in a flat rotation curve halo (M31 outskirts)
#[derive(Parser, Debug)]
struct Args {
    /// Scenario YAML; looked up in `scenarios/` when not an existing path
    #[arg(short, default_value = "m31_outskirts.yaml")]
    file_name: String,

    /// Override the number of tracers
    #[arg(short = 'n', long)]
    particles: Option<usize>,

    /// Override the random seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Override the PNG output path
    #[arg(short, long)]
    output: Option<String>,

    /// Step in polar coordinates
    #[arg(long)]
    polar: bool,

    /// Start from the noiseless ring
    #[arg(long)]
    ring: bool,

    /// Render the closed-form rigid rotation instead of integrating
    #[arg(long)]
    analytic: bool,

    /// Run the step-cost and energy-error benchmarks instead
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let given = PathBuf::from(file_name);
    let config_path = if given.exists() {
        given
    } else {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name)
    };

    let text = fs::read_to_string(&config_path)
        .with_context(|| format!("failed to read scenario {}", config_path.display()))?;
    let scenario_cfg = ScenarioConfig::from_yaml_str(&text)
        .with_context(|| format!("failed to parse scenario {}", config_path.display()))?;

    Ok(scenario_cfg)
}

fn apply_overrides(cfg: &mut ScenarioConfig, args: &Args) {
    if let Some(n) = args.particles {
        cfg.parameters.n_particles = n;
    }
    if let Some(seed) = args.seed {
        cfg.parameters.seed = seed;
    }
    if let Some(path) = &args.output {
        cfg.output.path = path.clone();
    }
    if args.polar {
        cfg.engine.coordinates = CoordinatesConfig::Polar;
    }
    if args.ring {
        cfg.engine.initial = InitialConfig::Ring;
    }
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();

    if args.bench {
        bench_step();
        bench_energy_curve();
        return Ok(());
    }

    let mut scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    apply_overrides(&mut scenario_cfg, &args);

    let mut scenario = Scenario::build_scenario(&scenario_cfg).context("invalid scenario")?;
    let history = if args.analytic {
        scenario.analytic_history()
    } else {
        scenario.run().context("integration failed")?
    };

    render_png(&history, &scenario_cfg.output)
        .with_context(|| format!("failed to write {}", scenario_cfg.output.path))?;

    info!(
        "{} finished: {} tracers, {} Gyr of evolution",
        if args.analytic { "analytic rotation" } else { "simulation" },
        scenario.system.len(),
        scenario.parameters.t_end
    );

    Ok(())
}
