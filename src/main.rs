use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, trace, warn};
use std::path::PathBuf;
use std::time::Instant;

use outbreak_engine::{AchievementSet, ScenarioPreset, Simulation, SimulationConfig};

/// Headless runner: seeds an outbreak and steps it until containment or the
/// step limit.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML config file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Grid width in cells (overrides config)
    #[arg(long)]
    width: Option<usize>,

    /// Grid height in cells (overrides config)
    #[arg(long)]
    height: Option<usize>,

    /// Outbreak pattern: patient_zero, airport_spread, border_invasion,
    /// urban_centers or random_chaos (overrides config)
    #[arg(short, long)]
    pattern: Option<String>,

    /// Rate preset, e.g. black_death or seasonal_flu (overrides config)
    #[arg(long)]
    scenario: Option<String>,

    /// Maximum number of steps to run (overrides config)
    #[arg(long)]
    steps: Option<u32>,

    /// RNG seed for a reproducible run (overrides config)
    #[arg(long)]
    seed: Option<u64>,

    /// Print the final statistics as JSON on stdout
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init();
    let args = Args::parse();

    info!("Starting Outbreak Engine...");

    // --- Load Configuration ---
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => {
            debug!("No config file given, using built-in defaults.");
            SimulationConfig::default()
        }
    };
    apply_overrides(&mut config, &args);
    config.validate().context("Invalid configuration after command-line overrides")?;
    let rates = config.get_transition_rates()?;
    debug!("Configuration: {:#?}", config);

    // --- Initialize Simulation ---
    let mut sim = match config.initial_conditions.seed {
        Some(seed) => Simulation::with_seed(config.grid.width, config.grid.height, seed)?,
        None => Simulation::new(config.grid.width, config.grid.height)?,
    };
    sim.apply_pattern(&config.initial_conditions.pattern)?;
    info!(
        "Seeded {}x{} grid with '{}': {} infected. Rates: infection {:.2}, death {:.2}, immunity {:.2}.",
        sim.width(),
        sim.height(),
        config.initial_conditions.pattern,
        sim.stats().infected,
        rates.infection,
        rates.death,
        rates.immunity
    );

    // --- Simulation Loop ---
    let total_steps = config.timing.max_steps;
    let log_interval = config.timing.log_interval_steps;
    let mut seen_achievements = AchievementSet::new();
    report_new_achievements(&sim, &mut seen_achievements);

    info!("Starting simulation loop for up to {} steps...", total_steps);
    let start_time = Instant::now();

    for step in 0..total_steps {
        if !sim.has_infected_cells() {
            // Lets the engine record the containment step.
            sim.step_with_rates(rates)?;
            if config.timing.stop_when_contained {
                info!("No infected cells remain after step {}. Stopping.", sim.current_step());
                break;
            }
            continue;
        }

        let step_start_time = Instant::now();
        sim.step_with_rates(rates)
            .with_context(|| format!("Simulation step {} failed", step + 1))?;
        let step_duration = step_start_time.elapsed();

        report_new_achievements(&sim, &mut seen_achievements);

        let is_last_step = step + 1 == total_steps;
        if (step + 1) % log_interval == 0 || is_last_step {
            let stats = sim.stats();
            info!(
                "Step [{}/{}] | H {} I {} R {} D {} | Rt {:.3} | Step Time: {:.3} ms",
                stats.step,
                total_steps,
                stats.healthy,
                stats.infected,
                stats.immune,
                stats.dead,
                stats.transmission_rate,
                step_duration.as_secs_f64() * 1000.0
            );
        } else {
            trace!(
                "Step [{}/{}] completed in {:.3} ms",
                step + 1,
                total_steps,
                step_duration.as_secs_f64() * 1000.0
            );
        }
    }

    if sim.has_infected_cells() {
        warn!("Step limit of {} reached with the outbreak still active.", total_steps);
    }

    let total_duration = start_time.elapsed();
    let stats = sim.stats();
    info!(
        "Simulation finished in {:.3} seconds: {:?} after {} steps.",
        total_duration.as_secs_f64(),
        sim.status(),
        stats.step
    );
    info!(
        "Peak infected {} | ever infected {} | deaths {} ({:.1}%) | recoveries {} ({:.1}%)",
        stats.peak_infected,
        stats.total_ever_infected,
        stats.total_deaths,
        stats.mortality_rate * 100.0,
        stats.total_recoveries,
        stats.recovery_rate * 100.0
    );

    if args.json {
        let json = serde_json::to_string_pretty(&stats).context("Failed to serialize final statistics")?;
        println!("{}", json);
    }

    info!("Simulation Complete.");
    Ok(())
}

fn apply_overrides(config: &mut SimulationConfig, args: &Args) {
    if let Some(width) = args.width {
        config.grid.width = width;
    }
    if let Some(height) = args.height {
        config.grid.height = height;
    }
    if let Some(pattern) = &args.pattern {
        config.initial_conditions.pattern = pattern.clone();
    }
    if let Some(scenario) = &args.scenario {
        config.rates.scenario = Some(scenario.clone());
    }
    if let Some(steps) = args.steps {
        config.timing.max_steps = steps;
    }
    if let Some(seed) = args.seed {
        config.initial_conditions.seed = Some(seed);
    }
    if let Some(name) = &config.rates.scenario {
        if let Ok(preset) = name.parse::<ScenarioPreset>() {
            debug!("Using scenario preset '{}': {:?}", preset, preset.rates());
        }
    }
}

fn report_new_achievements(sim: &Simulation, seen: &mut AchievementSet) {
    let fresh = sim.new_achievements(seen);
    for achievement in fresh.iter() {
        info!("Achievement Unlocked at step {}: {}", sim.current_step(), achievement);
    }
    *seen = sim.achievements();
}
