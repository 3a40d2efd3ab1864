use serde::{Deserialize, Serialize};
use anyhow::Result;
use crate::sim_params::{ScenarioPreset, TransitionRates};
use std::path::Path;

// Grid dimensions
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct GridConfig {
    #[serde(default = "default_grid_dim")]
    pub width: usize,
    #[serde(default = "default_grid_dim")]
    pub height: usize,
}

// Transition probabilities, either explicit or taken from a named preset
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RateConfig {
    #[serde(default = "default_infection_rate")]
    pub infection: f64,
    #[serde(default = "default_death_rate")]
    pub death: f64,
    #[serde(default = "default_immunity_rate")]
    pub immunity: f64,
    /// When set, overrides the three explicit rates.
    #[serde(default)]
    pub scenario: Option<String>,
}

// How the first infections are placed
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct InitialConditions {
    #[serde(default = "default_pattern")]
    pub pattern: String,
    /// Fixed RNG seed. Seeded from the OS when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

// Run length and progress reporting
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TimingConfig {
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,
    #[serde(default = "default_log_interval_steps")]
    pub log_interval_steps: u32,
    #[serde(default = "default_stop_when_contained")]
    pub stop_when_contained: bool,
}

// Main simulation configuration structure, loaded from config.toml.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct SimulationConfig {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub rates: RateConfig,
    #[serde(default)]
    pub initial_conditions: InitialConditions,
    #[serde(default)]
    pub timing: TimingConfig,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            width: default_grid_dim(),
            height: default_grid_dim(),
        }
    }
}

impl Default for RateConfig {
    fn default() -> Self {
        RateConfig {
            infection: default_infection_rate(),
            death: default_death_rate(),
            immunity: default_immunity_rate(),
            scenario: None,
        }
    }
}

impl Default for InitialConditions {
    fn default() -> Self {
        InitialConditions {
            pattern: default_pattern(),
            seed: None,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            max_steps: default_max_steps(),
            log_interval_steps: default_log_interval_steps(),
            stop_when_contained: default_stop_when_contained(),
        }
    }
}

impl SimulationConfig {
    /// Loads the simulation configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path_ref.display(), e))?;
        let config = Self::from_toml_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Invalid config '{}': {}", path_ref.display(), e))?;
        Ok(config)
    }

    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid.width == 0 || self.grid.height == 0 {
            anyhow::bail!(
                "grid dimensions must be positive (got {}x{}).",
                self.grid.width,
                self.grid.height
            );
        }
        // Resolves the scenario name as a side effect of the check.
        let rates = self.get_transition_rates()?;
        if let Some((name, value)) = rates.first_invalid() {
            anyhow::bail!("{} rate must lie in [0, 1] (got {}).", name, value);
        }
        if self.timing.log_interval_steps == 0 {
            anyhow::bail!("log_interval_steps must be greater than 0.");
        }
        Ok(())
    }

    /// Resolves the rates used at runtime: the scenario preset if one is
    /// named, the explicit values otherwise.
    pub fn get_transition_rates(&self) -> Result<TransitionRates> {
        match &self.rates.scenario {
            Some(name) => Ok(name.parse::<ScenarioPreset>()?.rates()),
            None => Ok(TransitionRates::new(
                self.rates.infection,
                self.rates.death,
                self.rates.immunity,
            )),
        }
    }
}

fn default_grid_dim() -> usize {
    40
}

fn default_infection_rate() -> f64 {
    TransitionRates::default().infection
}

fn default_death_rate() -> f64 {
    TransitionRates::default().death
}

fn default_immunity_rate() -> f64 {
    TransitionRates::default().immunity
}

fn default_pattern() -> String {
    "patient_zero".to_string()
}

fn default_max_steps() -> u32 {
    500
}

fn default_log_interval_steps() -> u32 {
    25
}

fn default_stop_when_contained() -> bool {
    true
}
