use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Per-step transition probabilities, derived from the configuration and
/// passed to every simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionRates {
    /// Probability scale for a healthy cell catching the infection; the
    /// effective chance is `infected_neighbors * infection / 8`.
    pub infection: f64,
    /// Chance an infected cell dies in a step.
    pub death: f64,
    /// Chance a surviving infected cell becomes immune in a step.
    pub immunity: f64,
}

impl TransitionRates {
    pub const fn new(infection: f64, death: f64, immunity: f64) -> Self {
        Self { infection, death, immunity }
    }

    /// Name and value of the first rate outside `[0, 1]`, if any.
    pub fn first_invalid(&self) -> Option<(&'static str, f64)> {
        [
            ("infection", self.infection),
            ("death", self.death),
            ("immunity", self.immunity),
        ]
        .into_iter()
        .find(|(_, rate)| !(0.0..=1.0).contains(rate))
    }
}

impl Default for TransitionRates {
    fn default() -> Self {
        Self::new(0.3, 0.1, 0.05)
    }
}

/// Named rate presets for quick experiments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioPreset {
    /// Highly contagious, rarely lethal.
    ZombieApocalypse,
    SuperImmunity,
    /// High mortality, little immunity.
    BlackDeath,
    LabExperiment,
    SeasonalFlu,
}

impl ScenarioPreset {
    pub const ALL: [ScenarioPreset; 5] = [
        ScenarioPreset::ZombieApocalypse,
        ScenarioPreset::SuperImmunity,
        ScenarioPreset::BlackDeath,
        ScenarioPreset::LabExperiment,
        ScenarioPreset::SeasonalFlu,
    ];

    pub fn rates(self) -> TransitionRates {
        match self {
            ScenarioPreset::ZombieApocalypse => TransitionRates::new(0.8, 0.05, 0.01),
            ScenarioPreset::SuperImmunity => TransitionRates::new(0.3, 0.1, 0.4),
            ScenarioPreset::BlackDeath => TransitionRates::new(0.4, 0.3, 0.05),
            ScenarioPreset::LabExperiment => TransitionRates::new(0.2, 0.15, 0.25),
            ScenarioPreset::SeasonalFlu => TransitionRates::new(0.25, 0.02, 0.15),
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            ScenarioPreset::ZombieApocalypse => "zombie_apocalypse",
            ScenarioPreset::SuperImmunity => "super_immunity",
            ScenarioPreset::BlackDeath => "black_death",
            ScenarioPreset::LabExperiment => "lab_experiment",
            ScenarioPreset::SeasonalFlu => "seasonal_flu",
        }
    }
}

impl fmt::Display for ScenarioPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ScenarioPreset {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        ScenarioPreset::ALL
            .into_iter()
            .find(|preset| preset.key() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown scenario preset: '{}'", s))
    }
}
