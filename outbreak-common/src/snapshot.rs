use crate::achievement::AchievementSet;
use crate::cell::CellState;
use serde::{Deserialize, Serialize};

/// An owned, row-major copy of a per-cell grid value.
///
/// Used for the cell states themselves, the infection trail mask and the
/// risk map. Mutating a snapshot never affects the simulation it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSnapshot<T = CellState> {
    pub width: usize,
    pub height: usize,
    /// Values in row-major order: `values[row * width + col]`.
    pub values: Vec<T>,
}

impl<T: Copy> GridSnapshot<T> {
    pub fn new(width: usize, height: usize, values: Vec<T>) -> Self {
        debug_assert_eq!(values.len(), width * height);
        Self { width, height, values }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        if row < self.height && col < self.width {
            self.values.get(row * self.width + col).copied()
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
        if row < self.height && col < self.width {
            self.values.get_mut(row * self.width + col)
        } else {
            None
        }
    }
}

impl GridSnapshot<CellState> {
    pub fn count(&self, state: CellState) -> usize {
        self.values.iter().filter(|&&s| s == state).count()
    }
}

/// One entry of the step-indexed history log, appended per applied step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub step: u32,
    /// Infected count after the step was applied.
    pub infected: usize,
    pub new_infections: usize,
    pub new_deaths: usize,
    pub new_recoveries: usize,
}

/// Population statistics and derived epidemiological rates at one moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationStats {
    pub healthy: usize,
    pub infected: usize,
    pub immune: usize,
    pub dead: usize,
    pub step: u32,
    pub peak_infected: usize,
    pub total_ever_infected: usize,
    pub total_deaths: usize,
    pub total_recoveries: usize,
    /// New infections per infected cell-step over a short trailing window.
    pub transmission_rate: f64,
    pub mortality_rate: f64,
    pub recovery_rate: f64,
    pub achievements: AchievementSet,
    pub outbreak_contained: bool,
    pub outbreak_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_infection_step: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outbreak_contained_step: Option<u32>,
}

impl PopulationStats {
    pub fn total_cells(&self) -> usize {
        self.healthy + self.infected + self.immune + self.dead
    }
}

/// Coarse, presentation-oriented summary of where a run currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutbreakStatus {
    /// Nothing has happened yet.
    Ready,
    Active,
    /// Every cell is dead.
    Extinction,
    ImmunityPrevailed,
    Contained,
}

/// Everything a caller needs to inspect a run offline, bundled as one owned
/// value. Lives in memory only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    pub step: u32,
    pub grid: GridSnapshot<CellState>,
    pub trail: GridSnapshot<bool>,
    pub history: Vec<HistoryEntry>,
    pub achievements: AchievementSet,
    pub stats: PopulationStats,
}
