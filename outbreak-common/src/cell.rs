use serde::{Deserialize, Serialize};
use std::fmt;

/// The state of a single grid cell. Exactly one per cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum CellState {
    #[default]
    Healthy = 0,
    Infected = 1,
    Immune = 2,
    Dead = 3,
}

impl CellState {
    /// All states, in discriminant order. Handy for building per-state tallies.
    pub const ALL: [CellState; 4] = [
        CellState::Healthy,
        CellState::Infected,
        CellState::Immune,
        CellState::Dead,
    ];

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Infected, Immune and Dead all count towards cumulative incidence.
    #[inline(always)]
    pub fn was_ever_infected(self) -> bool {
        !matches!(self, CellState::Healthy)
    }
}

impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CellState::Healthy => "healthy",
            CellState::Infected => "infected",
            CellState::Immune => "immune",
            CellState::Dead => "dead",
        };
        f.write_str(name)
    }
}
