//! Stochastic cellular-automaton outbreak simulation.
//!
//! Cells on a fixed 2-D grid move between healthy, infected, immune and dead
//! according to neighbour-driven infection and independent death and
//! recovery draws. [`Simulation`] owns one run: it seeds outbreaks from named
//! patterns, applies steps, tracks statistics and history, and flags
//! one-time achievements.

pub mod achievements;
pub mod error;
pub mod grid;
pub mod patterns;
pub mod risk;
pub mod simulation;
pub mod state;
pub mod stats;

pub use error::{Result, SimError};
pub use patterns::OutbreakPattern;
pub use simulation::Simulation;

// Shared data types, re-exported so callers only need this crate.
pub use outbreak_common::{
    Achievement, AchievementSet, CellState, GridSnapshot, HistoryEntry, OutbreakStatus,
    PopulationStats, ScenarioPreset, SimulationConfig, SimulationSnapshot, TransitionRates,
};
