pub mod achievement;
pub mod cell;
pub mod config;
pub mod sim_params;
pub mod snapshot;

// Re-export key types for easier use by dependent crates
pub use achievement::{Achievement, AchievementSet};
pub use cell::CellState;
pub use config::{SimulationConfig, GridConfig, RateConfig, InitialConditions, TimingConfig};
pub use sim_params::{ScenarioPreset, TransitionRates};
pub use snapshot::{GridSnapshot, HistoryEntry, OutbreakStatus, PopulationStats, SimulationSnapshot};
