use crate::achievements::{self, RuleContext};
use crate::error::{Result, SimError};
use crate::grid::count_neighbors;
use crate::patterns::OutbreakPattern;
use crate::risk;
use crate::state::GridState;
use crate::stats::StatsTracker;
use log::{debug, trace};
use outbreak_common::{
    AchievementSet, CellState, GridSnapshot, HistoryEntry, OutbreakStatus, PopulationStats,
    SimulationSnapshot, TransitionRates,
};
use rand::prelude::*;

/// Owns and advances one outbreak on a fixed-size grid.
///
/// All mutation goes through `reset`, `apply_pattern`, `infect_cell` and
/// `step`; everything else is a side-effect-free query returning owned data.
#[derive(Debug)]
pub struct Simulation {
    /// Cell states and infection trail.
    state: GridState,
    /// Derived statistics and the per-step history log.
    stats: StatsTracker,
    achievements: AchievementSet,
    /// Source of every stochastic decision: seeding and transitions.
    rng: StdRng,
    /// Number of applied transitions since the last reset.
    current_time_step: u32,
}

impl Simulation {
    /// Creates an all-healthy `width x height` simulation seeded from the OS.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Self::with_rng(width, height, StdRng::from_os_rng())
    }

    /// Creates a simulation whose random draws are reproducible from `seed`.
    pub fn with_seed(width: usize, height: usize, seed: u64) -> Result<Self> {
        Self::with_rng(width, height, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(width: usize, height: usize, rng: StdRng) -> Result<Self> {
        let state = GridState::new(width, height)?;
        debug!("Created {}x{} simulation grid.", width, height);
        Ok(Self {
            state,
            stats: StatsTracker::new(),
            achievements: AchievementSet::new(),
            rng,
            current_time_step: 0,
        })
    }

    pub fn width(&self) -> usize {
        self.state.width()
    }

    pub fn height(&self) -> usize {
        self.state.height()
    }

    pub fn num_cells(&self) -> usize {
        self.state.num_cells()
    }

    pub fn current_step(&self) -> u32 {
        self.current_time_step
    }

    // --- Commands ---

    /// Returns every piece of run state to its freshly constructed value.
    pub fn reset(&mut self) {
        self.state.reset();
        self.stats.reset();
        self.achievements.clear();
        self.current_time_step = 0;
        debug!("Simulation reset.");
    }

    /// Resets, then seeds infections using the pattern named `name`.
    ///
    /// An unknown name fails with `InvalidArgument` and leaves the current
    /// run untouched.
    pub fn apply_pattern(&mut self, name: &str) -> Result<()> {
        let pattern: OutbreakPattern = name.parse()?;
        self.apply_outbreak_pattern(pattern)
    }

    pub fn apply_outbreak_pattern(&mut self, pattern: OutbreakPattern) -> Result<()> {
        self.reset();
        pattern.seed(&mut self.state, &mut self.rng)?;
        self.stats.first_infection_step = Some(0);
        self.refresh_stats();
        debug!(
            "Applied pattern '{}': {} cells infected.",
            pattern,
            self.stats.count(CellState::Infected)
        );
        Ok(())
    }

    /// Infects a single healthy cell. Returns `false`, changing nothing, if
    /// the cell is in any other state.
    pub fn infect_cell(&mut self, row: usize, col: usize) -> Result<bool> {
        if self.state.get(row, col)? != CellState::Healthy {
            return Ok(false);
        }
        self.state.set(row, col, CellState::Infected)?;
        if self.stats.first_infection_step.is_none() {
            self.stats.first_infection_step = Some(self.current_time_step);
        }
        // Achievements wait for the next applied step.
        self.stats.refresh(&self.state);
        trace!("Manually infected cell ({}, {}).", row, col);
        Ok(true)
    }

    /// Advances the outbreak by one step. See [`Simulation::step_with_rates`].
    pub fn step(&mut self, infection_rate: f64, death_rate: f64, immunity_rate: f64) -> Result<()> {
        self.step_with_rates(TransitionRates::new(infection_rate, death_rate, immunity_rate))
    }

    /// Advances the outbreak by one step.
    ///
    /// With no infected cells this only records containment (once, and only
    /// after at least one applied step). Otherwise every cell's next state is
    /// decided from the current grid, all changes land at once, and the
    /// statistics, history and achievements are updated.
    pub fn step_with_rates(&mut self, rates: TransitionRates) -> Result<()> {
        if let Some((name, value)) = rates.first_invalid() {
            return Err(SimError::InvalidArgument(format!(
                "{} rate must lie in [0, 1] (got {})",
                name, value
            )));
        }

        if !self.has_infected_cells() {
            if self.current_time_step > 0 && self.stats.outbreak_contained_step.is_none() {
                self.stats.outbreak_contained_step = Some(self.current_time_step);
                debug!("Outbreak contained at step {}.", self.current_time_step);
            }
            return Ok(());
        }

        let (new_infections, new_deaths, new_recoveries) = self.update_cells(&rates);

        self.current_time_step += 1;
        self.stats.refresh(&self.state);
        self.stats.record(HistoryEntry {
            step: self.current_time_step,
            infected: self.stats.count(CellState::Infected),
            new_infections,
            new_deaths,
            new_recoveries,
        });
        self.check_achievements();

        trace!(
            "Step {}: +{} infected, +{} dead, +{} immune, {} currently infected.",
            self.current_time_step,
            new_infections,
            new_deaths,
            new_recoveries,
            self.stats.count(CellState::Infected)
        );
        Ok(())
    }

    /// One transition pass: reads `cells_in`, writes `cells_out`, then swaps.
    /// Returns (new infections, new deaths, new recoveries).
    fn update_cells(&mut self, rates: &TransitionRates) -> (usize, usize, usize) {
        let infected_neighbors = count_neighbors(
            &self.state.cells_in,
            self.state.width(),
            self.state.height(),
            CellState::Infected,
        );

        let mut new_infections = 0;
        let mut new_deaths = 0;
        let mut new_recoveries = 0;

        for idx in 0..self.state.num_cells() {
            let next = match self.state.cells_in[idx] {
                CellState::Healthy => {
                    let n = infected_neighbors[idx];
                    let chance = n as f64 * rates.infection / 8.0;
                    if n > 0 && self.rng.random::<f64>() < chance {
                        new_infections += 1;
                        self.state.trail[idx] = true;
                        CellState::Infected
                    } else {
                        CellState::Healthy
                    }
                }
                CellState::Infected => {
                    // Death is drawn first and pre-empts recovery.
                    if self.rng.random::<f64>() < rates.death {
                        new_deaths += 1;
                        CellState::Dead
                    } else if self.rng.random::<f64>() < rates.immunity {
                        new_recoveries += 1;
                        CellState::Immune
                    } else {
                        CellState::Infected
                    }
                }
                settled => settled,
            };
            self.state.cells_out[idx] = next;
        }

        self.state.swap_buffers();
        (new_infections, new_deaths, new_recoveries)
    }

    fn refresh_stats(&mut self) {
        self.stats.refresh(&self.state);
        self.check_achievements();
    }

    fn check_achievements(&mut self) {
        let ctx = RuleContext {
            step: self.current_time_step,
            num_cells: self.state.num_cells(),
            stats: &self.stats,
        };
        let fresh = achievements::evaluate(&ctx, &mut self.achievements);
        for achievement in fresh.iter() {
            debug!("Achievement unlocked at step {}: {}", self.current_time_step, achievement);
        }
    }

    // --- Queries ---

    pub fn has_infected_cells(&self) -> bool {
        self.state.contains_state(CellState::Infected)
    }

    pub fn get_state(&self, row: usize, col: usize) -> Result<CellState> {
        self.state.get(row, col)
    }

    pub fn stats(&self) -> PopulationStats {
        PopulationStats {
            healthy: self.stats.count(CellState::Healthy),
            infected: self.stats.count(CellState::Infected),
            immune: self.stats.count(CellState::Immune),
            dead: self.stats.count(CellState::Dead),
            step: self.current_time_step,
            peak_infected: self.stats.peak_infected,
            total_ever_infected: self.stats.total_ever_infected,
            total_deaths: self.stats.total_deaths,
            total_recoveries: self.stats.total_recoveries,
            transmission_rate: self.stats.transmission_rate(),
            mortality_rate: self.stats.mortality_rate(),
            recovery_rate: self.stats.recovery_rate(),
            achievements: self.achievements,
            outbreak_contained: self.stats.outbreak_contained_step.is_some(),
            outbreak_active: self.has_infected_cells(),
            first_infection_step: self.stats.first_infection_step,
            outbreak_contained_step: self.stats.outbreak_contained_step,
        }
    }

    pub fn grid_snapshot(&self) -> GridSnapshot<CellState> {
        self.state.snapshot()
    }

    pub fn trail_snapshot(&self) -> GridSnapshot<bool> {
        self.state.trail_snapshot()
    }

    pub fn risk_map(&self) -> GridSnapshot<f64> {
        risk::risk_map(&self.state)
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.stats.history().to_vec()
    }

    pub fn achievements(&self) -> AchievementSet {
        self.achievements
    }

    /// Achievements unlocked now that are missing from `previous`.
    pub fn new_achievements(&self, previous: &AchievementSet) -> AchievementSet {
        self.achievements.difference(previous)
    }

    pub fn status(&self) -> OutbreakStatus {
        if self.has_infected_cells() {
            return OutbreakStatus::Active;
        }
        if self.current_time_step == 0 {
            return OutbreakStatus::Ready;
        }
        let dead = self.stats.count(CellState::Dead);
        if dead == self.state.num_cells() {
            OutbreakStatus::Extinction
        } else if self.stats.count(CellState::Immune) > dead {
            OutbreakStatus::ImmunityPrevailed
        } else {
            OutbreakStatus::Contained
        }
    }

    /// Bundles the complete run state into one owned value.
    pub fn export_state(&self) -> SimulationSnapshot {
        SimulationSnapshot {
            step: self.current_time_step,
            grid: self.grid_snapshot(),
            trail: self.trail_snapshot(),
            history: self.history(),
            achievements: self.achievements,
            stats: self.stats(),
        }
    }
}
