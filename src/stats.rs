use crate::state::GridState;
use outbreak_common::{CellState, HistoryEntry};

/// Number of trailing history entries used for the transmission estimate.
const TRANSMISSION_WINDOW: usize = 5;

/// Population tallies, cumulative counters and the per-step history log.
///
/// Everything here is derived from the grid: `refresh` recomputes it from the
/// current state, `record` appends one history entry per applied step.
///
/// ```compile_fail
/// let mut stats = outbreak_engine::stats::StatsTracker::new();
/// stats.peak_infected = 5;
/// ```
#[derive(Debug, Clone, Default)]
pub struct StatsTracker {
    counts: [usize; 4],
    pub(crate) peak_infected: usize,
    pub(crate) total_ever_infected: usize,
    pub(crate) total_deaths: usize,
    pub(crate) total_recoveries: usize,
    history: Vec<HistoryEntry>,
    pub(crate) first_infection_step: Option<u32>,
    pub(crate) outbreak_contained_step: Option<u32>,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Re-tallies the grid and updates the running counters.
    pub fn refresh(&mut self, state: &GridState) {
        self.counts = state.tally();
        let infected = self.count(CellState::Infected);
        self.peak_infected = self.peak_infected.max(infected);
        self.total_deaths = self.count(CellState::Dead);
        self.total_recoveries = self.count(CellState::Immune);
        self.total_ever_infected = CellState::ALL
            .iter()
            .filter(|state| state.was_ever_infected())
            .map(|&state| self.count(state))
            .sum();
    }

    pub fn record(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
    }

    #[inline(always)]
    pub fn count(&self, state: CellState) -> usize {
        self.counts[state.index()]
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// New infections over the trailing window divided by the infected
    /// exposure that produced them (the same window minus its newest entry).
    pub fn transmission_rate(&self) -> f64 {
        if self.history.len() < 2 {
            return 0.0;
        }
        let recent = &self.history[self.history.len().saturating_sub(TRANSMISSION_WINDOW)..];
        let new_infections: usize = recent.iter().map(|h| h.new_infections).sum();
        let exposure: usize = recent[..recent.len() - 1].iter().map(|h| h.infected).sum();
        if exposure == 0 {
            0.0
        } else {
            new_infections as f64 / exposure as f64
        }
    }

    pub fn mortality_rate(&self) -> f64 {
        ratio(self.total_deaths, self.total_ever_infected)
    }

    pub fn recovery_rate(&self) -> f64 {
        ratio(self.total_recoveries, self.total_ever_infected)
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn entry(step: u32, infected: usize, new_infections: usize) -> HistoryEntry {
        HistoryEntry {
            step,
            infected,
            new_infections,
            new_deaths: 0,
            new_recoveries: 0,
        }
    }

    #[test]
    fn refresh_tallies_and_tracks_peak() {
        let mut state = GridState::new(4, 4).unwrap();
        let mut stats = StatsTracker::new();
        for col in 0..3 {
            state.set(0, col, CellState::Infected).unwrap();
        }
        state.set(3, 3, CellState::Dead).unwrap();
        stats.refresh(&state);
        assert_eq!(stats.count(CellState::Infected), 3);
        assert_eq!(stats.count(CellState::Healthy), 12);
        assert_eq!(stats.peak_infected, 3);
        assert_eq!(stats.total_ever_infected, 4);
        assert_eq!(stats.total_deaths, 1);

        state.set(0, 0, CellState::Immune).unwrap();
        state.set(0, 1, CellState::Immune).unwrap();
        stats.refresh(&state);
        assert_eq!(stats.count(CellState::Infected), 1);
        assert_eq!(stats.peak_infected, 3, "peak must not drop");
        assert_eq!(stats.total_recoveries, 2);
        assert_relative_eq!(stats.mortality_rate(), 0.25);
        assert_relative_eq!(stats.recovery_rate(), 0.5);
    }

    #[test]
    fn rates_are_zero_without_data() {
        let stats = StatsTracker::new();
        assert_eq!(stats.transmission_rate(), 0.0);
        assert_eq!(stats.mortality_rate(), 0.0);
        assert_eq!(stats.recovery_rate(), 0.0);
    }

    #[test]
    fn transmission_uses_trailing_window() {
        let mut stats = StatsTracker::new();
        stats.record(entry(1, 4, 3));
        assert_eq!(stats.transmission_rate(), 0.0, "needs two entries");

        stats.record(entry(2, 6, 2));
        // (3 + 2) / 4
        assert_relative_eq!(stats.transmission_rate(), 1.25);

        for step in 3..=7 {
            stats.record(entry(step, 10, 1));
        }
        // Window is steps 3..=7: five new infections over 4 * 10 exposure.
        assert_relative_eq!(stats.transmission_rate(), 5.0 / 40.0);
    }

    #[test]
    fn transmission_zero_exposure() {
        let mut stats = StatsTracker::new();
        stats.record(entry(1, 0, 0));
        stats.record(entry(2, 3, 3));
        assert_eq!(stats.transmission_rate(), 0.0);
    }
}
