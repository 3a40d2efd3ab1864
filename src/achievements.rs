use crate::stats::StatsTracker;
use outbreak_common::{Achievement, AchievementSet, CellState};

/// Length of the run of low-level history entries needed for an endemic state.
const ENDEMIC_WINDOW: usize = 20;

/// Read-only view handed to each achievement rule.
pub struct RuleContext<'a> {
    pub step: u32,
    pub num_cells: usize,
    pub stats: &'a StatsTracker,
}

impl RuleContext<'_> {
    #[inline(always)]
    fn count(&self, state: CellState) -> usize {
        self.stats.count(state)
    }

    /// `value >= fraction * num_cells`, in floating point.
    #[inline(always)]
    fn at_least(&self, value: usize, fraction: f64) -> bool {
        value as f64 >= fraction * self.num_cells as f64
    }
}

/// Whether the unlock condition for `achievement` holds right now.
fn holds(achievement: Achievement, ctx: &RuleContext<'_>) -> bool {
    let infected = ctx.count(CellState::Infected);
    match achievement {
        Achievement::PatientZero => infected > 0,
        Achievement::RapidSpread => ctx.step <= 10 && ctx.at_least(infected, 0.25),
        Achievement::Pandemic => ctx.at_least(ctx.stats.peak_infected, 0.8),
        Achievement::ExtinctionEvent => ctx.count(CellState::Dead) == ctx.num_cells,
        Achievement::Survivor => {
            ctx.step >= 100 && ctx.at_least(ctx.count(CellState::Healthy), 0.5) && infected == 0
        }
        Achievement::HerdImmunity => {
            ctx.at_least(ctx.count(CellState::Immune), 0.3)
                && infected == 0
                && ctx.count(CellState::Healthy) > 0
        }
        Achievement::ContainmentMaster => {
            ctx.step >= 50
                && ctx.stats.peak_infected as f64 <= 0.2 * ctx.num_cells as f64
                && infected == 0
        }
        Achievement::EndemicState => {
            let history = ctx.stats.history();
            if ctx.step < 50 || history.len() < ENDEMIC_WINDOW {
                return false;
            }
            let ceiling = 0.1 * ctx.num_cells as f64;
            history[history.len() - ENDEMIC_WINDOW..]
                .iter()
                .all(|h| h.infected > 0 && (h.infected as f64) < ceiling)
        }
        Achievement::GhostTown => {
            let ever = ctx.stats.total_ever_infected as f64;
            ever > 0.5 * ctx.num_cells as f64 && ctx.stats.total_deaths as f64 >= 0.9 * ever
        }
    }
}

/// Evaluates every rule not yet in `unlocked`, inserting the ones that hold.
/// Returns only the achievements unlocked by this call.
pub fn evaluate(ctx: &RuleContext<'_>, unlocked: &mut AchievementSet) -> AchievementSet {
    let mut fresh = AchievementSet::new();
    for achievement in Achievement::ALL {
        if !unlocked.contains(achievement) && holds(achievement, ctx) {
            unlocked.insert(achievement);
            fresh.insert(achievement);
        }
    }
    fresh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::GridState;
    use outbreak_common::HistoryEntry;

    /// 10x10 grid with the given number of cells in each non-healthy state.
    fn tracker(infected: usize, immune: usize, dead: usize) -> StatsTracker {
        let mut state = GridState::new(10, 10).unwrap();
        let mut idx = 0;
        for (n, cell) in [(infected, CellState::Infected), (immune, CellState::Immune), (dead, CellState::Dead)] {
            for _ in 0..n {
                state.set(idx / 10, idx % 10, cell).unwrap();
                idx += 1;
            }
        }
        let mut stats = StatsTracker::new();
        stats.refresh(&state);
        stats
    }

    fn run(step: u32, stats: &StatsTracker, unlocked: &mut AchievementSet) -> AchievementSet {
        evaluate(&RuleContext { step, num_cells: 100, stats }, unlocked)
    }

    #[test]
    fn patient_zero_and_rapid_spread() {
        let mut unlocked = AchievementSet::new();
        let fresh = run(3, &tracker(30, 0, 0), &mut unlocked);
        assert!(fresh.contains(Achievement::PatientZero));
        assert!(fresh.contains(Achievement::RapidSpread));
        assert!(!fresh.contains(Achievement::Pandemic));

        // Same condition later: nothing new.
        let again = run(4, &tracker(30, 0, 0), &mut unlocked);
        assert!(again.is_empty());
        assert_eq!(unlocked.len(), 2);
    }

    #[test]
    fn pandemic_fires_on_peak_not_current_count() {
        let mut unlocked = AchievementSet::new();
        run(30, &tracker(79, 0, 0), &mut unlocked);
        assert!(!unlocked.contains(Achievement::Pandemic));

        let mut stats = tracker(80, 0, 0);
        let mut state = GridState::new(10, 10).unwrap();
        state.set(0, 0, CellState::Infected).unwrap();
        stats.refresh(&state);
        assert_eq!(stats.count(CellState::Infected), 1);
        assert_eq!(stats.peak_infected, 80);

        let fresh = run(30, &stats, &mut unlocked);
        assert!(fresh.contains(Achievement::Pandemic));
    }

    #[test]
    fn rapid_spread_needs_early_step() {
        let mut unlocked = AchievementSet::new();
        run(11, &tracker(30, 0, 0), &mut unlocked);
        assert!(!unlocked.contains(Achievement::RapidSpread));
    }

    #[test]
    fn extinction_requires_every_cell_dead() {
        let mut unlocked = AchievementSet::new();
        run(20, &tracker(0, 0, 99), &mut unlocked);
        assert!(!unlocked.contains(Achievement::ExtinctionEvent));
        assert!(unlocked.contains(Achievement::GhostTown));

        run(21, &tracker(0, 0, 100), &mut unlocked);
        assert!(unlocked.contains(Achievement::ExtinctionEvent));
        assert!(!unlocked.contains(Achievement::HerdImmunity));
    }

    #[test]
    fn herd_immunity_and_survivor() {
        let mut unlocked = AchievementSet::new();
        run(99, &tracker(0, 30, 5), &mut unlocked);
        assert!(unlocked.contains(Achievement::HerdImmunity));
        assert!(!unlocked.contains(Achievement::Survivor));

        run(100, &tracker(0, 30, 5), &mut unlocked);
        assert!(unlocked.contains(Achievement::Survivor));
    }

    #[test]
    fn containment_master_uses_peak() {
        let mut stats = tracker(15, 0, 0);
        let mut state = GridState::new(10, 10).unwrap();
        state.set(0, 0, CellState::Immune).unwrap();
        stats.refresh(&state);
        assert_eq!(stats.peak_infected, 15);

        let mut unlocked = AchievementSet::new();
        run(49, &stats, &mut unlocked);
        assert!(!unlocked.contains(Achievement::ContainmentMaster));
        run(50, &stats, &mut unlocked);
        assert!(unlocked.contains(Achievement::ContainmentMaster));
    }

    #[test]
    fn endemic_state_needs_twenty_low_entries() {
        let mut stats = tracker(5, 0, 0);
        for step in 1..=19 {
            stats.record(HistoryEntry { step, infected: 5, new_infections: 1, new_deaths: 0, new_recoveries: 1 });
        }
        let mut unlocked = AchievementSet::new();
        run(60, &stats, &mut unlocked);
        assert!(!unlocked.contains(Achievement::EndemicState));

        stats.record(HistoryEntry { step: 20, infected: 9, new_infections: 1, new_deaths: 0, new_recoveries: 1 });
        run(60, &stats, &mut unlocked);
        assert!(unlocked.contains(Achievement::EndemicState));
    }

    #[test]
    fn endemic_state_rejects_zero_infected_entry() {
        let mut stats = tracker(5, 0, 0);
        for step in 1..=20 {
            let infected = if step == 10 { 0 } else { 5 };
            stats.record(HistoryEntry { step, infected, new_infections: 0, new_deaths: 0, new_recoveries: 0 });
        }
        let mut unlocked = AchievementSet::new();
        run(60, &stats, &mut unlocked);
        assert!(!unlocked.contains(Achievement::EndemicState));
    }
}
