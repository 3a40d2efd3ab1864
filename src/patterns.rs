use crate::error::{Result, SimError};
use crate::state::GridState;
use log::{debug, warn};
use outbreak_common::CellState;
use rand::seq::index;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Chance each cell within an urban cluster's square is infected.
const URBAN_CLUSTER_DENSITY: f64 = 0.3;
/// Fraction of the grid seeded by `random_chaos`.
const RANDOM_CHAOS_DENSITY: f64 = 0.005;
const RANDOM_CHAOS_MIN: usize = 5;

/// Named layouts for the initial infections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutbreakPattern {
    /// A single infection at the grid centre.
    PatientZero,
    /// Four distant seeds, like travel-borne introductions.
    AirportSpread,
    /// Evenly spaced seeds along all four edges.
    BorderInvasion,
    /// Random clusters around jittered centres on the diagonal.
    UrbanCenters,
    /// Uniformly scattered distinct seeds.
    RandomChaos,
}

impl OutbreakPattern {
    pub const ALL: [OutbreakPattern; 5] = [
        OutbreakPattern::PatientZero,
        OutbreakPattern::AirportSpread,
        OutbreakPattern::BorderInvasion,
        OutbreakPattern::UrbanCenters,
        OutbreakPattern::RandomChaos,
    ];

    pub fn key(self) -> &'static str {
        match self {
            OutbreakPattern::PatientZero => "patient_zero",
            OutbreakPattern::AirportSpread => "airport_spread",
            OutbreakPattern::BorderInvasion => "border_invasion",
            OutbreakPattern::UrbanCenters => "urban_centers",
            OutbreakPattern::RandomChaos => "random_chaos",
        }
    }

    /// Infects cells according to the pattern. Expects an all-healthy grid.
    pub fn seed<R: Rng + ?Sized>(self, state: &mut GridState, rng: &mut R) -> Result<()> {
        match self {
            OutbreakPattern::PatientZero => seed_patient_zero(state),
            OutbreakPattern::AirportSpread => seed_airport_spread(state),
            OutbreakPattern::BorderInvasion => seed_border_invasion(state),
            OutbreakPattern::UrbanCenters => seed_urban_centers(state, rng),
            OutbreakPattern::RandomChaos => seed_random_chaos(state, rng),
        }
    }
}

impl fmt::Display for OutbreakPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for OutbreakPattern {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        OutbreakPattern::ALL
            .into_iter()
            .find(|pattern| pattern.key() == s)
            .ok_or_else(|| SimError::InvalidArgument(format!("unknown pattern: '{}'", s)))
    }
}

fn seed_patient_zero(state: &mut GridState) -> Result<()> {
    state.set(state.height() / 2, state.width() / 2, CellState::Infected)
}

fn seed_airport_spread(state: &mut GridState) -> Result<()> {
    let (w, h) = (state.width(), state.height());
    // (row, col) at the quarter / three-quarter intersections.
    let positions = [
        (h / 4, w / 4),
        (h / 4, 3 * w / 4),
        (3 * h / 4, w / 2),
        (3 * h / 4, w / 4),
    ];
    for (row, col) in positions {
        state.set(row, col, CellState::Infected)?;
    }
    Ok(())
}

fn seed_border_invasion(state: &mut GridState) -> Result<()> {
    let (w, h) = (state.width(), state.height());
    let stride = (w / 8).clamp(3, 8);

    for col in (0..w).step_by(stride) {
        state.set(0, col, CellState::Infected)?;
        state.set(h - 1, col, CellState::Infected)?;
    }
    for row in (0..h).step_by(stride) {
        state.set(row, 0, CellState::Infected)?;
        state.set(row, w - 1, CellState::Infected)?;
    }
    Ok(())
}

fn seed_urban_centers<R: Rng + ?Sized>(state: &mut GridState, rng: &mut R) -> Result<()> {
    let (w, h) = (state.width() as i64, state.height() as i64);
    let num_centers = (w / 20).max(2);
    let radius = (w / 15).max(2);

    for i in 0..num_centers {
        // Evenly spaced along the main diagonal, then jittered.
        let base_x = (i + 1) * w / (num_centers + 1);
        let base_y = (i + 1) * h / (num_centers + 1);
        let cx = (base_x + jitter(rng, w)).min(w - radius).max(radius);
        let cy = (base_y + jitter(rng, h)).min(h - radius).max(radius);
        debug!("Urban center {} at (row {}, col {}), radius {}.", i, cy, cx, radius);

        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let (x, y) = (cx + dx, cy + dy);
                if (0..w).contains(&x) && (0..h).contains(&y) && rng.random::<f64>() < URBAN_CLUSTER_DENSITY {
                    state.set(y as usize, x as usize, CellState::Infected)?;
                }
            }
        }
    }
    Ok(())
}

/// Uniform offset in `-ceil(dim / 10)..floor(dim / 10)`. The lower bound
/// rounds away from zero, so the range is never empty for `dim >= 1`.
fn jitter<R: Rng + ?Sized>(rng: &mut R, dim: i64) -> i64 {
    rng.random_range(-((dim + 9) / 10)..dim / 10)
}

fn seed_random_chaos<R: Rng + ?Sized>(state: &mut GridState, rng: &mut R) -> Result<()> {
    let num_cells = state.num_cells();
    let wanted = ((num_cells as f64 * RANDOM_CHAOS_DENSITY) as usize).max(RANDOM_CHAOS_MIN);
    let amount = if wanted > num_cells {
        warn!(
            "random_chaos wants {} seeds but the grid only has {} cells. Infecting every cell.",
            wanted, num_cells
        );
        num_cells
    } else {
        wanted
    };

    let width = state.width();
    for idx in index::sample(rng, num_cells, amount) {
        state.set(idx / width, idx % width, CellState::Infected)?;
    }
    Ok(())
}
