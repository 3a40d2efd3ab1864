use crate::grid::count_neighbors;
use crate::state::GridState;
use outbreak_common::{CellState, GridSnapshot};

/// Standard deviation of the trail blur, in cells.
const TRAIL_SIGMA: f64 = 1.0;
/// Kernel half-width in standard deviations.
const TRAIL_TRUNCATE: f64 = 4.0;
/// Weight of the blurred trail relative to the neighbour term.
const TRAIL_BOOST: f64 = 0.1;

/// Per-cell infection risk in `[0, 1]`.
///
/// Healthy cells score `min(infected_neighbors / 8, 1)` plus a small boost
/// from the Gaussian-blurred infection trail. Every other cell scores 0.
pub fn risk_map(state: &GridState) -> GridSnapshot<f64> {
    let width = state.width();
    let height = state.height();
    let infected_neighbors = count_neighbors(&state.cells_in, width, height, CellState::Infected);

    let trail: Vec<f64> = state.trail.iter().map(|&t| if t { 1.0 } else { 0.0 }).collect();
    let blurred = gaussian_blur(&trail, width, height, TRAIL_SIGMA);

    let values = state
        .cells_in
        .iter()
        .zip(infected_neighbors.iter().zip(blurred.iter()))
        .map(|(&cell, (&n, &boost))| {
            if cell == CellState::Healthy {
                let neighbour_risk = (n as f64 / 8.0).min(1.0);
                (neighbour_risk + boost * TRAIL_BOOST).min(1.0)
            } else {
                0.0
            }
        })
        .collect();

    GridSnapshot::new(width, height, values)
}

/// Normalised 1-D Gaussian kernel of radius `round(TRAIL_TRUNCATE * sigma)`.
fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = (TRAIL_TRUNCATE * sigma + 0.5) as i64;
    let two_sigma_sq = 2.0 * sigma * sigma;
    let mut kernel: Vec<f64> = (-radius..=radius)
        .map(|x| (-((x * x) as f64) / two_sigma_sq).exp())
        .collect();
    let sum: f64 = kernel.iter().sum();
    kernel.iter_mut().for_each(|w| *w /= sum);
    kernel
}

/// Maps a possibly out-of-range index back into `0..len` by mirroring about
/// the edges, repeating the edge sample (`d c b a | a b c d | d c b a`).
#[inline(always)]
fn reflect_index(mut i: i64, len: i64) -> usize {
    loop {
        if i < 0 {
            i = -i - 1;
        } else if i >= len {
            i = 2 * len - i - 1;
        } else {
            return i as usize;
        }
    }
}

/// Separable Gaussian blur with reflective boundaries.
fn gaussian_blur(values: &[f64], width: usize, height: usize, sigma: f64) -> Vec<f64> {
    let kernel = gaussian_kernel(sigma);
    let radius = (kernel.len() / 2) as i64;

    // Pass 1: along rows.
    let mut horizontal = vec![0.0; values.len()];
    for row in 0..height {
        let base = row * width;
        for col in 0..width {
            horizontal[base + col] = kernel
                .iter()
                .enumerate()
                .map(|(k, w)| {
                    let src = reflect_index(col as i64 + k as i64 - radius, width as i64);
                    w * values[base + src]
                })
                .sum();
        }
    }

    // Pass 2: along columns.
    let mut out = vec![0.0; values.len()];
    for row in 0..height {
        for col in 0..width {
            out[row * width + col] = kernel
                .iter()
                .enumerate()
                .map(|(k, w)| {
                    let src = reflect_index(row as i64 + k as i64 - radius, height as i64);
                    w * horizontal[src * width + col]
                })
                .sum();
        }
    }
    out
}
