use crate::error::{Result, SimError};
use outbreak_common::{CellState, GridSnapshot};

/// Holds the grid cell states and infection trail for one simulation.
///
/// The buffers are only writable from inside the crate:
///
/// ```compile_fail
/// let mut state = outbreak_engine::state::GridState::new(2, 2).unwrap();
/// state.trail[0] = true;
/// ```
#[derive(Debug, Clone)] // Small enough at supported sizes to clone for tests
pub struct GridState {
    width: usize,
    height: usize,

    // --- Ping-Pong Buffers for the Transition Pass ---
    /// Current cell states, row-major.
    pub(crate) cells_in: Vec<CellState>,
    /// Next step's states. Only meaningful between a transition pass and
    /// `swap_buffers`.
    pub(crate) cells_out: Vec<CellState>,

    // --- Display-only State ---
    /// `true` wherever a cell has ever been infected since the last reset.
    pub(crate) trail: Vec<bool>,
}

impl GridState {
    /// Allocates a `width x height` grid with every cell healthy.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(SimError::InvalidArgument(format!(
                "grid dimensions must be positive (got {}x{})",
                width, height
            )));
        }
        let num_cells = width.checked_mul(height).ok_or_else(|| {
            SimError::InvalidArgument(format!("grid of {}x{} cells is too large", width, height))
        })?;

        Ok(Self {
            width,
            height,
            cells_in: vec![CellState::Healthy; num_cells],
            cells_out: vec![CellState::Healthy; num_cells],
            trail: vec![false; num_cells],
        })
    }

    #[inline(always)]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline(always)]
    pub fn num_cells(&self) -> usize {
        self.cells_in.len()
    }

    /// Row-major index of (row, col), or `OutOfBounds`.
    #[inline(always)]
    pub fn index(&self, row: usize, col: usize) -> Result<usize> {
        if row < self.height && col < self.width {
            Ok(row * self.width + col)
        } else {
            Err(SimError::OutOfBounds {
                row,
                col,
                width: self.width,
                height: self.height,
            })
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Result<CellState> {
        let idx = self.index(row, col)?;
        Ok(self.cells_in[idx])
    }

    /// Writes a cell state directly. Infecting a cell also marks its trail.
    pub(crate) fn set(&mut self, row: usize, col: usize, state: CellState) -> Result<()> {
        let idx = self.index(row, col)?;
        self.cells_in[idx] = state;
        if state == CellState::Infected {
            self.trail[idx] = true;
        }
        Ok(())
    }

    /// Sets every cell healthy and clears the trail.
    pub fn reset(&mut self) {
        self.cells_in.fill(CellState::Healthy);
        self.cells_out.fill(CellState::Healthy);
        self.trail.fill(false);
    }

    /// Swaps the input and output cell buffers after a transition pass.
    pub fn swap_buffers(&mut self) {
        std::mem::swap(&mut self.cells_in, &mut self.cells_out);
    }

    /// Per-state tally over the current grid, indexed by `CellState::index`.
    pub fn tally(&self) -> [usize; 4] {
        let mut counts = [0usize; 4];
        for state in &self.cells_in {
            counts[state.index()] += 1;
        }
        counts
    }

    pub fn contains_state(&self, state: CellState) -> bool {
        self.cells_in.contains(&state)
    }

    pub fn snapshot(&self) -> GridSnapshot<CellState> {
        GridSnapshot::new(self.width, self.height, self.cells_in.clone())
    }

    pub fn trail_snapshot(&self) -> GridSnapshot<bool> {
        GridSnapshot::new(self.width, self.height, self.trail.clone())
    }
}
