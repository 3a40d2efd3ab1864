use outbreak_common::CellState;

/// Counts, for every cell, how many of its Moore neighbours (edge or corner
/// adjacent, up to 8) are in `target`. Cells beyond the border count as empty.
///
/// Separable 3x3 box sum: a horizontal pass over each row followed by a
/// vertical pass over the row sums, then the centre cell is subtracted.
/// Both passes are O(width * height).
pub fn count_neighbors(cells: &[CellState], width: usize, height: usize, target: CellState) -> Vec<u8> {
    debug_assert_eq!(cells.len(), width * height);
    let mask: Vec<u8> = cells.iter().map(|&s| u8::from(s == target)).collect();

    // Phase 1: horizontal window sums (col - 1 ..= col + 1) per row.
    let mut row_sums = vec![0u8; mask.len()];
    for (mask_row, sum_row) in mask.chunks_exact(width).zip(row_sums.chunks_exact_mut(width)) {
        for col in 0..width {
            let mut sum = mask_row[col];
            if col > 0 {
                sum += mask_row[col - 1];
            }
            if col + 1 < width {
                sum += mask_row[col + 1];
            }
            sum_row[col] = sum;
        }
    }

    // Phase 2: vertical window sums of the row sums, minus the centre.
    let mut counts = vec![0u8; mask.len()];
    for row in 0..height {
        let base = row * width;
        for col in 0..width {
            let idx = base + col;
            let mut sum = row_sums[idx];
            if row > 0 {
                sum += row_sums[idx - width];
            }
            if row + 1 < height {
                sum += row_sums[idx + width];
            }
            counts[idx] = sum - mask[idx];
        }
    }
    counts
}
