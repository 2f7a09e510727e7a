//! Hinger classification
//!
//! A hinger is a cell holding exactly one counter whose removal splits a
//! region. Always evaluate against the board *before* the counter is taken.

use crate::grid::{Grid, Move};
use crate::regions::region_count;

/// True if (row, col) is a hinger on `grid`
pub fn is_hinger(grid: &Grid, row: usize, col: usize) -> bool {
    if grid.get(row, col) != Some(1) {
        return false;
    }
    let before = region_count(grid);
    let after = region_count(&grid.with_cell(row, col, 0));
    after > before
}

/// Number of hinger cells on `grid`
pub fn hinger_count(grid: &Grid) -> usize {
    hinger_count_in_place(&mut grid.clone())
}

/// Hinger cells in row-major order
pub fn hinger_cells(grid: &Grid) -> Vec<Move> {
    let mut scratch = grid.clone();
    let before = region_count(grid);
    grid.active_cells()
        .into_iter()
        .filter(|mv| splits_region(&mut scratch, mv.row, mv.col, before))
        .collect()
}

/// Hinger count on a grid the caller lets us scribble on (restored on return)
pub(crate) fn hinger_count_in_place(grid: &mut Grid) -> usize {
    let before = region_count(grid);
    let mut count = 0;
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            if splits_region(grid, row, col, before) {
                count += 1;
            }
        }
    }
    count
}

/// Hinger test that zeroes the cell in place and restores it
///
/// `regions_before` must be `region_count(grid)` for the current grid.
pub(crate) fn splits_region(grid: &mut Grid, row: usize, col: usize, regions_before: usize) -> bool {
    if grid.value(row, col) != 1 {
        return false;
    }
    grid.set(row, col, 0);
    let after = region_count(grid);
    grid.set(row, col, 1);
    after > regions_before
}
