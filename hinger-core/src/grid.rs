//! Rectangular counter grid with row-major move generation

use crate::error::{HingerError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Neighbor offsets (dr, dc) for 8-directional adjacency
/// Index: 0=N, 1=NE, 2=E, 3=SE, 4=S, 5=SW, 6=W, 7=NW
pub const NEIGHBORS: [(isize, isize); 8] = [
    (-1, 0),  // N
    (-1, 1),  // NE
    (0, 1),   // E
    (1, 1),   // SE
    (1, 0),   // S
    (1, -1),  // SW
    (0, -1),  // W
    (-1, -1), // NW
];

/// A move: remove one counter from (row, col)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub row: usize,
    pub col: usize,
}

impl Move {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Board state (clone to explore, `decrement` to commit)
///
/// Equality and hashing are element-wise, so a `Grid` is its own
/// de-duplication key in search visited sets.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<i64>>", into = "Vec<Vec<u32>>")]
pub struct Grid {
    rows: usize,
    cols: usize,
    /// Row-major counter values
    cells: Vec<u32>,
}

impl Grid {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Build a grid from a matrix, copying it
    ///
    /// Fails if the matrix is empty or ragged, or holds a negative value.
    pub fn new<R: AsRef<[i64]>>(matrix: &[R]) -> Result<Self> {
        let rows = matrix.len();
        if rows == 0 {
            return Err(HingerError::InvalidDimension(
                "grid must have at least one row".to_string(),
            ));
        }
        let cols = matrix[0].as_ref().len();
        if cols == 0 {
            return Err(HingerError::InvalidDimension(
                "grid must have at least one column".to_string(),
            ));
        }

        let mut cells = Vec::with_capacity(rows * cols);
        for (row, values) in matrix.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != cols {
                return Err(HingerError::InvalidDimension(format!(
                    "row {} has {} columns, expected {}",
                    row,
                    values.len(),
                    cols
                )));
            }
            for (col, &value) in values.iter().enumerate() {
                let counter = u32::try_from(value)
                    .map_err(|_| HingerError::InvalidValue { row, col, value })?;
                cells.push(counter);
            }
        }

        Ok(Self { rows, cols, cells })
    }

    /// Random board with each cell drawn uniformly from `0..=max_stack`
    pub fn random<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        max_stack: u32,
        rng: &mut R,
    ) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(HingerError::InvalidDimension(format!(
                "cannot generate a {}x{} grid",
                rows, cols
            )));
        }
        let cells = (0..rows * cols)
            .map(|_| rng.gen_range(0..=max_stack))
            .collect();
        Ok(Self { rows, cols, cells })
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn same_shape(&self, other: &Grid) -> bool {
        self.rows == other.rows && self.cols == other.cols
    }

    /// Counter value at (row, col), `None` if out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<u32> {
        if row < self.rows && col < self.cols {
            Some(self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    /// Value at an in-bounds cell
    #[inline]
    pub(crate) fn value(&self, row: usize, col: usize) -> u32 {
        self.cells[row * self.cols + col]
    }

    /// Overwrite an in-bounds cell (used for mutate/undo during search)
    #[inline]
    pub(crate) fn set(&mut self, row: usize, col: usize, value: u32) {
        self.cells[row * self.cols + col] = value;
    }

    /// In-bounds 8-directional neighbors of (row, col)
    pub fn neighbors(&self, row: usize, col: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        NEIGHBORS.iter().filter_map(move |&(dr, dc)| {
            let r = row.checked_add_signed(dr)?;
            let c = col.checked_add_signed(dc)?;
            (r < self.rows && c < self.cols).then_some((r, c))
        })
    }

    /// Cells with at least one counter, row-major
    pub fn active_cells(&self) -> Vec<Move> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v > 0)
            .map(|(i, _)| Move::new(i / self.cols, i % self.cols))
            .collect()
    }

    /// True when every cell is zero
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&v| v == 0)
    }

    pub fn total_counters(&self) -> u64 {
        self.cells.iter().map(|&v| v as u64).sum()
    }

    /// Canonical string form, identical for identical matrices
    pub fn key(&self) -> String {
        self.cells
            .chunks(self.cols)
            .map(|row| {
                row.iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    pub fn to_matrix(&self) -> Vec<Vec<u32>> {
        self.cells.chunks(self.cols).map(|row| row.to_vec()).collect()
    }

    // ========================================================================
    // MOVES
    // ========================================================================

    /// Successor grids, one per active cell, in row-major order
    ///
    /// Each call starts a fresh pass over the board.
    pub fn moves(&self) -> impl Iterator<Item = Grid> + Clone + '_ {
        self.successors().map(|(_, grid)| grid)
    }

    /// Successor grids paired with the move that produced them
    pub fn successors(&self) -> Successors<'_> {
        Successors { grid: self, next: 0 }
    }

    /// Remove one counter from (row, col) in place
    ///
    /// The caller is responsible for checking the move is legal.
    pub fn decrement(&mut self, row: usize, col: usize) {
        let i = row * self.cols + col;
        self.cells[i] = self.cells[i].saturating_sub(1);
    }

    /// Copy of this grid after removing one counter from `mv`
    pub fn after_move(&self, mv: Move) -> Grid {
        let mut next = self.clone();
        next.decrement(mv.row, mv.col);
        next
    }

    /// Copy of this grid with one cell overwritten
    pub fn with_cell(&self, row: usize, col: usize, value: u32) -> Grid {
        let mut next = self.clone();
        next.set(row, col, value);
        next
    }

    // ========================================================================
    // COMPARISONS
    // ========================================================================

    /// Number of cells whose values differ
    pub fn hamming_distance(&self, other: &Grid) -> usize {
        self.cells
            .iter()
            .zip(&other.cells)
            .filter(|(a, b)| a != b)
            .count()
    }

    /// True when every cell of `self` is at most the matching cell of `other`
    pub fn is_dominated_by(&self, other: &Grid) -> bool {
        self.same_shape(other) && self.cells.iter().zip(&other.cells).all(|(a, b)| a <= b)
    }

    /// Total amount removed going from `self` to `next`
    pub fn decrease_to(&self, next: &Grid) -> u32 {
        self.cells
            .iter()
            .zip(&next.cells)
            .map(|(&a, &b)| a.saturating_sub(b))
            .sum()
    }

    /// First cell (row-major) whose value went down going from `self` to `next`
    pub fn decreased_cell(&self, next: &Grid) -> Option<Move> {
        self.cells
            .iter()
            .zip(&next.cells)
            .position(|(a, b)| b < a)
            .map(|i| Move::new(i / self.cols, i % self.cols))
    }
}

/// Lazy row-major successor iterator returned by [`Grid::successors`]
#[derive(Clone, Debug)]
pub struct Successors<'a> {
    grid: &'a Grid,
    next: usize,
}

impl Iterator for Successors<'_> {
    type Item = (Move, Grid);

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < self.grid.cells.len() {
            let i = self.next;
            self.next += 1;
            if self.grid.cells[i] > 0 {
                let mv = Move::new(i / self.grid.cols, i % self.grid.cols);
                return Some((mv, self.grid.after_move(mv)));
            }
        }
        None
    }
}

impl TryFrom<Vec<Vec<i64>>> for Grid {
    type Error = HingerError;

    fn try_from(matrix: Vec<Vec<i64>>) -> Result<Self> {
        Grid::new(&matrix)
    }
}

impl From<Grid> for Vec<Vec<u32>> {
    fn from(grid: Grid) -> Self {
        grid.to_matrix()
    }
}

/// Parse a JSON matrix literal such as `[[1,0],[2,1]]`
impl FromStr for Grid {
    type Err = HingerError;

    fn from_str(s: &str) -> Result<Self> {
        let matrix: Vec<Vec<i64>> = serde_json::from_str(s)?;
        Grid::new(&matrix)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.cells.chunks(self.cols).enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            let line = row
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            write!(f, "{}", line)?;
        }
        Ok(())
    }
}
