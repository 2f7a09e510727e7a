//! Position evaluation

use crate::agent::ordered_moves;
use crate::grid::Grid;
use crate::hinger::hinger_count_in_place;

/// Score for a node where the side to move can play a hinger
pub const WIN_SCORE: i32 = 1;

/// How many ordered replies the evaluation looks at
pub const EVAL_LOOKAHEAD: usize = 3;

/// Static evaluation: hingers on the board now, minus the most hingers the
/// opponent could leave after one of our first few ordered moves
pub fn evaluate(grid: &Grid) -> i32 {
    evaluate_in_place(&mut grid.clone())
}

/// [`evaluate`] on a scratch grid, restored before returning
pub(crate) fn evaluate_in_place(grid: &mut Grid) -> i32 {
    let current = hinger_count_in_place(grid) as i32;

    let mut best_reply = 0;
    for candidate in ordered_moves(grid).iter().take(EVAL_LOOKAHEAD) {
        let (row, col) = (candidate.mv.row, candidate.mv.col);
        let original = grid.value(row, col);
        grid.set(row, col, original - 1);
        best_reply = best_reply.max(hinger_count_in_place(grid) as i32);
        grid.set(row, col, original);
    }

    current - best_reply
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[i64]]) -> Grid {
        Grid::new(rows).unwrap()
    }

    #[test]
    fn test_evaluate_u_shape() {
        // Three hingers now; every hinger reply leaves two
        let g = grid(&[&[1, 0, 1], &[1, 0, 1], &[1, 1, 1]]);
        assert_eq!(evaluate(&g), 1);
    }

    #[test]
    fn test_evaluate_quiet_boards() {
        assert_eq!(evaluate(&grid(&[&[2, 2, 0], &[2, 2, 2], &[0, 2, 2]])), 0);
        assert_eq!(evaluate(&grid(&[&[0, 0], &[0, 0]])), 0);
    }

    #[test]
    fn test_evaluate_leaves_grid_untouched() {
        let g = grid(&[&[1, 1, 1], &[0, 2, 0]]);
        let mut scratch = g.clone();
        evaluate_in_place(&mut scratch);
        assert_eq!(scratch, g);
    }
}
