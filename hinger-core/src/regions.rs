//! Region counting: connected components of active cells

use crate::grid::Grid;

/// Number of regions (maximal 8-connected sets of active cells)
///
/// Depends only on which cells are zero, never on stack heights.
pub fn region_count(grid: &Grid) -> usize {
    let (rows, cols) = (grid.rows(), grid.cols());
    let mut visited = vec![false; rows * cols];
    let mut stack = Vec::new();
    let mut regions = 0;

    for row in 0..rows {
        for col in 0..cols {
            if visited[row * cols + col] || grid.value(row, col) == 0 {
                continue;
            }

            regions += 1;
            visited[row * cols + col] = true;
            stack.push((row, col));

            while let Some((r, c)) = stack.pop() {
                for (nr, nc) in grid.neighbors(r, c) {
                    let i = nr * cols + nc;
                    if !visited[i] && grid.value(nr, nc) > 0 {
                        visited[i] = true;
                        stack.push((nr, nc));
                    }
                }
            }
        }
    }

    regions
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn grid(rows: &[&[i64]]) -> Grid {
        Grid::new(rows).unwrap()
    }

    #[test]
    fn test_empty_grid_has_no_regions() {
        assert_eq!(region_count(&grid(&[&[0, 0], &[0, 0]])), 0);
    }

    #[test]
    fn test_diagonal_cells_connect() {
        assert_eq!(region_count(&grid(&[&[1, 0], &[0, 1]])), 1);
        assert_eq!(region_count(&grid(&[&[1, 0, 1]])), 2);
    }

    #[test]
    fn test_mixed_board() {
        let g = grid(&[
            &[1, 1, 0, 0, 2],
            &[0, 1, 0, 1, 0],
            &[1, 0, 0, 0, 0],
            &[0, 2, 1, 1, 1],
        ]);
        assert_eq!(region_count(&g), 2);
        // Idempotent on an unmutated grid
        assert_eq!(region_count(&g), region_count(&g));
    }

    #[test]
    fn test_single_solid_region() {
        let g = grid(&[&[2, 2, 0], &[2, 2, 2], &[0, 2, 2]]);
        assert_eq!(region_count(&g), 1);
    }

    #[test]
    fn test_random_boards_zero_iff_empty() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..200 {
            let g = Grid::random(4, 4, 2, &mut rng).unwrap();
            let regions = region_count(&g);
            assert_eq!(regions == 0, g.is_empty());

            // Flattening every stack to one counter keeps the same regions
            let flat: Vec<Vec<i64>> = g
                .to_matrix()
                .iter()
                .map(|row| row.iter().map(|&v| i64::from(v.min(1))).collect())
                .collect();
            assert_eq!(region_count(&Grid::new(&flat).unwrap()), regions);
        }
    }
}
