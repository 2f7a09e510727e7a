//! Grid input helpers shared by the subcommands

use std::path::Path;

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use hinger_core::Grid;

/// Load a grid from a JSON literal (`[[1,0],[2,1]]`) or a file holding one
pub fn load_grid(source: &str, what: &str) -> Result<Grid> {
    let trimmed = source.trim();
    if trimmed.starts_with('[') {
        return trimmed
            .parse::<Grid>()
            .with_context(|| format!("Invalid {} grid: {}", what, trimmed));
    }

    let path = Path::new(trimmed);
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} grid: {}", what, path.display()))?;
    text.trim()
        .parse::<Grid>()
        .with_context(|| format!("Invalid {} grid in {}", what, path.display()))
}

/// Random board with every stack in `0..=max_stack`
pub fn random_grid(rows: usize, cols: usize, max_stack: u32, rng: &mut ChaCha8Rng) -> Result<Grid> {
    Grid::random(rows, cols, max_stack, rng)
        .with_context(|| format!("Cannot generate a {}x{} board", rows, cols))
}

/// Create RNG from seed or random
pub fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_grid_literal() {
        let g = load_grid(" [[1,0,1],[1,0,1],[1,1,1]] ", "start").unwrap();
        assert_eq!(g.rows(), 3);
        assert_eq!(g.cols(), 3);
        assert_eq!(g.get(2, 1), Some(1));
    }

    #[test]
    fn test_load_grid_rejects_ragged_rows() {
        assert!(load_grid("[[1,0],[1]]", "start").is_err());
        assert!(load_grid("[[1,-2]]", "start").is_err());
    }

    #[test]
    fn test_load_grid_from_file() {
        let path = std::env::temp_dir().join(format!("hinger-grid-{}.json", std::process::id()));
        std::fs::write(&path, "[[2,1],[0,3]]\n").unwrap();
        let g = load_grid(path.to_str().unwrap(), "goal").unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(g.to_matrix(), vec![vec![2, 1], vec![0, 3]]);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_grid("/no/such/grid.json", "goal").unwrap_err();
        assert!(format!("{:#}", err).contains("/no/such/grid.json"));
    }

    #[test]
    fn test_random_grid_deterministic() {
        let a = random_grid(3, 4, 2, &mut create_rng(Some(42))).unwrap();
        let b = random_grid(3, 4, 2, &mut create_rng(Some(42))).unwrap();
        assert_eq!(a, b);
        assert!(random_grid(0, 4, 2, &mut create_rng(Some(1))).is_err());
    }
}
