//! Analyze command - describe a single grid
//!
//! Prints the board with its region count, hinger cells, legal moves in the
//! order the agent would try them, and the agent's static evaluation.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use hinger_core::{evaluate, hinger_cells, legal_moves, region_count, Grid, Move};

use crate::board_input::load_grid;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Grid as a JSON matrix, or a file containing one
    #[arg(long, value_name = "GRID")]
    pub grid: String,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Everything the command reports about one grid
#[derive(Clone, Debug, Serialize)]
struct Analysis {
    grid: Grid,
    rows: usize,
    cols: usize,
    counters: u64,
    regions: usize,
    hingers: Vec<Move>,
    active_cells: Vec<Move>,
    ordered_moves: Vec<Move>,
    evaluation: i32,
}

pub fn run(args: AnalyzeArgs) -> Result<()> {
    let grid = load_grid(&args.grid, "input")?;
    let analysis = analyze(&grid);

    tracing::info!(
        "Analyzed {}x{} grid: {} regions, {} hingers",
        analysis.rows,
        analysis.cols,
        analysis.regions,
        analysis.hingers.len()
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print_text(&analysis);
    }
    Ok(())
}

fn analyze(grid: &Grid) -> Analysis {
    Analysis {
        grid: grid.clone(),
        rows: grid.rows(),
        cols: grid.cols(),
        counters: grid.total_counters(),
        regions: region_count(grid),
        hingers: hinger_cells(grid),
        active_cells: grid.active_cells(),
        ordered_moves: legal_moves(grid).into_iter().map(|c| c.mv).collect(),
        evaluation: evaluate(grid),
    }
}

fn print_text(analysis: &Analysis) {
    println!("{}", analysis.grid);
    println!();
    println!("Size:        {}x{}", analysis.rows, analysis.cols);
    println!("Counters:    {}", analysis.counters);
    println!("Regions:     {}", analysis.regions);
    println!("Hingers:     {}", join_moves(&analysis.hingers));
    println!("Active:      {}", join_moves(&analysis.active_cells));
    println!("Move order:  {}", join_moves(&analysis.ordered_moves));
    println!("Evaluation:  {}", analysis.evaluation);
}

fn join_moves(moves: &[Move]) -> String {
    if moves.is_empty() {
        return "none".to_string();
    }
    moves
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_u_shape() {
        let grid: Grid = "[[1,0,1],[1,0,1],[1,1,1]]".parse().unwrap();
        let analysis = analyze(&grid);
        assert_eq!(analysis.regions, 1);
        assert_eq!(analysis.counters, 7);
        assert_eq!(analysis.hingers.len(), 3);
        assert_eq!(analysis.active_cells.len(), 7);
        // Hingers lead the move order
        assert_eq!(&analysis.ordered_moves[..3], &analysis.hingers[..]);
    }

    #[test]
    fn test_join_moves() {
        assert_eq!(join_moves(&[]), "none");
        assert_eq!(join_moves(&[Move::new(0, 1), Move::new(2, 2)]), "(0, 1) (2, 2)");
    }
}
