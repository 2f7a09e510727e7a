//! Path command - safe-path search between two grids
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_endpoints(), run_searches(), report_results()
//! - Level 3: timed_search()
//! - Level 4: formatting utilities

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use hinger_core::{search, Algorithm, Grid, MoveCost, SafetyPolicy, SearchOptions, SearchReport};

use crate::board_input::load_grid;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PathArgs {
    /// Start grid as a JSON matrix, or a file containing one
    #[arg(long, value_name = "GRID")]
    pub start: String,

    /// Goal grid as a JSON matrix, or a file containing one
    #[arg(long, value_name = "GRID")]
    pub goal: String,

    /// bfs, dfs, iddfs, ucs, astar, or all to compare every strategy
    #[arg(long, default_value = "bfs")]
    pub algorithm: String,

    /// Move limit for iterative deepening
    #[arg(long, default_value = "10")]
    pub max_depth: usize,

    /// Safety rule: states (no hinger on either grid) or moves (no hinger removed)
    #[arg(long, default_value = "states")]
    pub policy: SafetyPolicy,

    /// Cost model for ucs and astar: decrement or value
    #[arg(long, default_value = "decrement")]
    pub cost: MoveCost,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// One search with its wall-clock time
#[derive(Clone, Debug, Serialize)]
struct TimedReport {
    #[serde(flatten)]
    report: SearchReport,
    elapsed_ms: f64,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run path command
///
/// 1. Load start and goal grids
/// 2. Run the selected strategies
/// 3. Report results
pub fn run(args: PathArgs) -> Result<()> {
    let (start, goal) = load_endpoints(&args)?;
    let algorithms = parse_algorithms(&args.algorithm)?;
    let options = SearchOptions::default()
        .with_max_depth(args.max_depth)
        .with_policy(args.policy)
        .with_cost(args.cost);

    tracing::info!(
        "Searching {}x{} grid with {} strategy(ies), policy={:?}, cost={:?}",
        start.rows(),
        start.cols(),
        algorithms.len(),
        options.policy,
        options.cost
    );

    let results = run_searches(&start, &goal, &algorithms, &options)?;

    report_results(&results, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_endpoints(args: &PathArgs) -> Result<(Grid, Grid)> {
    let start = load_grid(&args.start, "start")?;
    let goal = load_grid(&args.goal, "goal")?;
    Ok((start, goal))
}

/// `all` expands to every strategy
fn parse_algorithms(selector: &str) -> Result<Vec<Algorithm>> {
    if selector.trim().eq_ignore_ascii_case("all") {
        return Ok(Algorithm::ALL.to_vec());
    }
    let algorithm = selector
        .parse::<Algorithm>()
        .with_context(|| format!("Unsupported --algorithm value: {}", selector))?;
    Ok(vec![algorithm])
}

fn run_searches(
    start: &Grid,
    goal: &Grid,
    algorithms: &[Algorithm],
    options: &SearchOptions,
) -> Result<Vec<TimedReport>> {
    let mut results = Vec::with_capacity(algorithms.len());
    for &algorithm in algorithms {
        let timed = timed_search(start, goal, algorithm, options)?;
        tracing::info!(
            "{}: {} ({} nodes, {:.3}ms)",
            algorithm,
            describe_outcome(&timed.report),
            timed.report.nodes_expanded,
            timed.elapsed_ms
        );
        results.push(timed);
    }
    Ok(results)
}

fn report_results(results: &[TimedReport], args: &PathArgs) {
    if args.json {
        print_json_results(results);
    } else if results.len() == 1 {
        print_path(&results[0]);
    } else {
        print_comparison(results);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn timed_search(
    start: &Grid,
    goal: &Grid,
    algorithm: Algorithm,
    options: &SearchOptions,
) -> Result<TimedReport> {
    let t0 = Instant::now();
    let report = search(start, goal, algorithm, options)
        .with_context(|| format!("{} search failed", algorithm))?;
    Ok(TimedReport {
        report,
        elapsed_ms: t0.elapsed().as_secs_f64() * 1000.0,
    })
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn describe_outcome(report: &SearchReport) -> String {
    match report.steps() {
        Some(steps) => format!("{} steps", steps),
        None => "no safe path".to_string(),
    }
}

fn print_json_results(results: &[TimedReport]) {
    if let Ok(json) = serde_json::to_string_pretty(results) {
        println!("{}", json);
    }
}

fn print_path(timed: &TimedReport) {
    let report = &timed.report;
    let Some(path) = &report.path else {
        println!("{}: no safe path ({} nodes expanded)", report.algorithm, report.nodes_expanded);
        return;
    };

    println!(
        "{}: {} steps, cost {}, {} nodes expanded",
        report.algorithm,
        path.len() - 1,
        report.cost.unwrap_or(0),
        report.nodes_expanded
    );
    for (i, grid) in path.iter().enumerate() {
        match i.checked_sub(1).and_then(|prev| path[prev].decreased_cell(grid)) {
            Some(mv) => println!("\nStep {}: remove at {}", i, mv),
            None => println!("\nStart"),
        }
        println!("{}", grid);
    }
}

fn print_comparison(results: &[TimedReport]) {
    println!("\n| Algorithm | Found | Steps | Cost | Nodes | Time |");
    println!("|-----------|-------|-------|------|-------|------|");
    for timed in results {
        println!("{}", comparison_row(timed));
    }
}

fn comparison_row(timed: &TimedReport) -> String {
    let report = &timed.report;
    format!(
        "| {} | {} | {} | {} | {} | {:.3}ms |",
        report.algorithm,
        if report.found() { "yes" } else { "no" },
        report.steps().map_or_else(|| "-".to_string(), |s| s.to_string()),
        report.cost.map_or_else(|| "-".to_string(), |c| c.to_string()),
        report.nodes_expanded,
        timed.elapsed_ms
    )
}

// ============================================================================
// TESTS
// ============================================================================
