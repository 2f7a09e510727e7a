//! Path search and agent benchmark
//!
//! Compares:
//! 1. Time and expansions for the five path strategies
//! 2. Time and visited nodes for minimax vs alpha-beta at several depths

use std::time::Instant;

use hinger_core::{search, Agent, AgentConfig, Algorithm, Grid, SearchOptions, Strategy};

// ============================================================================
// TEST POSITIONS
// ============================================================================

/// Four-by-five board with mixed stacks and a goal three removals away
fn path_position() -> (Grid, Grid) {
    let start = Grid::new(&[
        vec![1i64, 0, 0, 0, 0],
        vec![2, 0, 2, 2, 1],
        vec![2, 0, 0, 0, 2],
        vec![0, 0, 1, 2, 1],
    ])
    .expect("valid start grid");
    let goal = Grid::new(&[
        vec![1i64, 0, 0, 0, 0],
        vec![2, 0, 2, 2, 1],
        vec![1, 0, 0, 0, 2],
        vec![0, 0, 0, 2, 0],
    ])
    .expect("valid goal grid");
    (start, goal)
}

/// Open midgame with no hingers on the board
fn agent_position() -> Grid {
    Grid::new(&[
        vec![2i64, 2, 0, 1],
        vec![2, 2, 2, 1],
        vec![0, 2, 2, 1],
        vec![1, 1, 1, 1],
    ])
    .expect("valid agent grid")
}

// ============================================================================
// BENCHMARK STRUCTURES
// ============================================================================

#[derive(Clone, Debug)]
struct BenchmarkResult {
    name: String,
    config: String,
    avg_time_ms: f64,
    nodes: u64,
    outcome: String,
}

impl BenchmarkResult {
    fn to_table_row(&self) -> String {
        format!(
            "| {} | {} | {:.3}ms | {} | {} |",
            self.name, self.config, self.avg_time_ms, self.nodes, self.outcome
        )
    }
}

// ============================================================================
// BENCHMARK: Path Strategies
// ============================================================================

fn benchmark_paths(start: &Grid, goal: &Grid) -> Vec<BenchmarkResult> {
    println!("\n=== PATH SEARCH BENCHMARK ===");
    let options = SearchOptions::default();
    let iterations = 5;
    let mut results = Vec::new();

    for algorithm in Algorithm::ALL {
        print!("  {} ... ", algorithm);
        let mut total_time = 0.0;
        let mut last = None;

        for _ in 0..iterations {
            let t0 = Instant::now();
            last = search(start, goal, algorithm, &options).ok();
            total_time += t0.elapsed().as_secs_f64() * 1000.0;
        }

        let avg = total_time / iterations as f64;
        let (nodes, outcome) = match last {
            Some(report) => (
                report.nodes_expanded as u64,
                match report.steps() {
                    Some(steps) => format!("{} steps", steps),
                    None => "no path".to_string(),
                },
            ),
            None => (0, "error".to_string()),
        };

        results.push(BenchmarkResult {
            name: algorithm.to_string(),
            config: format!("max depth {}", options.max_depth),
            avg_time_ms: avg,
            nodes,
            outcome,
        });

        println!("{:.3}ms", avg);
    }

    results
}

// ============================================================================
// BENCHMARK: Agent Strategies
// ============================================================================

fn benchmark_agent(grid: &Grid) -> Vec<BenchmarkResult> {
    println!("\n=== AGENT BENCHMARK ===");
    let mut results = Vec::new();

    for depth in [1, 2, 3] {
        for strategy in [Strategy::Minimax, Strategy::AlphaBeta] {
            print!("  {} depth {} ... ", strategy, depth);
            let mut agent = Agent::new(AgentConfig::default().with_strategy(strategy));
            let iterations = 3;
            let mut total_time = 0.0;
            let mut mv = None;

            for _ in 0..iterations {
                let t0 = Instant::now();
                mv = agent.select_move(grid, strategy, depth);
                total_time += t0.elapsed().as_secs_f64() * 1000.0;
            }

            let avg = total_time / iterations as f64;
            results.push(BenchmarkResult {
                name: strategy.to_string(),
                config: format!("Depth {}", depth),
                avg_time_ms: avg,
                nodes: agent.nodes_searched(),
                outcome: mv.map_or_else(|| "none".to_string(), |m| m.to_string()),
            });

            println!("{:.3}ms", avg);
        }
    }

    results
}

// ============================================================================
// MAIN
// ============================================================================

fn main() {
    println!("Hinger search benchmark");

    let (start, goal) = path_position();
    let mut results = benchmark_paths(&start, &goal);
    results.extend(benchmark_agent(&agent_position()));

    println!("\n| Search | Config | Avg time | Nodes | Result |");
    println!("|--------|--------|----------|-------|--------|");
    for result in &results {
        println!("{}", result.to_table_row());
    }
}
