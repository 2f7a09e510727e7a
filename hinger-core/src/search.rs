//! Safe-path search between two grids
//!
//! Nodes are grids, edges are single-counter removals, and an edge may only be
//! taken when the safety predicate accepts the `(from, to)` transition.
//! Five strategies share that graph:
//! - breadth-first (fewest moves)
//! - depth-first (baseline, no optimality)
//! - iterative deepening (fewest moves, linear memory)
//! - uniform-cost (cheapest path)
//! - A* with a Hamming-distance heuristic (cheapest path, fewer expansions)
//!
//! Moves only ever remove counters, so every path from one grid to another
//! has the same number of moves and the graph has no cycles.

use crate::error::{HingerError, Result};
use crate::grid::Grid;
use crate::hinger::{hinger_count, is_hinger};
use crate::regions::region_count;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Default move limit for iterative deepening
pub const DEFAULT_MAX_DEPTH: usize = 10;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Path search strategy
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Bfs,
    Dfs,
    Iddfs,
    Ucs,
    AStar,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Bfs,
        Algorithm::Dfs,
        Algorithm::Iddfs,
        Algorithm::Ucs,
        Algorithm::AStar,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Bfs => "bfs",
            Algorithm::Dfs => "dfs",
            Algorithm::Iddfs => "iddfs",
            Algorithm::Ucs => "ucs",
            Algorithm::AStar => "astar",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = HingerError;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "bfs" | "breadthfirst" => Ok(Algorithm::Bfs),
            "dfs" | "depthfirst" => Ok(Algorithm::Dfs),
            "iddfs" | "ids" | "iterativedeepening" => Ok(Algorithm::Iddfs),
            "ucs" | "uniformcost" | "minsafe" | "dijkstra" => Ok(Algorithm::Ucs),
            "astar" | "a*" => Ok(Algorithm::AStar),
            _ => Err(HingerError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Which transitions a path may use
///
/// The two policies accept different transition sets and are never combined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SafetyPolicy {
    /// Neither grid has a hinger and the region count does not grow
    #[default]
    NoHingerStates,
    /// The resulting grid has no hinger and the removed counter was not one
    NoHingerMoves,
}

impl SafetyPolicy {
    pub fn is_safe(self, from: &Grid, to: &Grid) -> bool {
        match self {
            SafetyPolicy::NoHingerStates => {
                hinger_count(from) == 0
                    && hinger_count(to) == 0
                    && region_count(to) <= region_count(from)
            }
            SafetyPolicy::NoHingerMoves => {
                hinger_count(to) == 0
                    && from
                        .decreased_cell(to)
                        .map_or(true, |mv| !is_hinger(from, mv.row, mv.col))
            }
        }
    }
}

impl FromStr for SafetyPolicy {
    type Err = HingerError;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "states" | "nohingerstates" => Ok(SafetyPolicy::NoHingerStates),
            "moves" | "nohingermoves" => Ok(SafetyPolicy::NoHingerMoves),
            _ => Err(HingerError::UnknownPolicy(s.to_string())),
        }
    }
}

/// How much a single transition costs
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveCost {
    /// Total amount removed (1 for every single-counter move)
    #[default]
    Decrement,
    /// Height of the stack the counter was taken from
    CellValue,
}

impl MoveCost {
    pub fn cost(self, from: &Grid, to: &Grid) -> u64 {
        match self {
            MoveCost::Decrement => u64::from(from.decrease_to(to)),
            MoveCost::CellValue => from
                .decreased_cell(to)
                .and_then(|mv| from.get(mv.row, mv.col))
                .map_or(0, u64::from),
        }
    }

    /// Total cost of walking a path
    pub fn path_cost(self, path: &[Grid]) -> u64 {
        path.windows(2).map(|pair| self.cost(&pair[0], &pair[1])).sum()
    }
}

impl FromStr for MoveCost {
    type Err = HingerError;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "decrement" | "unit" => Ok(MoveCost::Decrement),
            "value" | "cellvalue" => Ok(MoveCost::CellValue),
            _ => Err(HingerError::UnknownCostModel(s.to_string())),
        }
    }
}

/// Options shared by every strategy
#[derive(Clone, Debug)]
pub struct SearchOptions {
    /// Move limit for iterative deepening
    pub max_depth: usize,
    pub policy: SafetyPolicy,
    /// Cost model for uniform-cost and A*
    pub cost: MoveCost,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            policy: SafetyPolicy::default(),
            cost: MoveCost::default(),
        }
    }
}

impl SearchOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_policy(mut self, policy: SafetyPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_cost(mut self, cost: MoveCost) -> Self {
        self.cost = cost;
        self
    }
}

/// Result of one search call
#[derive(Clone, Debug, Serialize)]
pub struct SearchReport {
    pub algorithm: Algorithm,
    /// Grids from start to goal inclusive, `None` if the goal is unreachable
    pub path: Option<Vec<Grid>>,
    /// Path cost under the configured cost model
    pub cost: Option<u64>,
    /// Nodes taken off the frontier
    pub nodes_expanded: usize,
}

impl SearchReport {
    pub fn found(&self) -> bool {
        self.path.is_some()
    }

    /// Number of moves on the path
    pub fn steps(&self) -> Option<usize> {
        self.path.as_ref().map(|p| p.len() - 1)
    }
}

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// Find a safe path from `start` to `goal`
///
/// Returns `Ok(None)` when no safe path exists.
pub fn find_path(
    start: &Grid,
    goal: &Grid,
    algorithm: Algorithm,
    options: &SearchOptions,
) -> Result<Option<Vec<Grid>>> {
    Ok(search(start, goal, algorithm, options)?.path)
}

/// Run a search with the configured safety policy
pub fn search(
    start: &Grid,
    goal: &Grid,
    algorithm: Algorithm,
    options: &SearchOptions,
) -> Result<SearchReport> {
    let policy = options.policy;
    search_with(start, goal, algorithm, options, |from, to| {
        policy.is_safe(from, to)
    })
}

/// Run a search with a caller-supplied safety predicate
pub fn search_with<F>(
    start: &Grid,
    goal: &Grid,
    algorithm: Algorithm,
    options: &SearchOptions,
    is_safe: F,
) -> Result<SearchReport>
where
    F: Fn(&Grid, &Grid) -> bool,
{
    if !start.same_shape(goal) {
        return Err(HingerError::DimensionMismatch {
            start_rows: start.rows(),
            start_cols: start.cols(),
            goal_rows: goal.rows(),
            goal_cols: goal.cols(),
        });
    }

    // Counters are never added, so a goal above start anywhere is out of reach
    let outcome = if !goal.is_dominated_by(start) {
        tracing::debug!(%algorithm, "goal exceeds start, skipping search");
        Outcome::not_found(0)
    } else {
        match algorithm {
            Algorithm::Bfs => breadth_first(start, goal, &is_safe),
            Algorithm::Dfs => depth_first(start, goal, &is_safe),
            Algorithm::Iddfs => iterative_deepening(start, goal, options.max_depth, &is_safe),
            Algorithm::Ucs => best_first(start, goal, options.cost, &is_safe, |_| 0),
            Algorithm::AStar => best_first(start, goal, options.cost, &is_safe, |grid| {
                grid.hamming_distance(goal) as u64
            }),
        }
    };

    let cost = outcome.path.as_deref().map(|p| options.cost.path_cost(p));
    tracing::debug!(
        %algorithm,
        found = outcome.path.is_some(),
        nodes = outcome.expanded,
        "path search finished"
    );

    Ok(SearchReport {
        algorithm,
        path: outcome.path,
        cost,
        nodes_expanded: outcome.expanded,
    })
}

// ============================================================================
// SEARCH TREE
// ============================================================================

struct Outcome {
    path: Option<Vec<Grid>>,
    expanded: usize,
}

impl Outcome {
    fn found(path: Vec<Grid>, expanded: usize) -> Self {
        Self { path: Some(path), expanded }
    }

    fn not_found(expanded: usize) -> Self {
        Self { path: None, expanded }
    }
}

struct TreeNode {
    grid: Grid,
    parent: Option<usize>,
    cost: u64,
}

/// Arena of generated nodes; a node's path is its parent chain
struct SearchTree {
    nodes: Vec<TreeNode>,
}

impl SearchTree {
    fn new(root: &Grid) -> Self {
        Self {
            nodes: vec![TreeNode {
                grid: root.clone(),
                parent: None,
                cost: 0,
            }],
        }
    }

    fn push(&mut self, grid: Grid, parent: usize, cost: u64) -> usize {
        self.nodes.push(TreeNode {
            grid,
            parent: Some(parent),
            cost,
        });
        self.nodes.len() - 1
    }

    fn grid(&self, id: usize) -> &Grid {
        &self.nodes[id].grid
    }

    fn path_to(&self, id: usize) -> Vec<Grid> {
        let mut path = Vec::new();
        let mut cursor = Some(id);
        while let Some(i) = cursor {
            path.push(self.nodes[i].grid.clone());
            cursor = self.nodes[i].parent;
        }
        path.reverse();
        path
    }
}

// ============================================================================
// UNINFORMED STRATEGIES
// ============================================================================

fn breadth_first<F>(start: &Grid, goal: &Grid, is_safe: &F) -> Outcome
where
    F: Fn(&Grid, &Grid) -> bool,
{
    let mut tree = SearchTree::new(start);
    let mut visited = FxHashSet::default();
    visited.insert(start.clone());
    let mut frontier = VecDeque::from([0]);
    let mut expanded = 0;

    while let Some(id) = frontier.pop_front() {
        expanded += 1;
        let current = tree.grid(id);
        if current == goal {
            return Outcome::found(tree.path_to(id), expanded);
        }

        let children: Vec<Grid> = current
            .moves()
            .filter(|child| !visited.contains(child) && is_safe(current, child))
            .collect();
        for child in children {
            visited.insert(child.clone());
            frontier.push_back(tree.push(child, id, 0));
        }
    }

    Outcome::not_found(expanded)
}

fn depth_first<F>(start: &Grid, goal: &Grid, is_safe: &F) -> Outcome
where
    F: Fn(&Grid, &Grid) -> bool,
{
    let mut tree = SearchTree::new(start);
    let mut visited = FxHashSet::default();
    let mut stack = vec![0];
    let mut expanded = 0;

    while let Some(id) = stack.pop() {
        let current = tree.grid(id);
        if !visited.insert(current.clone()) {
            continue;
        }
        expanded += 1;
        if current == goal {
            return Outcome::found(tree.path_to(id), expanded);
        }

        let children: Vec<Grid> = current
            .moves()
            .filter(|child| !visited.contains(child) && is_safe(current, child))
            .collect();
        for child in children {
            stack.push(tree.push(child, id, 0));
        }
    }

    Outcome::not_found(expanded)
}

/// Depth-limited DFS for limits 1..=max_depth, with a fresh visited set per limit
fn iterative_deepening<F>(start: &Grid, goal: &Grid, max_depth: usize, is_safe: &F) -> Outcome
where
    F: Fn(&Grid, &Grid) -> bool,
{
    let mut expanded = 0;

    for limit in 1..=max_depth.max(1) {
        let mut visited = FxHashSet::default();
        let mut path = vec![start.clone()];
        let mut cut_off = false;

        if depth_limited(
            start,
            goal,
            limit,
            is_safe,
            &mut visited,
            &mut path,
            &mut expanded,
            &mut cut_off,
        ) {
            return Outcome::found(path, expanded);
        }
        if !cut_off {
            // Whole safe region explored without touching the limit
            break;
        }
        tracing::trace!(limit, expanded, "deepening");
    }

    Outcome::not_found(expanded)
}

#[allow(clippy::too_many_arguments)]
fn depth_limited<F>(
    grid: &Grid,
    goal: &Grid,
    remaining: usize,
    is_safe: &F,
    visited: &mut FxHashSet<Grid>,
    path: &mut Vec<Grid>,
    expanded: &mut usize,
    cut_off: &mut bool,
) -> bool
where
    F: Fn(&Grid, &Grid) -> bool,
{
    *expanded += 1;
    if grid == goal {
        return true;
    }
    if remaining == 0 {
        *cut_off = true;
        return false;
    }
    visited.insert(grid.clone());

    for child in grid.moves() {
        if visited.contains(&child) || !is_safe(grid, &child) {
            continue;
        }
        path.push(child.clone());
        if depth_limited(&child, goal, remaining - 1, is_safe, visited, path, expanded, cut_off) {
            return true;
        }
        path.pop();
    }

    false
}

// ============================================================================
// COST-ORDERED STRATEGIES
// ============================================================================

/// Frontier entry ordered by priority, then insertion order
#[derive(PartialEq, Eq)]
struct Ranked {
    priority: u64,
    seq: u64,
    id: usize,
}

impl Ord for Ranked {
    // Reversed so BinaryHeap pops the smallest (priority, seq) first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Uniform-cost search, or A* when `heuristic` is non-zero
fn best_first<F, H>(
    start: &Grid,
    goal: &Grid,
    cost_model: MoveCost,
    is_safe: &F,
    heuristic: H,
) -> Outcome
where
    F: Fn(&Grid, &Grid) -> bool,
    H: Fn(&Grid) -> u64,
{
    let mut tree = SearchTree::new(start);
    let mut best_cost: FxHashMap<Grid, u64> = FxHashMap::default();
    best_cost.insert(start.clone(), 0);

    let mut frontier = BinaryHeap::new();
    let mut seq = 0u64;
    frontier.push(Ranked {
        priority: heuristic(start),
        seq,
        id: 0,
    });
    let mut expanded = 0;

    while let Some(Ranked { id, .. }) = frontier.pop() {
        let current = tree.grid(id);
        let cost = tree.nodes[id].cost;

        // Superseded by a cheaper route pushed later
        if best_cost.get(current).is_some_and(|&best| best < cost) {
            continue;
        }
        expanded += 1;
        if current == goal {
            return Outcome::found(tree.path_to(id), expanded);
        }

        let children: Vec<(Grid, u64)> = current
            .moves()
            .filter(|child| is_safe(current, child))
            .map(|child| {
                let step = cost_model.cost(current, &child);
                (child, cost + step)
            })
            .collect();

        for (child, next_cost) in children {
            if best_cost.get(&child).is_some_and(|&best| best <= next_cost) {
                continue;
            }
            best_cost.insert(child.clone(), next_cost);
            seq += 1;
            let priority = next_cost + heuristic(&child);
            let child_id = tree.push(child, id, next_cost);
            frontier.push(Ranked {
                priority,
                seq,
                id: child_id,
            });
        }
    }

    Outcome::not_found(expanded)
}

// ============================================================================
// UTILITIES
// ============================================================================

fn normalize(s: &str) -> String {
    s.trim()
        .to_ascii_lowercase()
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
