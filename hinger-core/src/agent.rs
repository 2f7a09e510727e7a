//! Game-tree agent: minimax and alpha-beta search over counter removals

use crate::error::{HingerError, Result};
use crate::eval::{evaluate_in_place, WIN_SCORE};
use crate::grid::{Grid, Move};
use crate::hinger::splits_region;
use crate::regions::region_count;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Default search depth in plies
pub const DEFAULT_DEPTH: u32 = 4;

/// Game-tree search variant
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Minimax,
    #[default]
    AlphaBeta,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Minimax => f.write_str("minimax"),
            Strategy::AlphaBeta => f.write_str("alphabeta"),
        }
    }
}

impl FromStr for Strategy {
    type Err = HingerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "minimax" => Ok(Strategy::Minimax),
            "alphabeta" | "ab" => Ok(Strategy::AlphaBeta),
            _ => Err(HingerError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    pub name: String,
    pub strategy: Strategy,
    /// Search depth in plies (values below 1 search one ply)
    pub depth: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: "Agent".to_string(),
            strategy: Strategy::AlphaBeta,
            depth: DEFAULT_DEPTH,
        }
    }
}

impl AgentConfig {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }
}

// ============================================================================
// AGENT
// ============================================================================

/// Computer player
///
/// Holds no game state between calls, only diagnostics for the most recent
/// search.
#[derive(Clone, Debug)]
pub struct Agent {
    config: AgentConfig,
    nodes_searched: u64,
    last_score: Option<i32>,
}

impl Agent {
    pub fn new(config: AgentConfig) -> Self {
        Self {
            config,
            nodes_searched: 0,
            last_score: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Game-tree nodes visited by the most recent call
    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }

    /// Root score of the most recent full search (`None` after a shortcut)
    pub fn last_score(&self) -> Option<i32> {
        self.last_score
    }

    /// Pick a move with the configured strategy and depth
    pub fn best_move(&mut self, grid: &Grid) -> Option<Move> {
        self.select_move(grid, self.config.strategy, self.config.depth)
    }

    /// Pick a move, or `None` if the board has no counters left
    ///
    /// A hinger is played straight away since it wins the game outright.
    pub fn select_move(&mut self, grid: &Grid, strategy: Strategy, max_depth: u32) -> Option<Move> {
        self.nodes_searched = 0;
        self.last_score = None;

        let mut scratch = grid.clone();
        let moves = ordered_moves(&mut scratch);
        let first = moves.first()?;
        if first.is_hinger {
            tracing::debug!(agent = %self.config.name, mv = %first.mv, "taking hinger");
            return Some(first.mv);
        }

        let depth = max_depth.max(1);
        let mut nodes = 0;
        let (score, best) = match strategy {
            Strategy::Minimax => minimax(&mut scratch, depth, true, &mut nodes),
            Strategy::AlphaBeta => {
                alpha_beta(&mut scratch, depth, i32::MIN, i32::MAX, true, &mut nodes)
            }
        };
        debug_assert_eq!(&scratch, grid);

        self.nodes_searched = nodes;
        self.last_score = Some(score);
        tracing::debug!(
            agent = %self.config.name,
            %strategy,
            depth,
            nodes,
            score,
            "search finished"
        );

        best
    }
}

// ============================================================================
// MOVE ORDERING
// ============================================================================

/// A legal move tagged with whether it plays a hinger
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CandidateMove {
    pub mv: Move,
    pub is_hinger: bool,
}

/// Legal moves, hingers first, otherwise row-major
pub fn legal_moves(grid: &Grid) -> Vec<CandidateMove> {
    ordered_moves(&mut grid.clone())
}

pub(crate) fn ordered_moves(grid: &mut Grid) -> Vec<CandidateMove> {
    let regions = region_count(grid);
    let mut moves: Vec<CandidateMove> = grid
        .active_cells()
        .into_iter()
        .map(|mv| CandidateMove {
            mv,
            is_hinger: splits_region(grid, mv.row, mv.col, regions),
        })
        .collect();
    // Stable: row-major order survives within each group
    moves.sort_by_key(|candidate| !candidate.is_hinger);
    moves
}

// ============================================================================
// TREE SEARCH
// ============================================================================

fn minimax(grid: &mut Grid, depth: u32, maximizing: bool, nodes: &mut u64) -> (i32, Option<Move>) {
    *nodes += 1;
    let moves = ordered_moves(grid);
    if depth == 0 || moves.is_empty() {
        return (evaluate_in_place(grid), None);
    }
    if moves[0].is_hinger {
        return (terminal_score(maximizing), Some(moves[0].mv));
    }

    let mut best_score = if maximizing { i32::MIN } else { i32::MAX };
    let mut best_move = None;

    for candidate in &moves {
        let Move { row, col } = candidate.mv;
        let original = grid.value(row, col);
        grid.set(row, col, original - 1);
        let (score, _) = minimax(grid, depth - 1, !maximizing, nodes);
        grid.set(row, col, original);

        if improves(score, best_score, maximizing) {
            best_score = score;
            best_move = Some(candidate.mv);
        }
    }

    (best_score, best_move)
}

fn alpha_beta(
    grid: &mut Grid,
    depth: u32,
    mut alpha: i32,
    mut beta: i32,
    maximizing: bool,
    nodes: &mut u64,
) -> (i32, Option<Move>) {
    *nodes += 1;
    let moves = ordered_moves(grid);
    if depth == 0 || moves.is_empty() {
        return (evaluate_in_place(grid), None);
    }
    if moves[0].is_hinger {
        return (terminal_score(maximizing), Some(moves[0].mv));
    }

    let mut best_score = if maximizing { i32::MIN } else { i32::MAX };
    let mut best_move = None;

    for candidate in &moves {
        let Move { row, col } = candidate.mv;
        let original = grid.value(row, col);
        grid.set(row, col, original - 1);
        let (score, _) = alpha_beta(grid, depth - 1, alpha, beta, !maximizing, nodes);
        grid.set(row, col, original);

        if improves(score, best_score, maximizing) {
            best_score = score;
            best_move = Some(candidate.mv);
        }
        if maximizing {
            alpha = alpha.max(score);
        } else {
            beta = beta.min(score);
        }
        if beta <= alpha {
            break;
        }
    }

    (best_score, best_move)
}

fn terminal_score(maximizing: bool) -> i32 {
    if maximizing {
        WIN_SCORE
    } else {
        -WIN_SCORE
    }
}

fn improves(score: i32, best: i32, maximizing: bool) -> bool {
    if maximizing {
        score > best
    } else {
        score < best
    }
}

// ============================================================================
// TESTS
// ============================================================================
