//! Hinger Core - Board analysis, path search, and game AI
//!
//! This crate provides the core logic for the Hinger counter-removal game:
//! - Grid state and row-major move generation
//! - Region counting and hinger classification
//! - Safe-path search (BFS, DFS, IDDFS, uniform-cost, A*)
//! - Minimax / alpha-beta agent with a hinger-based evaluation
//! - Rule primitives and a two-player turn loop

pub mod error;
pub mod grid;
pub mod regions;
pub mod hinger;
pub mod search;
pub mod eval;
pub mod agent;
pub mod game;

// Re-exports for convenient access
pub use error::HingerError;
pub use grid::{Grid, Move, NEIGHBORS};
pub use regions::region_count;
pub use hinger::{hinger_cells, hinger_count, is_hinger};
pub use search::{
    find_path, search, search_with, Algorithm, MoveCost, SafetyPolicy, SearchOptions,
    SearchReport,
};
pub use eval::{evaluate, EVAL_LOOKAHEAD, WIN_SCORE};
pub use agent::{legal_moves, Agent, AgentConfig, CandidateMove, Strategy};
pub use game::{
    apply_move, board_cleared, is_hinger_now, is_legal_move, play, play_with, GameOutcome,
    GameRecord, MoveChoice, MoveSource, PlayedMove, ScriptedPlayer, Side, WinReason,
};
