//! Play command - one game between two players
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: setup_board(), create_player(), play_game(), report_results()
//! - Level 3: HumanPlayer
//! - Level 4: formatting utilities

use std::io::{self, Write};

use anyhow::Result;
use clap::{Args, ValueEnum};
use serde::Serialize;

use hinger_core::{
    play_with, Agent, AgentConfig, GameOutcome, GameRecord, Grid, Move, MoveChoice, MoveSource,
    PlayedMove, Side, Strategy,
};

use crate::board_input::{create_rng, load_grid, random_grid};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Starting grid as a JSON matrix, or a file containing one
    #[arg(long, value_name = "GRID", conflicts_with_all = ["rows", "cols", "max_stack"])]
    pub grid: Option<String>,

    /// Rows of a random board (when no --grid is given)
    #[arg(long, default_value = "4")]
    pub rows: usize,

    /// Columns of a random board
    #[arg(long, default_value = "5")]
    pub cols: usize,

    /// Highest stack on a random board
    #[arg(long, default_value = "2")]
    pub max_stack: u32,

    /// Who moves first
    #[arg(long, value_enum, default_value = "agent")]
    pub a: PlayerKind,

    /// Who moves second
    #[arg(long, value_enum, default_value = "agent")]
    pub b: PlayerKind,

    /// Agent search strategy: minimax or alphabeta
    #[arg(long, default_value = "alphabeta")]
    pub strategy: Strategy,

    /// Agent search depth in plies
    #[arg(long, default_value = "4")]
    pub depth: u32,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PlayerKind {
    Agent,
    Human,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Load or generate the board
/// 2. Seat both players
/// 3. Play the game out
/// 4. Report the result
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let grid = setup_board(&args, seed)?;

    let mut a = create_player(args.a, Side::A, &args);
    let mut b = create_player(args.b, Side::B, &args);

    tracing::info!(
        "Starting game: {} vs {} on {}x{} board ({} counters)",
        a.name(),
        b.name(),
        grid.rows(),
        grid.cols(),
        grid.total_counters()
    );

    let record = play_game(&grid, a.as_mut(), b.as_mut(), args.json);

    tracing::info!("Game over: {} after {} moves", record.outcome, record.moves.len());

    report_results(&grid, &record, args.json);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn setup_board(args: &PlayArgs, seed: Option<u64>) -> Result<Grid> {
    match &args.grid {
        Some(source) => load_grid(source, "starting"),
        None => {
            let mut rng = create_rng(seed);
            random_grid(args.rows, args.cols, args.max_stack, &mut rng)
        }
    }
}

fn create_player(kind: PlayerKind, side: Side, args: &PlayArgs) -> Box<dyn MoveSource> {
    match kind {
        PlayerKind::Agent => {
            let config = AgentConfig::default()
                .with_name(format!("Agent {:?}", side))
                .with_strategy(args.strategy)
                .with_depth(args.depth);
            Box::new(Agent::new(config))
        }
        PlayerKind::Human => Box::new(HumanPlayer::stdin(format!("Player {:?}", side))),
    }
}

/// Play the game, echoing each move unless JSON output was requested
fn play_game(start: &Grid, a: &mut dyn MoveSource, b: &mut dyn MoveSource, quiet: bool) -> GameRecord {
    let mut grid = start.clone();
    if !quiet {
        println!("Start\n{}", grid);
    }
    play_with(&mut grid, a, b, |played, board| {
        if !quiet {
            println!("\n{}\n{}", describe_move(played), board);
        }
    })
}

fn report_results(start: &Grid, record: &GameRecord, json: bool) {
    if json {
        print_json_results(start, record);
    } else {
        print_text_results(record);
    }
}

// ============================================================================
// LEVEL 3 - HUMAN PLAYER
// ============================================================================

type LineSource = Box<dyn Iterator<Item = io::Result<String>>>;

/// Reads "row col" moves line by line
///
/// End of input, a read error, or a line that is not two indices forfeits the
/// game. An off-board or empty cell is passed through and loses as illegal.
pub struct HumanPlayer {
    name: String,
    lines: LineSource,
}

impl HumanPlayer {
    pub fn new<I>(name: impl Into<String>, lines: I) -> Self
    where
        I: Iterator<Item = io::Result<String>> + 'static,
    {
        Self {
            name: name.into(),
            lines: Box::new(lines),
        }
    }

    /// Player reading from standard input, prompting on stderr
    pub fn stdin(name: impl Into<String>) -> Self {
        // Stdin is locked per line so two people can share one terminal
        let lines = std::iter::from_fn(|| {
            let mut line = String::new();
            match io::stdin().read_line(&mut line) {
                Ok(0) => None,
                Ok(_) => Some(Ok(line)),
                Err(e) => Some(Err(e)),
            }
        });
        Self::new(name, lines)
    }
}

impl MoveSource for HumanPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(&mut self, _grid: &Grid) -> MoveChoice {
        eprint!("{} (row col): ", self.name);
        let _ = io::stderr().flush();

        match self.lines.next() {
            Some(Ok(line)) => match parse_move(&line) {
                Some(mv) => MoveChoice::Play(mv),
                None => {
                    tracing::warn!(player = %self.name, input = line.trim(), "malformed move");
                    MoveChoice::Forfeit
                }
            },
            Some(Err(e)) => {
                tracing::warn!(player = %self.name, error = %e, "failed to read move");
                MoveChoice::Forfeit
            }
            None => MoveChoice::Forfeit,
        }
    }
}

/// Accepts `2 3`, `2,3` and `(2, 3)`
fn parse_move(line: &str) -> Option<Move> {
    let cleaned = line.trim().trim_start_matches('(').trim_end_matches(')');
    let mut parts = cleaned
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty());
    let row = parts.next()?.parse().ok()?;
    let col = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Move::new(row, col))
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn describe_move(played: &PlayedMove) -> String {
    let suffix = if played.hinger { " (hinger!)" } else { "" };
    format!("{:?} removes at {}{}", played.side, played.mv, suffix)
}

/// Print results as JSON
fn print_json_results(start: &Grid, record: &GameRecord) {
    #[derive(Serialize)]
    struct JsonOutput<'a> {
        start: &'a Grid,
        outcome: &'a GameOutcome,
        winner: Option<Side>,
        total_moves: usize,
        moves: &'a [PlayedMove],
        final_grid: &'a Grid,
    }

    let output = JsonOutput {
        start,
        outcome: &record.outcome,
        winner: record.winner(),
        total_moves: record.moves.len(),
        moves: &record.moves,
        final_grid: &record.final_grid,
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(record: &GameRecord) {
    println!("\n=== Game Result ===");
    println!("Outcome:     {}", record.outcome);
    println!("Total moves: {}", record.moves.len());
    println!(
        "Hinger move: {}",
        record
            .moves
            .iter()
            .find(|m| m.hinger)
            .map_or_else(|| "none".to_string(), describe_move)
    );
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use hinger_core::WinReason;

    fn scripted_lines(input: &'static str) -> impl Iterator<Item = io::Result<String>> {
        input.lines().map(|line| Ok(line.to_string()))
    }

    #[test]
    fn test_parse_move_formats() {
        assert_eq!(parse_move("2 3\n"), Some(Move::new(2, 3)));
        assert_eq!(parse_move("2,3"), Some(Move::new(2, 3)));
        assert_eq!(parse_move(" (0, 4) "), Some(Move::new(0, 4)));
        assert_eq!(parse_move("2"), None);
        assert_eq!(parse_move("a b"), None);
        assert_eq!(parse_move("1 2 3"), None);
        assert_eq!(parse_move("-1 2"), None);
    }

    #[test]
    fn test_human_forfeits_on_garbage() {
        let g: Grid = "[[1,1]]".parse().unwrap();
        let mut human = HumanPlayer::new("P", scripted_lines("hello"));
        assert_eq!(human.choose_move(&g), MoveChoice::Forfeit);
        // Input exhausted
        assert_eq!(human.choose_move(&g), MoveChoice::Forfeit);
    }

    #[test]
    fn test_human_vs_agent_hinger_win() {
        let g: Grid = "[[1,0,1],[1,0,1],[1,1,1]]".parse().unwrap();
        let mut human = HumanPlayer::new("P", scripted_lines("2 1"));
        let mut agent = Agent::new(AgentConfig::default());

        let record = play_game(&g, &mut human, &mut agent, true);
        assert_eq!(
            record.outcome,
            GameOutcome::Win {
                winner: Side::A,
                reason: WinReason::Hinger
            }
        );
    }

    #[test]
    fn test_human_off_board_loses() {
        let g: Grid = "[[2,2],[2,2]]".parse().unwrap();
        let mut human = HumanPlayer::new("P", scripted_lines("5 5"));
        let mut agent = Agent::new(AgentConfig::default());

        let record = play_game(&g, &mut human, &mut agent, true);
        assert_eq!(
            record.outcome,
            GameOutcome::Win {
                winner: Side::B,
                reason: WinReason::IllegalMove
            }
        );
    }

    #[test]
    fn test_describe_move() {
        let played = PlayedMove {
            side: Side::B,
            mv: Move::new(1, 2),
            hinger: true,
        };
        assert_eq!(describe_move(&played), "B removes at (1, 2) (hinger!)");
    }
}
