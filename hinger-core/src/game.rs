//! Game rules and the two-player turn loop
//!
//! Players alternate removing one counter. Removing a hinger wins on the
//! spot; an illegal move, or having no move to offer, loses; clearing the
//! board without anyone playing a hinger is a draw. A game that starts on an
//! empty board is lost by A, who has nothing to play.

use crate::agent::Agent;
use crate::grid::{Grid, Move};
use crate::hinger::is_hinger;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

// ============================================================================
// RULE PRIMITIVES
// ============================================================================

/// (row, col) is on the board and holds at least one counter
pub fn is_legal_move(grid: &Grid, row: usize, col: usize) -> bool {
    grid.get(row, col).is_some_and(|v| v > 0)
}

/// Would removing a counter at (row, col) right now be a hinger move
pub fn is_hinger_now(grid: &Grid, row: usize, col: usize) -> bool {
    is_hinger(grid, row, col)
}

/// Commit a move to the live grid; the caller has checked legality
pub fn apply_move(grid: &mut Grid, row: usize, col: usize) {
    grid.decrement(row, col);
}

pub fn board_cleared(grid: &Grid) -> bool {
    grid.is_empty()
}

// ============================================================================
// MOVE SOURCES
// ============================================================================

/// What a move source decided for its turn
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveChoice {
    Play(Move),
    /// Nothing to offer (e.g. an agent facing an empty board)
    NoMove,
    /// Gave up, e.g. malformed input from a person
    Forfeit,
}

/// Anything that can produce a move for a position
pub trait MoveSource {
    fn name(&self) -> &str;

    fn choose_move(&mut self, grid: &Grid) -> MoveChoice;
}

impl MoveSource for Agent {
    fn name(&self) -> &str {
        Agent::name(self)
    }

    fn choose_move(&mut self, grid: &Grid) -> MoveChoice {
        match self.best_move(grid) {
            Some(mv) => MoveChoice::Play(mv),
            None => MoveChoice::NoMove,
        }
    }
}

/// Plays a pre-supplied sequence of moves, then forfeits
#[derive(Clone, Debug)]
pub struct ScriptedPlayer {
    name: String,
    moves: VecDeque<Move>,
}

impl ScriptedPlayer {
    pub fn new(name: impl Into<String>, moves: impl IntoIterator<Item = Move>) -> Self {
        Self {
            name: name.into(),
            moves: moves.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.moves.len()
    }
}

impl MoveSource for ScriptedPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(&mut self, _grid: &Grid) -> MoveChoice {
        match self.moves.pop_front() {
            Some(mv) => MoveChoice::Play(mv),
            None => MoveChoice::Forfeit,
        }
    }
}

// ============================================================================
// TURN LOOP
// ============================================================================

/// Seat at the table; A moves first
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// Why a game was won
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinReason {
    /// Winner removed a hinger
    Hinger,
    /// Loser named an empty or off-board cell
    IllegalMove,
    /// Loser had no move to offer
    NoMove,
    /// Loser gave up
    Forfeit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    Win { winner: Side, reason: WinReason },
    Draw,
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOutcome::Win { winner, reason } => write!(f, "{:?} wins ({:?})", winner, reason),
            GameOutcome::Draw => f.write_str("Draw"),
        }
    }
}

/// One applied move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayedMove {
    pub side: Side,
    pub mv: Move,
    pub hinger: bool,
}

/// Full record of a finished game
#[derive(Clone, Debug, Serialize)]
pub struct GameRecord {
    pub outcome: GameOutcome,
    pub moves: Vec<PlayedMove>,
    pub final_grid: Grid,
}

impl GameRecord {
    pub fn winner(&self) -> Option<Side> {
        match self.outcome {
            GameOutcome::Win { winner, .. } => Some(winner),
            GameOutcome::Draw => None,
        }
    }
}

/// Play `grid` out between `a` and `b`, mutating it in place
pub fn play(grid: &mut Grid, a: &mut dyn MoveSource, b: &mut dyn MoveSource) -> GameRecord {
    play_with(grid, a, b, |_, _| {})
}

/// [`play`], calling `on_move` after every applied move
pub fn play_with<F>(
    grid: &mut Grid,
    a: &mut dyn MoveSource,
    b: &mut dyn MoveSource,
    mut on_move: F,
) -> GameRecord
where
    F: FnMut(&PlayedMove, &Grid),
{
    let mut moves = Vec::new();
    let mut side = Side::A;

    let outcome = loop {
        let player: &mut dyn MoveSource = match side {
            Side::A => &mut *a,
            Side::B => &mut *b,
        };

        let mv = match player.choose_move(grid) {
            MoveChoice::Play(mv) => mv,
            MoveChoice::NoMove => break loss(side, WinReason::NoMove),
            MoveChoice::Forfeit => break loss(side, WinReason::Forfeit),
        };

        if !is_legal_move(grid, mv.row, mv.col) {
            tracing::info!(player = player.name(), %mv, "illegal move");
            break loss(side, WinReason::IllegalMove);
        }

        // Hinger status belongs to the board before the counter is removed
        let hinger = is_hinger_now(grid, mv.row, mv.col);
        apply_move(grid, mv.row, mv.col);

        let played = PlayedMove { side, mv, hinger };
        tracing::debug!(player = player.name(), %mv, hinger, "move applied");
        on_move(&played, grid);
        moves.push(played);

        if hinger {
            break GameOutcome::Win {
                winner: side,
                reason: WinReason::Hinger,
            };
        }
        if board_cleared(grid) {
            break GameOutcome::Draw;
        }

        side = side.opponent();
    };

    GameRecord {
        outcome,
        moves,
        final_grid: grid.clone(),
    }
}

fn loss(loser: Side, reason: WinReason) -> GameOutcome {
    GameOutcome::Win {
        winner: loser.opponent(),
        reason,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentConfig;

    fn grid(rows: &[&[i64]]) -> Grid {
        Grid::new(rows).unwrap()
    }

    fn agent(name: &str) -> Agent {
        Agent::new(AgentConfig::default().with_name(name))
    }

    #[test]
    fn test_rule_primitives() {
        let mut g = grid(&[&[1, 0, 1], &[1, 0, 1], &[1, 1, 1]]);
        assert!(is_legal_move(&g, 0, 0));
        assert!(!is_legal_move(&g, 0, 1));
        assert!(!is_legal_move(&g, 3, 0));
        assert!(is_hinger_now(&g, 2, 1));

        apply_move(&mut g, 2, 1);
        assert_eq!(g.get(2, 1), Some(0));
        assert!(!board_cleared(&g));
        assert!(board_cleared(&grid(&[&[0]])));
    }

    #[test]
    fn test_first_agent_wins_with_hinger() {
        let mut g = grid(&[&[1, 0, 1], &[1, 0, 1], &[1, 1, 1]]);
        let mut a = agent("AgentA");
        let mut b = agent("AgentB");

        let record = play(&mut g, &mut a, &mut b);
        assert_eq!(
            record.outcome,
            GameOutcome::Win {
                winner: Side::A,
                reason: WinReason::Hinger
            }
        );
        assert_eq!(record.moves.len(), 1);
        assert!(record.moves[0].hinger);
    }

    #[test]
    fn test_clearing_without_hinger_is_draw() {
        // Flatten every stack, then peel the single counters off in an order
        // that never splits a region
        let script = [
            (0, 0), (0, 1), (1, 0), (1, 1), (1, 2), (2, 1), (2, 2),
            (0, 0), (0, 1), (1, 0), (1, 1), (1, 2), (2, 1), (2, 2),
        ]
        .map(|(r, c)| Move::new(r, c));
        let a_moves: Vec<Move> = script.iter().copied().step_by(2).collect();
        let b_moves: Vec<Move> = script.iter().copied().skip(1).step_by(2).collect();

        let mut g = grid(&[&[2, 2, 0], &[2, 2, 2], &[0, 2, 2]]);
        let mut a = ScriptedPlayer::new("A", a_moves);
        let mut b = ScriptedPlayer::new("B", b_moves);

        let record = play(&mut g, &mut a, &mut b);
        assert_eq!(record.outcome, GameOutcome::Draw);
        assert_eq!(record.moves.len(), 14);
        assert!(record.moves.iter().all(|m| !m.hinger));
        assert!(record.final_grid.is_empty());
        assert_eq!(a.remaining() + b.remaining(), 0);
    }

    #[test]
    fn test_illegal_move_loses() {
        let mut g = grid(&[&[1, 1], &[1, 1]]);
        let mut bad = ScriptedPlayer::new("BadAgent", [Move::new(7, 99)]);
        let mut good = agent("GoodAgent");

        let record = play(&mut g, &mut bad, &mut good);
        assert_eq!(
            record.outcome,
            GameOutcome::Win {
                winner: Side::B,
                reason: WinReason::IllegalMove
            }
        );
        assert!(record.moves.is_empty());
        assert_eq!(record.final_grid, grid(&[&[1, 1], &[1, 1]]));
    }

    #[test]
    fn test_empty_script_forfeits() {
        let mut g = grid(&[&[2]]);
        let mut a = ScriptedPlayer::new("A", [Move::new(0, 0)]);
        let mut b = ScriptedPlayer::new("B", Vec::new());

        let record = play(&mut g, &mut a, &mut b);
        assert_eq!(record.winner(), Some(Side::A));
        assert!(matches!(
            record.outcome,
            GameOutcome::Win { reason: WinReason::Forfeit, .. }
        ));
    }

    #[test]
    fn test_empty_start_first_player_loses() {
        let mut g = grid(&[&[0, 0], &[0, 0]]);
        let mut a = agent("AgentA");
        let mut b = agent("AgentB");

        let record = play(&mut g, &mut a, &mut b);
        assert_eq!(
            record.outcome,
            GameOutcome::Win {
                winner: Side::B,
                reason: WinReason::NoMove
            }
        );
        assert!(record.moves.is_empty());
    }

    #[test]
    fn test_callback_sees_every_move() {
        let mut g = grid(&[&[1, 1]]);
        let mut a = ScriptedPlayer::new("A", [Move::new(0, 0)]);
        let mut b = ScriptedPlayer::new("B", [Move::new(0, 1)]);

        let mut seen = Vec::new();
        let record = play_with(&mut g, &mut a, &mut b, |played, board| {
            seen.push((played.side, board.total_counters()));
        });
        assert_eq!(seen, vec![(Side::A, 1), (Side::B, 0)]);
        assert_eq!(record.outcome, GameOutcome::Draw);
    }

    #[test]
    fn test_agents_finish_any_game() {
        let mut g = grid(&[&[2, 1, 0], &[1, 2, 1], &[0, 1, 2]]);
        let mut a = Agent::new(AgentConfig::default().with_name("A").with_depth(2));
        let mut b = Agent::new(AgentConfig::default().with_name("B").with_depth(2));
        let start = g.total_counters() as usize;

        let record = play(&mut g, &mut a, &mut b);
        assert!(record.moves.len() <= start);
        if record.outcome == GameOutcome::Draw {
            assert!(record.final_grid.is_empty());
        } else {
            assert!(record.moves.last().unwrap().hinger);
        }
    }
}
