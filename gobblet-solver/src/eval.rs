//! Static evaluation.
//!
//! Scores are from Player One's point of view: positive favours Player One.

use gobblet_core::{Board, Move, Player, WIN_LINES};

/// Base score of a won position. Wins are biased by the remaining depth so
/// that faster wins and slower losses are preferred.
pub const WIN_SCORE: i32 = 1000;

/// Position evaluator used at search leaves and for move ordering.
#[derive(Clone, Copy, Debug, Default)]
pub struct Evaluator;

impl Evaluator {
    pub fn new() -> Self {
        Evaluator
    }

    /// Terminal score if the game is won, otherwise the line heuristic.
    pub fn evaluate(&self, board: &Board, depth_remaining: u32) -> i32 {
        match board.check_win() {
            Some(winner) => win_for(winner, depth_remaining),
            None => self.heuristic(board),
        }
    }

    /// Score of a position where the side to move has no legal move: a loss
    /// for that side.
    pub fn no_moves(&self, board: &Board, depth_remaining: u32) -> i32 {
        win_for(board.active_player().opponent(), depth_remaining)
    }

    /// Sum over the eight lines of the visible pieces' potential.
    ///
    /// A line with both owners visible is dead. Two pieces of one owner and
    /// an empty square score 100, one piece and two empty squares score 10.
    /// The total never exceeds 800 in magnitude, well short of `WIN_SCORE`.
    pub fn heuristic(&self, board: &Board) -> i32 {
        WIN_LINES
            .iter()
            .map(|line| {
                let mut counts = [0u8; 2];
                for &pos in line {
                    if let Some(piece) = board.top_piece(pos) {
                        counts[piece.owner.index()] += 1;
                    }
                }
                match counts {
                    [2, 0] => 100,
                    [1, 0] => 10,
                    [0, 2] => -100,
                    [0, 1] => -10,
                    _ => 0,
                }
            })
            .sum()
    }

    /// Score the position one ply after `mov`, for move ordering.
    ///
    /// The board is restored before returning.
    pub fn score_move(&self, board: &mut Board, mov: Move) -> i32 {
        board.must_make_move(mov);
        let score = self.evaluate(board, 0);
        board.undo_move(mov);
        score
    }
}

fn win_for(winner: Player, depth_remaining: u32) -> i32 {
    // Saturates so the negation below cannot overflow.
    let bias = i32::try_from(depth_remaining).unwrap_or(i32::MAX);
    let score = WIN_SCORE.saturating_add(bias);
    match winner {
        Player::One => score,
        Player::Two => -score,
    }
}
