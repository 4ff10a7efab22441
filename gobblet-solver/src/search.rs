//! Depth-bounded minimax with alpha-beta pruning and a transposition table.
//!
//! The search is fail-soft: a node's returned value may lie outside the
//! window it was given, and the table records on which side of the window it
//! fell. Player One maximizes, Player Two minimizes.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use gobblet_core::{Board, Move, MoveList, Player};

use crate::eval::{Evaluator, WIN_SCORE};
use crate::stats::SearchStats;
use crate::tt::{Bound, TranspositionTable};

/// Order in which a node's children are searched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MoveOrdering {
    /// Generation order.
    Natural,
    /// Table move first, then by one-ply evaluation, best for the mover first.
    #[default]
    Heuristic,
    /// Random permutation from an explicitly seeded generator.
    Shuffled { seed: u64 },
}

/// Search switches. Every combination computes the same root value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Alpha-beta cutoffs; off gives plain minimax.
    pub pruning: bool,
    /// Transposition table lookups and stores.
    pub use_table: bool,
    pub ordering: MoveOrdering,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            pruning: true,
            use_table: true,
            ordering: MoveOrdering::Heuristic,
        }
    }
}

/// Outcome of a root search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    /// Minimax value from Player One's point of view.
    pub value: i32,
    /// `None` if the root had no move to make (won, stalemated, or depth 0).
    pub best_move: Option<Move>,
    /// Forced winner within the searched depth.
    pub winner: Option<Player>,
}

/// Forced winner implied by a search value, if any.
pub fn winner_from_value(value: i32) -> Option<Player> {
    if value >= WIN_SCORE {
        Some(Player::One)
    } else if value <= -WIN_SCORE {
        Some(Player::Two)
    } else {
        None
    }
}

/// One search session: owns the table, which is emptied at the start of
/// every [`Searcher::search`] so each root result matches a fresh searcher.
/// The table of the most recent search stays readable until the next one.
#[derive(Debug)]
pub struct Searcher {
    config: SearchConfig,
    evaluator: Evaluator,
    table: TranspositionTable,
    stats: SearchStats,
    rng: Option<StdRng>,
}

impl Searcher {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            evaluator: Evaluator::new(),
            table: TranspositionTable::new(),
            stats: SearchStats::default(),
            rng: None,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn table(&self) -> &TranspositionTable {
        &self.table
    }

    /// Statistics of the most recent search.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Search `board` to `max_depth` plies. The caller's board is not
    /// touched; the search works on one private copy.
    #[instrument(skip(self, board), fields(hash = board.hash(), to_move = %board.active_player()))]
    pub fn search(&mut self, board: &Board, max_depth: u32) -> SearchResult {
        let mut board = board.clone();
        self.table.clear();
        self.stats = SearchStats::new();
        if let MoveOrdering::Shuffled { seed } = self.config.ordering {
            self.rng = Some(StdRng::seed_from_u64(seed));
        }

        let (value, best_move) = self.alpha_beta(&mut board, max_depth, i32::MIN, i32::MAX);
        let result = SearchResult {
            value,
            best_move,
            winner: winner_from_value(value),
        };

        debug!(value, best_move = ?result.best_move, winner = ?result.winner, "root searched");
        self.stats.log_summary(self.table.len());
        result
    }

    /// Best move for the side to move, or `None` if it has none.
    pub fn best_move(&mut self, board: &Board, max_depth: u32) -> Option<Move> {
        self.search(board, max_depth).best_move
    }

    /// Forced winner within `max_depth` plies, or `None` if undetermined.
    pub fn solve(&mut self, board: &Board, max_depth: u32) -> Option<Player> {
        self.search(board, max_depth).winner
    }

    fn alpha_beta(&mut self, board: &mut Board, depth: u32, mut alpha: i32, mut beta: i32) -> (i32, Option<Move>) {
        self.stats.nodes += 1;
        let hash = board.hash();

        if self.config.use_table {
            // Leaf entries carry no move and are never reused.
            if let Some((value, Some(mov))) = self.table.lookup(hash, depth, alpha, beta) {
                if board.is_legal(mov) {
                    self.stats.table_hits += 1;
                    return (value, Some(mov));
                }
            }
        }

        let winner = board.check_win();
        if depth == 0 || winner.is_some() {
            if let Some(winner) = winner {
                self.stats.terminal_wins[winner.index()] += 1;
            }
            self.stats.leaves += 1;
            let value = self.evaluator.evaluate(board, depth);
            self.store(hash, value, depth, Bound::Exact, None);
            return (value, None);
        }

        let mut moves = board.legal_moves();
        if moves.is_empty() {
            self.stats.no_move_losses += 1;
            let value = self.evaluator.no_moves(board, depth);
            self.store(hash, value, depth, Bound::Exact, None);
            return (value, None);
        }

        let hash_move = if self.config.use_table {
            self.table.best_move(hash)
        } else {
            None
        };
        self.order_moves(board, &mut moves, hash_move);

        let maximizing = board.active_player() == Player::One;
        let (alpha0, beta0) = (alpha, beta);
        let mut best_value = if maximizing { i32::MIN } else { i32::MAX };
        let mut best_move = None;

        for &mov in &moves {
            board.must_make_move(mov);
            let (value, _) = self.alpha_beta(board, depth - 1, alpha, beta);
            board.undo_move(mov);

            if maximizing {
                if value > best_value {
                    best_value = value;
                    best_move = Some(mov);
                }
                alpha = alpha.max(best_value);
            } else {
                if value < best_value {
                    best_value = value;
                    best_move = Some(mov);
                }
                beta = beta.min(best_value);
            }

            if self.config.pruning && beta <= alpha {
                self.stats.cutoffs += 1;
                break;
            }
        }

        let bound = Bound::classify(best_value, alpha0, beta0);
        self.store(hash, best_value, depth, bound, best_move);
        (best_value, best_move)
    }

    #[inline]
    fn store(&mut self, hash: u64, value: i32, depth: u32, bound: Bound, best_move: Option<Move>) {
        if self.config.use_table {
            self.table.store(hash, value, depth, bound, best_move);
        }
    }

    fn order_moves(&mut self, board: &mut Board, moves: &mut MoveList, hash_move: Option<Move>) {
        match self.config.ordering {
            MoveOrdering::Natural => {}
            MoveOrdering::Heuristic => {
                let evaluator = self.evaluator;
                let maximizing = board.active_player() == Player::One;
                moves.as_mut_slice().sort_by_cached_key(|&mov| {
                    let score = evaluator.score_move(board, mov);
                    (Some(mov) != hash_move, if maximizing { -score } else { score })
                });
            }
            MoveOrdering::Shuffled { .. } => {
                if let Some(rng) = self.rng.as_mut() {
                    moves.as_mut_slice().shuffle(rng);
                }
            }
        }
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

/// Best move for the side to move with a fresh default searcher.
pub fn get_best_move(board: &Board, max_depth: u32) -> Option<Move> {
    Searcher::default().best_move(board, max_depth)
}

/// Forced winner within `max_depth` plies with a fresh default searcher.
/// `None` means no forced result was found at that depth.
pub fn solve_position(board: &Board, max_depth: u32) -> Option<Player> {
    Searcher::default().solve(board, max_depth)
}
