//! Gobblet Gobblers search engine.
//!
//! Depth-bounded minimax with alpha-beta pruning over [`gobblet_core::Board`],
//! backed by a Zobrist-keyed transposition table.
//!
//! ```no_run
//! use gobblet_core::{Board, Player};
//! use gobblet_solver::solve_position;
//!
//! assert_eq!(solve_position(&Board::new(), 9), Some(Player::One));
//! ```

pub mod eval;
pub mod notation;
pub mod search;
pub mod stats;
pub mod tt;

pub use eval::{Evaluator, WIN_SCORE};
pub use search::{
    get_best_move, solve_position, winner_from_value, MoveOrdering, SearchConfig, SearchResult, Searcher,
};
pub use stats::SearchStats;
pub use tt::{Bound, TranspositionTable, TtEntry};
