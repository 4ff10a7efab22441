//! Search configuration equivalence
//!
//! Pruning, the transposition table and move ordering only change how much
//! of the tree is visited, never the root value. Positions come from seeded
//! random playouts. Relocations let a position recur at a different remaining
//! depth within one search, so the deeper cases here cover table reuse
//! across transpositions.

use gobblet_core::{Board, Move, Pos, Size};
use gobblet_solver::{MoveOrdering, SearchConfig, Searcher};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const POSITIONS: usize = 40;

fn random_position(rng: &mut StdRng) -> Board {
    let mut board = Board::new();
    let plies = rng.random_range(0..10);
    for _ in 0..plies {
        let moves = board.legal_moves();
        if moves.is_empty() {
            break;
        }
        board.must_make_move(moves.get(rng.random_range(0..moves.len())));
    }
    board
}

fn plain_minimax() -> SearchConfig {
    SearchConfig {
        pruning: false,
        use_table: false,
        ordering: MoveOrdering::Natural,
    }
}

fn value(config: SearchConfig, board: &Board, depth: u32) -> i32 {
    Searcher::new(config).search(board, depth).value
}

#[test]
fn test_alpha_beta_matches_minimax() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..POSITIONS {
        let board = random_position(&mut rng);
        for depth in 1..=3 {
            let pruned = SearchConfig {
                use_table: false,
                ..SearchConfig::default()
            };
            assert_eq!(
                value(pruned, &board, depth),
                value(plain_minimax(), &board, depth),
                "depth {depth}:\n{board}"
            );
        }
    }
}

#[test]
fn test_table_is_transparent() {
    let mut rng = StdRng::seed_from_u64(77);
    for _ in 0..POSITIONS {
        let board = random_position(&mut rng);
        for depth in 1..=3 {
            let with_table = SearchConfig::default();
            let without_table = SearchConfig {
                use_table: false,
                ..SearchConfig::default()
            };
            assert_eq!(
                value(with_table, &board, depth),
                value(without_table, &board, depth),
                "depth {depth}:\n{board}"
            );
        }
    }
}

#[test]
fn test_table_is_transparent_at_depth() {
    let mut rng = StdRng::seed_from_u64(78);
    for _ in 0..10 {
        let board = random_position(&mut rng);
        for depth in 5..=6 {
            let without_table = SearchConfig {
                use_table: false,
                ..SearchConfig::default()
            };
            assert_eq!(
                value(SearchConfig::default(), &board, depth),
                value(without_table, &board, depth),
                "depth {depth}:\n{board}"
            );
        }
    }
}

#[test]
fn test_table_is_transparent_after_transposition() {
    // Relocations reach the same position at several remaining depths here.
    let mut board = Board::new();
    for (row, col, size) in [(0, 1, Size::Small), (1, 0, Size::Large), (1, 1, Size::Large)] {
        let mov = Move::place(board.active_player(), Pos::new(row, col), size);
        board.make_move(mov).unwrap();
    }
    for depth in 5..=6 {
        let without_table = SearchConfig {
            use_table: false,
            ..SearchConfig::default()
        };
        assert_eq!(
            value(SearchConfig::default(), &board, depth),
            value(without_table, &board, depth),
            "depth {depth}"
        );
    }
}

#[test]
fn test_ordering_does_not_change_value() {
    let mut rng = StdRng::seed_from_u64(5);
    for i in 0..POSITIONS {
        let board = random_position(&mut rng);
        let reference = value(plain_minimax(), &board, 3);
        for ordering in [
            MoveOrdering::Natural,
            MoveOrdering::Heuristic,
            MoveOrdering::Shuffled { seed: i as u64 },
        ] {
            let config = SearchConfig {
                ordering,
                ..SearchConfig::default()
            };
            assert_eq!(value(config, &board, 3), reference, "{ordering:?}:\n{board}");
        }
    }
}

#[test]
fn test_all_switches_agree_at_depth_four() {
    let mut rng = StdRng::seed_from_u64(404);
    for _ in 0..8 {
        let board = random_position(&mut rng);
        let reference = value(plain_minimax(), &board, 4);
        assert_eq!(value(SearchConfig::default(), &board, 4), reference, "\n{board}");
    }
}

#[test]
fn test_best_move_is_always_legal() {
    let mut rng = StdRng::seed_from_u64(31);
    for _ in 0..POSITIONS {
        let board = random_position(&mut rng);
        let result = Searcher::default().search(&board, 3);
        match result.best_move {
            Some(mov) => assert!(board.is_legal(mov), "{mov} illegal:\n{board}"),
            None => assert!(board.check_win().is_some() || !board.has_any_legal_move()),
        }
    }
}
