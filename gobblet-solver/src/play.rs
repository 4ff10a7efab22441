//! Interactive game loop.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use tracing::info;

use gobblet_core::{Board, Player};
use gobblet_solver::notation::parse_move;
use gobblet_solver::{SearchConfig, Searcher};

/// Play a game on stdin/stdout, `human` against the engine.
pub fn run(human: Player, depth: u32, config: SearchConfig, show_stats: bool) -> Result<()> {
    let mut board = Board::new();
    let mut searcher = Searcher::new(config);
    let mut lines = io::stdin().lock().lines();

    info!(%human, depth, "starting game");
    println!("You are {human}. Enter moves as \"b2 S\" (place) or \"b1 a0\" (relocate), \"quit\" to stop.");

    loop {
        println!("\n{board}");

        if let Some(winner) = board.check_win() {
            println!("{winner} wins!");
            return Ok(());
        }
        let to_move = board.active_player();
        if !board.has_any_legal_move() {
            println!("{to_move} has no legal move. {} wins!", to_move.opponent());
            return Ok(());
        }

        if to_move == human {
            print!("Your move: ");
            io::stdout().flush()?;

            let Some(line) = lines.next() else {
                println!();
                return Ok(());
            };
            let line = line?;
            let text = line.trim();
            if text.eq_ignore_ascii_case("quit") {
                return Ok(());
            }

            match parse_move(text, human) {
                Ok(mov) => {
                    if let Err(err) = board.make_move(mov) {
                        println!("Illegal move: {err}");
                    }
                }
                Err(err) => println!("{err}"),
            }
        } else {
            let result = searcher.search(&board, depth);
            let mov = result.best_move.context("engine returned no move")?;
            println!("{to_move} plays {mov} (eval {})", result.value);
            if show_stats {
                searcher.stats().print_summary(searcher.table().len());
            }
            board.make_move(mov)?;
        }
    }
}
